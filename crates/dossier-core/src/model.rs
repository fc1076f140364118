//! Request, metadata, and decision DTOs exchanged with the collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DossierError, DossierResult};

/// Upper bound on the description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 4000;

/// Caller-supplied description to apply to a dossier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierDescriptionRequest {
    /// Free-text description.
    pub description: String,
}

impl DossierDescriptionRequest {
    /// Build a request from a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Reject blank or oversized descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::InvalidRequest`] naming the `description` field.
    pub fn validate(&self) -> DossierResult<()> {
        if self.description.trim().is_empty() {
            return Err(DossierError::InvalidRequest {
                field: "description",
                reason: "blank",
            });
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(DossierError::InvalidRequest {
                field: "description",
                reason: "too_long",
            });
        }
        Ok(())
    }
}

/// Search parameters used to locate a dossier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DossierLookup<'a> {
    /// Actor on whose behalf the search runs.
    pub actor_id: &'a str,
    /// Dossier identifier to match.
    pub dossier_id: &'a str,
    /// Metadata field matched against `dossier_id`.
    pub id_field: &'a str,
    /// Search index to query.
    pub index: &'a str,
    /// Correlation token.
    pub trace_id: &'a str,
}

/// Metadata record returned by the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DossierMetadata {
    fields: Map<String, Value>,
}

impl DossierMetadata {
    /// Wrap a raw attribute map.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Attribute value when it is a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Replace an attribute value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Dossier status read from `status_field`, trimmed; blank counts as absent.
    #[must_use]
    pub fn status(&self, status_field: &str) -> Option<&str> {
        self.get_str(status_field)
            .map(str::trim)
            .filter(|status| !status.is_empty())
    }

    /// All attributes.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Authorization resource descriptor derived from dossier metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type, e.g. `DOSSIER`.
    pub resource_type: String,
    /// Action requested on the resource, e.g. `UPDATE_DOSSIER`.
    pub action: String,
    /// Attributes the policy may evaluate.
    pub attributes: Map<String, Value>,
}

/// Effect of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionEffect {
    /// The action is allowed.
    Permit,
    /// The action is refused.
    Deny,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Permit or deny.
    pub effect: DecisionEffect,
    /// Role or context label attached by the policy service.
    pub role: Option<String>,
}

impl Decision {
    /// Permit decision carrying a role label.
    #[must_use]
    pub fn permit(role: impl Into<String>) -> Self {
        Self {
            effect: DecisionEffect::Permit,
            role: Some(role.into()),
        }
    }

    /// Deny decision carrying a role label.
    #[must_use]
    pub fn deny(role: impl Into<String>) -> Self {
        Self {
            effect: DecisionEffect::Deny,
            role: Some(role.into()),
        }
    }

    /// Returns `true` for a permit decision.
    #[must_use]
    pub fn is_permit(&self) -> bool {
        self.effect == DecisionEffect::Permit
    }
}

/// Properties changed by a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUpdateProperties {
    /// New description.
    pub description: String,
}

/// Partial update instruction sent to the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUpdateCommand {
    /// Entity type understood by the repository.
    #[serde(rename = "entity-type")]
    pub entity_type: String,
    /// Repository document identifier.
    pub uid: String,
    /// Properties to change.
    pub properties: PartialUpdateProperties,
}

impl PartialUpdateCommand {
    /// Entity type used for dossier documents.
    pub const DOCUMENT_ENTITY: &'static str = "document";

    /// Build a description update for `uid`.
    #[must_use]
    pub fn description(uid: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            entity_type: Self::DOCUMENT_ENTITY.to_string(),
            uid: uid.into(),
            properties: PartialUpdateProperties {
                description: description.into(),
            },
        }
    }
}

/// Audit entry written after a successful update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Actor who performed the action.
    pub actor_id: String,
    /// Correlation token.
    pub trace_id: String,
    /// Dossier the action applied to.
    pub dossier_id: String,
    /// Action name.
    pub action: String,
    /// Request payload as received.
    pub payload: Value,
    /// Time the record was produced.
    pub recorded_at: DateTime<Utc>,
}

/// Result of a successful partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Updated dossier.
    pub dossier_id: String,
    /// Actor who performed the update.
    pub actor_id: String,
    /// Role reported by the policy decision.
    pub role: Option<String>,
    /// Whether the audit record was written.
    pub audited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_description_is_rejected() {
        let err = DossierDescriptionRequest::new("   ").validate();
        assert!(matches!(
            err,
            Err(DossierError::InvalidRequest {
                field: "description",
                reason: "blank"
            })
        ));
    }

    #[test]
    fn oversized_description_is_rejected() {
        let request = DossierDescriptionRequest::new("x".repeat(MAX_DESCRIPTION_CHARS + 1));
        assert!(matches!(
            request.validate(),
            Err(DossierError::InvalidRequest {
                reason: "too_long",
                ..
            })
        ));
        assert!(
            DossierDescriptionRequest::new("x".repeat(MAX_DESCRIPTION_CHARS))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn status_is_trimmed_and_blank_is_absent() {
        let metadata = DossierMetadata::default()
            .with("dossierStatus", " CLOSED ")
            .with("blank", "  ")
            .with("numeric", 3);
        assert_eq!(metadata.status("dossierStatus"), Some("CLOSED"));
        assert_eq!(metadata.status("blank"), None);
        assert_eq!(metadata.status("numeric"), None);
        assert_eq!(metadata.status("missing"), None);
    }

    #[test]
    fn decisions_report_permit() {
        assert!(Decision::permit("editor").is_permit());
        assert!(!Decision::deny("viewer").is_permit());
    }

    #[test]
    fn update_command_serialises_entity_type_key() -> Result<(), serde_json::Error> {
        let command = PartialUpdateCommand::description("doc-7", "Updated");
        let value = serde_json::to_value(&command)?;
        assert_eq!(
            value,
            json!({
                "entity-type": "document",
                "uid": "doc-7",
                "properties": { "description": "Updated" }
            })
        );
        Ok(())
    }

    #[test]
    fn metadata_serialises_as_flat_object() -> Result<(), serde_json::Error> {
        let metadata = DossierMetadata::default()
            .with("uniqueId", "d-1")
            .with("dossierStatus", "open");
        let value = serde_json::to_value(&metadata)?;
        assert_eq!(value, json!({ "uniqueId": "d-1", "dossierStatus": "open" }));
        Ok(())
    }
}
