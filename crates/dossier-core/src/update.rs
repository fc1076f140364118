//! Partial update of a dossier description.
//!
//! # Design
//! - Validate, authenticate, look up, check status, authorize, update, audit; strictly
//!   in that order.
//! - Every precondition failure returns before any write happens.
//! - The audit write runs only after the repository accepted the update. A failed
//!   audit write is logged and counted; it does not undo the update.

use chrono::Utc;
use dossier_config::DossierSettings;
use dossier_telemetry::{Metrics, UpdateOutcomeLabel, current_route};
use tracing::{Instrument, info, info_span, warn};

use crate::error::{DossierError, DossierResult};
use crate::model::{
    AuditRecord, DossierDescriptionRequest, DossierLookup, DossierMetadata, PartialUpdateCommand,
    UpdateOutcome,
};
use crate::service::Collaborators;

/// Orchestrates the description update against the collaborators.
#[derive(Clone)]
pub struct PartialUpdateDossierService {
    collaborators: Collaborators,
    settings: DossierSettings,
    metrics: Metrics,
}

impl PartialUpdateDossierService {
    /// Wire the service with its collaborators and lookup settings.
    #[must_use]
    pub const fn new(
        collaborators: Collaborators,
        settings: DossierSettings,
        metrics: Metrics,
    ) -> Self {
        Self {
            collaborators,
            settings,
            metrics,
        }
    }

    /// Apply `request` to the dossier identified by `dossier_id` on behalf of `consumer_id`.
    ///
    /// # Errors
    ///
    /// - [`DossierError::InvalidRequest`] when the description is blank or too long.
    /// - [`DossierError::Authentication`] when the identity cannot be resolved.
    /// - [`DossierError::NotFound`] / [`DossierError::Lookup`] when the search finds nothing or fails.
    /// - [`DossierError::AlreadyClosed`] when the dossier status is closed.
    /// - [`DossierError::AccessDenied`] / [`DossierError::Authorization`] when the policy
    ///   does not permit or cannot decide.
    /// - [`DossierError::Update`] when the content repository rejects the update.
    pub async fn partial_update_by_patch(
        &self,
        consumer_id: &str,
        trace_id: &str,
        dossier_id: &str,
        request: &DossierDescriptionRequest,
    ) -> DossierResult<UpdateOutcome> {
        let span = info_span!(
            "dossier.partial_update",
            trace_id,
            dossier_id,
            route = %active_route()
        );
        let result = self
            .apply(consumer_id, trace_id, dossier_id, request)
            .instrument(span)
            .await;
        self.metrics.inc_dossier_update(match &result {
            Ok(_) => UpdateOutcomeLabel::Updated,
            Err(err) => outcome_label(err),
        });
        if let Err(err) = &result {
            warn!(
                trace_id,
                dossier_id,
                code = err.code(),
                error = %err,
                "dossier partial update rejected"
            );
        }
        result
    }

    async fn apply(
        &self,
        consumer_id: &str,
        trace_id: &str,
        dossier_id: &str,
        request: &DossierDescriptionRequest,
    ) -> DossierResult<UpdateOutcome> {
        request.validate()?;

        let actor_id = self
            .collaborators
            .identity
            .validate_user(consumer_id, trace_id)
            .await
            .map_err(|err| DossierError::Authentication {
                consumer_id: consumer_id.to_string(),
                source: err.into(),
            })?;

        let metadata = self.lookup(&actor_id, trace_id, dossier_id).await?;
        self.ensure_open(&metadata, dossier_id)?;

        let resource = self.collaborators.resources.map_resource(
            &metadata,
            &self.settings.resource_type,
            &self.settings.action,
        );
        let decision = self
            .collaborators
            .policy
            .decide(&resource, trace_id, &actor_id)
            .await
            .map_err(|err| DossierError::Authorization {
                dossier_id: dossier_id.to_string(),
                source: err.into(),
            })?;
        if !decision.is_permit() {
            return Err(DossierError::AccessDenied {
                actor_id,
                role: decision.role,
            });
        }

        let command = PartialUpdateCommand::description(
            self.repository_uid(&metadata, dossier_id),
            request.description.clone(),
        );
        self.collaborators
            .repository
            .partial_update(&command, &actor_id, trace_id)
            .await
            .map_err(|err| DossierError::Update {
                dossier_id: dossier_id.to_string(),
                source: err.into(),
            })?;
        info!(
            trace_id,
            dossier_id,
            actor_id = %actor_id,
            uid = %command.uid,
            "dossier description updated"
        );

        let audited = self.audit(request, &actor_id, trace_id, dossier_id).await;

        Ok(UpdateOutcome {
            dossier_id: dossier_id.to_string(),
            actor_id,
            role: decision.role,
            audited,
        })
    }

    async fn lookup(
        &self,
        actor_id: &str,
        trace_id: &str,
        dossier_id: &str,
    ) -> DossierResult<DossierMetadata> {
        let lookup = DossierLookup {
            actor_id,
            dossier_id,
            id_field: &self.settings.id_field,
            index: &self.settings.search_index,
            trace_id,
        };
        self.collaborators
            .search
            .find_dossier(&lookup)
            .await
            .map_err(|err| DossierError::Lookup {
                dossier_id: dossier_id.to_string(),
                source: err.into(),
            })?
            .ok_or_else(|| DossierError::NotFound {
                dossier_id: dossier_id.to_string(),
            })
    }

    fn ensure_open(&self, metadata: &DossierMetadata, dossier_id: &str) -> DossierResult<()> {
        let Some(status) = metadata.status(&self.settings.status_field) else {
            return Ok(());
        };
        if self.settings.is_closed_status(status) {
            return Err(DossierError::AlreadyClosed {
                dossier_id: dossier_id.to_string(),
            });
        }
        Ok(())
    }

    fn repository_uid(&self, metadata: &DossierMetadata, dossier_id: &str) -> String {
        metadata
            .get_str(&self.settings.repository_id_field)
            .filter(|uid| !uid.trim().is_empty())
            .unwrap_or(dossier_id)
            .to_string()
    }

    async fn audit(
        &self,
        request: &DossierDescriptionRequest,
        actor_id: &str,
        trace_id: &str,
        dossier_id: &str,
    ) -> bool {
        let payload = match serde_json::to_value(request) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(trace_id, dossier_id, error = %err, "failed to encode audit payload");
                serde_json::Value::Null
            }
        };
        let record = AuditRecord {
            actor_id: actor_id.to_string(),
            trace_id: trace_id.to_string(),
            dossier_id: dossier_id.to_string(),
            action: self.settings.action.clone(),
            payload,
            recorded_at: Utc::now(),
        };
        match self.collaborators.audit.record(&record).await {
            Ok(()) => true,
            Err(err) => {
                self.metrics.inc_audit_failure();
                warn!(
                    trace_id,
                    dossier_id,
                    actor_id,
                    error = %err,
                    "audit write failed after dossier update"
                );
                false
            }
        }
    }
}

fn active_route() -> String {
    current_route().unwrap_or_else(|| "-".to_string())
}

const fn outcome_label(err: &DossierError) -> UpdateOutcomeLabel {
    match err {
        DossierError::InvalidRequest { .. } => UpdateOutcomeLabel::Invalid,
        DossierError::Authentication { .. } => UpdateOutcomeLabel::Unauthenticated,
        DossierError::NotFound { .. } => UpdateOutcomeLabel::NotFound,
        DossierError::Lookup { .. } => UpdateOutcomeLabel::LookupFailed,
        DossierError::AlreadyClosed { .. } => UpdateOutcomeLabel::Closed,
        DossierError::AccessDenied { .. } => UpdateOutcomeLabel::Denied,
        DossierError::Authorization { .. } => UpdateOutcomeLabel::AuthorizationFailed,
        DossierError::Update { .. } => UpdateOutcomeLabel::UpdateFailed,
    }
}
