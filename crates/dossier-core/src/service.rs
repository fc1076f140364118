//! Collaborator traits consumed by the partial update workflow.
//!
//! Implementations live outside this crate; tests use scripted doubles and the
//! application binary wires in-memory ones.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{
    AuditRecord, Decision, DossierLookup, DossierMetadata, PartialUpdateCommand, Resource,
};

/// Resolves the acting identity behind a consumer identifier.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    /// Return the actor id for `consumer_id`; any error is an authentication failure.
    async fn validate_user(&self, consumer_id: &str, trace_id: &str) -> anyhow::Result<String>;
}

/// Looks dossiers up in the search index.
#[async_trait]
pub trait DossierSearch: Send + Sync {
    /// Return the dossier metadata, or `None` when no record matches.
    async fn find_dossier(
        &self,
        lookup: &DossierLookup<'_>,
    ) -> anyhow::Result<Option<DossierMetadata>>;
}

/// Maps dossier metadata onto an authorization resource.
pub trait ResourceMapper: Send + Sync {
    /// Build the resource descriptor for `resource_type`/`action`.
    fn map_resource(
        &self,
        metadata: &DossierMetadata,
        resource_type: &str,
        action: &str,
    ) -> Resource;
}

/// Evaluates authorization policy.
#[async_trait]
pub trait AuthorizationPolicy: Send + Sync {
    /// Decide whether `actor_id` may perform the resource's action.
    async fn decide(
        &self,
        resource: &Resource,
        trace_id: &str,
        actor_id: &str,
    ) -> anyhow::Result<Decision>;
}

/// Applies partial updates in the content repository.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Send the partial update on behalf of `actor_id`.
    async fn partial_update(
        &self,
        command: &PartialUpdateCommand,
        actor_id: &str,
        trace_id: &str,
    ) -> anyhow::Result<()>;
}

/// Receives audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist the audit record.
    async fn record(&self, record: &AuditRecord) -> anyhow::Result<()>;
}

/// Default mapper: every metadata attribute becomes a resource attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeResourceMapper;

impl ResourceMapper for AttributeResourceMapper {
    fn map_resource(
        &self,
        metadata: &DossierMetadata,
        resource_type: &str,
        action: &str,
    ) -> Resource {
        Resource {
            resource_type: resource_type.to_string(),
            action: action.to_string(),
            attributes: metadata.fields().clone(),
        }
    }
}

/// Shared handles to every collaborator the workflow calls.
#[derive(Clone)]
pub struct Collaborators {
    /// Identity validation.
    pub identity: Arc<dyn IdentityValidator>,
    /// Search lookup.
    pub search: Arc<dyn DossierSearch>,
    /// Resource mapping.
    pub resources: Arc<dyn ResourceMapper>,
    /// Authorization decision.
    pub policy: Arc<dyn AuthorizationPolicy>,
    /// Content-repository update.
    pub repository: Arc<dyn ContentRepository>,
    /// Audit write.
    pub audit: Arc<dyn AuditSink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_mapper_copies_metadata() {
        let metadata = DossierMetadata::default()
            .with("uniqueId", "d-1")
            .with("owner", "team-a");
        let resource = AttributeResourceMapper.map_resource(&metadata, "DOSSIER", "UPDATE_DOSSIER");
        assert_eq!(resource.resource_type, "DOSSIER");
        assert_eq!(resource.action, "UPDATE_DOSSIER");
        assert_eq!(resource.attributes.get("owner"), Some(&json!("team-a")));
        assert_eq!(resource.attributes.len(), 2);
    }
}
