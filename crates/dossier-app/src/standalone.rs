//! In-memory collaborators used when the service runs without external systems.
//!
//! # Design
//! - A single [`StandaloneStore`] owns the seeded actors, editors, and dossier
//!   records; every collaborator holds a shared handle to it.
//! - Search matches the configured identifier field; the repository matches the
//!   repository identifier field and falls back to the dossier identifier.
//! - Unknown consumers and unknown documents are errors, never silent no-ops.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use dossier_config::DossierSettings;
use dossier_core::{
    AttributeResourceMapper, AuditRecord, AuditSink, AuthorizationPolicy, Collaborators,
    ContentRepository, Decision, DossierLookup, DossierMetadata, DossierSearch,
    IdentityValidator, PartialUpdateCommand, Resource,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Role reported for actors allowed to edit dossiers.
pub const EDITOR_ROLE: &str = "editor";
/// Role reported for everybody else.
pub const VIEWER_ROLE: &str = "viewer";

/// Seed document accepted through `DOSSIER_SEED_PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedDocument {
    /// Consumer id to actor id.
    pub actors: HashMap<String, String>,
    /// Actors granted the editor role.
    pub editors: Vec<String>,
    /// Dossier metadata records.
    pub dossiers: Vec<DossierMetadata>,
}

#[derive(Debug, Default)]
struct StoreState {
    actors: HashMap<String, String>,
    editors: BTreeSet<String>,
    dossiers: Vec<DossierMetadata>,
    audit: Vec<AuditRecord>,
}

/// Shared in-memory backing store for the standalone collaborators.
#[derive(Debug, Clone, Default)]
pub struct StandaloneStore {
    state: Arc<RwLock<StoreState>>,
}

impl StandaloneStore {
    /// Build a store from an already decoded seed document.
    #[must_use]
    pub fn from_seed(seed: SeedDocument) -> Self {
        let state = StoreState {
            actors: seed.actors,
            editors: seed.editors.into_iter().collect(),
            dossiers: seed.dossiers,
            audit: Vec::new(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Read and decode a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a valid seed document.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|err| AppError::io("seed.read", Some(path.to_path_buf()), err))?;
        let seed: SeedDocument =
            serde_json::from_slice(&raw).map_err(|source| AppError::Seed {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            actors = seed.actors.len(),
            editors = seed.editors.len(),
            dossiers = seed.dossiers.len(),
            "standalone seed loaded"
        );
        Ok(Self::from_seed(seed))
    }

    /// Wire every collaborator against this store.
    #[must_use]
    pub fn collaborators(&self, settings: &DossierSettings) -> Collaborators {
        Collaborators {
            identity: Arc::new(StandaloneIdentity {
                store: self.clone(),
            }),
            search: Arc::new(StandaloneSearch {
                store: self.clone(),
                index: settings.search_index.clone(),
            }),
            resources: Arc::new(AttributeResourceMapper),
            policy: Arc::new(StandalonePolicy {
                store: self.clone(),
            }),
            repository: Arc::new(StandaloneRepository {
                store: self.clone(),
                id_field: settings.id_field.clone(),
                repository_id_field: settings.repository_id_field.clone(),
            }),
            audit: Arc::new(StandaloneAudit {
                store: self.clone(),
            }),
        }
    }

    /// Current copy of the dossier whose `id_field` equals `dossier_id`.
    pub async fn dossier(&self, id_field: &str, dossier_id: &str) -> Option<DossierMetadata> {
        let state = self.state.read().await;
        state
            .dossiers
            .iter()
            .find(|record| record.get_str(id_field) == Some(dossier_id))
            .cloned()
    }

    /// Audit records written so far, oldest first.
    pub async fn audit_records(&self) -> Vec<AuditRecord> {
        self.state.read().await.audit.clone()
    }
}

struct StandaloneIdentity {
    store: StandaloneStore,
}

#[async_trait]
impl IdentityValidator for StandaloneIdentity {
    async fn validate_user(&self, consumer_id: &str, trace_id: &str) -> anyhow::Result<String> {
        let state = self.store.state.read().await;
        let actor = state
            .actors
            .get(consumer_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown consumer"))?;
        debug!(trace_id, consumer_id, actor_id = %actor, "consumer resolved");
        Ok(actor)
    }
}

struct StandaloneSearch {
    store: StandaloneStore,
    index: String,
}

#[async_trait]
impl DossierSearch for StandaloneSearch {
    async fn find_dossier(
        &self,
        lookup: &DossierLookup<'_>,
    ) -> anyhow::Result<Option<DossierMetadata>> {
        if lookup.index != self.index {
            return Err(anyhow!("unknown search index '{}'", lookup.index));
        }
        Ok(self.store.dossier(lookup.id_field, lookup.dossier_id).await)
    }
}

struct StandalonePolicy {
    store: StandaloneStore,
}

#[async_trait]
impl AuthorizationPolicy for StandalonePolicy {
    async fn decide(
        &self,
        resource: &Resource,
        trace_id: &str,
        actor_id: &str,
    ) -> anyhow::Result<Decision> {
        let state = self.store.state.read().await;
        let decision = if state.editors.contains(actor_id) {
            Decision::permit(EDITOR_ROLE)
        } else {
            Decision::deny(VIEWER_ROLE)
        };
        debug!(
            trace_id,
            actor_id,
            resource_type = %resource.resource_type,
            action = %resource.action,
            permit = decision.is_permit(),
            "policy evaluated"
        );
        Ok(decision)
    }
}

struct StandaloneRepository {
    store: StandaloneStore,
    id_field: String,
    repository_id_field: String,
}

#[async_trait]
impl ContentRepository for StandaloneRepository {
    async fn partial_update(
        &self,
        command: &PartialUpdateCommand,
        actor_id: &str,
        trace_id: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.store.state.write().await;
        let record = state
            .dossiers
            .iter_mut()
            .find(|record| {
                record.get_str(&self.repository_id_field) == Some(command.uid.as_str())
                    || record.get_str(&self.id_field) == Some(command.uid.as_str())
            })
            .ok_or_else(|| anyhow!("document '{}' does not exist", command.uid))?;
        record.set("description", command.properties.description.clone());
        debug!(trace_id, actor_id, uid = %command.uid, "document description stored");
        Ok(())
    }
}

struct StandaloneAudit {
    store: StandaloneStore,
}

#[async_trait]
impl AuditSink for StandaloneAudit {
    async fn record(&self, record: &AuditRecord) -> anyhow::Result<()> {
        info!(
            target: "audit",
            trace_id = %record.trace_id,
            actor_id = %record.actor_id,
            dossier_id = %record.dossier_id,
            action = %record.action,
            recorded_at = %record.recorded_at,
            "audit record"
        );
        self.store.state.write().await.audit.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dossier_core::DossierError;
    use dossier_core::{DossierDescriptionRequest, PartialUpdateDossierService};
    use dossier_telemetry::Metrics;
    use serde_json::json;

    fn seed() -> Result<SeedDocument> {
        Ok(serde_json::from_value(json!({
            "actors": { "consumer-1": "alice", "consumer-2": "bob" },
            "editors": ["alice"],
            "dossiers": [
                { "uniqueId": "d-1", "documentId": "doc-1", "dossierStatus": "open" },
                { "uniqueId": "d-2", "dossierStatus": "closed" },
                { "uniqueId": "d-3" }
            ]
        }))?)
    }

    fn service(store: &StandaloneStore) -> Result<PartialUpdateDossierService> {
        let settings = DossierSettings::default();
        Ok(PartialUpdateDossierService::new(
            store.collaborators(&settings),
            settings,
            Metrics::new()?,
        ))
    }

    #[tokio::test]
    async fn editor_update_is_stored_and_audited() -> Result<()> {
        let store = StandaloneStore::from_seed(seed()?);
        let outcome = service(&store)?
            .partial_update_by_patch(
                "consumer-1",
                "trace-1",
                "d-1",
                &DossierDescriptionRequest::new("fresh"),
            )
            .await?;
        assert_eq!(outcome.actor_id, "alice");
        assert_eq!(outcome.role.as_deref(), Some(EDITOR_ROLE));
        assert!(outcome.audited);

        let record = store
            .dossier("uniqueId", "d-1")
            .await
            .ok_or_else(|| anyhow!("dossier d-1 missing"))?;
        assert_eq!(record.get_str("description"), Some("fresh"));

        let audit = store.audit_records().await;
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].dossier_id, "d-1");
        assert_eq!(audit[0].trace_id, "trace-1");
        Ok(())
    }

    #[tokio::test]
    async fn non_editor_is_denied() -> Result<()> {
        let store = StandaloneStore::from_seed(seed()?);
        let err = service(&store)?
            .partial_update_by_patch(
                "consumer-2",
                "trace-2",
                "d-1",
                &DossierDescriptionRequest::new("nope"),
            )
            .await
            .err()
            .ok_or_else(|| anyhow!("expected denial"))?;
        assert!(matches!(
            err,
            DossierError::AccessDenied { ref role, .. } if role.as_deref() == Some(VIEWER_ROLE)
        ));
        assert!(store.audit_records().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_consumer_and_closed_dossier_are_rejected() -> Result<()> {
        let store = StandaloneStore::from_seed(seed()?);
        let service = service(&store)?;
        let request = DossierDescriptionRequest::new("text");

        let unknown = service
            .partial_update_by_patch("stranger", "trace-3", "d-1", &request)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected authentication failure"))?;
        assert_eq!(unknown.code(), "AUTHENTICATION_FAILED");

        let closed = service
            .partial_update_by_patch("consumer-1", "trace-4", "d-2", &request)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected closed dossier"))?;
        assert_eq!(closed.code(), "DOSSIER_ALREADY_CLOSED");
        Ok(())
    }

    #[tokio::test]
    async fn repository_falls_back_to_dossier_id() -> Result<()> {
        let store = StandaloneStore::from_seed(seed()?);
        service(&store)?
            .partial_update_by_patch(
                "consumer-1",
                "trace-5",
                "d-3",
                &DossierDescriptionRequest::new("no document id"),
            )
            .await?;
        let record = store
            .dossier("uniqueId", "d-3")
            .await
            .ok_or_else(|| anyhow!("dossier d-3 missing"))?;
        assert_eq!(record.get_str("description"), Some("no document id"));
        Ok(())
    }

    #[tokio::test]
    async fn search_rejects_unknown_index() -> Result<()> {
        let store = StandaloneStore::from_seed(seed()?);
        let search = StandaloneSearch {
            store,
            index: "searchDossier".to_string(),
        };
        let lookup = DossierLookup {
            actor_id: "alice",
            dossier_id: "d-1",
            id_field: "uniqueId",
            index: "other",
            trace_id: "trace-6",
        };
        assert!(search.find_dossier(&lookup).await.is_err());
        Ok(())
    }
}
