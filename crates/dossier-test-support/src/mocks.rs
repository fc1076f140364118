//! Scripted collaborator doubles that record every call in order.
//!
//! # Design
//! - One shared [`CallLog`] per scenario so tests can assert call order across collaborators.
//! - Responses are fixed when the double is built; nothing is computed from inputs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dossier_config::DossierSettings;
use dossier_core::{
    AttributeResourceMapper, AuditRecord, AuditSink, AuthorizationPolicy, Collaborators,
    ContentRepository, Decision, DossierLookup, DossierMetadata, DossierSearch,
    IdentityValidator, PartialUpdateCommand, PartialUpdateDossierService, Resource,
    ResourceMapper,
};
use dossier_telemetry::Metrics;

use crate::fixtures;

/// Collaborator call captured by a double.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Identity validation.
    ValidateUser {
        /// Consumer identifier received.
        consumer_id: String,
        /// Trace identifier received.
        trace_id: String,
    },
    /// Search lookup.
    FindDossier {
        /// Actor identifier received.
        actor_id: String,
        /// Dossier identifier received.
        dossier_id: String,
        /// Id field name received.
        id_field: String,
        /// Index name received.
        index: String,
        /// Trace identifier received.
        trace_id: String,
    },
    /// Resource mapping.
    MapResource {
        /// Resource type received.
        resource_type: String,
        /// Action received.
        action: String,
    },
    /// Authorization decision.
    Decide {
        /// Resource received.
        resource: Resource,
        /// Trace identifier received.
        trace_id: String,
        /// Actor identifier received.
        actor_id: String,
    },
    /// Content-repository update.
    PartialUpdate {
        /// Command received.
        command: PartialUpdateCommand,
        /// Actor identifier received.
        actor_id: String,
        /// Trace identifier received.
        trace_id: String,
    },
    /// Audit write.
    Audit {
        /// Record received.
        record: AuditRecord,
    },
}

/// Discriminant of [`Call`], for order and count assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// [`Call::ValidateUser`].
    ValidateUser,
    /// [`Call::FindDossier`].
    FindDossier,
    /// [`Call::MapResource`].
    MapResource,
    /// [`Call::Decide`].
    Decide,
    /// [`Call::PartialUpdate`].
    PartialUpdate,
    /// [`Call::Audit`].
    Audit,
}

impl Call {
    /// Discriminant of the call.
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        match self {
            Self::ValidateUser { .. } => CallKind::ValidateUser,
            Self::FindDossier { .. } => CallKind::FindDossier,
            Self::MapResource { .. } => CallKind::MapResource,
            Self::Decide { .. } => CallKind::Decide,
            Self::PartialUpdate { .. } => CallKind::PartialUpdate,
            Self::Audit { .. } => CallKind::Audit,
        }
    }
}

/// Ordered, shared record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn push(&self, call: Call) {
        self.guard().push(call);
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.guard().clone()
    }

    /// Kinds of every recorded call, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<CallKind> {
        self.guard().iter().map(Call::kind).collect()
    }

    /// Number of calls of `kind`.
    #[must_use]
    pub fn count(&self, kind: CallKind) -> usize {
        self.guard().iter().filter(|call| call.kind() == kind).count()
    }
}

/// Identity double returning a fixed actor or failure.
pub struct ScriptedIdentity {
    log: CallLog,
    actor: Option<String>,
}

#[async_trait]
impl IdentityValidator for ScriptedIdentity {
    async fn validate_user(&self, consumer_id: &str, trace_id: &str) -> Result<String> {
        self.log.push(Call::ValidateUser {
            consumer_id: consumer_id.to_string(),
            trace_id: trace_id.to_string(),
        });
        self.actor
            .clone()
            .ok_or_else(|| anyhow!("consumer {consumer_id} is not registered"))
    }
}

/// Scripted search response.
#[derive(Debug, Clone)]
pub enum SearchResponse {
    /// The dossier exists with this metadata.
    Found(DossierMetadata),
    /// No record matches.
    Missing,
    /// The index is unavailable.
    Fail,
}

/// Search double returning a fixed response.
pub struct ScriptedSearch {
    log: CallLog,
    response: SearchResponse,
}

#[async_trait]
impl DossierSearch for ScriptedSearch {
    async fn find_dossier(&self, lookup: &DossierLookup<'_>) -> Result<Option<DossierMetadata>> {
        self.log.push(Call::FindDossier {
            actor_id: lookup.actor_id.to_string(),
            dossier_id: lookup.dossier_id.to_string(),
            id_field: lookup.id_field.to_string(),
            index: lookup.index.to_string(),
            trace_id: lookup.trace_id.to_string(),
        });
        match &self.response {
            SearchResponse::Found(metadata) => Ok(Some(metadata.clone())),
            SearchResponse::Missing => Ok(None),
            SearchResponse::Fail => Err(anyhow!("search index unavailable")),
        }
    }
}

/// Mapper double delegating to [`AttributeResourceMapper`].
pub struct RecordingResourceMapper {
    log: CallLog,
}

impl ResourceMapper for RecordingResourceMapper {
    fn map_resource(
        &self,
        metadata: &DossierMetadata,
        resource_type: &str,
        action: &str,
    ) -> Resource {
        self.log.push(Call::MapResource {
            resource_type: resource_type.to_string(),
            action: action.to_string(),
        });
        AttributeResourceMapper.map_resource(metadata, resource_type, action)
    }
}

/// Policy double returning a fixed decision or failure.
pub struct ScriptedPolicy {
    log: CallLog,
    decision: Option<Decision>,
}

#[async_trait]
impl AuthorizationPolicy for ScriptedPolicy {
    async fn decide(
        &self,
        resource: &Resource,
        trace_id: &str,
        actor_id: &str,
    ) -> Result<Decision> {
        self.log.push(Call::Decide {
            resource: resource.clone(),
            trace_id: trace_id.to_string(),
            actor_id: actor_id.to_string(),
        });
        self.decision
            .clone()
            .ok_or_else(|| anyhow!("policy decision point unavailable"))
    }
}

/// Repository double recording commands, optionally failing.
pub struct RecordingRepository {
    log: CallLog,
    fail: bool,
}

#[async_trait]
impl ContentRepository for RecordingRepository {
    async fn partial_update(
        &self,
        command: &PartialUpdateCommand,
        actor_id: &str,
        trace_id: &str,
    ) -> Result<()> {
        self.log.push(Call::PartialUpdate {
            command: command.clone(),
            actor_id: actor_id.to_string(),
            trace_id: trace_id.to_string(),
        });
        if self.fail {
            return Err(anyhow!("content repository rejected the update"));
        }
        Ok(())
    }
}

/// Audit double recording records, optionally failing.
pub struct RecordingAudit {
    log: CallLog,
    fail: bool,
}

#[async_trait]
impl AuditSink for RecordingAudit {
    async fn record(&self, record: &AuditRecord) -> Result<()> {
        self.log.push(Call::Audit {
            record: record.clone(),
        });
        if self.fail {
            return Err(anyhow!("audit sink unavailable"));
        }
        Ok(())
    }
}

/// Scenario builder producing a fully wired set of doubles.
///
/// Defaults to the happy path: the consumer resolves to [`fixtures::ACTOR_ID`],
/// the dossier is open, the policy permits with role `employee`, and both
/// writes succeed.
#[derive(Debug, Clone)]
pub struct MockCollaborators {
    log: CallLog,
    actor: Option<String>,
    search: SearchResponse,
    decision: Option<Decision>,
    repository_fails: bool,
    audit_fails: bool,
}

impl Default for MockCollaborators {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            actor: Some(fixtures::ACTOR_ID.to_string()),
            search: SearchResponse::Found(fixtures::open_dossier()),
            decision: Some(Decision::permit("employee")),
            repository_fails: false,
            audit_fails: false,
        }
    }
}

impl MockCollaborators {
    /// Happy-path scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity validation fails.
    #[must_use]
    pub fn with_identity_failure(mut self) -> Self {
        self.actor = None;
        self
    }

    /// Search returns `response`.
    #[must_use]
    pub fn with_search(mut self, response: SearchResponse) -> Self {
        self.search = response;
        self
    }

    /// Policy returns `decision`.
    #[must_use]
    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Policy fails to decide.
    #[must_use]
    pub fn with_policy_failure(mut self) -> Self {
        self.decision = None;
        self
    }

    /// Content repository rejects the update.
    #[must_use]
    pub const fn with_repository_failure(mut self) -> Self {
        self.repository_fails = true;
        self
    }

    /// Audit sink rejects the record.
    #[must_use]
    pub const fn with_audit_failure(mut self) -> Self {
        self.audit_fails = true;
        self
    }

    /// Shared call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Collaborator handles backed by the scripted doubles.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            identity: Arc::new(ScriptedIdentity {
                log: self.log.clone(),
                actor: self.actor.clone(),
            }),
            search: Arc::new(ScriptedSearch {
                log: self.log.clone(),
                response: self.search.clone(),
            }),
            resources: Arc::new(RecordingResourceMapper {
                log: self.log.clone(),
            }),
            policy: Arc::new(ScriptedPolicy {
                log: self.log.clone(),
                decision: self.decision.clone(),
            }),
            repository: Arc::new(RecordingRepository {
                log: self.log.clone(),
                fail: self.repository_fails,
            }),
            audit: Arc::new(RecordingAudit {
                log: self.log.clone(),
                fail: self.audit_fails,
            }),
        }
    }

    /// Service wired with the doubles, default settings, and a fresh metrics registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics registry cannot be built.
    pub fn service(&self) -> Result<(PartialUpdateDossierService, Metrics)> {
        self.service_with(DossierSettings::default())
    }

    /// Service wired with the doubles and caller-supplied lookup settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics registry cannot be built.
    pub fn service_with(
        &self,
        settings: DossierSettings,
    ) -> Result<(PartialUpdateDossierService, Metrics)> {
        let metrics = Metrics::new()?;
        let service =
            PartialUpdateDossierService::new(self.collaborators(), settings, metrics.clone());
        Ok((service, metrics))
    }
}
