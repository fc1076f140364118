//! # Design
//!
//! - Each variant displays as its fixed machine-readable code; callers match on
//!   the code, never on formatted text.
//! - Identifiers travel in structured fields and collaborator failures keep their source.

use std::error::Error;

use thiserror::Error;

/// Result alias for dossier operations.
pub type DossierResult<T> = Result<T, DossierError>;

type BoxedSource = Box<dyn Error + Send + Sync>;

/// Errors raised by the partial update workflow.
#[derive(Debug, Error)]
pub enum DossierError {
    /// The request payload failed validation.
    #[error("INVALID_REQUEST")]
    InvalidRequest {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The caller identity could not be resolved.
    #[error("AUTHENTICATION_FAILED")]
    Authentication {
        /// Consumer identifier supplied by the caller.
        consumer_id: String,
        /// Underlying identity failure.
        #[source]
        source: BoxedSource,
    },
    /// Search returned no dossier for the identifier.
    #[error("DOSSIER_NOT_FOUND")]
    NotFound {
        /// Dossier identifier that was looked up.
        dossier_id: String,
    },
    /// The dossier is closed and no longer accepts updates.
    #[error("DOSSIER_ALREADY_CLOSED")]
    AlreadyClosed {
        /// Closed dossier identifier.
        dossier_id: String,
    },
    /// The policy decision for the actor was not permit.
    #[error("ACCESS_DENIED")]
    AccessDenied {
        /// Actor the decision applied to.
        actor_id: String,
        /// Role reported alongside the decision, when any.
        role: Option<String>,
    },
    /// The search collaborator failed.
    #[error("DOSSIER_LOOKUP_FAILED")]
    Lookup {
        /// Dossier identifier that was looked up.
        dossier_id: String,
        /// Underlying search failure.
        #[source]
        source: BoxedSource,
    },
    /// The policy collaborator failed to produce a decision.
    #[error("AUTHORIZATION_UNAVAILABLE")]
    Authorization {
        /// Dossier identifier under evaluation.
        dossier_id: String,
        /// Underlying policy failure.
        #[source]
        source: BoxedSource,
    },
    /// The content repository rejected the update.
    #[error("DOSSIER_UPDATE_FAILED")]
    Update {
        /// Dossier identifier being updated.
        dossier_id: String,
        /// Underlying repository failure.
        #[source]
        source: BoxedSource,
    },
}

/// Coarse classification used by delivery surfaces to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DossierErrorKind {
    /// The request cannot be applied as sent.
    BadRequest,
    /// The caller is not authenticated.
    Unauthenticated,
    /// The caller is authenticated but not allowed.
    Forbidden,
    /// The dossier does not exist.
    NotFound,
    /// A collaborator failed.
    Upstream,
}

impl DossierError {
    /// Fixed machine-readable code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::NotFound { .. } => "DOSSIER_NOT_FOUND",
            Self::AlreadyClosed { .. } => "DOSSIER_ALREADY_CLOSED",
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::Lookup { .. } => "DOSSIER_LOOKUP_FAILED",
            Self::Authorization { .. } => "AUTHORIZATION_UNAVAILABLE",
            Self::Update { .. } => "DOSSIER_UPDATE_FAILED",
        }
    }

    /// Classification of the error.
    #[must_use]
    pub const fn kind(&self) -> DossierErrorKind {
        match self {
            Self::InvalidRequest { .. } | Self::AlreadyClosed { .. } => {
                DossierErrorKind::BadRequest
            }
            Self::Authentication { .. } => DossierErrorKind::Unauthenticated,
            Self::AccessDenied { .. } => DossierErrorKind::Forbidden,
            Self::NotFound { .. } => DossierErrorKind::NotFound,
            Self::Lookup { .. } | Self::Authorization { .. } | Self::Update { .. } => {
                DossierErrorKind::Upstream
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_machine_code() {
        let errors = [
            DossierError::NotFound {
                dossier_id: "d-1".into(),
            },
            DossierError::AlreadyClosed {
                dossier_id: "d-1".into(),
            },
            DossierError::AccessDenied {
                actor_id: "actor".into(),
                role: Some("employee".into()),
            },
            DossierError::InvalidRequest {
                field: "description",
                reason: "blank",
            },
        ];
        for error in errors {
            assert_eq!(error.to_string(), error.code());
        }
    }

    #[test]
    fn collaborator_failures_keep_their_source() {
        let error = DossierError::Update {
            dossier_id: "d-1".into(),
            source: anyhow::anyhow!("repository offline").into(),
        };
        assert_eq!(error.to_string(), "DOSSIER_UPDATE_FAILED");
        assert_eq!(error.kind(), DossierErrorKind::Upstream);
        let source = error.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("repository offline"));
    }

    #[test]
    fn kinds_follow_error_category() {
        assert_eq!(
            DossierError::AlreadyClosed {
                dossier_id: "d".into()
            }
            .kind(),
            DossierErrorKind::BadRequest
        );
        assert_eq!(
            DossierError::AccessDenied {
                actor_id: "a".into(),
                role: None
            }
            .kind(),
            DossierErrorKind::Forbidden
        );
        assert_eq!(
            DossierError::NotFound {
                dossier_id: "d".into()
            }
            .kind(),
            DossierErrorKind::NotFound
        );
    }
}
