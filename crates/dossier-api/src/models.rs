//! Wire DTOs returned by the HTTP surface.

use serde::{Deserialize, Serialize};

/// RFC 9457 problem document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Machine-readable error code, e.g. `DOSSIER_ALREADY_CLOSED`.
    pub code: Option<String>,
}

/// Body returned after a successful description update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DossierUpdateResponse {
    /// Updated dossier.
    pub dossier_id: String,
    /// Correlation token used for the request.
    pub trace_id: String,
    /// Whether the audit record was written.
    pub audited: bool,
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Build identifier.
    pub build: String,
}
