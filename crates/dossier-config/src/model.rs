//! Typed settings consumed by the service crates.

use std::net::IpAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Fully resolved application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Dossier lookup and authorization settings.
    pub dossier: DossierSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Optional JSON seed for the standalone collaborators.
    pub seed_path: Option<PathBuf>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface the API binds to.
    pub bind_addr: IpAddr,
    /// TCP port the API binds to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR,
            port: defaults::HTTP_PORT,
        }
    }
}

/// Names used when addressing a dossier in the search index, the policy
/// service and the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierSettings {
    /// Search index holding dossier metadata.
    pub search_index: String,
    /// Metadata field matched against the dossier identifier.
    pub id_field: String,
    /// Metadata field carrying the dossier status.
    pub status_field: String,
    /// Lower-cased status values treated as closed.
    pub closed_statuses: Vec<String>,
    /// Metadata field carrying the content-repository document id.
    pub repository_id_field: String,
    /// Authorization resource type.
    pub resource_type: String,
    /// Authorization and audit action name.
    pub action: String,
}

impl Default for DossierSettings {
    fn default() -> Self {
        Self {
            search_index: defaults::SEARCH_INDEX.to_string(),
            id_field: defaults::ID_FIELD.to_string(),
            status_field: defaults::STATUS_FIELD.to_string(),
            closed_statuses: vec![defaults::CLOSED_STATUS.to_string()],
            repository_id_field: defaults::REPOSITORY_ID_FIELD.to_string(),
            resource_type: defaults::RESOURCE_TYPE.to_string(),
            action: defaults::UPDATE_ACTION.to_string(),
        }
    }
}

impl DossierSettings {
    /// Returns `true` when `status` matches one of the closed values, ignoring case
    /// and surrounding whitespace.
    #[must_use]
    pub fn is_closed_status(&self, status: &str) -> bool {
        let status = status.trim();
        self.closed_statuses
            .iter()
            .any(|closed| closed.eq_ignore_ascii_case(status))
    }
}

/// Output format requested for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatChoice {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default level directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format; `None` lets the telemetry crate pick per build profile.
    pub format: Option<LogFormatChoice>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_status_match_ignores_case_and_whitespace() {
        let settings = DossierSettings::default();
        assert!(settings.is_closed_status("CLOSED"));
        assert!(settings.is_closed_status(" closed "));
        assert!(!settings.is_closed_status("open"));
        assert!(!settings.is_closed_status(""));
    }

    #[test]
    fn defaults_match_search_and_policy_names() {
        let settings = DossierSettings::default();
        assert_eq!(settings.search_index, "searchDossier");
        assert_eq!(settings.id_field, "uniqueId");
        assert_eq!(settings.resource_type, "DOSSIER");
        assert_eq!(settings.action, "UPDATE_DOSSIER");
    }
}
