//! Environment parsing for [`AppConfig`].
//!
//! # Design
//! - Every setting has a default; the environment only overrides.
//! - Parsing goes through a lookup closure so tests never mutate the process environment.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, LogFormatChoice};

const ENV_BIND_ADDR: &str = "DOSSIER_BIND_ADDR";
const ENV_HTTP_PORT: &str = "DOSSIER_HTTP_PORT";
const ENV_SEARCH_INDEX: &str = "DOSSIER_SEARCH_INDEX";
const ENV_ID_FIELD: &str = "DOSSIER_ID_FIELD";
const ENV_STATUS_FIELD: &str = "DOSSIER_STATUS_FIELD";
const ENV_CLOSED_STATUSES: &str = "DOSSIER_CLOSED_STATUSES";
const ENV_REPOSITORY_ID_FIELD: &str = "DOSSIER_REPOSITORY_ID_FIELD";
const ENV_RESOURCE_TYPE: &str = "DOSSIER_RESOURCE_TYPE";
const ENV_UPDATE_ACTION: &str = "DOSSIER_UPDATE_ACTION";
const ENV_LOG_LEVEL: &str = "DOSSIER_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "DOSSIER_LOG_FORMAT";
const ENV_SEED_PATH: &str = "DOSSIER_SEED_PATH";

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is present but invalid.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BIND_ADDR) {
            config.server.bind_addr = raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid(ENV_BIND_ADDR, "not_an_ip_address", &raw))?;
        }
        if let Some(raw) = lookup(ENV_HTTP_PORT) {
            config.server.port = parse_port(&raw)?;
        }

        let dossier = &mut config.dossier;
        override_text(&lookup, ENV_SEARCH_INDEX, &mut dossier.search_index)?;
        override_text(&lookup, ENV_ID_FIELD, &mut dossier.id_field)?;
        override_text(&lookup, ENV_STATUS_FIELD, &mut dossier.status_field)?;
        override_text(
            &lookup,
            ENV_REPOSITORY_ID_FIELD,
            &mut dossier.repository_id_field,
        )?;
        override_text(&lookup, ENV_RESOURCE_TYPE, &mut dossier.resource_type)?;
        override_text(&lookup, ENV_UPDATE_ACTION, &mut dossier.action)?;
        if let Some(raw) = lookup(ENV_CLOSED_STATUSES) {
            dossier.closed_statuses = parse_status_list(&raw)?;
        }

        override_text(&lookup, ENV_LOG_LEVEL, &mut config.logging.level)?;
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.logging.format = Some(parse_log_format(&raw)?);
        }

        config.seed_path = lookup(ENV_SEED_PATH)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

fn override_text<F>(lookup: &F, field: &'static str, target: &mut String) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(field) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::invalid(field, "empty", &raw));
        }
        *target = trimmed.to_string();
    }
    Ok(())
}

fn parse_port(raw: &str) -> ConfigResult<u16> {
    let port = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::invalid(ENV_HTTP_PORT, "not_a_port", raw))?;
    if port == 0 {
        return Err(ConfigError::invalid(ENV_HTTP_PORT, "zero", raw));
    }
    Ok(port)
}

fn parse_status_list(raw: &str) -> ConfigResult<Vec<String>> {
    let statuses: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if statuses.is_empty() {
        return Err(ConfigError::invalid(ENV_CLOSED_STATUSES, "empty", raw));
    }
    Ok(statuses)
}

fn parse_log_format(raw: &str) -> ConfigResult<LogFormatChoice> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormatChoice::Json),
        "pretty" => Ok(LogFormatChoice::Pretty),
        _ => Err(ConfigError::invalid(ENV_LOG_FORMAT, "unknown_format", raw)),
    }
}
