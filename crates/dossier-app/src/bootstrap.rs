use std::net::SocketAddr;

use dossier_api::ApiServer;
use dossier_config::{AppConfig, LogFormatChoice, LoggingSettings};
use dossier_core::PartialUpdateDossierService;
use dossier_telemetry::{LogFormat, LoggingConfig, Metrics, build_sha, init_logging};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::standalone::StandaloneStore;

/// Entry point for the dossier service boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, seeding, or the API listener fails.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
    run_app_with(config).await
}

pub(crate) async fn run_app_with(config: AppConfig) -> AppResult<()> {
    init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(build = build_sha(), "Dossier service bootstrap starting");

    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let store = match &config.seed_path {
        Some(path) => StandaloneStore::load(path).await?,
        None => {
            info!("no seed path configured; starting with an empty standalone store");
            StandaloneStore::default()
        }
    };
    let service = build_service(&store, &config, telemetry.clone());
    let api = ApiServer::new(service, telemetry);

    let addr = SocketAddr::new(config.server.bind_addr, config.server.port);
    info!(addr = %addr, "Launching API listener");
    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn build_service(
    store: &StandaloneStore,
    config: &AppConfig,
    telemetry: Metrics,
) -> PartialUpdateDossierService {
    PartialUpdateDossierService::new(
        store.collaborators(&config.dossier),
        config.dossier.clone(),
        telemetry,
    )
}

fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    let defaults = LoggingConfig::default();
    LoggingConfig {
        level: &settings.level,
        format: settings.format.map_or(defaults.format, |choice| match choice {
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Pretty => LogFormat::Pretty,
        }),
        build_sha: defaults.build_sha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dossier_core::DossierDescriptionRequest;
    use serde_json::json;

    use crate::standalone::SeedDocument;

    #[test]
    fn logging_config_honours_explicit_format() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            format: Some(LogFormatChoice::Json),
        };
        let config = logging_config(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn logging_config_infers_format_when_unset() {
        let settings = LoggingSettings::default();
        assert_eq!(logging_config(&settings).format, LogFormat::infer());
    }

    #[tokio::test]
    async fn built_service_uses_configured_fields() -> Result<()> {
        let seed: SeedDocument = serde_json::from_value(json!({
            "actors": { "consumer-1": "alice" },
            "editors": ["alice"],
            "dossiers": [ { "ref": "d-9", "state": "open" } ]
        }))?;
        let store = StandaloneStore::from_seed(seed);
        let mut config = AppConfig::default();
        config.dossier.id_field = "ref".to_string();
        config.dossier.status_field = "state".to_string();

        let service = build_service(&store, &config, Metrics::new()?);
        let outcome = service
            .partial_update_by_patch(
                "consumer-1",
                "trace-9",
                "d-9",
                &DossierDescriptionRequest::new("configured"),
            )
            .await?;
        assert_eq!(outcome.dossier_id, "d-9");
        Ok(())
    }
}
