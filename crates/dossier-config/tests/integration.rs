//! Configuration loading against the real process environment.

use dossier_config::{AppConfig, DossierSettings};

#[test]
fn from_env_without_overrides_uses_dossier_defaults() -> anyhow::Result<()> {
    if std::env::vars().any(|(key, _)| key.starts_with("DOSSIER_")) {
        return Ok(());
    }
    let config = AppConfig::from_env()?;
    assert_eq!(config.dossier, DossierSettings::default());
    assert_eq!(config.server.port, 8080);
    Ok(())
}
