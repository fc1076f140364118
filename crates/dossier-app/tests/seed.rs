//! Seed file loading for the standalone collaborators.

use std::io::Write;

use anyhow::{Result, anyhow};
use dossier_app::AppError;
use dossier_app::standalone::StandaloneStore;

#[tokio::test]
async fn load_reads_dossiers_from_disk() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{"actors":{{"c":"a"}},"editors":["a"],"dossiers":[{{"uniqueId":"d-1","dossierStatus":"open"}}]}}"#
    )?;

    let store = StandaloneStore::load(file.path()).await?;
    let record = store
        .dossier("uniqueId", "d-1")
        .await
        .ok_or_else(|| anyhow!("seeded dossier missing"))?;
    assert_eq!(record.get_str("dossierStatus"), Some("open"));
    Ok(())
}

#[tokio::test]
async fn load_rejects_malformed_seed() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;

    let err = StandaloneStore::load(file.path())
        .await
        .err()
        .ok_or_else(|| anyhow!("expected seed decoding failure"))?;
    assert!(matches!(err, AppError::Seed { .. }));
    Ok(())
}

#[tokio::test]
async fn load_reports_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("absent.json");

    let err = StandaloneStore::load(&missing)
        .await
        .err()
        .ok_or_else(|| anyhow!("expected io failure"))?;
    assert!(matches!(
        err,
        AppError::Io {
            operation: "seed.read",
            ..
        }
    ));
    Ok(())
}
