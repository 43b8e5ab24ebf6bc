use crate::cli::commands::sync_db::*;
use crate::cli::error::CliError;
use crate::config::{Config, MockSecretSource};
use crate::store::{MemoryConnector, MemoryStore};
use crate::sync::{JobLock, JobStatus, LockError, RunOutcome};
use serde_json::json;
use std::future::pending;
use tempfile::TempDir;

fn secrets() -> MockSecretSource {
    let mut secrets = MockSecretSource::new();
    secrets
        .expect_lookup()
        .returning(|variable| Some(format!("{}-value", variable.to_lowercase())));
    secrets
}

fn stores() -> (MemoryStore, MemoryStore) {
    let source = MemoryStore::new("Production");
    source.insert("shops", vec![json!({"id": "shop-1", "name": "Downtown"})]);
    source.insert(
        "services",
        vec![json!({"id": "svc-1", "shop_id": "shop-1", "is_active": true})],
    );
    (source, MemoryStore::new("Development"))
}

fn config(temp: &TempDir) -> Config {
    Config::default().with_lock_path(temp.path().join("sync-db.lock"))
}

#[tokio::test]
async fn test_sync_db_runs_job_under_lock() {
    let temp = TempDir::new().unwrap();
    let (source, target) = stores();
    let connector = MemoryConnector::new().with_store(&source).with_store(&target);

    let job = sync_db(&config(&temp), secrets(), connector, pending())
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Succeeded);
    assert!(target.contains("shops", "shop-1"));
    // lock released once the command returns
    assert!(JobLock::acquire(&temp.path().join("sync-db.lock")).is_ok());
}

#[tokio::test]
async fn test_sync_db_refuses_when_lock_held() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let _held = JobLock::acquire(&config.lock_path).unwrap();
    let (source, target) = stores();
    let connector = MemoryConnector::new().with_store(&source).with_store(&target);

    let result = sync_db(&config, MockSecretSource::new(), connector.clone(), pending()).await;

    assert!(matches!(
        result,
        Err(CliError::Lock(LockError::Held { .. }))
    ));
    assert_eq!(connector.connects(), 0);
    assert_eq!(source.calls(), 0);
    assert_eq!(target.calls(), 0);
}

#[tokio::test]
async fn test_sync_db_uses_configured_collections() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.collections = vec!["services".to_string()];
    let (source, target) = stores();
    let connector = MemoryConnector::new().with_store(&source).with_store(&target);

    let job = sync_db(&config, secrets(), connector, pending())
        .await
        .unwrap();

    let copied = job.copy_report.as_ref().unwrap();
    assert_eq!(copied.collection_names(), vec!["services"]);
    assert!(!target.contains("shops", "shop-1"));
}

#[tokio::test]
async fn test_format_job_success() {
    let temp = TempDir::new().unwrap();
    let (source, target) = stores();
    let connector = MemoryConnector::new().with_store(&source).with_store(&target);

    let job = sync_db(&config(&temp), secrets(), connector, pending())
        .await
        .unwrap();
    let output = format_job(&job);

    assert!(output.contains("Production → Development"));
    assert!(output.contains("Copied essential data"));
    assert!(output.contains("Seeded test data (fixtures v1)"));
    assert!(output.contains("✓ sync-db completed"));
}

#[tokio::test]
async fn test_format_job_failure_names_stage() {
    let temp = TempDir::new().unwrap();
    let (source, target) = stores();
    let connector = MemoryConnector::new().with_store(&source).with_store(&target);
    let mut missing = MockSecretSource::new();
    missing.expect_lookup().returning(|_| None);

    let job = sync_db(&config(&temp), missing, connector, pending())
        .await
        .unwrap();
    let output = format_job(&job);

    assert_eq!(job.outcome(), RunOutcome::Failed);
    assert!(output.contains("✗ sync-db failed while validating config"));
    assert!(output.contains("SOURCE_SERVICE_KEY"));
    assert!(!output.contains("Copied essential data"));
}
