//! `sync-db` command implementation.

use std::future::Future;

use tracing::info;

use crate::cli::error::CliResult;
use crate::config::{Config, Registry, SecretSource};
use crate::store::Connector;
use crate::sync::{Copier, JobLock, Orchestrator, Seeder, SyncJob};

/// Promote essential data from source to target, then seed fixtures.
///
/// Holds the job lock for the whole run. Returns the finished job even when
/// it failed; only a lock or setup problem is an `Err`.
pub async fn sync_db<S, C, F>(
    config: &Config,
    secrets: S,
    connector: C,
    interrupt: F,
) -> CliResult<SyncJob>
where
    S: SecretSource,
    C: Connector,
    F: Future<Output = ()>,
{
    let lock = JobLock::acquire(&config.lock_path)?;
    info!(
        source = %config.source.name,
        target = %config.target.name,
        lock = %lock.path().display(),
        "Starting sync-db"
    );

    let orchestrator = Orchestrator::new(
        Registry::from_config(config, secrets),
        connector,
        Copier::new(config.collections.clone()),
        Seeder::default(),
    );
    Ok(orchestrator.run_until(interrupt).await)
}

/// Human-readable summary of a finished job.
pub fn format_job(job: &SyncJob) -> String {
    let mut output = String::new();

    if let (Some(source), Some(target)) = (&job.source, &job.target) {
        output.push_str(&format!("{} → {}\n\n", source.name, target.name));
    }

    if let Some(copied) = &job.copy_report {
        output.push_str("Copied essential data:\n");
        output.push_str(&copied.to_table());
        output.push_str("\n\n");
    }

    if let Some(seeded) = &job.seed_report {
        output.push_str(&format!(
            "Seeded test data (fixtures v{}):\n",
            seeded.fixture_version
        ));
        output.push_str(&seeded.to_table());
        output.push_str("\n\n");
    }

    match &job.failure_reason {
        None => output.push_str("✓ sync-db completed\n"),
        Some(reason) => {
            let stage = job
                .failed_stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            output.push_str(&format!("✗ sync-db failed while {}: {}\n", stage, reason));
        }
    }

    output
}
