//! Sync orchestrator - promotes essential data from source to target.
//!
//! Drives a single [`SyncJob`] through an explicit state machine:
//!
//! ```text
//! Idle -> ValidatingConfig -> Copying -> Seeding -> Done
//!              \                 \          \
//!               +-----------------+----------+--> Failed
//! ```
//!
//! A failure while validating or copying skips every later stage. A seeding
//! failure still fails the job but leaves the copied collections in place.

use std::fmt;
use std::future::Future;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{error, info};

use super::copier::{CopyError, Copier};
use super::report::{CopyReport, SeedReport};
use super::seeder::{SeedError, Seeder};
use crate::config::{ConfigError, EnvironmentProfile, Registry, Role, SecretSource};
use crate::store::{Connector, StoreError};

/// Terminal error of a sync job.
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not open the {role} environment: {source}")]
    #[diagnostic(code(detail_ops::sync::connect))]
    Connect {
        role: Role,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Copy(#[from] CopyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Seed(#[from] SeedError),

    #[error("Interrupted by operator")]
    #[diagnostic(code(detail_ops::sync::interrupted))]
    Interrupted,
}

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ValidatingConfig,
    Copying,
    Seeding,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ValidatingConfig => "validating config",
            Stage::Copying => "copying",
            Stage::Seeding => "seeding",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Externally visible job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Process exit outcome of a job: 0 when done, 1 when failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Done,
    Failed,
}

impl RunOutcome {
    pub fn code(self) -> u8 {
        match self {
            RunOutcome::Done => 0,
            RunOutcome::Failed => 1,
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// One promotion run. Lives only as long as the process.
#[derive(Debug)]
pub struct SyncJob {
    pub source: Option<EnvironmentProfile>,
    pub target: Option<EnvironmentProfile>,
    pub status: JobStatus,
    pub failure_reason: Option<String>,
    /// Stage the job failed in, if any
    pub failed_stage: Option<Stage>,
    pub copy_report: Option<CopyReport>,
    pub seed_report: Option<SeedReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    stage: Stage,
    history: Vec<Stage>,
}

impl Default for SyncJob {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncJob {
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            status: JobStatus::Pending,
            failure_reason: None,
            failed_stage: None,
            copy_report: None,
            seed_report: None,
            started_at: Utc::now(),
            finished_at: None,
            stage: Stage::Idle,
            history: vec![Stage::Idle],
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage the job has entered, in order.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn outcome(&self) -> RunOutcome {
        match self.status {
            JobStatus::Succeeded => RunOutcome::Done,
            _ => RunOutcome::Failed,
        }
    }

    fn advance(&mut self, next: Stage) {
        info!(from = %self.stage, to = %next, "Sync stage transition");
        self.stage = next;
        self.history.push(next);
        match next {
            Stage::Done => {
                self.status = JobStatus::Succeeded;
                self.finished_at = Some(Utc::now());
            }
            Stage::Idle => {}
            _ => self.status = JobStatus::Running,
        }
    }

    fn fail(&mut self, err: &SyncError) {
        let stage = self.stage;
        error!(stage = %stage, "sync-db failed: {}", err);
        if let SyncError::Copy(CopyError::Store { completed, .. }) = err
            && !completed.collections.is_empty()
        {
            error!(
                stage = %stage,
                "Collections already copied remain in the target: {}",
                completed.collection_names().join(", ")
            );
        }

        self.failed_stage = Some(stage);
        self.failure_reason = Some(err.to_string());
        self.stage = Stage::Failed;
        self.history.push(Stage::Failed);
        self.status = JobStatus::Failed;
        self.finished_at = Some(Utc::now());
    }
}

/// Sequences validation, copy and seed for one job.
pub struct Orchestrator<S: SecretSource, C: Connector> {
    registry: Registry<S>,
    connector: C,
    copier: Copier,
    seeder: Seeder,
}

impl<S: SecretSource, C: Connector> Orchestrator<S, C> {
    pub fn new(registry: Registry<S>, connector: C, copier: Copier, seeder: Seeder) -> Self {
        Self {
            registry,
            connector,
            copier,
            seeder,
        }
    }

    /// Run one job to completion, stopping on Ctrl-C.
    pub async fn run(&self) -> RunOutcome {
        self.run_until(interrupt_signal()).await.outcome()
    }

    /// Run one job, abandoning it as soon as `interrupt` resolves.
    ///
    /// Returns the finished job for reporting.
    pub async fn run_until<F>(&self, interrupt: F) -> SyncJob
    where
        F: Future<Output = ()>,
    {
        let mut job = SyncJob::new();

        let result = tokio::select! {
            biased;
            _ = interrupt => Err(SyncError::Interrupted),
            result = self.execute(&mut job) => result,
        };

        match result {
            Ok(()) => info!("sync-db completed"),
            Err(err) => job.fail(&err),
        }
        job
    }

    async fn execute(&self, job: &mut SyncJob) -> Result<(), SyncError> {
        job.advance(Stage::ValidatingConfig);
        // Both credentials are checked before anything connects.
        let source = self.registry.resolve(Role::Source)?;
        let target = self.registry.resolve(Role::Target)?;
        info!(source = %source.name, target = %target.name, "Environments resolved");
        job.source = Some(source.clone());
        job.target = Some(target.clone());

        let source_client = self
            .connector
            .connect(&source)
            .map_err(|source| SyncError::Connect {
                role: Role::Source,
                source,
            })?;
        let target_client = self
            .connector
            .connect(&target)
            .map_err(|source| SyncError::Connect {
                role: Role::Target,
                source,
            })?;

        job.advance(Stage::Copying);
        let copied = self.copier.copy(&source_client, &target_client).await?;
        info!(records = copied.total(), "Copy stage finished");
        job.copy_report = Some(copied);

        job.advance(Stage::Seeding);
        let seeded = self.seeder.seed(&target_client).await?;
        info!(records = seeded.total(), "Seed stage finished");
        job.seed_report = Some(seeded);

        job.advance(Stage::Done);
        Ok(())
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupt_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
