//! Sync module - promotes essential data between environments.
//!
//! Copies configuration-class collections from the production project into
//! the development project, then seeds development fixtures on top.

mod copier;
mod fixtures;
mod lock;
mod orchestrator;
mod report;
mod seeder;

pub use copier::{CopyError, Copier, DEFAULT_COLLECTIONS, PROTECTED_COLLECTIONS, is_protected};
pub use fixtures::{FIXTURE_VERSION, FixtureSet, SAMPLE_SHOP_ID};
pub use lock::{JobLock, LockError};
pub use orchestrator::{
    JobStatus, Orchestrator, RunOutcome, Stage, SyncError, SyncJob, interrupt_signal,
};
pub use report::{CollectionCount, CopyReport, SeedReport};
pub use seeder::{SeedError, Seeder};
