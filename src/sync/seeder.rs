//! Test-data seeder.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, instrument};

use super::fixtures::FixtureSet;
use super::report::SeedReport;
use crate::store::{DataStoreClient, StoreError};

/// Error raised while writing fixtures. Earlier copy results are kept.
#[derive(Error, Diagnostic, Debug)]
#[error("Failed to seed '{collection}': {source}")]
#[diagnostic(
    code(detail_ops::sync::seed_failed),
    help("Copied collections were left in place; re-running the sync is safe.")
)]
pub struct SeedError {
    pub collection: String,
    #[source]
    pub source: StoreError,
}

/// Writes a [`FixtureSet`] into the target environment.
#[derive(Debug, Clone)]
pub struct Seeder {
    fixtures: FixtureSet,
}

impl Default for Seeder {
    fn default() -> Self {
        Self::new(FixtureSet::standard())
    }
}

impl Seeder {
    pub fn new(fixtures: FixtureSet) -> Self {
        Self { fixtures }
    }

    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Upsert every fixture by its stable key.
    ///
    /// Safe to re-run: existing fixtures are overwritten, never duplicated.
    #[instrument(skip_all, fields(target = target.environment(), version = self.fixtures.version))]
    pub async fn seed<T: DataStoreClient>(&self, target: &T) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport {
            fixture_version: self.fixtures.version,
            ..SeedReport::default()
        };

        for (collection, batch) in &self.fixtures.collections {
            let written = target
                .upsert(collection, batch)
                .await
                .map_err(|source| SeedError {
                    collection: collection.clone(),
                    source,
                })?;
            info!(collection = %collection, records = written, "Seeded fixtures");
            report.record(collection, written);
        }

        Ok(report)
    }
}
