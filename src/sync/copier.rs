//! Essential-data copier.
//!
//! Promotes configuration-class collections (shops, catalogue, opening hours)
//! from the source environment into the target. Customer-generated
//! collections never leave the source.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, instrument};

use super::report::CopyReport;
use crate::store::{DataStoreClient, StoreError};

/// Collections promoted by default, parents before children.
pub const DEFAULT_COLLECTIONS: &[&str] = &[
    "shops",
    "service_categories",
    "services",
    "business_hours",
];

/// Transactional collections holding customer data.
pub const PROTECTED_COLLECTIONS: &[&str] = &["bookings", "leads"];

/// Whether `collection` is one of the [`PROTECTED_COLLECTIONS`].
pub fn is_protected(collection: &str) -> bool {
    let normalized = collection.trim().to_ascii_lowercase();
    PROTECTED_COLLECTIONS.contains(&normalized.as_str())
}

/// Errors that can occur during the copy stage.
#[derive(Error, Diagnostic, Debug)]
pub enum CopyError {
    #[error("Refusing to copy '{collection}': it holds customer data")]
    #[diagnostic(code(detail_ops::sync::copy_forbidden))]
    Forbidden { collection: String },

    #[error("Failed to copy '{collection}': {source}")]
    #[diagnostic(
        code(detail_ops::sync::copy_failed),
        help("Collections copied before the failure remain in the target.")
    )]
    Store {
        collection: String,
        /// Collections fully written before the failure
        completed: CopyReport,
        #[source]
        source: StoreError,
    },
}

/// Copies an allow-list of collections between two environments.
#[derive(Debug, Clone)]
pub struct Copier {
    collections: Vec<String>,
}

impl Default for Copier {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTIONS.iter().map(|c| c.to_string()).collect())
    }
}

impl Copier {
    pub fn new(collections: Vec<String>) -> Self {
        Self { collections }
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Copy every allow-listed collection from `source` to `target`.
    ///
    /// Records keep their identity, so copying twice leaves the target in
    /// the same state as copying once. Stops at the first store error
    /// without undoing earlier collections.
    #[instrument(skip_all, fields(source = source.environment(), target = target.environment()))]
    pub async fn copy<S, T>(&self, source: &S, target: &T) -> Result<CopyReport, CopyError>
    where
        S: DataStoreClient,
        T: DataStoreClient,
    {
        if let Some(collection) = self.collections.iter().find(|c| is_protected(c)) {
            return Err(CopyError::Forbidden {
                collection: collection.clone(),
            });
        }

        let mut report = CopyReport::default();

        for collection in &self.collections {
            let written = match Self::copy_collection(source, target, collection).await {
                Ok(written) => written,
                Err(source) => {
                    return Err(CopyError::Store {
                        collection: collection.clone(),
                        completed: report,
                        source,
                    });
                }
            };
            info!(collection = %collection, records = written, "Copied collection");
            report.record(collection, written);
        }

        Ok(report)
    }

    async fn copy_collection<S, T>(
        source: &S,
        target: &T,
        collection: &str,
    ) -> Result<usize, StoreError>
    where
        S: DataStoreClient,
        T: DataStoreClient,
    {
        let batch = source.fetch_all(collection).await?;
        if batch.is_empty() {
            return Ok(0);
        }
        target.upsert(collection, &batch).await
    }
}
