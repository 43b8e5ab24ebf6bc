//! Capability traits for the hosted data store.
//!
//! The orchestrator, copier, seeder and inspector only ever see these traits,
//! so they can be exercised against an in-memory store in tests.

use std::future::Future;

use super::{Filter, RecordBatch, StoreResult};
use crate::config::EnvironmentProfile;

/// Column that scopes shop-owned records.
pub const SHOP_KEY: &str = "shop_id";

/// Read/write access to named collections in one environment.
pub trait DataStoreClient: Send + Sync {
    /// Display name of the environment this client talks to.
    fn environment(&self) -> &str;

    /// Read every record of a collection.
    fn fetch_all(&self, collection: &str) -> impl Future<Output = StoreResult<RecordBatch>> + Send;

    /// Insert or overwrite records by their identifying key.
    ///
    /// Returns the number of records written.
    fn upsert(
        &self,
        collection: &str,
        batch: &RecordBatch,
    ) -> impl Future<Output = StoreResult<usize>> + Send;

    /// Read the records of a collection owned by `shop_id`, narrowed by `filters`.
    fn query_by_shop(
        &self,
        collection: &str,
        shop_id: &str,
        filters: &[Filter],
    ) -> impl Future<Output = StoreResult<RecordBatch>> + Send;
}

/// Produces an authenticated client for a resolved environment profile.
pub trait Connector {
    type Client: DataStoreClient;

    fn connect(&self, profile: &EnvironmentProfile) -> StoreResult<Self::Client>;
}
