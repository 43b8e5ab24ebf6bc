//! In-memory data store used by tests.
//!
//! Records are kept per collection, keyed by their identifying key, so
//! upserts behave like the hosted database's merge-duplicates mode.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use serde_json::Value;

use super::client::{Connector, DataStoreClient, SHOP_KEY};
use super::{Filter, RECORD_KEY, Record, RecordBatch, StoreError, StoreResult};
use crate::config::EnvironmentProfile;

/// Store operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Upsert,
    Query,
}

struct Inner {
    environment: String,
    collections: DashMap<String, BTreeMap<String, Record>>,
    calls: AtomicUsize,
    upserts: AtomicUsize,
    upsert_budget: AtomicUsize,
    failures: DashSet<(Operation, String)>,
}

/// Cloneable handle to a shared in-memory store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new(environment: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                environment: environment.to_string(),
                collections: DashMap::new(),
                calls: AtomicUsize::new(0),
                upserts: AtomicUsize::new(0),
                upsert_budget: AtomicUsize::new(usize::MAX),
                failures: DashSet::new(),
            }),
        }
    }

    /// Insert JSON objects directly, bypassing call counting.
    pub fn insert(&self, collection: &str, rows: Vec<Value>) {
        let mut table = self.inner.collections.entry(collection.to_string()).or_default();
        for row in rows {
            let record = Record::from_value(row).expect("fixture rows must be objects");
            let key = record.key().expect("fixture rows must have an id");
            table.insert(key, record);
        }
    }

    /// Records of a collection in key order.
    pub fn records(&self, collection: &str) -> Vec<Record> {
        self.inner
            .collections
            .get(collection)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map(|table| table.len())
            .unwrap_or(0)
    }

    pub fn contains(&self, collection: &str, key: &str) -> bool {
        self.inner
            .collections
            .get(collection)
            .is_some_and(|table| table.contains_key(key))
    }

    /// Number of trait calls made against this store.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Make every `operation` on `collection` fail.
    pub fn fail_on(&self, operation: Operation, collection: &str) {
        self.inner
            .failures
            .insert((operation, collection.to_string()));
    }

    /// Let `count` upserts succeed, then fail every following one.
    pub fn fail_upserts_after(&self, count: usize) {
        self.inner.upsert_budget.store(count, Ordering::SeqCst);
    }

    fn enter(&self, operation: Operation, collection: &str) -> StoreResult<()> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .inner
            .failures
            .contains(&(operation, collection.to_string()));
        let over_budget = operation == Operation::Upsert
            && self.inner.upserts.load(Ordering::SeqCst)
                >= self.inner.upsert_budget.load(Ordering::SeqCst);

        if injected || over_budget {
            return Err(StoreError::Rejected {
                environment: self.inner.environment.clone(),
                collection: collection.to_string(),
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl DataStoreClient for MemoryStore {
    fn environment(&self) -> &str {
        &self.inner.environment
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<RecordBatch> {
        self.enter(Operation::Fetch, collection)?;
        Ok(RecordBatch::new(self.records(collection)))
    }

    async fn upsert(&self, collection: &str, batch: &RecordBatch) -> StoreResult<usize> {
        self.enter(Operation::Upsert, collection)?;

        let mut keyed = Vec::with_capacity(batch.len());
        for record in batch {
            let key = record.key().ok_or_else(|| StoreError::MissingKey {
                collection: collection.to_string(),
                key: RECORD_KEY.to_string(),
            })?;
            keyed.push((key, record.clone()));
        }

        let mut table = self
            .inner
            .collections
            .entry(collection.to_string())
            .or_default();
        table.extend(keyed);
        self.inner.upserts.fetch_add(1, Ordering::SeqCst);

        Ok(batch.len())
    }

    async fn query_by_shop(
        &self,
        collection: &str,
        shop_id: &str,
        filters: &[Filter],
    ) -> StoreResult<RecordBatch> {
        self.enter(Operation::Query, collection)?;

        let shop = Filter::eq(SHOP_KEY, shop_id);
        let records = self
            .records(collection)
            .into_iter()
            .filter(|record| record.matches(&shop) && filters.iter().all(|f| record.matches(f)))
            .collect();
        Ok(RecordBatch::new(records))
    }
}

/// Hands out [`MemoryStore`]s by environment name and counts connections.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    stores: HashMap<String, MemoryStore>,
    connects: Arc<AtomicUsize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: &MemoryStore) -> Self {
        self.stores
            .insert(store.environment().to_string(), store.clone());
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    type Client = MemoryStore;

    fn connect(&self, profile: &EnvironmentProfile) -> StoreResult<MemoryStore> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.stores
            .get(&profile.name)
            .cloned()
            .ok_or_else(|| StoreError::Connection {
                environment: profile.name.clone(),
                message: "no such environment".to_string(),
            })
    }
}
