//! Data store access.
//!
//! All durable state lives in the hosted database. This module defines the
//! narrow capability the rest of the crate depends on, plus its
//! implementations.
//!
//! # Architecture
//!
//! - `client`: `DataStoreClient` and `Connector` traits
//! - `models`: opaque `Record`s, `RecordBatch` and query `Filter`s
//! - `rest`: PostgREST implementation over reqwest
//! - `memory`: in-memory implementation for tests

mod client;
mod error;
#[cfg(test)]
mod memory;
mod models;
mod rest;

#[cfg(test)]
mod memory_test;

pub use client::{Connector, DataStoreClient, SHOP_KEY};
pub use error::{StoreError, StoreResult};
#[cfg(test)]
pub use memory::{MemoryConnector, MemoryStore, Operation};
pub use models::{Filter, RECORD_KEY, Record, RecordBatch};
pub use rest::{RestConnector, RestStore};
