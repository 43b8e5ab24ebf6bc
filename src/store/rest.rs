//! REST client for the hosted database.
//!
//! Talks to the project's PostgREST interface (`/rest/v1/<collection>`),
//! authenticating every request with the environment's service key.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::client::{Connector, DataStoreClient, SHOP_KEY};
use super::{Filter, RECORD_KEY, Record, RecordBatch, StoreError, StoreResult};
use crate::config::{EnvironmentProfile, Secret};

/// Rows requested per page when reading a whole collection.
const PAGE_SIZE: usize = 1000;

/// PostgREST-backed [`DataStoreClient`].
pub struct RestStore {
    environment: String,
    base_url: String,
    key: Secret,
    client: Client,
}

impl RestStore {
    /// Create a client for `profile` with a per-call `timeout`.
    pub fn new(profile: &EnvironmentProfile, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Connection {
                environment: profile.name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            environment: profile.name.clone(),
            base_url: format!("{}/rest/v1", profile.endpoint.trim_end_matches('/')),
            key: profile.credential.clone(),
            client,
        })
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.key.expose())
            .bearer_auth(self.key.expose())
    }

    /// Send a request, retrying once on a transient network failure.
    async fn send<F>(&self, build: F) -> StoreResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        match build().send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                let err = self.transport_error(e);
                if !err.is_transient() {
                    return Err(err);
                }
                warn!(environment = %self.environment, "Retrying after transient failure: {}", err);
                build().send().await.map_err(|e| self.transport_error(e))
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout {
                environment: self.environment.clone(),
            }
        } else if e.is_connect() {
            StoreError::Connection {
                environment: self.environment.clone(),
                message: e.to_string(),
            }
        } else {
            StoreError::InvalidResponse {
                environment: self.environment.clone(),
                message: e.to_string(),
            }
        }
    }

    /// Map non-success statuses to [`StoreError::Rejected`].
    async fn check(&self, collection: &str, response: Response) -> StoreResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(StoreError::Rejected {
            environment: self.environment.clone(),
            collection: collection.to_string(),
            status,
            message,
        })
    }

    /// Read every page matching `filters`, ordered by key.
    ///
    /// Projects may cap rows per response below [`PAGE_SIZE`], so only an
    /// empty page ends the scan.
    async fn fetch_pages(
        &self,
        collection: &str,
        filters: Vec<(String, String)>,
    ) -> StoreResult<RecordBatch> {
        let url = self.collection_url(collection);
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            let mut query = filters.clone();
            query.extend([
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), format!("{}.asc", RECORD_KEY)),
                ("limit".to_string(), PAGE_SIZE.to_string()),
                ("offset".to_string(), offset.to_string()),
            ]);
            let response = self
                .send(|| self.authorized(self.client.get(&url).query(&query)))
                .await?;
            let page = self.read_batch(self.check(collection, response).await?).await?;
            if page.is_empty() {
                break;
            }

            let fetched = page.len();
            records.extend(page);
            debug!(collection, fetched, offset, "Fetched page");
            offset += fetched;
        }

        Ok(RecordBatch::new(records))
    }

    async fn read_batch(&self, response: Response) -> StoreResult<RecordBatch> {
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse {
                environment: self.environment.clone(),
                message: e.to_string(),
            })?;

        rows.into_iter()
            .map(|row| {
                Record::from_value(row).ok_or_else(|| StoreError::InvalidResponse {
                    environment: self.environment.clone(),
                    message: "expected an array of objects".to_string(),
                })
            })
            .collect::<StoreResult<Vec<_>>>()
            .map(RecordBatch::new)
    }
}

impl DataStoreClient for RestStore {
    fn environment(&self) -> &str {
        &self.environment
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<RecordBatch> {
        self.fetch_pages(collection, Vec::new()).await
    }

    async fn upsert(&self, collection: &str, batch: &RecordBatch) -> StoreResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        if batch.iter().any(|record| record.key().is_none()) {
            return Err(StoreError::MissingKey {
                collection: collection.to_string(),
                key: RECORD_KEY.to_string(),
            });
        }

        let url = self.collection_url(collection);
        let response = self
            .send(|| {
                self.authorized(self.client.post(&url))
                    .query(&[("on_conflict", RECORD_KEY)])
                    .header("Prefer", "resolution=merge-duplicates,return=minimal")
                    .json(batch)
            })
            .await?;
        // return=minimal answers 201 with no body
        self.check(collection, response).await?;

        Ok(batch.len())
    }

    async fn query_by_shop(
        &self,
        collection: &str,
        shop_id: &str,
        filters: &[Filter],
    ) -> StoreResult<RecordBatch> {
        let mut query = vec![(SHOP_KEY.to_string(), format!("eq.{}", shop_id))];
        query.extend(
            filters
                .iter()
                .map(|f| (f.field.clone(), format!("eq.{}", f.query_value()))),
        );
        self.fetch_pages(collection, query).await
    }
}

/// Creates [`RestStore`]s sharing one timeout setting.
#[derive(Debug, Clone, Copy)]
pub struct RestConnector {
    timeout: Duration,
}

impl RestConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for RestConnector {
    type Client = RestStore;

    fn connect(&self, profile: &EnvironmentProfile) -> StoreResult<RestStore> {
        RestStore::new(profile, self.timeout)
    }
}
