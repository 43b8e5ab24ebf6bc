//! Process configuration.
//!
//! Resolved once at startup and passed explicitly to every collaborator.
//! Precedence: CLI flag > `DETAIL_OPS_CONFIG` file > built-in defaults.
//! Credentials are never part of this file; see [`super::Registry`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::error::{ConfigError, ConfigResult};
use super::paths::get_lock_path;
use super::registry::Role;
use crate::sync::{DEFAULT_COLLECTIONS, is_protected};

/// Default per-call timeout against the data store.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fixed connection settings of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentSettings {
    /// Display label used in logs and reports
    pub name: String,
    /// Base URL of the hosted project
    pub endpoint: String,
}

/// detail-ops configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: EnvironmentSettings,
    pub target: EnvironmentSettings,
    /// Configuration-class collections promoted from source to target, in order
    pub collections: Vec<String>,
    pub request_timeout_secs: u64,
    /// Advisory lock serializing sync jobs
    pub lock_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: EnvironmentSettings {
                name: "Production".to_string(),
                endpoint: "https://detailing-prod.supabase.co".to_string(),
            },
            target: EnvironmentSettings {
                name: "Development".to_string(),
                endpoint: "https://detailing-dev.supabase.co".to_string(),
            },
            collections: DEFAULT_COLLECTIONS.iter().map(|c| c.to_string()).collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            lock_path: get_lock_path(),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file and validate it.
    ///
    /// Sections missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject configurations that could leak customer data or never connect.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(collection) = self.collections.iter().find(|c| is_protected(c)) {
            return Err(ConfigError::TransactionalCollection {
                collection: collection.clone(),
            });
        }

        for role in [Role::Source, Role::Target] {
            let endpoint = &self.environment(role).endpoint;
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::InvalidEndpoint {
                    role,
                    endpoint: endpoint.clone(),
                });
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    /// Settings for the given role.
    pub fn environment(&self, role: Role) -> &EnvironmentSettings {
        match role {
            Role::Source => &self.source,
            Role::Target => &self.target,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Override the lock file location (CLI flag).
    pub fn with_lock_path(mut self, path: PathBuf) -> Self {
        self.lock_path = path;
        self
    }

    /// Override the per-call timeout (CLI flag).
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }
}
