//! Configuration and environment resolution.
//!
//! - `settings`: fixed endpoints, collection allow-list, timeouts
//! - `registry`: role → profile resolution against a secret source
//! - `secret`: redacted credential type and secret sources

mod error;
mod paths;
mod registry;
mod secret;
mod settings;

#[cfg(test)]
mod registry_test;

pub use error::{ConfigError, ConfigResult};
pub use paths::{get_data_dir, get_lock_path};
pub use registry::{EnvironmentProfile, Registry, Role};
#[cfg(test)]
pub use secret::MockSecretSource;
pub use secret::{ProcessEnv, Secret, SecretSource};
pub use settings::{Config, DEFAULT_REQUEST_TIMEOUT_SECS, EnvironmentSettings};
