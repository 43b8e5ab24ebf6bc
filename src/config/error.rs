//! Configuration error types.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use super::Role;

/// Problems detected before any environment is contacted.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("No credential configured for the {role} environment ({variable} is unset or empty)")]
    #[diagnostic(
        code(detail_ops::config::missing_credential),
        help("Export {variable} with the service key of the {role} project before running.")
    )]
    MissingCredential { role: Role, variable: String },

    #[error("Collection '{collection}' holds customer data and cannot be promoted")]
    #[diagnostic(
        code(detail_ops::config::transactional_collection),
        help("Remove it from `collections`; bookings and leads never leave production.")
    )]
    TransactionalCollection { collection: String },

    #[error("Endpoint for the {role} environment is not an http(s) URL: '{endpoint}'")]
    #[diagnostic(code(detail_ops::config::invalid_endpoint))]
    InvalidEndpoint { role: Role, endpoint: String },

    #[error("Request timeout must be at least one second")]
    #[diagnostic(code(detail_ops::config::invalid_timeout))]
    InvalidTimeout,

    #[error("Failed to read config file {path:?}: {source}")]
    #[diagnostic(code(detail_ops::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    #[diagnostic(code(detail_ops::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
