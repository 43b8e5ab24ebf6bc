use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::convert::ServerError;
use crate::store::StoreError;
use crate::sync::LockError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Server(#[from] ServerError),

    #[error("Conversion upstream is not configured")]
    #[diagnostic(
        code(detail_ops::cli::missing_upstream),
        help("Pass --upstream-url or set the CONVERSION_API_URL environment variable.")
    )]
    MissingUpstream,

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(detail_ops::cli::output))]
    Output { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
