//! `serve` command implementation.

use std::net::IpAddr;
use std::time::Duration;

use crate::cli::error::{CliError, CliResult};
use crate::config::Secret;
use crate::convert;

/// Build the conversion server settings from CLI input.
pub fn server_config(
    host: IpAddr,
    port: u16,
    upstream_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
) -> CliResult<convert::Config> {
    let upstream_url = upstream_url
        .filter(|url| !url.trim().is_empty())
        .ok_or(CliError::MissingUpstream)?;
    let api_key = api_key.map(Secret::new).filter(|key| !key.is_blank());

    Ok(convert::Config {
        host,
        port,
        upstream_url,
        api_key,
        timeout,
    })
}

/// Run the conversion server until Ctrl-C.
pub async fn serve(config: convert::Config) -> CliResult<()> {
    convert::run(config).await?;
    Ok(())
}
