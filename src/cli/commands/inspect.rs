//! `inspect-services` command implementation.

use crate::cli::OutputFormat;
use crate::cli::error::CliResult;
use crate::inspect::inspect_services;
use crate::store::DataStoreClient;

/// Show every service, the active services and the categories of a shop.
pub async fn inspect<C: DataStoreClient>(
    client: &C,
    shop_id: &str,
    format: OutputFormat,
) -> CliResult<String> {
    let inspection = inspect_services(client, shop_id).await?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&inspection)?),
        OutputFormat::Table => Ok(inspection.to_tables()),
    }
}
