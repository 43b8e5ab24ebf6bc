//! Read-only service inspection for a single shop.
//!
//! Answers "what does this shop offer?" by listing every service record,
//! the active subset and the service categories. Nothing is written.

use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::instrument;

use crate::store::{DataStoreClient, Filter, RecordBatch, StoreResult};

pub const SERVICES: &str = "services";
pub const SERVICE_CATEGORIES: &str = "service_categories";
/// Flag marking a service as bookable.
pub const ACTIVE_FLAG: &str = "is_active";

/// Services and categories of one shop.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInspection {
    pub shop_id: String,
    pub services: RecordBatch,
    pub active_services: RecordBatch,
    pub categories: RecordBatch,
}

/// Query all services, active services and categories of `shop_id`.
#[instrument(skip(client), fields(environment = client.environment()))]
pub async fn inspect_services<C: DataStoreClient>(
    client: &C,
    shop_id: &str,
) -> StoreResult<ServiceInspection> {
    let services = client.query_by_shop(SERVICES, shop_id, &[]).await?;
    let active_services = client
        .query_by_shop(SERVICES, shop_id, &[Filter::eq(ACTIVE_FLAG, true)])
        .await?;
    let categories = client
        .query_by_shop(SERVICE_CATEGORIES, shop_id, &[])
        .await?;

    Ok(ServiceInspection {
        shop_id: shop_id.to_string(),
        services,
        active_services,
        categories,
    })
}

impl ServiceInspection {
    /// Render the inspection as titled tables.
    pub fn to_tables(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Shop: {}\n\n", self.shop_id));
        output.push_str(&section(
            "All services",
            &self.services,
            &["id", "name", "category_id", ACTIVE_FLAG],
        ));
        output.push_str(&section(
            "Active services",
            &self.active_services,
            &["id", "name", "category_id"],
        ));
        output.push_str(&section(
            "Service categories",
            &self.categories,
            &["id", "name"],
        ));
        output
    }
}

fn section(title: &str, batch: &RecordBatch, columns: &[&str]) -> String {
    if batch.is_empty() {
        return format!("{} (0)\nNo records found.\n\n", title);
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for record in batch {
        builder.push_record(columns.iter().map(|c| cell(record.get(c))));
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    format!("{} ({})\n{}\n\n", title, batch.len(), table)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
