//! Per-stage record counts.

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// Records written to one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CollectionCount {
    #[tabled(rename = "Collection")]
    pub collection: String,
    #[tabled(rename = "Records")]
    pub records: usize,
}

/// Result of the copy stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub collections: Vec<CollectionCount>,
}

/// Result of the seed stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub fixture_version: u32,
    pub collections: Vec<CollectionCount>,
}

impl CopyReport {
    pub(crate) fn record(&mut self, collection: &str, records: usize) {
        self.collections.push(CollectionCount {
            collection: collection.to_string(),
            records,
        });
    }

    pub fn total(&self) -> usize {
        self.collections.iter().map(|c| c.records).sum()
    }

    /// Names of the collections that were fully written.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections
            .iter()
            .map(|c| c.collection.as_str())
            .collect()
    }

    pub fn to_table(&self) -> String {
        render(&self.collections, self.total())
    }
}

impl SeedReport {
    pub(crate) fn record(&mut self, collection: &str, records: usize) {
        self.collections.push(CollectionCount {
            collection: collection.to_string(),
            records,
        });
    }

    pub fn total(&self) -> usize {
        self.collections.iter().map(|c| c.records).sum()
    }

    pub fn to_table(&self) -> String {
        render(&self.collections, self.total())
    }
}

fn render(counts: &[CollectionCount], total: usize) -> String {
    let mut rows = counts.to_vec();
    rows.push(CollectionCount {
        collection: "Total".to_string(),
        records: total,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
