//! Synthetic records seeded into development environments.
//!
//! Fixture ids are fixed so re-seeding overwrites instead of duplicating.
//! Bump [`FIXTURE_VERSION`] whenever the set changes.

use serde_json::{Value, json};

use crate::store::{Record, RecordBatch};

pub const FIXTURE_VERSION: u32 = 1;

pub const SAMPLE_SHOP_ID: &str = "f1c7a000-0000-4000-8000-000000000001";

const EXTERIOR_CATEGORY_ID: &str = "f1c7a000-0000-4000-8000-000000000101";
const INTERIOR_CATEGORY_ID: &str = "f1c7a000-0000-4000-8000-000000000102";
const COATING_CATEGORY_ID: &str = "f1c7a000-0000-4000-8000-000000000103";

/// A versioned, ordered set of fixture collections.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub version: u32,
    pub collections: Vec<(String, RecordBatch)>,
}

impl FixtureSet {
    pub fn new(version: u32, collections: Vec<(String, RecordBatch)>) -> Self {
        Self {
            version,
            collections,
        }
    }

    /// Sample shop with its service catalogue.
    pub fn standard() -> Self {
        Self::new(
            FIXTURE_VERSION,
            vec![
                ("shops".to_string(), batch(shops())),
                ("service_categories".to_string(), batch(categories())),
                ("services".to_string(), batch(services())),
            ],
        )
    }

    /// Total number of fixture records.
    pub fn len(&self) -> usize {
        self.collections.iter().map(|(_, b)| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn batch(rows: Vec<Value>) -> RecordBatch {
    RecordBatch::new(rows.into_iter().filter_map(Record::from_value).collect())
}

fn shops() -> Vec<Value> {
    vec![json!({
        "id": SAMPLE_SHOP_ID,
        "name": "Sample Detailing Studio",
        "slug": "sample-detailing",
        "phone": "+1 555 0100",
        "email": "studio@example.test",
        "timezone": "America/New_York",
        "is_active": true,
    })]
}

fn categories() -> Vec<Value> {
    vec![
        json!({
            "id": EXTERIOR_CATEGORY_ID,
            "shop_id": SAMPLE_SHOP_ID,
            "name": "Exterior",
            "sort_order": 1,
        }),
        json!({
            "id": INTERIOR_CATEGORY_ID,
            "shop_id": SAMPLE_SHOP_ID,
            "name": "Interior",
            "sort_order": 2,
        }),
        json!({
            "id": COATING_CATEGORY_ID,
            "shop_id": SAMPLE_SHOP_ID,
            "name": "Ceramic Coating",
            "sort_order": 3,
        }),
    ]
}

fn services() -> Vec<Value> {
    [
        ("201", EXTERIOR_CATEGORY_ID, "Hand Wash & Wax", 7500, 90, true),
        ("202", EXTERIOR_CATEGORY_ID, "Paint Decontamination", 12000, 120, true),
        ("203", INTERIOR_CATEGORY_ID, "Full Interior Detail", 15000, 180, true),
        ("204", INTERIOR_CATEGORY_ID, "Odor Removal", 9000, 60, false),
        ("205", COATING_CATEGORY_ID, "One-Year Ceramic Coating", 65000, 480, true),
    ]
    .into_iter()
    .map(|(suffix, category, name, price_cents, minutes, active)| {
        json!({
            "id": format!("f1c7a000-0000-4000-8000-000000000{}", suffix),
            "shop_id": SAMPLE_SHOP_ID,
            "category_id": category,
            "name": name,
            "price_cents": price_cents,
            "duration_minutes": minutes,
            "is_active": active,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_fixtures_have_unique_stable_keys() {
        let fixtures = FixtureSet::standard();
        let mut keys = HashSet::new();
        for (_, batch) in &fixtures.collections {
            for record in batch {
                let key = record.key().expect("fixture without id");
                assert!(keys.insert(key.clone()), "duplicate fixture id {}", key);
            }
        }
        assert_eq!(keys.len(), fixtures.len());
        assert_eq!(fixtures.len(), 9);
    }

    #[test]
    fn standard_fixtures_are_deterministic() {
        let a = FixtureSet::standard();
        let b = FixtureSet::standard();
        assert_eq!(a.collections, b.collections);
    }

    #[test]
    fn standard_fixtures_never_touch_customer_data() {
        let fixtures = FixtureSet::standard();
        assert!(
            fixtures
                .collections
                .iter()
                .all(|(name, _)| !crate::sync::is_protected(name))
        );
    }
}
