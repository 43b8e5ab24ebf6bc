//! Tests for the in-memory store and the record model it relies on.

use crate::store::{DataStoreClient, Filter, MemoryStore, Operation, Record, RecordBatch};
use serde_json::json;

fn batch(rows: Vec<serde_json::Value>) -> RecordBatch {
    RecordBatch::new(rows.into_iter().filter_map(Record::from_value).collect())
}

#[test]
fn record_key_accepts_string_and_numeric_ids() {
    let text = Record::from_value(json!({"id": "abc"})).unwrap();
    let number = Record::from_value(json!({"id": 42})).unwrap();
    let empty = Record::from_value(json!({"id": ""})).unwrap();
    let missing = Record::from_value(json!({"name": "x"})).unwrap();

    assert_eq!(text.key().as_deref(), Some("abc"));
    assert_eq!(number.key().as_deref(), Some("42"));
    assert_eq!(empty.key(), None);
    assert_eq!(missing.key(), None);
}

#[test]
fn non_objects_are_not_records() {
    assert!(Record::from_value(json!([1, 2])).is_none());
    assert!(Record::from_value(json!("id")).is_none());
}

#[test]
fn filter_query_value_strips_string_quotes() {
    assert_eq!(Filter::eq("is_active", true).query_value(), "true");
    assert_eq!(Filter::eq("shop_id", "s-1").query_value(), "s-1");
}

#[tokio::test]
async fn upsert_overwrites_by_key() {
    let store = MemoryStore::new("Development");

    store
        .upsert("shops", &batch(vec![json!({"id": "s-1", "name": "Old"})]))
        .await
        .unwrap();
    store
        .upsert("shops", &batch(vec![json!({"id": "s-1", "name": "New"})]))
        .await
        .unwrap();

    let records = store.records("shops");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some(&json!("New")));
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn query_by_shop_applies_shop_and_filters() {
    let store = MemoryStore::new("Production");
    store.insert(
        "services",
        vec![
            json!({"id": "1", "shop_id": "a", "is_active": true}),
            json!({"id": "2", "shop_id": "a", "is_active": false}),
            json!({"id": "3", "shop_id": "b", "is_active": true}),
        ],
    );

    let all = store.query_by_shop("services", "a", &[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let active = store
        .query_by_shop("services", "a", &[Filter::eq("is_active", true)])
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active.iter().next().unwrap().key().as_deref(), Some("1"));
}

#[tokio::test]
async fn injected_failures_surface_as_store_errors() {
    let store = MemoryStore::new("Production");
    store.fail_on(Operation::Fetch, "services");

    assert!(store.fetch_all("shops").await.is_ok());
    assert!(store.fetch_all("services").await.is_err());
}

#[tokio::test]
async fn upsert_budget_fails_later_calls() {
    let store = MemoryStore::new("Development");
    store.fail_upserts_after(1);
    let rows = batch(vec![json!({"id": "x"})]);

    assert!(store.upsert("a", &rows).await.is_ok());
    assert!(store.upsert("b", &rows).await.is_err());
    assert_eq!(store.count("b"), 0);
}
