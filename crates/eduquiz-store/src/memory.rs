//! In-memory store implementation.

use async_trait::async_trait;
use eduquiz_core::{DocumentStore, StoreError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory document store.
///
/// Collections are created lazily on first insert. Documents get a string
/// `_id` assigned on insert if they don't carry one.
#[derive(Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

/// Check whether `doc` matches every field of `filter`.
///
/// Dotted filter keys descend into nested objects; an array along the path
/// matches if any element matches the remainder.
fn matches(doc: &Value, filter: &Value) -> bool {
    let Value::Object(fields) = filter else {
        return false;
    };
    fields
        .iter()
        .all(|(path, expected)| path_matches(doc, &path.split('.').collect::<Vec<_>>(), expected))
}

fn path_matches(value: &Value, path: &[&str], expected: &Value) -> bool {
    let Some((head, rest)) = path.split_first() else {
        return value == expected;
    };
    match value {
        Value::Object(map) => map
            .get(*head)
            .is_some_and(|next| path_matches(next, rest, expected)),
        Value::Array(items) => items.iter().any(|item| path_matches(item, path, expected)),
        _ => false,
    }
}

/// Compare two JSON values for sorting (strings lexically, numbers by
/// value). RFC 3339 timestamps sort correctly as strings.
fn sort_key_cmp(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

fn ensure_id(doc: &mut Value) -> Result<Uuid, StoreError> {
    let Value::Object(map) = doc else {
        return Err(StoreError::Insert("document must be a JSON object".into()));
    };
    if let Some(Value::String(existing)) = map.get("_id") {
        return Uuid::parse_str(existing)
            .map_err(|e| StoreError::Insert(format!("invalid _id: {e}")));
    }
    let id = Uuid::new_v4();
    map.insert("_id".to_string(), Value::String(id.to_string()));
    Ok(id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut doc: Value) -> Result<Uuid, StoreError> {
        let id = ensure_id(&mut doc)?;
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(doc);
        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn find(&self, collection: &str, filter: &Value) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, filter)).cloned()))
    }

    async fn find_latest(
        &self,
        collection: &str,
        filter: &Value,
        sort_field: &str,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .filter(|doc| matches(doc, filter))
                .max_by(|a, b| {
                    sort_key_cmp(
                        a.get(sort_field).unwrap_or(&Value::Null),
                        b.get(sort_field).unwrap_or(&Value::Null),
                    )
                })
                .cloned()
        }))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Value,
        patch: Value,
    ) -> Result<u64, StoreError> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::Update("patch must be a JSON object".into()));
        };
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(doc) = docs.iter_mut().find(|doc| matches(doc, filter)) else {
            return Ok(0);
        };
        let Value::Object(target) = doc else {
            return Err(StoreError::Update("stored document is not an object".into()));
        };
        merge(target, patch);
        Ok(1)
    }

    async fn delete_one(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(pos) = docs.iter().position(|doc| matches(doc, filter)) else {
            return Ok(0);
        };
        docs.remove(pos);
        debug!("Deleted one document from {}", collection);
        Ok(1)
    }
}

fn merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}
