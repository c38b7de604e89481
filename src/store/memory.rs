//! In-process document store.
//!
//! Mirrors the subset of Appwrite listing semantics the dashboard relies on:
//! creation-time range filters, case-insensitive search, descending sort,
//! `total` counted before pagination, and a default page size of 25.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::store::query::CREATED_AT;
use crate::store::{Collection, DocumentList, DocumentStore, Query, StoreError};

/// Page size applied when a query carries no limit.
pub const DEFAULT_LIMIT: u32 = 25;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
    failing: RwLock<HashSet<Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: Collection, document: Value) {
        let mut map = self.collections.write().unwrap_or_else(|e| e.into_inner());
        map.entry(collection).or_default().push(document);
    }

    pub fn insert_many(&self, collection: Collection, documents: impl IntoIterator<Item = Value>) {
        for doc in documents {
            self.insert(collection, doc);
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        map.get(&collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    /// Make every call touching `collection` fail with a 503.
    pub fn fail_collection(&self, collection: Collection) {
        let mut failing = self.failing.write().unwrap_or_else(|e| e.into_inner());
        failing.insert(collection);
    }

    fn guard(&self, collection: Collection) -> Result<(), StoreError> {
        let failing = self.failing.read().unwrap_or_else(|e| e.into_inner());
        if failing.contains(&collection) {
            return Err(StoreError::Remote {
                status: 503,
                message: format!("{collection} unavailable"),
            });
        }
        Ok(())
    }
}

fn id_of(doc: &Value) -> Option<&str> {
    doc.get("$id").and_then(Value::as_str)
}

fn created_at(doc: &Value) -> Option<DateTime<Utc>> {
    doc.get(CREATED_AT)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn matches(doc: &Value, query: &Query) -> bool {
    let stamp = created_at(doc);
    if let Some(after) = query.created_after {
        if !stamp.is_some_and(|at| at > after) {
            return false;
        }
    }
    if let Some(from) = query.created_from {
        if !stamp.is_some_and(|at| at >= from) {
            return false;
        }
    }
    if let Some(until) = query.created_until {
        if !stamp.is_some_and(|at| at <= until) {
            return false;
        }
    }
    if let Some((attribute, term)) = &query.search {
        let haystack = doc
            .get(attribute)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        if !haystack.contains(&term.to_lowercase()) {
            return false;
        }
    }
    true
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<DocumentList<Value>, StoreError> {
        self.guard(collection)?;
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let mut selected: Vec<Value> = map
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, query)).cloned().collect())
            .unwrap_or_default();

        if let Some(attribute) = &query.order_desc {
            selected.sort_by(|a, b| compare_values(b.get(attribute), a.get(attribute)));
        }

        let total = selected.len() as u64;
        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT) as usize;
        let documents = selected.into_iter().skip(offset).take(limit).collect();
        Ok(DocumentList { total, documents })
    }

    async fn get_document(&self, collection: Collection, id: &str) -> Result<Value, StoreError> {
        self.guard(collection)?;
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        map.get(&collection)
            .and_then(|docs| docs.iter().find(|d| id_of(d) == Some(id)))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_document(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        self.guard(collection)?;
        let mut map = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let doc = map
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| id_of(d) == Some(id)))
            .ok_or(StoreError::NotFound)?;

        if let (Some(target), Value::Object(changes)) = (doc.as_object_mut(), data) {
            for (key, value) in changes {
                target.insert(key, value);
            }
            target.insert(
                "$updatedAt".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false)),
            );
        }
        Ok(doc.clone())
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.guard(collection)?;
        let mut map = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let docs = map.get_mut(&collection).ok_or(StoreError::NotFound)?;
        let before = docs.len();
        docs.retain(|d| id_of(d) != Some(id));
        if docs.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
