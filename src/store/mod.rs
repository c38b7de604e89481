//! Access to the hosted document store.
//!
//! Handlers and statistics talk to the backend through the [`DocumentStore`]
//! trait so the Appwrite client can be swapped for [`memory::MemoryStore`]
//! in tests. Documents travel as raw JSON and are decoded into typed models
//! by the helpers in this module.

pub mod appwrite;
pub mod memory;
pub mod query;
pub mod storage;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use query::Query;

/// Page size used when walking a whole collection.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Posts,
    Likes,
    Comments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Likes => "likes",
            Collection::Comments => "comments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a listing plus the total number of matching documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

#[derive(Debug)]
pub enum StoreError {
    Http(reqwest::Error),
    Remote { status: u16, message: String },
    Decode(serde_json::Error),
    NotFound,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(e) => write!(f, "Backend request failed: {e}"),
            StoreError::Remote { status, message } => {
                write!(f, "Backend returned {status}: {message}")
            }
            StoreError::Decode(e) => write!(f, "Unexpected backend payload: {e}"),
            StoreError::NotFound => write!(f, "Document not found"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Http(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e)
    }
}

impl StoreError {
    /// Message suitable for showing to the person who triggered the call.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<DocumentList<Value>, StoreError>;

    async fn get_document(&self, collection: Collection, id: &str) -> Result<Value, StoreError>;

    async fn update_document(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError>;

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Value>) -> Result<Vec<T>, StoreError> {
    documents
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
        .collect()
}

/// Fetch one page and decode it.
pub async fn list<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &Query,
) -> Result<DocumentList<T>, StoreError> {
    let page = store.list_documents(collection, query).await?;
    Ok(DocumentList {
        total: page.total,
        documents: decode_all(page.documents)?,
    })
}

/// Walk every page matching `query` and return all documents.
///
/// Any limit/offset already on `query` is replaced.
pub async fn list_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    let mut collected: Vec<Value> = Vec::new();
    loop {
        let page_query = query
            .clone()
            .limit(PAGE_SIZE)
            .offset(collected.len() as u32);
        let page = store.list_documents(collection, &page_query).await?;
        let fetched = page.documents.len();
        collected.extend(page.documents);
        if fetched == 0 || collected.len() as u64 >= page.total {
            break;
        }
    }
    log::debug!("Loaded {} {} documents", collected.len(), collection);
    decode_all(collected)
}

/// Number of documents matching `query`, using the listing total.
pub async fn count(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &Query,
) -> Result<u64, StoreError> {
    let page = store
        .list_documents(collection, &query.clone().limit(1).offset(0))
        .await?;
    Ok(page.total)
}

/// Fetch one document; `Ok(None)` when it does not exist.
pub async fn find<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.get_document(collection, id).await {
        Ok(doc) => Ok(Some(serde_json::from_value(doc)?)),
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
