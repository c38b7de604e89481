use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::list_state::ListState;
use super::{Page, null_as_default};
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

/// Platform user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "avatarId", default)]
    pub avatar_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follower: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followed: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            "Unknown"
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Online => "online",
            UserStatus::Blocked => "blocked",
        }
    }
}

/// Attribute searched by the management list.
pub const SEARCH_ATTRIBUTE: &str = "username";

/// Newest-first page of users, optionally filtered by username.
pub async fn find_page(store: &dyn DocumentStore, state: &ListState) -> Result<Page<User>, StoreError> {
    let result = store::list::<User>(store, Collection::Users, &state.to_query(SEARCH_ATTRIBUTE)).await?;
    Ok(state.page_of(result.documents, result.total))
}

pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<User>, StoreError> {
    store::find(store, Collection::Users, id).await
}

pub async fn update_status(
    store: &dyn DocumentStore,
    id: &str,
    status: UserStatus,
) -> Result<User, StoreError> {
    let doc = store
        .update_document(Collection::Users, id, json!({ "status": status.as_str() }))
        .await?;
    Ok(serde_json::from_value(doc)?)
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete_document(Collection::Users, id).await
}

/// Users ordered by follower count, sorted by the backend.
pub async fn top_by_followers(store: &dyn DocumentStore, limit: u32) -> Result<Vec<User>, StoreError> {
    let query = Query::new().order_desc("follower").limit(limit);
    Ok(store::list::<User>(store, Collection::Users, &query).await?.documents)
}

pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<User>, StoreError> {
    store::list_all(store, Collection::Users, &Query::new()).await
}
