use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "postCollections", default)]
    pub post: Option<Reference>,
    /// Author of the comment.
    #[serde(rename = "userCollections", default)]
    pub user: Option<Reference>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn post_id(&self) -> Option<&str> {
        self.post.as_ref().map(|r| r.id.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|r| r.id.as_str())
    }
}

pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<Comment>, StoreError> {
    store::list_all(store, Collection::Comments, &Query::new()).await
}
