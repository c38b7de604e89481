use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "postCollections", default)]
    pub post: Option<Reference>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn post_id(&self) -> Option<&str> {
        self.post.as_ref().map(|r| r.id.as_str())
    }
}

pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<Like>, StoreError> {
    store::list_all(store, Collection::Likes, &Query::new()).await
}
