use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::list_state::ListState;
use super::user::User;
use super::{Page, null_as_default};
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Author relationship: the expanded user document, or only its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Expanded(Box<User>),
    Id(String),
}

impl Author {
    pub fn id(&self) -> &str {
        match self {
            Author::Expanded(user) => &user.id,
            Author::Id(id) => id,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Author::Expanded(user) => Some(user.as_ref()),
            Author::Id(_) => None,
        }
    }
}

/// Post document and its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, alias = "hashTags", deserialize_with = "null_as_default")]
    pub hashtags: Vec<String>,
    #[serde(rename = "fileIds", default, deserialize_with = "null_as_default")]
    pub file_ids: Vec<String>,
    #[serde(rename = "accountID", default)]
    pub author: Option<Author>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Title with markup removed, or a placeholder when nothing is left.
    pub fn plain_title(&self) -> String {
        let text = strip_html(&self.title);
        if text.is_empty() { UNTITLED.to_string() } else { text }
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(Author::id)
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(Author::user)
            .map(|a| a.username.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn author_avatar(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(Author::user)
            .and_then(|a| a.avatar_id.as_deref())
    }
}

/// An element tag or comment; a `<` not followed by a tag name is text.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").unwrap());

/// Drop tags, decode the common entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub const SEARCH_ATTRIBUTE: &str = "title";

pub async fn find_page(store: &dyn DocumentStore, state: &ListState) -> Result<Page<Post>, StoreError> {
    let result = store::list::<Post>(store, Collection::Posts, &state.to_query(SEARCH_ATTRIBUTE)).await?;
    Ok(state.page_of(result.documents, result.total))
}

pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Post>, StoreError> {
    store::find(store, Collection::Posts, id).await
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete_document(Collection::Posts, id).await
}

pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<Post>, StoreError> {
    store::list_all(store, Collection::Posts, &Query::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_markup_and_entities() {
        assert_eq!(strip_html("<p>Hello&nbsp;<b>world</b></p>"), "Hello world");
        assert_eq!(strip_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(strip_html("<br/>"), "");
    }

    #[test]
    fn keeps_comparison_signs_in_plain_text() {
        assert_eq!(strip_html("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(strip_html("<p>a <b>&lt; b</b></p>"), "a < b");
        assert_eq!(strip_html("x<!-- note -->y"), "x y");
    }

    #[test]
    fn decodes_with_legacy_hashtag_field_and_nulls() {
        let post: Post = serde_json::from_value(json!({
            "$id": "p1",
            "title": "<h1></h1>",
            "hashTags": ["rust"],
            "fileIds": null,
            "accountID": null,
            "$createdAt": "2024-03-06T10:00:00.000+00:00"
        }))
        .unwrap();
        assert_eq!(post.hashtags, vec!["rust"]);
        assert!(post.file_ids.is_empty());
        assert_eq!(post.plain_title(), UNTITLED);
        assert_eq!(post.author_name(), UNKNOWN_AUTHOR);
        assert_eq!(post.author_id(), None);
    }

    #[test]
    fn author_may_be_a_bare_id() {
        let post: Post = serde_json::from_value(json!({
            "$id": "p1",
            "title": "Hi",
            "accountID": "u1",
            "$createdAt": "2024-03-06T10:00:00.000+00:00"
        }))
        .unwrap();
        assert_eq!(post.author_id(), Some("u1"));
        assert_eq!(post.author_name(), UNKNOWN_AUTHOR);
        assert_eq!(post.author_avatar(), None);
    }
}
