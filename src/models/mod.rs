pub mod comment;
pub mod like;
pub mod list_state;
pub mod post;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Relationship field pointing at another document.
///
/// The backend sends either the expanded document or its bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawReference")]
pub struct Reference {
    #[serde(rename = "$id")]
    pub id: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Id(String),
    Document {
        #[serde(rename = "$id")]
        id: String,
    },
}

impl From<RawReference> for Reference {
    fn from(raw: RawReference) -> Self {
        match raw {
            RawReference::Id(id) | RawReference::Document { id } => Reference { id },
        }
    }
}

/// Only the creation stamp of a document, for time-window counts.
#[derive(Debug, Clone, Deserialize)]
pub struct Stamped {
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One page of a management listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_accepts_expanded_document() {
        let r: Reference = serde_json::from_value(json!({"$id": "p1", "title": "x"})).unwrap();
        assert_eq!(r.id, "p1");
    }

    #[test]
    fn reference_accepts_bare_id() {
        let r: Reference = serde_json::from_value(json!("p2")).unwrap();
        assert_eq!(r.id, "p2");
    }
}
