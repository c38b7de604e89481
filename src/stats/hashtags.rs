use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TOP_N;
use super::tally::Tally;
use crate::models::post::{self, Post};
use crate::store::{DocumentStore, StoreError};

/// A post carrying a hashtag.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedPost {
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HashtagStat {
    pub tag: String,
    pub count: u64,
    pub posts: Vec<TaggedPost>,
}

/// Tags are counted as stored; blank entries are skipped.
fn is_countable(tag: &str) -> bool {
    !tag.trim().is_empty()
}

/// Most used hashtags, each with the posts it appears in.
pub fn rank_hashtags(posts: &[Post]) -> Vec<HashtagStat> {
    let mut tally: Tally<(), Vec<TaggedPost>> = Tally::new();
    for p in posts {
        let tagged = TaggedPost {
            id: p.id.clone(),
            title: p.plain_title(),
            author_name: p.author_name().to_string(),
            created_at: p.created_at,
        };
        for tag in p.hashtags.iter().filter(|t| is_countable(t)) {
            tally.seed(tag, ());
            tally.record(tag, |list| list.push(tagged.clone()));
        }
    }
    tally
        .rank_by(|list| list.len() as u64, TOP_N)
        .into_iter()
        .map(|e| HashtagStat {
            count: e.counts.len() as u64,
            tag: e.key,
            posts: e.counts,
        })
        .collect()
}

pub async fn top_hashtags(store: &dyn DocumentStore) -> Result<Vec<HashtagStat>, StoreError> {
    let posts = post::find_all(store).await?;
    Ok(rank_hashtags(&posts))
}
