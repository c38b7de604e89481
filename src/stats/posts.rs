use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TOP_N;
use super::tally::{Entry, Tally};
use crate::models::comment::{self, Comment};
use crate::models::like::{self, Like};
use crate::models::post::{self, Post};
use crate::store::storage::StorageUrls;
use crate::store::{DocumentStore, StoreError};

/// Display fields copied from a post when it is seeded.
#[derive(Debug, Clone, Serialize)]
pub struct PostMeta {
    pub title: String,
    pub author_name: String,
    pub author_avatar_url: String,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub media_urls: Vec<String>,
}

impl PostMeta {
    pub fn from_post(post: &Post, urls: &StorageUrls) -> Self {
        Self {
            title: post.plain_title(),
            author_name: post.author_name().to_string(),
            author_avatar_url: urls.avatar_url(post.author_avatar()),
            hashtags: post.hashtags.clone(),
            created_at: post.created_at,
            media_urls: post.file_ids.iter().map(|f| urls.post_file_url(f)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interactions {
    pub likes: u64,
    pub comments: u64,
}

impl Interactions {
    /// Likes and comments weigh the same.
    pub fn total(&self) -> u64 {
        self.likes + self.comments
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostRanking {
    pub post_id: String,
    #[serde(flatten)]
    pub meta: PostMeta,
    pub likes: u64,
    pub comments: u64,
    pub total_interactions: u64,
}

impl From<Entry<PostMeta, Interactions>> for PostRanking {
    fn from(entry: Entry<PostMeta, Interactions>) -> Self {
        Self {
            post_id: entry.key,
            meta: entry.meta,
            likes: entry.counts.likes,
            comments: entry.counts.comments,
            total_interactions: entry.counts.total(),
        }
    }
}

/// Seed one zeroed slot per post.
pub fn seed_posts(posts: &[Post], urls: &StorageUrls) -> Tally<PostMeta, Interactions> {
    let mut tally = Tally::new();
    for post in posts {
        tally.seed(post.id.as_str(), PostMeta::from_post(post, urls));
    }
    tally
}

fn count_likes(tally: &mut Tally<PostMeta, Interactions>, likes: &[Like]) {
    for like in likes {
        tally.record_ref(like.post_id(), |c| c.likes += 1);
    }
}

fn count_comments(tally: &mut Tally<PostMeta, Interactions>, comments: &[Comment]) {
    for comment in comments {
        tally.record_ref(comment.post_id(), |c| c.comments += 1);
    }
}

fn ranked<F>(tally: Tally<PostMeta, Interactions>, metric: F) -> Vec<PostRanking>
where
    F: Fn(&Interactions) -> u64,
{
    tally.rank_by(metric, TOP_N).into_iter().map(PostRanking::from).collect()
}

/// Most liked posts.
pub fn rank_by_likes(posts: &[Post], likes: &[Like], urls: &StorageUrls) -> Vec<PostRanking> {
    let mut tally = seed_posts(posts, urls);
    count_likes(&mut tally, likes);
    tally.warn_dangling("post likes");
    ranked(tally, |c| c.likes)
}

/// Most commented posts.
pub fn rank_by_comments(posts: &[Post], comments: &[Comment], urls: &StorageUrls) -> Vec<PostRanking> {
    let mut tally = seed_posts(posts, urls);
    count_comments(&mut tally, comments);
    tally.warn_dangling("post comments");
    ranked(tally, |c| c.comments)
}

/// Posts with the most likes plus comments.
pub fn rank_trending(
    posts: &[Post],
    likes: &[Like],
    comments: &[Comment],
    urls: &StorageUrls,
) -> Vec<PostRanking> {
    let mut tally = seed_posts(posts, urls);
    count_likes(&mut tally, likes);
    count_comments(&mut tally, comments);
    tally.warn_dangling("trending posts");
    ranked(tally, Interactions::total)
}

pub async fn most_liked(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<PostRanking>, StoreError> {
    let (posts, likes) = tokio::try_join!(post::find_all(store), like::find_all(store))?;
    Ok(rank_by_likes(&posts, &likes, urls))
}

pub async fn most_commented(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<PostRanking>, StoreError> {
    let (posts, comments) = tokio::try_join!(post::find_all(store), comment::find_all(store))?;
    Ok(rank_by_comments(&posts, &comments, urls))
}

pub async fn trending(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<PostRanking>, StoreError> {
    let (posts, likes, comments) = tokio::try_join!(
        post::find_all(store),
        like::find_all(store),
        comment::find_all(store)
    )?;
    Ok(rank_trending(&posts, &likes, &comments, urls))
}
