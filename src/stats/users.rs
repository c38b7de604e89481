use std::collections::HashMap;

use serde::Serialize;

use super::TOP_N;
use super::tally::{Entry, Tally};
use crate::models::comment::{self, Comment};
use crate::models::like::{self, Like};
use crate::models::post::{self, Post};
use crate::models::user::{self, User};
use crate::store::storage::StorageUrls;
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct UserMeta {
    pub username: String,
    pub avatar_url: String,
}

/// A user and the count they are ranked by.
#[derive(Debug, Clone, Serialize)]
pub struct UserRanking {
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub count: u64,
}

impl From<Entry<UserMeta, u64>> for UserRanking {
    fn from(entry: Entry<UserMeta, u64>) -> Self {
        Self {
            user_id: entry.key,
            username: entry.meta.username,
            avatar_url: entry.meta.avatar_url,
            count: entry.counts,
        }
    }
}

pub fn seed_users(users: &[User], urls: &StorageUrls) -> Tally<UserMeta, u64> {
    let mut tally = Tally::new();
    for u in users {
        let meta = UserMeta {
            username: u.display_name().to_string(),
            avatar_url: urls.avatar_url(u.avatar_id.as_deref()),
        };
        tally.seed(u.id.as_str(), meta);
    }
    tally
}

fn ranked(tally: Tally<UserMeta, u64>) -> Vec<UserRanking> {
    tally.rank_by(|c| *c, TOP_N).into_iter().map(UserRanking::from).collect()
}

/// Authors with the most posts.
pub fn rank_by_posts(users: &[User], posts: &[Post], urls: &StorageUrls) -> Vec<UserRanking> {
    let mut tally = seed_users(users, urls);
    for p in posts {
        tally.record_ref(p.author_id(), |c| *c += 1);
    }
    tally.warn_dangling("user posts");
    ranked(tally)
}

/// Authors whose posts received the most likes.
///
/// Likes point at posts, so each like is resolved to the post's author
/// before it is counted.
pub fn rank_by_likes_received(
    users: &[User],
    posts: &[Post],
    likes: &[Like],
    urls: &StorageUrls,
) -> Vec<UserRanking> {
    let author_of: HashMap<&str, &str> = posts
        .iter()
        .filter_map(|p| p.author_id().map(|author| (p.id.as_str(), author)))
        .collect();

    let mut tally = seed_users(users, urls);
    for l in likes {
        let author = l.post_id().and_then(|post_id| author_of.get(post_id).copied());
        tally.record_ref(author, |c| *c += 1);
    }
    tally.warn_dangling("user likes");
    ranked(tally)
}

/// Users who wrote the most comments.
pub fn rank_by_comments(users: &[User], comments: &[Comment], urls: &StorageUrls) -> Vec<UserRanking> {
    let mut tally = seed_users(users, urls);
    for c in comments {
        tally.record_ref(c.user_id(), |count| *count += 1);
    }
    tally.warn_dangling("user comments");
    ranked(tally)
}

/// Followers come pre-sorted from the backend; this only reshapes them.
pub fn follower_ranking(users: &[User], urls: &StorageUrls) -> Vec<UserRanking> {
    users
        .iter()
        .take(TOP_N)
        .map(|u| UserRanking {
            user_id: u.id.clone(),
            username: u.display_name().to_string(),
            avatar_url: urls.avatar_url(u.avatar_id.as_deref()),
            count: u.follower.max(0) as u64,
        })
        .collect()
}

pub async fn top_posters(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<UserRanking>, StoreError> {
    let (users, posts) = tokio::try_join!(user::find_all(store), post::find_all(store))?;
    Ok(rank_by_posts(&users, &posts, urls))
}

pub async fn most_liked(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<UserRanking>, StoreError> {
    let (users, posts, likes) = tokio::try_join!(
        user::find_all(store),
        post::find_all(store),
        like::find_all(store)
    )?;
    Ok(rank_by_likes_received(&users, &posts, &likes, urls))
}

pub async fn top_commenters(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<UserRanking>, StoreError> {
    let (users, comments) = tokio::try_join!(user::find_all(store), comment::find_all(store))?;
    Ok(rank_by_comments(&users, &comments, urls))
}

pub async fn top_followed(store: &dyn DocumentStore, urls: &StorageUrls) -> Result<Vec<UserRanking>, StoreError> {
    let users = user::top_by_followers(store, TOP_N as u32).await?;
    Ok(follower_ranking(&users, urls))
}
