use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use super::tally::Tally;
use crate::models::Stamped;
use crate::store::{self, Collection, DocumentStore, Query, StoreError};

/// Days shown on the overview chart, today included.
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DayCounts {
    users: u64,
    posts: u64,
    comments: u64,
    likes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCounts {
    pub date: String,
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_likes: u64,
    pub daily: Vec<DailyCounts>,
}

fn count_days<F>(tally: &mut Tally<(), DayCounts>, docs: &[Stamped], bump: F)
where
    F: Fn(&mut DayCounts),
{
    for doc in docs {
        let day = doc.created_at.date_naive().format("%Y-%m-%d").to_string();
        // Documents outside the window simply have no slot.
        tally.record(&day, &bump);
    }
}

/// Per-day creation counts for the window ending at `today`, oldest first.
///
/// Every day of the window is present, zeroed when nothing was created.
pub fn daily_breakdown(
    today: NaiveDate,
    users: &[Stamped],
    posts: &[Stamped],
    comments: &[Stamped],
    likes: &[Stamped],
) -> Vec<DailyCounts> {
    let mut tally: Tally<(), DayCounts> = Tally::new();
    for back in 0..WINDOW_DAYS {
        let day = today - Duration::days(back);
        tally.seed(day.format("%Y-%m-%d").to_string(), ());
    }

    count_days(&mut tally, users, |c| c.users += 1);
    count_days(&mut tally, posts, |c| c.posts += 1);
    count_days(&mut tally, comments, |c| c.comments += 1);
    count_days(&mut tally, likes, |c| c.likes += 1);

    tally
        .into_sorted_entries()
        .into_iter()
        .map(|e| DailyCounts {
            date: e.key,
            users: e.counts.users,
            posts: e.counts.posts,
            comments: e.counts.comments,
            likes: e.counts.likes,
        })
        .collect()
}

/// New documents of every collection over the last week.
pub async fn weekly_overview(store: &dyn DocumentStore) -> Result<Overview, StoreError> {
    let now = Utc::now();
    let query = Query::new().created_after(now - Duration::days(WINDOW_DAYS));

    let (users, posts, comments, likes) = tokio::try_join!(
        store::list_all::<Stamped>(store, Collection::Users, &query),
        store::list_all::<Stamped>(store, Collection::Posts, &query),
        store::list_all::<Stamped>(store, Collection::Comments, &query),
        store::list_all::<Stamped>(store, Collection::Likes, &query),
    )?;

    Ok(Overview {
        total_users: users.len() as u64,
        total_posts: posts.len() as u64,
        total_comments: comments.len() as u64,
        total_likes: likes.len() as u64,
        daily: daily_breakdown(now.date_naive(), &users, &posts, &comments, &likes),
    })
}
