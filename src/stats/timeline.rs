use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::tally::Tally;
use crate::models::post::{self, Post};
use crate::store::{DocumentStore, StoreError};

/// Width of a timeline bucket. All bucketing is done in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// Bucket key of `at`: `YYYY-MM-DD`, `YYYY-Wnn`, `YYYY-MM`, `YYYY-Qn` or `YYYY`.
    ///
    /// Week keys use the ISO-8601 week and week-based year, so keys sort
    /// chronologically as plain strings.
    pub fn bucket(&self, at: DateTime<Utc>) -> String {
        match self {
            Granularity::Day => at.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = at.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Month => at.format("%Y-%m").to_string(),
            Granularity::Quarter => format!("{}-Q{}", at.year(), at.month0() / 3 + 1),
            Granularity::Year => at.year().to_string(),
        }
    }

    /// Human label for a bucket key produced by [`Granularity::bucket`].
    pub fn label(&self, key: &str) -> String {
        match self {
            Granularity::Day => {
                let parts: Vec<&str> = key.split('-').collect();
                match parts.as_slice() {
                    [y, m, d] => format!("{d}/{m}/{y}"),
                    _ => key.to_string(),
                }
            }
            Granularity::Week => match key.split_once("-W") {
                Some((y, w)) => format!("Week {w}/{y}"),
                None => key.to_string(),
            },
            Granularity::Month => match key.split_once('-') {
                Some((y, m)) => format!("Month {m}/{y}"),
                None => key.to_string(),
            },
            Granularity::Quarter => match key.split_once("-Q") {
                Some((y, q)) => format!("Q{q}/{y}"),
                None => key.to_string(),
            },
            Granularity::Year => format!("Year {key}"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            other => Err(format!("Unknown time range '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub bucket: String,
    pub label: String,
    pub posts: u64,
    /// Posts in this bucket and every earlier one.
    pub cumulative: u64,
}

/// Posts per bucket in chronological order with a running total.
pub fn build_timeline(posts: &[Post], granularity: Granularity) -> Vec<TimelinePoint> {
    let mut tally: Tally<(), u64> = Tally::new();
    for p in posts {
        let key = granularity.bucket(p.created_at);
        tally.seed(key.as_str(), ());
        tally.record(&key, |c| *c += 1);
    }

    let mut cumulative = 0;
    tally
        .into_sorted_entries()
        .into_iter()
        .map(|e| {
            cumulative += e.counts;
            TimelinePoint {
                label: granularity.label(&e.key),
                bucket: e.key,
                posts: e.counts,
                cumulative,
            }
        })
        .collect()
}

pub async fn post_timeline(
    store: &dyn DocumentStore,
    granularity: Granularity,
) -> Result<Vec<TimelinePoint>, StoreError> {
    let posts = post::find_all(store).await?;
    Ok(build_timeline(&posts, granularity))
}
