//! Dashboard statistics.
//!
//! Every statistic follows the same pipeline: fetch the collections it
//! needs concurrently, seed a [`tally::Tally`] from the primary collection,
//! count secondary documents against it, then rank or order the result.
//! The pure aggregation functions take already-fetched documents so they
//! can be exercised without a backend; the async wrappers do the fetching.

pub mod growth;
pub mod hashtags;
pub mod media;
pub mod overview;
pub mod posts;
pub mod report;
pub mod tally;
pub mod timeline;
pub mod users;

/// Size of every ranked list on the statistics pages.
pub const TOP_N: usize = 10;
