use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::post::{self, Post};
use crate::store::{DocumentStore, StoreError};

pub const VIDEO_EXTENSIONS: [&str; 6] = [".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv"];

/// File names are classified by extension only; everything else is an image.
pub fn is_video(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    fn label(&self, attached: usize) -> String {
        match (self, attached) {
            (MediaKind::Image, 0) => "No images".to_string(),
            (MediaKind::Image, 1) => "1 image".to_string(),
            (MediaKind::Image, n) => format!("{n} images"),
            (MediaKind::Video, 0) => "No videos".to_string(),
            (MediaKind::Video, 1) => "1 video".to_string(),
            (MediaKind::Video, n) => format!("{n} videos"),
        }
    }
}

/// Posts carrying exactly `attached` files of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub attached: usize,
    pub label: String,
    pub posts: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaStats {
    pub total_posts: u64,
    pub posts_with_media: u64,
    pub total_images: u64,
    pub total_videos: u64,
    pub posts_with_images: u64,
    pub posts_with_videos: u64,
    pub posts_with_both: u64,
    pub image_distribution: Vec<DistributionBucket>,
    pub video_distribution: Vec<DistributionBucket>,
}

fn distribution(kind: MediaKind, counts: BTreeMap<usize, u64>, total: u64) -> Vec<DistributionBucket> {
    counts
        .into_iter()
        .map(|(attached, posts)| DistributionBucket {
            attached,
            label: kind.label(attached),
            posts,
            percentage: posts as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Attachment summary and per-count distributions for images and videos.
///
/// Buckets are ordered by attachment count, so "No images" comes first.
pub fn media_stats(posts: &[Post]) -> MediaStats {
    let mut stats = MediaStats {
        total_posts: posts.len() as u64,
        ..MediaStats::default()
    };
    let mut images_per_post: BTreeMap<usize, u64> = BTreeMap::new();
    let mut videos_per_post: BTreeMap<usize, u64> = BTreeMap::new();

    for p in posts {
        let videos = p.file_ids.iter().filter(|f| is_video(f)).count();
        let images = p.file_ids.len() - videos;

        stats.total_images += images as u64;
        stats.total_videos += videos as u64;
        if !p.file_ids.is_empty() {
            stats.posts_with_media += 1;
        }
        if images > 0 {
            stats.posts_with_images += 1;
        }
        if videos > 0 {
            stats.posts_with_videos += 1;
        }
        if images > 0 && videos > 0 {
            stats.posts_with_both += 1;
        }

        *images_per_post.entry(images).or_default() += 1;
        *videos_per_post.entry(videos).or_default() += 1;
    }

    stats.image_distribution = distribution(MediaKind::Image, images_per_post, stats.total_posts);
    stats.video_distribution = distribution(MediaKind::Video, videos_per_post, stats.total_posts);
    stats
}

pub async fn post_media(store: &dyn DocumentStore) -> Result<MediaStats, StoreError> {
    let posts = post::find_all(store).await?;
    Ok(media_stats(&posts))
}
