//! JSON endpoints behind the dashboard charts.
//!
//! Each handler runs one statistic; a failed fetch fails the whole request
//! with a 502 body, never a partial result.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::errors::AppError;
use crate::stats::timeline::{self, Granularity};
use crate::stats::{hashtags, media, overview, posts, users};
use crate::store::DocumentStore;
use crate::store::storage::StorageUrls;

type Store = web::Data<dyn DocumentStore>;
type Urls = web::Data<StorageUrls>;

#[derive(Deserialize)]
pub struct TimelineParams {
    #[serde(default)]
    pub range: Granularity,
}

pub async fn overview(store: Store) -> Result<HttpResponse, AppError> {
    let overview = overview::weekly_overview(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(overview))
}

pub async fn post_likes(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = posts::most_liked(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn post_comments(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = posts::most_commented(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn trending(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = posts::trending(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn hashtags(store: Store) -> Result<HttpResponse, AppError> {
    let tags = hashtags::top_hashtags(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// GET /api/stats/posts/timeline?range=day|week|month|quarter|year
pub async fn timeline(store: Store, params: web::Query<TimelineParams>) -> Result<HttpResponse, AppError> {
    let points = timeline::post_timeline(store.get_ref(), params.range).await?;
    Ok(HttpResponse::Ok().json(points))
}

pub async fn media(store: Store) -> Result<HttpResponse, AppError> {
    let stats = media::post_media(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn user_followers(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = users::top_followed(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn user_posts(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = users::top_posters(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn user_likes(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = users::most_liked(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}

pub async fn user_comments(store: Store, urls: Urls) -> Result<HttpResponse, AppError> {
    let ranking = users::top_commenters(store.get_ref(), &urls).await?;
    Ok(HttpResponse::Ok().json(ranking))
}
