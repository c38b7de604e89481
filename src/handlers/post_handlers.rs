use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::user_handlers::ListParams;
use crate::errors::AppError;
use crate::models::post::{self, Post};
use crate::stats::posts::PostMeta;
use crate::store::DocumentStore;
use crate::store::storage::StorageUrls;

/// A post as shown in the management table: plain title, author and media URLs.
#[derive(Serialize)]
pub struct PostItem {
    pub id: String,
    #[serde(flatten)]
    pub meta: PostMeta,
}

impl PostItem {
    fn new(post: &Post, urls: &StorageUrls) -> Self {
        Self {
            id: post.id.clone(),
            meta: PostMeta::from_post(post, urls),
        }
    }
}

/// GET /api/posts?page=&per_page=&search=
pub async fn list(
    store: web::Data<dyn DocumentStore>,
    urls: web::Data<StorageUrls>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let page = post::find_page(store.get_ref(), &params.state()).await?;
    Ok(HttpResponse::Ok().json(page.map(|p| PostItem::new(&p, &urls))))
}

pub async fn read(
    store: web::Data<dyn DocumentStore>,
    urls: web::Data<StorageUrls>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let found = post::find_by_id(store.get_ref(), &path)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(PostItem::new(&found, &urls)))
}

pub async fn delete(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    post::delete(store.get_ref(), &id).await?;
    log::info!("Post {id} deleted");
    Ok(HttpResponse::NoContent().finish())
}
