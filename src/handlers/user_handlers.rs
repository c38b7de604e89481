use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::list_state::ListState;
use crate::models::user::{self, User, UserStatus};
use crate::store::DocumentStore;
use crate::store::storage::StorageUrls;

/// Query parameters shared by the management lists.
#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn state(&self) -> ListState {
        ListState::from_params(self.page, self.per_page, self.search.as_deref())
    }
}

#[derive(Serialize)]
pub struct UserItem {
    #[serde(flatten)]
    pub user: User,
    pub avatar_url: String,
}

impl UserItem {
    fn new(user: User, urls: &StorageUrls) -> Self {
        Self {
            avatar_url: urls.avatar_url(user.avatar_id.as_deref()),
            user,
        }
    }
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: UserStatus,
}

/// GET /api/users?page=&per_page=&search=
pub async fn list(
    store: web::Data<dyn DocumentStore>,
    urls: web::Data<StorageUrls>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let page = user::find_page(store.get_ref(), &params.state()).await?;
    Ok(HttpResponse::Ok().json(page.map(|u| UserItem::new(u, &urls))))
}

pub async fn read(
    store: web::Data<dyn DocumentStore>,
    urls: web::Data<StorageUrls>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let found = user::find_by_id(store.get_ref(), &path)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserItem::new(found, &urls)))
}

/// PUT /api/users/{id}/status with `{"status": "online" | "blocked"}`
pub async fn update_status(
    store: web::Data<dyn DocumentStore>,
    urls: web::Data<StorageUrls>,
    path: web::Path<String>,
    body: web::Json<StatusUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let updated = user::update_status(store.get_ref(), &id, body.status).await?;
    log::info!("User {id} status set to {}", body.status.as_str());
    Ok(HttpResponse::Ok().json(UserItem::new(updated, &urls)))
}

pub async fn delete(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    user::delete(store.get_ref(), &id).await?;
    log::info!("User {id} deleted");
    Ok(HttpResponse::NoContent().finish())
}
