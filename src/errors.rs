use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use serde_json::json;
use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Template(askama::Error),
    Session(String),
    Validation(String),
    Forbidden(String),
    Unauthorized,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "Store error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Validation(e) => write!(f, "{e}"),
            AppError::Forbidden(e) => write!(f, "Forbidden: {e}"),
            AppError::Unauthorized => write!(f, "Not signed in"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::NotFound) | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Template(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Forbidden(_) => "Forbidden".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::NotFound | AppError::Store(StoreError::NotFound) => "Not found".to_string(),
            AppError::Store(_) => {
                log::error!("{self}");
                "Failed to load data from the backend".to_string()
            }
            AppError::Template(_) | AppError::Session(_) => {
                log::error!("{self}");
                "Internal Server Error".to_string()
            }
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(e: actix_session::SessionInsertError) -> Self {
        AppError::Session(e.to_string())
    }
}

impl From<actix_session::SessionGetError> for AppError {
    fn from(e: actix_session::SessionGetError) -> Self {
        AppError::Session(e.to_string())
    }
}

/// Render a template into an HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_map_to_bad_gateway() {
        let err = AppError::from(StoreError::Remote {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::from(StoreError::NotFound).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_is_a_json_401() {
        let resp = AppError::Unauthorized.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
