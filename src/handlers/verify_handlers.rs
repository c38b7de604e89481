use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::redirect;
use crate::auth::accounts::AccountService;
use crate::auth::verification;
use crate::config::VerificationSettings;
use crate::errors::{AppError, render};
use crate::templates_structs::{APP_NAME, VerifyErrorTemplate, VerifySuccessTemplate};

const DEFAULT_ERROR: &str = "Something went wrong";

#[derive(Deserialize)]
pub struct VerificationRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub secret: Option<String>,
}

#[derive(Deserialize)]
pub struct ErrorParams {
    pub error: Option<String>,
}

#[derive(Serialize)]
struct ErrorQuery<'a> {
    error: &'a str,
}

/// POST /api/auth/verification
pub async fn send_verification(
    accounts: web::Data<dyn AccountService>,
    settings: web::Data<VerificationSettings>,
    body: web::Json<VerificationRequest>,
) -> HttpResponse {
    match verification::send_verification(accounts.get_ref(), &settings, &body.user_id, &body.email).await {
        // The secret only travels in the mailed link.
        Ok(_) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => {
            log::error!("Verification mail for {} failed: {e}", body.user_id);
            HttpResponse::InternalServerError().json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}

/// GET /verify?userId=..&secret=.. from the mailed link.
pub async fn verify(
    accounts: web::Data<dyn AccountService>,
    params: web::Query<VerifyParams>,
) -> HttpResponse {
    let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    let (Some(user_id), Some(secret)) = (non_empty(&params.user_id), non_empty(&params.secret)) else {
        return HttpResponse::BadRequest().json(json!({ "error": "User ID and secret are required" }));
    };

    match verification::redeem(accounts.get_ref(), &user_id, &secret).await {
        Ok(()) => {
            log::info!("Email verified for {user_id}");
            redirect("/verify-success")
        }
        Err(e) => {
            log::warn!("Verification for {user_id} failed: {e}");
            redirect(&error_location(&e.to_string()))
        }
    }
}

/// `/verify-error?error=...` with the message percent-encoded.
pub fn error_location(message: &str) -> String {
    match serde_urlencoded::to_string(ErrorQuery { error: message }) {
        Ok(query) => format!("/verify-error?{query}"),
        Err(_) => "/verify-error".to_string(),
    }
}

pub async fn success_page() -> Result<HttpResponse, AppError> {
    render(VerifySuccessTemplate { app_name: APP_NAME })
}

pub async fn error_page(params: web::Query<ErrorParams>) -> Result<HttpResponse, AppError> {
    let error = params
        .error
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(DEFAULT_ERROR)
        .to_string();
    render(VerifyErrorTemplate { app_name: APP_NAME, error })
}
