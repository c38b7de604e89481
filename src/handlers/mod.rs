pub mod auth_handlers;
pub mod dashboard;
pub mod post_handlers;
pub mod report_handlers;
pub mod stats_handlers;
pub mod user_handlers;
pub mod verify_handlers;

use std::sync::Arc;

use actix_web::{HttpResponse, middleware::from_fn, web};

use crate::auth::accounts::AccountService;
use crate::auth::middleware::{require_auth, require_json_content_type};
use crate::auth::rate_limit::LoginLimiter;
use crate::config::VerificationSettings;
use crate::store::DocumentStore;
use crate::store::storage::StorageUrls;

/// Everything the handlers need, built once at startup.
///
/// Cloning is cheap; the backend clients and the limiter state are shared.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub accounts: Arc<dyn AccountService>,
    pub urls: StorageUrls,
    pub verification: VerificationSettings,
    pub limiter: LoginLimiter,
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Register application data and every route.
pub fn configure(cfg: &mut web::ServiceConfig, services: &Services) {
    cfg.app_data(web::Data::from(services.store.clone()))
        .app_data(web::Data::from(services.accounts.clone()))
        .app_data(web::Data::new(services.urls.clone()))
        .app_data(web::Data::new(services.verification.clone()))
        .app_data(web::Data::new(services.limiter.clone()));

    // Public routes
    cfg.route("/", web::get().to(|| async { redirect("/dashboard") }))
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/verify", web::get().to(verify_handlers::verify))
        .route("/verify-success", web::get().to(verify_handlers::success_page))
        .route("/verify-error", web::get().to(verify_handlers::error_page));

    // Public JSON; must precede the authenticated /api scope
    cfg.service(
        web::scope("/api/auth")
            .wrap(from_fn(require_json_content_type))
            .route("/verification", web::post().to(verify_handlers::send_verification)),
    );

    cfg.service(
        web::scope("/api")
            .wrap(from_fn(require_json_content_type))
            .wrap(from_fn(require_auth))
            .route("/stats/overview", web::get().to(stats_handlers::overview))
            .route("/stats/posts/likes", web::get().to(stats_handlers::post_likes))
            .route("/stats/posts/comments", web::get().to(stats_handlers::post_comments))
            .route("/stats/posts/trending", web::get().to(stats_handlers::trending))
            .route("/stats/posts/hashtags", web::get().to(stats_handlers::hashtags))
            .route("/stats/posts/timeline", web::get().to(stats_handlers::timeline))
            .route("/stats/posts/media", web::get().to(stats_handlers::media))
            .route("/stats/users/followers", web::get().to(stats_handlers::user_followers))
            .route("/stats/users/posts", web::get().to(stats_handlers::user_posts))
            .route("/stats/users/likes", web::get().to(stats_handlers::user_likes))
            .route("/stats/users/comments", web::get().to(stats_handlers::user_comments))
            .route("/reports", web::get().to(report_handlers::summary))
            .route("/users", web::get().to(user_handlers::list))
            .route("/users/{id}", web::get().to(user_handlers::read))
            .route("/users/{id}", web::delete().to(user_handlers::delete))
            .route("/users/{id}/status", web::put().to(user_handlers::update_status))
            .route("/posts", web::get().to(post_handlers::list))
            .route("/posts/{id}", web::get().to(post_handlers::read))
            .route("/posts/{id}", web::delete().to(post_handlers::delete)),
    );

    // Signed-in pages; registered last since the empty scope matches every path
    cfg.service(
        web::scope("")
            .wrap(from_fn(require_auth))
            .route("/dashboard", web::get().to(dashboard::index))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route("/reports/export", web::get().to(report_handlers::export)),
    );
}
