use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware};

use chronox_admin::auth::rate_limit::LoginLimiter;
use chronox_admin::config::AppConfig;
use chronox_admin::handlers::{self, Services};
use chronox_admin::store::appwrite::AppwriteClient;

fn session_key(configured: Option<&str>) -> Key {
    match configured {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("{e}");
        std::process::exit(1);
    });
    let client = Arc::new(AppwriteClient::new(&config).unwrap_or_else(|e| {
        log::error!("Failed to build backend client: {e}");
        std::process::exit(1);
    }));

    let services = Services {
        store: client.clone(),
        accounts: client,
        urls: config.storage_urls(),
        verification: config.verification.clone(),
        limiter: LoginLimiter::default(),
    };
    let secret_key = session_key(config.session_key.as_deref());

    log::info!(
        "Starting server at http://{} (backend {})",
        config.bind_addr,
        config.appwrite.endpoint
    );

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(false)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(|cfg| handlers::configure(cfg, &services))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
