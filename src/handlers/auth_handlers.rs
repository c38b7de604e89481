use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::redirect;
use crate::auth::accounts::AccountService;
use crate::auth::rate_limit::LoginLimiter;
use crate::auth::session;
use crate::errors::{AppError, render};
use crate::store::StoreError;
use crate::templates_structs::{APP_NAME, LoginTemplate};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const TOO_MANY_ATTEMPTS: &str = "Too many failed login attempts. Please try again later.";
const BACKEND_UNAVAILABLE: &str = "Sign-in is unavailable right now. Please try again.";

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, error: Option<&str>, email: &str) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: error.map(String::from),
        app_name: APP_NAME,
        csrf_token: session::csrf_token(session)?,
        email: email.to_string(),
    };
    render(tmpl)
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if session::current_user_id(&session).is_some() {
        return Ok(redirect("/dashboard"));
    }
    login_form(&session, None, "")
}

pub async fn login_submit(
    req: HttpRequest,
    session: Session,
    form: web::Form<LoginForm>,
    accounts: web::Data<dyn AccountService>,
    limiter: web::Data<LoginLimiter>,
) -> Result<HttpResponse, AppError> {
    session::verify_csrf(&session, &form.csrf_token)?;

    // Rate-limit check before calling the backend
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if limiter.is_blocked(&ip) {
        log::warn!("Login blocked for {ip}");
        return login_form(&session, Some(TOO_MANY_ATTEMPTS), &form.email);
    }

    let signed_in = match accounts.create_email_session(&form.email, &form.password).await {
        Ok(backend_session) => accounts
            .get_account(&backend_session.secret)
            .await
            .map(|account| (account, backend_session.secret)),
        Err(e) => Err(e),
    };

    match signed_in {
        Ok((account, secret)) => {
            limiter.clear(&ip);
            session::sign_in(&session, &account, &secret)?;
            log::info!("Admin {} signed in", account.id);
            Ok(redirect("/dashboard"))
        }
        Err(StoreError::Remote { status: 400 | 401, .. }) => {
            limiter.record_failure(ip);
            login_form(&session, Some(INVALID_CREDENTIALS), &form.email)
        }
        Err(e) => {
            log::error!("Sign-in failed: {e}");
            login_form(&session, Some(BACKEND_UNAVAILABLE), &form.email)
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
    accounts: web::Data<dyn AccountService>,
) -> Result<HttpResponse, AppError> {
    session::verify_csrf(&session, &form.csrf_token)?;
    if let Some(secret) = session::session_secret(&session) {
        // The local session ends regardless of the backend outcome.
        if let Err(e) = accounts.delete_session(&secret).await {
            log::warn!("Failed to end backend session: {e}");
        }
    }
    session.purge();
    Ok(redirect("/login"))
}
