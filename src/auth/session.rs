//! What the admin session cookie holds.
//!
//! After login the cookie carries the backend account id, a display name,
//! the backend session secret (needed to end the backend session on
//! logout) and the CSRF token for HTML forms.

use actix_session::Session;
use rand::Rng;

use super::accounts::Account;
use crate::errors::AppError;

const USER_ID: &str = "user_id";
const USERNAME: &str = "username";
const SESSION_SECRET: &str = "session_secret";
const CSRF_TOKEN: &str = "csrf_token";

pub fn sign_in(session: &Session, account: &Account, secret: &str) -> Result<(), AppError> {
    session.renew();
    let name = if account.name.trim().is_empty() {
        &account.email
    } else {
        &account.name
    };
    session.insert(USER_ID, &account.id)?;
    session.insert(USERNAME, name)?;
    session.insert(SESSION_SECRET, secret)?;
    Ok(())
}

pub fn current_user_id(session: &Session) -> Option<String> {
    session.get::<String>(USER_ID).unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, AppError> {
    session
        .get::<String>(USERNAME)?
        .ok_or_else(|| AppError::Session("No username in session".to_string()))
}

pub fn session_secret(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_SECRET).unwrap_or(None)
}

/// The form token for this session, created on first use.
pub fn csrf_token(session: &Session) -> Result<String, AppError> {
    if let Some(token) = session.get::<String>(CSRF_TOKEN)? {
        return Ok(token);
    }
    let bytes: [u8; 32] = rand::rng().random();
    let token = hex::encode(bytes);
    session.insert(CSRF_TOKEN, &token)?;
    Ok(token)
}

pub fn verify_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = session.get::<String>(CSRF_TOKEN)?.unwrap_or_default();
    if stored.is_empty() || !constant_time_eq(&stored, submitted) {
        return Err(AppError::Forbidden("Invalid or missing CSRF token".to_string()));
    }
    Ok(())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
