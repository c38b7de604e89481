//! Email verification by magic URL.
//!
//! Issuing a verification looks up the user's email messaging targets,
//! creates a magic-URL token and asks a backend function to mail the link.
//! Following the link redeems the token, which marks the email verified.

use std::fmt;

use serde_json::json;

use super::accounts::{AccountService, MagicUrlToken};
use crate::config::VerificationSettings;
use crate::store::StoreError;

pub const MAIL_SUBJECT: &str = "Verify your ChronoX email";
const EMAIL_PROVIDER: &str = "email";

#[derive(Debug)]
pub enum VerificationError {
    NoEmailTarget(String),
    Store(StoreError),
    Encode(serde_urlencoded::ser::Error),
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationError::NoEmailTarget(user_id) => {
                write!(f, "No email target found for user {user_id}")
            }
            VerificationError::Store(e) => write!(f, "{}", e.user_message()),
            VerificationError::Encode(e) => write!(f, "Could not build verification link: {e}"),
        }
    }
}

impl std::error::Error for VerificationError {}

impl From<StoreError> for VerificationError {
    fn from(e: StoreError) -> Self {
        VerificationError::Store(e)
    }
}

impl From<serde_urlencoded::ser::Error> for VerificationError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        VerificationError::Encode(e)
    }
}

/// `{app_url}/verify?userId=..&secret=..`
pub fn verify_link(app_url: &str, user_id: &str, secret: &str) -> Result<String, VerificationError> {
    let query = serde_urlencoded::to_string([("userId", user_id), ("secret", secret)])?;
    Ok(format!("{app_url}/verify?{query}"))
}

/// Payload for the mail-delivery function.
pub fn mail_payload(link: &str, target_ids: &[String]) -> serde_json::Value {
    let content = format!(
        "<h2>Verify your email</h2>\
         <p>Welcome to ChronoX!</p>\
         <p>Please click the link below to verify your email address:</p>\
         <p><a href=\"{link}\">Verify email</a></p>\
         <p>This link expires in 1 hour.</p>"
    );
    json!({
        "subject": MAIL_SUBJECT,
        "content": content,
        "targets": target_ids,
    })
}

/// Issue a magic-URL token for `user_id` and mail the link to their email targets.
pub async fn send_verification(
    accounts: &dyn AccountService,
    settings: &VerificationSettings,
    user_id: &str,
    email: &str,
) -> Result<MagicUrlToken, VerificationError> {
    let target_ids: Vec<String> = accounts
        .user_targets(user_id)
        .await?
        .into_iter()
        .filter(|t| t.provider_type == EMAIL_PROVIDER)
        .map(|t| t.id)
        .collect();
    if target_ids.is_empty() {
        return Err(VerificationError::NoEmailTarget(user_id.to_string()));
    }
    log::debug!("Email targets for {user_id}: {target_ids:?}");

    let redirect = format!("{}/verify", settings.app_url);
    let token = accounts.create_magic_url_token(user_id, email, &redirect).await?;

    let link = verify_link(&settings.app_url, user_id, &token.secret)?;
    let execution = accounts
        .execute_function(&settings.function_id, mail_payload(&link, &target_ids).to_string())
        .await?;
    log::info!(
        "Verification mail for {user_id} queued (execution {}, status {})",
        execution.id,
        execution.status
    );
    Ok(token)
}

pub async fn redeem(accounts: &dyn AccountService, user_id: &str, secret: &str) -> Result<(), VerificationError> {
    accounts.redeem_magic_url(user_id, secret).await?;
    Ok(())
}
