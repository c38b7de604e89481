use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A session created by the backend for email/password or magic-URL login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSession {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
}

/// The account behind a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Messaging target attached to a backend user (email, sms, push).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingTarget {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "providerType")]
    pub provider_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagicUrlToken {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub secret: String,
    #[serde(default)]
    pub expire: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// Authentication and messaging calls delegated to the hosted backend.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountSession, StoreError>;

    async fn get_account(&self, session_secret: &str) -> Result<Account, StoreError>;

    async fn delete_session(&self, session_secret: &str) -> Result<(), StoreError>;

    async fn user_targets(&self, user_id: &str) -> Result<Vec<MessagingTarget>, StoreError>;

    async fn create_magic_url_token(
        &self,
        user_id: &str,
        email: &str,
        url: &str,
    ) -> Result<MagicUrlToken, StoreError>;

    async fn redeem_magic_url(&self, user_id: &str, secret: &str) -> Result<(), StoreError>;

    async fn execute_function(&self, function_id: &str, body: String) -> Result<Execution, StoreError>;
}
