use std::fmt;
use std::time::Duration;

use crate::store::storage::StorageUrls;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing required setting {key}"),
            ConfigError::Invalid(key, value) => write!(f, "Invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Collection ids inside the Appwrite database.
#[derive(Debug, Clone)]
pub struct CollectionIds {
    pub users: String,
    pub posts: String,
    pub likes: String,
    pub comments: String,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub collections: CollectionIds,
    pub avatars_bucket: String,
    pub posts_bucket: String,
}

/// Settings used by the email verification routes.
#[derive(Debug, Clone)]
pub struct VerificationSettings {
    /// Public base URL of this service, without trailing slash.
    pub app_url: String,
    /// Appwrite function that delivers the verification mail.
    pub function_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub appwrite: AppwriteSettings,
    pub verification: VerificationSettings,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("HTTP_TIMEOUT_SECS", raw.clone()))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let appwrite = AppwriteSettings {
            endpoint: required("APPWRITE_ENDPOINT")?.trim_end_matches('/').to_string(),
            project_id: required("APPWRITE_PROJECT_ID")?,
            api_key: required("APPWRITE_API_KEY")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            collections: CollectionIds {
                users: required("APPWRITE_USERS_COLLECTION_ID")?,
                posts: required("APPWRITE_POSTS_COLLECTION_ID")?,
                likes: required("APPWRITE_LIKES_COLLECTION_ID")?,
                comments: required("APPWRITE_COMMENTS_COLLECTION_ID")?,
            },
            avatars_bucket: required("APPWRITE_AVATARS_BUCKET_ID")?,
            posts_bucket: required("APPWRITE_POSTS_BUCKET_ID")?,
        };

        let verification = VerificationSettings {
            app_url: required("APP_URL")?.trim_end_matches('/').to_string(),
            function_id: required("APPWRITE_VERIFY_FUNCTION_ID")?,
        };

        Ok(Self {
            appwrite,
            verification,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session_key: lookup("SESSION_KEY"),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    pub fn storage_urls(&self) -> StorageUrls {
        StorageUrls {
            endpoint: self.appwrite.endpoint.clone(),
            project_id: self.appwrite.project_id.clone(),
            avatars_bucket: self.appwrite.avatars_bucket.clone(),
            posts_bucket: self.appwrite.posts_bucket.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        let mut env = HashMap::new();
        env.insert("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1/".to_string());
        env.insert("APPWRITE_PROJECT_ID", "chronox".to_string());
        env.insert("APPWRITE_API_KEY", "secret-key".to_string());
        env.insert("APPWRITE_DATABASE_ID", "main".to_string());
        env.insert("APPWRITE_USERS_COLLECTION_ID", "users".to_string());
        env.insert("APPWRITE_POSTS_COLLECTION_ID", "posts".to_string());
        env.insert("APPWRITE_LIKES_COLLECTION_ID", "likes".to_string());
        env.insert("APPWRITE_COMMENTS_COLLECTION_ID", "comments".to_string());
        env.insert("APPWRITE_AVATARS_BUCKET_ID", "avatars".to_string());
        env.insert("APPWRITE_POSTS_BUCKET_ID", "media".to_string());
        env.insert("APPWRITE_VERIFY_FUNCTION_ID", "send-mail".to_string());
        env.insert("APP_URL", "https://admin.chronox.app/".to_string());
        env
    }

    #[test]
    fn loads_defaults_and_trims_urls() {
        let env = full_env();
        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.appwrite.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(config.verification.app_url, "https://admin.chronox.app");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.session_key.is_none());
    }

    #[test]
    fn missing_key_is_reported() {
        let mut env = full_env();
        env.remove("APPWRITE_API_KEY");
        let err = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("APPWRITE_API_KEY")));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let mut env = full_env();
        env.insert("HTTP_TIMEOUT_SECS", "soon".to_string());
        let err = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("HTTP_TIMEOUT_SECS", _)));
    }
}
