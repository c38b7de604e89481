//! Shared test infrastructure.
//!
//! - `urls()` - storage URL builder pointing at a fake endpoint
//! - `*_doc()` - raw backend documents in the shape Appwrite returns them
//! - `seeded_store()` - a small social graph in a `MemoryStore`
//! - `FakeAccounts` - scripted account service recording what it was asked
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;
use serde_json::{Value, json};

use chronox_admin::auth::accounts::{
    Account, AccountService, AccountSession, Execution, MagicUrlToken, MessagingTarget,
};
use chronox_admin::auth::rate_limit::LoginLimiter;
use chronox_admin::config::VerificationSettings;
use chronox_admin::handlers::Services;
use chronox_admin::store::memory::MemoryStore;
use chronox_admin::store::storage::StorageUrls;
use chronox_admin::store::{Collection, StoreError};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_EMAIL: &str = "admin@chronox.app";
pub const ADMIN_PASS: &str = "correct horse";
pub const ADMIN_ID: &str = "admin-1";
pub const APP_URL: &str = "https://admin.chronox.test";
pub const FUNCTION_ID: &str = "mailer";
pub const MAGIC_SECRET: &str = "magic-secret";

// ============================================================================
// DOCUMENTS
// ============================================================================

pub fn urls() -> StorageUrls {
    StorageUrls {
        endpoint: "https://appwrite.test/v1".into(),
        project_id: "chronox".into(),
        avatars_bucket: "avatars".into(),
        posts_bucket: "media".into(),
    }
}

pub fn stamp(date: &str) -> String {
    format!("{date}T10:00:00.000+00:00")
}

pub fn user_doc(id: &str, username: &str, date: &str) -> Value {
    json!({
        "$id": id,
        "username": username,
        "email": format!("{id}@chronox.test"),
        "avatarId": format!("avatar-{id}"),
        "follower": 0,
        "followed": 0,
        "status": "online",
        "$createdAt": stamp(date),
    })
}

pub fn user_with_followers(id: &str, username: &str, followers: i64) -> Value {
    let mut doc = user_doc(id, username, "2024-01-01");
    doc["follower"] = json!(followers);
    doc
}

pub fn post_doc(id: &str, title: &str, author: Option<&str>, date: &str) -> Value {
    json!({
        "$id": id,
        "title": title,
        "hashtags": [],
        "fileIds": [],
        "accountID": author.map(|a| user_doc(a, &format!("name-{a}"), "2024-01-01")),
        "$createdAt": stamp(date),
    })
}

pub fn post_with_tags(id: &str, author: &str, tags: &[&str]) -> Value {
    let mut doc = post_doc(id, &format!("<p>{id}</p>"), Some(author), "2024-03-06");
    doc["hashtags"] = json!(tags);
    doc
}

pub fn post_with_files(id: &str, files: &[&str]) -> Value {
    let mut doc = post_doc(id, id, None, "2024-03-06");
    doc["fileIds"] = json!(files);
    doc
}

pub fn like_doc(id: &str, post_id: &str, date: &str) -> Value {
    json!({ "$id": id, "postCollections": { "$id": post_id }, "$createdAt": stamp(date) })
}

pub fn comment_doc(id: &str, post_id: &str, user_id: &str, date: &str) -> Value {
    json!({
        "$id": id,
        "postCollections": { "$id": post_id },
        "userCollections": { "$id": user_id },
        "$createdAt": stamp(date),
    })
}

/// Three users, three posts, likes and comments with one dangling reference each.
///
/// - p1 (by u1): 3 likes, 1 comment
/// - p2 (by u2): 1 like, 2 comments
/// - p3 (by u1): nothing
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_many(
        Collection::Users,
        [
            user_doc("u1", "alice", "2024-03-01"),
            user_doc("u2", "bob", "2024-03-02"),
            user_doc("u3", "carol", "2024-03-03"),
        ],
    );
    store.insert_many(
        Collection::Posts,
        [
            post_doc("p1", "<b>First</b> post", Some("u1"), "2024-03-04"),
            post_doc("p2", "Second", Some("u2"), "2024-03-05"),
            post_doc("p3", "Third", Some("u1"), "2024-03-06"),
        ],
    );
    store.insert_many(
        Collection::Likes,
        [
            like_doc("l1", "p1", "2024-03-06"),
            like_doc("l2", "p1", "2024-03-06"),
            like_doc("l3", "p1", "2024-03-07"),
            like_doc("l4", "p2", "2024-03-07"),
            like_doc("l5", "gone", "2024-03-07"),
        ],
    );
    store.insert_many(
        Collection::Comments,
        [
            comment_doc("c1", "p1", "u3", "2024-03-06"),
            comment_doc("c2", "p2", "u3", "2024-03-06"),
            comment_doc("c3", "p2", "u2", "2024-03-07"),
            comment_doc("c4", "gone", "u2", "2024-03-07"),
        ],
    );
    store
}

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Account service with one valid admin login and one verifiable user.
#[derive(Default)]
pub struct FakeAccounts {
    pub targets: Vec<MessagingTarget>,
    pub executions: Mutex<Vec<(String, Value)>>,
    pub deleted_sessions: Mutex<Vec<String>>,
    pub redeemed: Mutex<Vec<(String, String)>>,
}

impl FakeAccounts {
    pub fn new() -> Self {
        Self {
            targets: vec![
                MessagingTarget { id: "t-email".into(), provider_type: "email".into() },
                MessagingTarget { id: "t-push".into(), provider_type: "push".into() },
            ],
            ..Self::default()
        }
    }

    pub fn without_targets() -> Self {
        Self::default()
    }
}

fn unauthorized(message: &str) -> StoreError {
    StoreError::Remote { status: 401, message: message.into() }
}

#[async_trait]
impl AccountService for FakeAccounts {
    async fn create_email_session(&self, email: &str, password: &str) -> Result<AccountSession, StoreError> {
        if email == ADMIN_EMAIL && password == ADMIN_PASS {
            Ok(AccountSession { id: "s1".into(), user_id: ADMIN_ID.into(), secret: "session-secret".into() })
        } else {
            Err(unauthorized("Invalid credentials. Please check the email and password."))
        }
    }

    async fn get_account(&self, session_secret: &str) -> Result<Account, StoreError> {
        if session_secret != "session-secret" {
            return Err(unauthorized("User (role: guests) missing scope (account)"));
        }
        Ok(Account { id: ADMIN_ID.into(), name: "Admin".into(), email: ADMIN_EMAIL.into() })
    }

    async fn delete_session(&self, session_secret: &str) -> Result<(), StoreError> {
        self.deleted_sessions.lock().unwrap().push(session_secret.to_string());
        Ok(())
    }

    async fn user_targets(&self, user_id: &str) -> Result<Vec<MessagingTarget>, StoreError> {
        if user_id == "missing" {
            return Err(StoreError::NotFound);
        }
        Ok(self.targets.clone())
    }

    async fn create_magic_url_token(&self, user_id: &str, _email: &str, _url: &str) -> Result<MagicUrlToken, StoreError> {
        Ok(MagicUrlToken {
            id: "tok1".into(),
            user_id: user_id.into(),
            secret: MAGIC_SECRET.into(),
            expire: "2030-01-01T00:00:00.000+00:00".into(),
        })
    }

    async fn redeem_magic_url(&self, user_id: &str, secret: &str) -> Result<(), StoreError> {
        if secret != MAGIC_SECRET {
            return Err(unauthorized("Invalid token passed in the request."));
        }
        self.redeemed.lock().unwrap().push((user_id.to_string(), secret.to_string()));
        Ok(())
    }

    async fn execute_function(&self, function_id: &str, body: String) -> Result<Execution, StoreError> {
        let payload: Value = serde_json::from_str(&body).map_err(StoreError::from)?;
        self.executions.lock().unwrap().push((function_id.to_string(), payload));
        Ok(Execution { id: "exec1".into(), status: "completed".into() })
    }
}

// ============================================================================
// APP SETUP
// ============================================================================

pub fn verification_settings() -> VerificationSettings {
    VerificationSettings { app_url: APP_URL.into(), function_id: FUNCTION_ID.into() }
}

pub fn services(store: Arc<MemoryStore>, accounts: Arc<FakeAccounts>) -> Services {
    Services {
        store,
        accounts,
        urls: urls(),
        verification: verification_settings(),
        limiter: LoginLimiter::default(),
    }
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64][..]))
        .cookie_secure(false)
        .build()
}
