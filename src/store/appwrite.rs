//! Appwrite REST client.
//!
//! Implements [`DocumentStore`] over the Databases API and
//! [`AccountService`] over the Account, Users and Functions APIs.
//!
//! ## API Reference
//!
//! - `GET    /databases/{db}/collections/{c}/documents?queries[]=...`
//! - `GET    /databases/{db}/collections/{c}/documents/{id}`
//! - `PATCH  /databases/{db}/collections/{c}/documents/{id}`
//! - `DELETE /databases/{db}/collections/{c}/documents/{id}`
//! - `POST   /account/sessions/email`, `GET /account`, `DELETE /account/sessions/current`
//! - `POST   /account/tokens/magic-url`, `PUT /account/sessions/magic-url`
//! - `GET    /users/{id}`, `POST /functions/{id}/executions`

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::auth::accounts::{
    Account, AccountService, AccountSession, Execution, MagicUrlToken, MessagingTarget,
};
use crate::config::{AppConfig, AppwriteSettings};
use crate::store::{Collection, DocumentList, DocumentStore, Query, StoreError};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// Error body returned by Appwrite on non-2xx responses.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct UserTargets {
    #[serde(default)]
    targets: Vec<MessagingTarget>,
}

pub struct AppwriteClient {
    http: reqwest::Client,
    settings: AppwriteSettings,
}

impl AppwriteClient {
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            settings: config.appwrite.clone(),
        })
    }

    fn collection_id(&self, collection: Collection) -> &str {
        let ids = &self.settings.collections;
        match collection {
            Collection::Users => &ids.users,
            Collection::Posts => &ids.posts,
            Collection::Likes => &ids.likes,
            Collection::Comments => &ids.comments,
        }
    }

    fn documents_path(&self, collection: Collection) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.settings.database_id,
            self.collection_id(collection)
        )
    }

    /// Request authenticated with the server API key.
    fn server_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.settings.endpoint, path))
            .header(PROJECT_HEADER, &self.settings.project_id)
            .header(KEY_HEADER, &self.settings.api_key)
    }

    /// Request acting as the holder of a user session.
    fn session_request(&self, method: Method, path: &str, secret: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.settings.endpoint, path))
            .header(PROJECT_HEADER, &self.settings.project_id)
            .header(SESSION_HEADER, secret)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        let message = match response.json::<RemoteErrorBody>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => status.canonical_reason().unwrap_or("Unknown error").to_string(),
        };
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), StoreError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_documents(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<DocumentList<Value>, StoreError> {
        let params: Vec<(&str, String)> = query
            .to_params()
            .into_iter()
            .map(|q| ("queries[]", q))
            .collect();
        let request = self
            .server_request(Method::GET, &self.documents_path(collection))
            .query(&params);
        Self::send_json(request).await
    }

    async fn get_document(&self, collection: Collection, id: &str) -> Result<Value, StoreError> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        Self::send_json(self.server_request(Method::GET, &path)).await
    }

    async fn update_document(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        let request = self
            .server_request(Method::PATCH, &path)
            .json(&json!({ "data": data }));
        Self::send_json(request).await
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        Self::send_empty(self.server_request(Method::DELETE, &path)).await
    }
}

#[async_trait]
impl AccountService for AppwriteClient {
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountSession, StoreError> {
        let request = self
            .server_request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }));
        Self::send_json(request).await
    }

    async fn get_account(&self, session_secret: &str) -> Result<Account, StoreError> {
        Self::send_json(self.session_request(Method::GET, "/account", session_secret)).await
    }

    async fn delete_session(&self, session_secret: &str) -> Result<(), StoreError> {
        let request = self.session_request(Method::DELETE, "/account/sessions/current", session_secret);
        Self::send_empty(request).await
    }

    async fn user_targets(&self, user_id: &str) -> Result<Vec<MessagingTarget>, StoreError> {
        let user: UserTargets =
            Self::send_json(self.server_request(Method::GET, &format!("/users/{user_id}"))).await?;
        Ok(user.targets)
    }

    async fn create_magic_url_token(
        &self,
        user_id: &str,
        email: &str,
        url: &str,
    ) -> Result<MagicUrlToken, StoreError> {
        let request = self
            .server_request(Method::POST, "/account/tokens/magic-url")
            .json(&json!({ "userId": user_id, "email": email, "url": url }));
        Self::send_json(request).await
    }

    async fn redeem_magic_url(&self, user_id: &str, secret: &str) -> Result<(), StoreError> {
        let request = self
            .server_request(Method::PUT, "/account/sessions/magic-url")
            .json(&json!({ "userId": user_id, "secret": secret }));
        Self::send_empty(request).await
    }

    async fn execute_function(&self, function_id: &str, body: String) -> Result<Execution, StoreError> {
        let request = self
            .server_request(Method::POST, &format!("/functions/{function_id}/executions"))
            .json(&json!({ "body": body, "async": false }));
        Self::send_json(request).await
    }
}
