//! HTTP client for the StudyHub backend.

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use studyhub_core::{AppConfig, Note, Quiz, RecordId, Resource, Session};
use tracing::{debug, warn};

/// Message shown when the backend gives no usable reason.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Error type for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by backend calls. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or decoding failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with an error status
    #[error("{message}")]
    Backend {
        /// HTTP status
        status: u16,
        /// User-facing message
        message: String,
    },
}

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Http(_) => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Whether the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Backend { status: 401 | 403, .. })
    }
}

/// Extract a user-facing message from an error response body.
///
/// Looks for a `message` or `error` string field and falls back to
/// [`FALLBACK_MESSAGE`].
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "error"].iter().find_map(|key| {
                json.get(key)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    user: Option<LoginUser>,
}

#[derive(Deserialize)]
struct LoginUser {
    #[serde(default, alias = "name")]
    username: Option<String>,
}

impl LoginResponse {
    fn into_session(self, requested: &str) -> Session {
        let username = self
            .username
            .or_else(|| self.user.and_then(|u| u.username))
            .unwrap_or_else(|| requested.to_string());
        Session {
            token: self.token,
            username,
        }
    }
}

/// StudyHub REST client.
#[derive(Clone)]
pub struct StudyHubClient {
    /// HTTP client
    client: Client,

    /// Backend base URL, without trailing slash
    base_url: String,

    /// Bearer token of the current session
    token: Option<String>,
}

impl StudyHubClient {
    /// Create a client for a base URL.
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: ClientBuilder::new()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
            token: None,
        }
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        )
    }

    /// Attach an existing session.
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    /// Whether a bearer token is set.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop the bearer token.
    pub fn logout(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        warn!(status = status.as_u16(), %message, "Backend call failed");
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = Self::check(builder.send().await?).await?;
        if response.status() != StatusCode::NO_CONTENT {
            debug!(status = response.status().as_u16(), "Ignoring response body");
        }
        Ok(())
    }

    // === Auth ===

    /// Log in and keep the returned token for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let payload = json!({ "username": username, "password": password });
        let response: LoginResponse = self
            .send(self.request(Method::POST, "/api/auth/login").json(&payload))
            .await?;

        let session = response.into_session(username);
        self.token = Some(session.token.clone());
        debug!(user = %session.username, "Logged in");
        Ok(session)
    }

    // === Quizzes ===

    /// List quizzes.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        self.send(self.request(Method::GET, "/api/quizzes")).await
    }

    /// Create a quiz, returning the stored copy.
    pub async fn create_quiz(&self, quiz: &Quiz) -> Result<Quiz> {
        self.send(self.request(Method::POST, "/api/quizzes").json(quiz)).await
    }

    /// Replace a quiz.
    pub async fn update_quiz(&self, id: &RecordId, quiz: &Quiz) -> Result<Quiz> {
        self.send(self.request(Method::PUT, &format!("/api/quizzes/{}", id)).json(quiz))
            .await
    }

    /// Delete a quiz.
    pub async fn delete_quiz(&self, id: &RecordId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/quizzes/{}", id)))
            .await
    }

    // === Notes ===

    /// List notes.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.send(self.request(Method::GET, "/api/studyhub/notes")).await
    }

    /// Create a note, returning the stored copy.
    pub async fn create_note(&self, note: &Note) -> Result<Note> {
        self.send(self.request(Method::POST, "/api/studyhub/notes").json(note)).await
    }

    /// Replace a note.
    pub async fn update_note(&self, id: &RecordId, note: &Note) -> Result<Note> {
        self.send(self.request(Method::PUT, &format!("/api/studyhub/notes/{}", id)).json(note))
            .await
    }

    /// Delete a note.
    pub async fn delete_note(&self, id: &RecordId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/studyhub/notes/{}", id)))
            .await
    }

    // === Resources ===

    /// List shared resources.
    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.send(self.request(Method::GET, "/api/studyhub/resources")).await
    }

    /// Share a resource, returning the stored copy.
    pub async fn create_resource(&self, resource: &Resource) -> Result<Resource> {
        self.send(self.request(Method::POST, "/api/studyhub/resources").json(resource))
            .await
    }

    /// Delete a shared resource.
    pub async fn delete_resource(&self, id: &RecordId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/studyhub/resources/{}", id)))
            .await
    }
}
