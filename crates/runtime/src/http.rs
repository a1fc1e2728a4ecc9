//! Timeout-bounded, retrying HTTP client wrapper
//!
//! Every backend call goes through [`HttpClient::execute`]. One call may make
//! several attempts; each attempt is bounded by the configured timeout and
//! attempts are separated by a fixed delay. Retry eligibility depends on the
//! request method:
//!
//! - `GET`, `PUT` and `DELETE` are idempotent and retried.
//! - `POST` is retried only when it carries an idempotency key, which is
//!   generated once per logical request and resent on every attempt.
//! - Any other `POST` (login, register) is attempted once.
//!
//! Every failure of an eligible request is retried, non-2xx statuses included,
//! so a permanently failing call makes exactly `retries` attempts.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::deps::{AsyncRuntime, RealAsyncRuntime};
use crate::error::HttpError;
use crate::session::Session;

/// Header carrying the idempotency key of a retryable create
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Whether a request carries the session's bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// No `Authorization` header
    Anonymous,
    /// `Authorization: Bearer <token>` when the session holds a token
    Required,
}

/// Description of one logical backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    auth: AuthMode,
    idempotency_key: Option<String>,
}

impl ApiRequest {
    /// Create a request for a method and path relative to the base URL
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            auth: AuthMode::Anonymous,
            idempotency_key: None,
        }
    }

    /// `GET` request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        let value = serde_json::to_value(body)
            .map_err(|e| HttpError::Parse(format!("Failed to serialize request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send the session's bearer token with this request
    #[must_use]
    pub const fn authenticated(mut self) -> Self {
        self.auth = AuthMode::Required;
        self
    }

    /// Mark a create as safe to retry by attaching a fresh idempotency key
    #[must_use]
    pub fn with_idempotency_key(mut self) -> Self {
        self.idempotency_key = Some(uuid::Uuid::new_v4().to_string());
        self
    }

    /// HTTP method
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL
    pub fn path(&self) -> &str {
        &self.path
    }

    /// JSON body, if any
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Authentication mode
    pub const fn auth(&self) -> AuthMode {
        self.auth
    }

    /// Idempotency key, if one was attached
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Whether a failed attempt may be repeated
    pub fn is_retry_eligible(&self) -> bool {
        if self.method == Method::POST {
            return self.idempotency_key.is_some();
        }
        [Method::GET, Method::HEAD, Method::PUT, Method::DELETE, Method::OPTIONS]
            .contains(&self.method)
    }
}

/// HTTP client applying timeout, retry and auth injection
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<ApiConfig>,
    runtime: Arc<dyn AsyncRuntime>,
}

impl HttpClient {
    /// Create a client sleeping on the tokio timer between attempts
    pub fn new(config: ApiConfig) -> Self {
        Self::with_runtime(config, Arc::new(RealAsyncRuntime))
    }

    /// Create a client with an injected runtime
    pub fn with_runtime(config: ApiConfig, runtime: Arc<dyn AsyncRuntime>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: Arc::new(config),
            runtime,
        }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full URL for a path relative to the base URL
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Execute a request and deserialize the JSON response
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        session: &Session,
    ) -> Result<T, HttpError> {
        let value = self.execute(request, session).await?;
        serde_json::from_value(value).map_err(|e| {
            HttpError::Parse(format!(
                "Unexpected response from {} {}: {e}",
                request.method,
                request.path
            ))
        })
    }

    /// Execute a request, retrying failures when eligible, and return the JSON body
    ///
    /// An empty response body is returned as `Value::Null`.
    pub async fn execute(&self, request: &ApiRequest, session: &Session) -> Result<Value, HttpError> {
        let max_attempts = if request.is_retry_eligible() {
            self.config.retries.max(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            match self.attempt(request, session).await {
                Ok(value) => {
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(err) if attempt < max_attempts => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        max_attempts,
                        error = %err,
                        "Request failed, retrying"
                    );
                    self.runtime.sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        error = %err,
                        "Request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// One attempt, bounded by the configured timeout
    async fn attempt(&self, request: &ApiRequest, session: &Session) -> Result<Value, HttpError> {
        let url = self.build_url(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(self.config.timeout);

        if request.auth == AuthMode::Required {
            match session.token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => tracing::debug!(path = %request.path, "No auth token, sending request without it"),
            }
        }
        if let Some(key) = &request.idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let body = parse_body(&bytes);

        if !status.is_success() {
            return Err(HttpError::from_status(status.as_u16(), body.ok()));
        }

        body.map_err(|e| HttpError::Parse(e.to_string()))
    }

    fn transport_error(&self, error: &reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            HttpError::Network {
                message: error.to_string(),
            }
        }
    }

    /// Request the backend root; `true` iff it answers with a 2xx status
    pub async fn check_health(&self) -> bool {
        let url = self.build_url("/");
        match self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::error!(%url, error = %e, "API health check failed");
                false
            }
        }
    }
}

fn parse_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
