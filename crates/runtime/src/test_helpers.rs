//! Test helper utilities and mock implementations for the client layer.
//!
//! This module provides mock implementations and utility functions to help
//! write tests for the runtime crate. It includes mocks for the timer, the
//! admin endpoints and the token store.
//!
//! # Example
//!
//! ```rust
//! use solar_runtime::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_with_mocked_runtime() {
//!     let mut runtime = MockAsyncRuntimeMock::new();
//!     runtime.expect_sleep().times(2).returning(|_| ());
//!
//!     let http = HttpClient::with_runtime(test_config(&server.uri()), Arc::new(runtime));
//!     // ...
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;

use crate::api_client::AdminApi;
use crate::api_client::types::{AdminUser, AuthResponse, Credentials};
use crate::config::ApiConfig;
use crate::deps::{AsyncRuntime, TokenStore};
use crate::error::{HttpError, TokenStoreError};
use crate::session::Session;

// Mock implementation of the `AsyncRuntime` trait for testing.
//
// This mock allows you to control the delay between retries in tests,
// making them run instantly instead of waiting.
//
// # Example
//
// ```rust
// let mut runtime_mock = MockAsyncRuntimeMock::new();
//
// // Make sleep return immediately instead of waiting
// runtime_mock
//     .expect_sleep()
//     .with(mockall::predicate::eq(Duration::from_millis(25)))
//     .returning(|_| ());
// ```
mock! {
    pub AsyncRuntimeMock {}

    #[async_trait]
    impl AsyncRuntime for AsyncRuntimeMock {
        async fn sleep(&self, duration: Duration);
    }
}

// Mock implementation of the `AdminApi` trait for testing.
//
// # Example
//
// ```rust
// let mut admin = MockAdminApiMock::new();
// admin
//     .expect_login()
//     .returning(|_| Ok(login_success("tok", "admin")));
// ```
mock! {
    pub AdminApiMock {}

    #[async_trait]
    impl AdminApi for AdminApiMock {
        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;
        async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;
        async fn profile(&self, session: &Session) -> Result<AdminUser, HttpError>;
    }
}

// Mock implementation of the `TokenStore` trait, for failure injection.
mock! {
    pub TokenStoreMock {}

    impl TokenStore for TokenStoreMock {
        fn load(&self) -> Result<Option<String>, TokenStoreError>;
        fn save(&self, token: &str) -> Result<(), TokenStoreError>;
        fn clear(&self) -> Result<(), TokenStoreError>;
    }
}

/// Runtime mock that lets any number of sleeps through instantly
pub fn instant_runtime() -> MockAsyncRuntimeMock {
    let mut runtime = MockAsyncRuntimeMock::new();
    runtime.expect_sleep().returning(|_| ());
    runtime
}

/// Configuration pointing at a test server with a short, distinctive retry delay
pub fn test_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(2),
        retries: 3,
        retry_delay: Duration::from_millis(25),
        ..ApiConfig::default()
    }
}

/// Successful login response
pub fn login_success(token: &str, username: &str) -> AuthResponse {
    AuthResponse {
        success: true,
        token: Some(token.to_string()),
        admin: Some(AdminUser {
            username: username.to_string(),
        }),
        message: None,
    }
}

/// Rejected login response
pub fn login_failure(message: &str) -> AuthResponse {
    AuthResponse {
        success: false,
        message: Some(message.to_string()),
        ..AuthResponse::default()
    }
}
