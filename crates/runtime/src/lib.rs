//! Core client layer for the solar catalog backend
//!
//! This crate contains the foundational pieces used by the `solar` admin
//! client: configuration resolution, the retrying HTTP client wrapper, the
//! admin session manager and the typed resource clients built on top of them.

/// Typed resource clients for products, categories and admin accounts
pub mod api_client;
/// Configuration constants and resolution
pub mod config;
/// Dependency injection traits and implementations
pub mod deps;
/// Error taxonomy
pub mod error;
/// Timeout and retry aware HTTP client wrapper
pub mod http;
/// Admin session state
pub mod session;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types at the crate root
pub use api_client::types::{
    AdminUser, AuthResponse, Category, CategoryPayload, CategoryRef, Credentials, LastUpdate,
    MessageResponse, Product, ProductPayload,
};
pub use api_client::{AdminApi, CatalogApi, CategoriesApi, ProductsApi};
pub use config::{
    API_URL_ENV_VAR, AUTH_TOKEN_ENV_VAR, ApiConfig, ApiOverrides, DEFAULT_API_BASE_URL,
    FeatureFlags,
};
pub use deps::{
    AsyncRuntime, KeyringTokenStore, MemoryTokenStore, MessageStyle, ProgressIndicator,
    RealAsyncRuntime, TokenStore, UserInterface,
};
pub use error::{HttpError, TokenStoreError};
pub use http::{ApiRequest, AuthMode, HttpClient};
pub use session::{LoginOutcome, RestoreOutcome, Session, SessionManager};
