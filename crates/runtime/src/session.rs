//! Admin session state and the manager that drives its transitions
//!
//! A [`Session`] is an immutable value: callers take a snapshot from the
//! [`SessionManager`] and pass it explicitly into every resource-client call
//! that needs authentication. The manager moves between two states:
//!
//! - anonymous: no accepted token
//! - authenticated: a token the backend accepted, plus the account name
//!
//! A persisted token alone never yields an authenticated session; it must be
//! confirmed against the profile endpoint first.

use std::sync::{Arc, PoisonError, RwLock};

use crate::api_client::AdminApi;
use crate::api_client::types::{AdminUser, AuthResponse, Credentials};
use crate::deps::TokenStore;
use crate::error::{HttpError, TokenStoreError};

/// Client-held authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<AdminUser>,
}

impl Session {
    /// Session without credentials
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// Session for a token the backend accepted
    pub fn authenticated(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(AdminUser {
                username: username.into(),
            }),
        }
    }

    /// Session carrying a token that has not been verified yet
    pub fn unverified(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    /// Bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Authenticated account, if any
    pub const fn user(&self) -> Option<&AdminUser> {
        self.user.as_ref()
    }

    /// Name of the authenticated account
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// Whether the backend has accepted this session's token
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Result of a login attempt; login never fails past this value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token accepted and persisted
    Success {
        /// Account name reported by the backend
        username: String,
    },
    /// Credentials rejected or the backend unreachable
    Failure {
        /// User-facing reason
        error: String,
    },
}

impl LoginOutcome {
    /// Whether the login succeeded
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Result of restoring a session at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No token was persisted
    NoToken,
    /// The persisted token was confirmed by the backend
    Verified {
        /// Account name reported by the backend
        username: String,
    },
    /// The backend rejected the persisted token, which has been discarded
    Rejected,
    /// The token could not be checked; it is kept but not trusted
    Unverified {
        /// Why verification did not complete
        error: String,
    },
}

/// Owner of the current [`Session`]
pub struct SessionManager {
    admin: Arc<dyn AdminApi>,
    store: Arc<dyn TokenStore>,
    token_override: Option<String>,
    current: RwLock<Session>,
}

impl SessionManager {
    /// Create an anonymous manager
    pub fn new(admin: Arc<dyn AdminApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            admin,
            store,
            token_override: None,
            current: RwLock::new(Session::anonymous()),
        }
    }

    /// Use this token instead of the persisted one when restoring
    #[must_use]
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        self.token_override = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, session: Session) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Load the persisted token and confirm it with the backend
    pub async fn restore(&self) -> RestoreOutcome {
        let stored = match &self.token_override {
            Some(token) => Some(token.clone()),
            None => self.store.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read persisted auth token");
                None
            }),
        };

        let Some(token) = stored else {
            self.set(Session::anonymous());
            return RestoreOutcome::NoToken;
        };

        match self.verify_session(&token).await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "Restored session");
                self.set(Session::authenticated(token, user.username.clone()));
                RestoreOutcome::Verified {
                    username: user.username,
                }
            }
            Err(err) if err.is_unauthorized() => {
                tracing::info!("Persisted auth token was rejected, discarding it");
                if self.token_override.is_none() {
                    if let Err(e) = self.store.clear() {
                        tracing::warn!(error = %e, "Could not discard rejected auth token");
                    }
                }
                self.set(Session::anonymous());
                RestoreOutcome::Rejected
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not verify persisted auth token");
                self.set(Session::anonymous());
                RestoreOutcome::Unverified {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Ask the backend which account a token belongs to
    pub async fn verify_session(&self, token: &str) -> Result<AdminUser, HttpError> {
        self.admin.profile(&Session::unverified(token)).await
    }

    /// Exchange credentials for a token and persist it
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        tracing::debug!(%username, "Logging in");
        let credentials = Credentials::new(username, password);

        match self.admin.login(&credentials).await {
            Ok(response) => self.accept_login(response),
            Err(err) => {
                tracing::warn!(error = %err, "Login request failed");
                let error = match (&err, err.server_message()) {
                    (_, Some(message)) => message.to_string(),
                    (HttpError::Network { .. }, None) => err.to_string(),
                    _ => format!("Network error: {err}"),
                };
                LoginOutcome::Failure { error }
            }
        }
    }

    fn accept_login(&self, response: AuthResponse) -> LoginOutcome {
        if !response.success {
            return LoginOutcome::Failure {
                error: response.message.unwrap_or_else(|| "Login failed".to_string()),
            };
        }

        let (Some(token), Some(admin)) = (response.token, response.admin) else {
            return LoginOutcome::Failure {
                error: "Login response did not include a token".to_string(),
            };
        };

        if let Err(e) = self.store.save(&token) {
            tracing::error!(error = %e, "Could not persist auth token");
            return LoginOutcome::Failure {
                error: e.to_string(),
            };
        }

        tracing::info!(username = %admin.username, "Logged in");
        self.set(Session::authenticated(token, admin.username.clone()));
        LoginOutcome::Success {
            username: admin.username,
        }
    }

    /// Create an admin account
    pub async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, HttpError> {
        self.admin
            .register(&Credentials::new(username, password))
            .await
    }

    /// Forget the session and the persisted token
    pub fn logout(&self) -> Result<(), TokenStoreError> {
        self.set(Session::anonymous());
        self.store.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
