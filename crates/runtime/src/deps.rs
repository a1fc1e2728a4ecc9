//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for the external dependencies of
//! the client layer (timers and the persisted token store), allowing for easy
//! mocking and testing.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TokenStoreError;

/// Keyring service name under which the auth token is stored
pub const TOKEN_SERVICE: &str = "solar-admin";

/// Well-known storage key of the auth token
pub const TOKEN_KEY: &str = "authToken";

/// Async runtime operations
#[async_trait]
pub trait AsyncRuntime: Send + Sync {
    /// Sleep for a duration
    async fn sleep(&self, duration: Duration);
}

/// Production async runtime
pub struct RealAsyncRuntime;

#[async_trait]
impl AsyncRuntime for RealAsyncRuntime {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Check if running in interactive mode
    fn is_interactive(&self) -> bool;

    /// Prompt for text input
    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> anyhow::Result<String>;

    /// Prompt for a secret without echoing it
    fn prompt_password(&self, prompt: &str) -> anyhow::Result<String>;

    /// Ask a yes/no question
    fn prompt_confirm(&self, prompt: &str, default: bool) -> anyhow::Result<bool>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Finish and clear the progress
    fn finish_and_clear(&self);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Unstyled text
    Normal,
    /// Bold text style
    Bold,
    /// Cyan colored text
    Cyan,
    /// Dimmed secondary text
    Dim,
    /// Warning style (typically yellow)
    Warning,
    /// Error style (typically red)
    Error,
    /// Success style (typically green)
    Success,
}

/// Durable storage for the single opaque auth token
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` when nothing is stored
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist a token, replacing any previous one
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the persisted token; clearing an empty store is not an error
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token store backed by the platform keyring
pub struct KeyringTokenStore {
    service: String,
    key: String,
}

impl KeyringTokenStore {
    /// Store under a custom service and key
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, TokenStoreError> {
        keyring::Entry::new(&self.service, &self.key)
            .map_err(|e| TokenStoreError::Access(e.to_string()))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(TOKEN_SERVICE, TOKEN_KEY)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match self.entry()?.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenStoreError::Operation {
                action: "read",
                message: e.to_string(),
            }),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| TokenStoreError::Operation {
                action: "write",
                message: e.to_string(),
            })
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenStoreError::Operation {
                action: "delete",
                message: e.to_string(),
            }),
        }
    }
}

/// In-process token store, used by tests and one-shot invocations
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Peek at the stored token
    pub fn current(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.current())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_token_store_round_trip() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.load().unwrap(), None);

        store.save("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
