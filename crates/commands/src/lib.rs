//! Command implementations for the solar admin CLI
//!
//! Each command drives a [`view::CatalogView`] or the session manager through
//! injected dependencies, so that the flows can be tested against mocked
//! resource clients.

/// Command implementations module
pub mod commands;

/// Listing filters, sorting and dashboard statistics
pub mod catalog;

/// Dependency wiring shared by the commands
pub mod context;

/// Product form validation and coercion
pub mod form;

/// Catalog view state and mutation flows
pub mod view;

#[cfg(test)]
pub mod test_helpers;

// Re-export all commands at the crate root for easier access
pub use commands::{
    auth, categories, config, dashboard, health, login, logout, products, register,
};
