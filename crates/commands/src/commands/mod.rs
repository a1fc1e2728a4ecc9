//! Command implementations
//!
//! Each command exposes an `execute_with_deps` entry point taking injected
//! dependencies, and an `execute` wrapper that wires the real ones.

pub mod auth;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod login;
pub mod logout;
pub mod products;
pub mod register;
