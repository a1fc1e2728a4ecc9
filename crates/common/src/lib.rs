//! Shared building blocks for the solar admin CLI
//!
//! - [`config`]: the `~/.solar/config.toml` file and its sections
//! - [`ui`]: terminal and in-memory implementations of the UI trait

pub mod config;
pub mod ui;

pub use config::{Config, ConfigSection, load_api_config};
pub use ui::{RealUserInterface, TestUserInterface};
