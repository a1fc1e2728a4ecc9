//! Configuration file for the solar admin CLI
//!
//! Persistent settings live in `~/.solar/config.toml`. Each consumer owns one
//! top-level table of that file through the [`ConfigSection`] trait, so the
//! file can grow new sections without the loader knowing about them.
//!
//! The backend settings are stored in the `[api]` table:
//!
//! ```toml
//! [api]
//! base_url = "https://catalog.example.com"
//! timeout_ms = 5000
//! retries = 2
//!
//! [api.features]
//! categories = false
//! ```
//!
//! Environment variables always win over the file; see
//! [`solar_runtime::config`] for the full precedence rules.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solar_runtime::{ApiConfig, ApiOverrides};
use toml::Value;

/// Trait that all configuration sections must implement
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Clone {
    /// Key of this section in the top-level TOML table
    fn section_name() -> &'static str;
}

impl ConfigSection for ApiOverrides {
    fn section_name() -> &'static str {
        "api"
    }
}

/// Configuration file manager
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    data: BTreeMap<String, Value>,
}

impl Config {
    /// Default configuration directory name
    pub const CONFIG_DIR: &'static str = ".solar";

    /// Default configuration file name
    pub const CONFIG_FILE: &'static str = "config.toml";

    /// Load configuration from the default location (~/.solar/config.toml)
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path; a missing file is empty
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;

            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file at {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(Self::CONFIG_DIR).join(Self::CONFIG_FILE))
    }

    /// Get a configuration section
    pub fn get_section<T: ConfigSection>(&self) -> Result<Option<T>> {
        let section_name = T::section_name();

        match self.data.get(section_name) {
            Some(value) => {
                let section = value
                    .clone()
                    .try_into()
                    .with_context(|| format!("Failed to deserialize {section_name} section"))?;
                Ok(Some(section))
            }
            None => Ok(None),
        }
    }

    /// Set a configuration section
    pub fn set_section<T: ConfigSection>(&mut self, section: T) -> Result<()> {
        let section_name = T::section_name();
        let value = Value::try_from(section)
            .with_context(|| format!("Failed to serialize {section_name} section"))?;

        self.data.insert(section_name.to_string(), value);
        Ok(())
    }

    /// Remove a configuration section
    pub fn remove_section<T: ConfigSection>(&mut self) -> Option<Value> {
        self.data.remove(T::section_name())
    }

    /// Save the configuration to disk, creating parent directories as needed
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(&self.data).context("Failed to serialize config data")?;

        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config file at {}", self.path.display()))?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a section exists
    pub fn has_section<T: ConfigSection>(&self) -> bool {
        self.data.contains_key(T::section_name())
    }

    /// Read the `[api]` overrides, empty when the section is absent
    pub fn api_overrides(&self) -> Result<ApiOverrides> {
        Ok(self.get_section::<ApiOverrides>()?.unwrap_or_default())
    }
}

/// Resolve the client configuration from the config file and the environment
///
/// A config file that cannot be read is reported and ignored so that the CLI
/// still works from environment variables alone.
pub fn load_api_config() -> ApiConfig {
    let overrides = Config::load()
        .and_then(|config| config.api_overrides())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable config file");
            ApiOverrides::default()
        });
    ApiConfig::resolve_with(&overrides)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn config_in(temp_dir: &TempDir) -> Config {
        Config::load_from_path(&temp_dir.path().join("config.toml")).unwrap()
    }

    #[test]
    fn test_missing_file_has_no_api_section() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        assert!(!config.has_section::<ApiOverrides>());
        assert_eq!(config.api_overrides().unwrap(), ApiOverrides::default());
    }

    #[test]
    fn test_api_section_round_trips_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);

        let overrides = ApiOverrides {
            base_url: Some("https://catalog.example.com".to_string()),
            retries: Some(2),
            ..ApiOverrides::default()
        };
        config.set_section(overrides.clone()).unwrap();
        config.save().unwrap();

        let reloaded = config_in(&temp_dir);
        assert_eq!(reloaded.api_overrides().unwrap(), overrides);
    }

    #[test]
    fn test_partial_feature_table_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\ntimeout_ms = 5000\n\n[api.features]\ncategories = false\n",
        )
        .unwrap();

        let overrides = Config::load_from_path(&path)
            .unwrap()
            .api_overrides()
            .unwrap();
        let mut resolved = ApiConfig::default();
        resolved.apply(&overrides);

        assert_eq!(resolved.timeout, Duration::from_millis(5000));
        assert!(!resolved.features.categories);
        assert!(resolved.features.search);
        assert!(resolved.features.admin_panel);
    }

    #[test]
    fn test_unknown_sections_survive_a_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[ui]\ntheme = \"dark\"\n").unwrap();

        let mut config = Config::load_from_path(&path).unwrap();
        config
            .set_section(ApiOverrides {
                retries: Some(5),
                ..ApiOverrides::default()
            })
            .unwrap();
        config.save().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("theme = \"dark\""));
        assert!(contents.contains("retries = 5"));
    }

    #[test]
    fn test_remove_section() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.set_section(ApiOverrides::default()).unwrap();

        assert!(config.remove_section::<ApiOverrides>().is_some());
        assert!(!config.has_section::<ApiOverrides>());
    }

    #[test]
    fn test_empty_file_handling() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "   \n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(!config.has_section::<ApiOverrides>());
    }

    #[test]
    fn test_malformed_toml_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[invalid toml").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deep/nested/config.toml");

        let mut config = Config::load_from_path(&path).unwrap();
        config.set_section(ApiOverrides::default()).unwrap();
        config.save().unwrap();

        assert!(path.exists());
        assert_eq!(config.path(), path.as_path());
    }
}
