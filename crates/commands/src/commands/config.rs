//! Inspect and edit the `[api]` section of `~/.solar/config.toml`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};

use solar_common::Config;
use solar_runtime::{ApiConfig, ApiOverrides, FeatureFlags, MessageStyle, UserInterface};

/// Dependencies for the config command
pub struct ConfigDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// Config file location
    pub path: PathBuf,
    /// Environment lookup layered over the file
    pub env: fn(&str) -> Option<String>,
}

/// Values to write; `None` leaves the stored value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigSetArgs {
    /// Backend base URL
    pub api_url: Option<String>,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Maximum attempts per request
    pub retries: Option<u32>,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: Option<u64>,
}

/// Config subcommands
#[derive(Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Store overrides in the config file
    Set(ConfigSetArgs),
    /// Remove all stored overrides
    Reset,
}

/// Execute a config subcommand with injected dependencies
pub fn execute_with_deps(command: ConfigCommand, deps: &Arc<ConfigDependencies>) -> Result<()> {
    match command {
        ConfigCommand::Show => show(deps),
        ConfigCommand::Set(args) => set(args, deps),
        ConfigCommand::Reset => reset(deps),
    }
}

fn show(deps: &ConfigDependencies) -> Result<()> {
    let file = Config::load_from_path(&deps.path)?;
    let overrides = file.api_overrides()?;
    let config = ApiConfig::resolve_with_lookup(&overrides, deps.env);

    deps.ui.print_styled(
        &format!("Config file: {}", deps.path.display()),
        MessageStyle::Dim,
    );
    if !file.has_section::<ApiOverrides>() {
        deps.ui
            .print_styled("  (no [api] section; using defaults)", MessageStyle::Dim);
    }
    deps.ui.print("");
    deps.ui.print_styled("Effective settings", MessageStyle::Bold);
    deps.ui.print(&format!("  API URL:      {}", config.base_url));
    deps.ui.print(&format!(
        "  Timeout:      {} ms",
        config.timeout.as_millis()
    ));
    deps.ui.print(&format!("  Retries:      {}", config.retries));
    deps.ui.print(&format!(
        "  Retry delay:  {} ms",
        config.retry_delay.as_millis()
    ));
    deps.ui
        .print(&format!("  Features:     {}", describe(config.features)));
    Ok(())
}

fn describe(features: FeatureFlags) -> String {
    let state = |on: bool| if on { "on" } else { "off" };
    format!(
        "search={} categories={} admin_panel={} real_time_updates={}",
        state(features.search),
        state(features.categories),
        state(features.admin_panel),
        state(features.real_time_updates)
    )
}

fn set(args: ConfigSetArgs, deps: &ConfigDependencies) -> Result<()> {
    if args.api_url.is_none()
        && args.timeout_ms.is_none()
        && args.retries.is_none()
        && args.retry_delay_ms.is_none()
    {
        bail!("Nothing to set; pass --api-url, --timeout-ms, --retries or --retry-delay-ms");
    }
    if let Some(url) = &args.api_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        bail!("API URL must start with http:// or https://, got '{url}'");
    }
    if args.retries == Some(0) {
        bail!("--retries must be at least 1");
    }

    let mut file = Config::load_from_path(&deps.path)?;
    let mut overrides = file.api_overrides()?;
    if let Some(url) = args.api_url {
        overrides.base_url = Some(url.trim_end_matches('/').to_string());
    }
    overrides.timeout_ms = args.timeout_ms.or(overrides.timeout_ms);
    overrides.retries = args.retries.or(overrides.retries);
    overrides.retry_delay_ms = args.retry_delay_ms.or(overrides.retry_delay_ms);

    file.set_section(overrides)?;
    file.save()?;
    tracing::debug!(path = %deps.path.display(), "Saved [api] overrides");

    deps.ui.print_styled(
        &format!("✅ Saved to {}", deps.path.display()),
        MessageStyle::Success,
    );
    Ok(())
}

fn reset(deps: &ConfigDependencies) -> Result<()> {
    let mut file = Config::load_from_path(&deps.path)?;
    if file.remove_section::<ApiOverrides>().is_none() {
        deps.ui.print("No stored API settings to remove.");
        return Ok(());
    }
    file.save()?;
    deps.ui
        .print_styled("✅ Stored API settings removed", MessageStyle::Success);
    Ok(())
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Execute a config subcommand against `~/.solar/config.toml`
pub fn execute(command: ConfigCommand) -> Result<()> {
    let deps = Arc::new(ConfigDependencies {
        ui: Arc::new(solar_common::RealUserInterface),
        path: Config::default_config_path()?,
        env: env_var,
    });
    execute_with_deps(command, &deps)
}
