//! Admin login command

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};

use solar_runtime::{LoginOutcome, MessageStyle};

use crate::commands::auth::AuthDependencies;
use crate::context::AppContext;

/// Login command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    /// Admin username; prompted for when absent
    pub username: Option<String>,
    /// Admin password; prompted for when absent
    pub password: Option<String>,
}

/// Execute the login command with injected dependencies
pub async fn execute_with_deps(args: LoginArgs, deps: &Arc<AuthDependencies>) -> Result<()> {
    let username = match args.username {
        Some(username) => username,
        None if deps.ui.is_interactive() => deps.ui.prompt_input("Username", None)?,
        None => bail!("A username is required; pass --username"),
    };
    let password = match args.password {
        Some(password) => password,
        None if deps.ui.is_interactive() => deps.ui.prompt_password("Password")?,
        None => bail!("A password is required; pass --password or set SOLAR_ADMIN_PASSWORD"),
    };

    deps.ui
        .print_styled(&format!("→ Logging in as {username}"), MessageStyle::Cyan);

    let spinner = deps.ui.create_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Contacting the catalog backend...");
    let outcome = deps.session.login(&username, &password).await;
    spinner.finish_and_clear();

    match outcome {
        LoginOutcome::Success { username } => {
            deps.ui.print_styled(
                &format!("✅ Logged in as {username}"),
                MessageStyle::Success,
            );
            Ok(())
        }
        LoginOutcome::Failure { error } => bail!("{error}"),
    }
}

/// Execute the login command with default dependencies
pub async fn execute(args: LoginArgs) -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(args, &AuthDependencies::from_context(&ctx)).await
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
