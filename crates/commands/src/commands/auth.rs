//! Session status command and the dependencies shared by the auth commands

use std::sync::Arc;

use anyhow::Result;

use solar_runtime::{MessageStyle, RestoreOutcome, SessionManager, UserInterface};

use crate::context::AppContext;

/// Dependencies for login, logout, register and status
pub struct AuthDependencies {
    /// User interface for output and interaction
    pub ui: Arc<dyn UserInterface>,
    /// Session manager
    pub session: Arc<SessionManager>,
}

impl AuthDependencies {
    /// Wire the real session manager and terminal
    pub fn from_context(ctx: &AppContext) -> Arc<Self> {
        Arc::new(Self {
            ui: ctx.ui.clone(),
            session: ctx.session.clone(),
        })
    }
}

/// Auth command arguments
#[derive(Debug, Clone, Copy)]
pub enum AuthCommand {
    /// Show whether the saved session is valid
    Status,
}

/// Report whether the saved token is still accepted by the backend
pub async fn status_with_deps(deps: &Arc<AuthDependencies>) -> Result<()> {
    let spinner = deps.ui.create_spinner();
    spinner.set_message("Checking saved session...");
    let outcome = deps.session.restore().await;
    spinner.finish_and_clear();

    match outcome {
        RestoreOutcome::Verified { username } => {
            deps.ui.print_styled(
                &format!("✅ Logged in as {username}"),
                MessageStyle::Success,
            );
        }
        RestoreOutcome::NoToken => {
            deps.ui.print("Not logged in.");
            deps.ui.print("Run `solar login` to sign in.");
        }
        RestoreOutcome::Rejected => {
            deps.ui.print_styled(
                "Your saved session has expired and was removed.",
                MessageStyle::Warning,
            );
            deps.ui.print("Run `solar login` to sign in again.");
        }
        RestoreOutcome::Unverified { error } => {
            deps.ui.print_styled(
                &format!("⚠️  Could not verify the saved session: {error}"),
                MessageStyle::Warning,
            );
            deps.ui
                .print("The token was kept; admin commands stay locked until it is verified.");
        }
    }
    Ok(())
}

/// Execute the auth command with default dependencies
pub async fn execute(command: AuthCommand) -> Result<()> {
    let ctx = AppContext::from_environment();
    let deps = AuthDependencies::from_context(&ctx);
    match command {
        AuthCommand::Status => status_with_deps(&deps).await,
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
