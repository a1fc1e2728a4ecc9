//! Logout command

use std::sync::Arc;

use anyhow::Result;

use solar_runtime::MessageStyle;

use crate::commands::auth::AuthDependencies;
use crate::context::AppContext;

/// Execute the logout command with injected dependencies
///
/// Logging out without a saved session is not an error.
pub fn execute_with_deps(deps: &Arc<AuthDependencies>) -> Result<()> {
    deps.ui
        .print_styled("→ Logging out of the solar catalog", MessageStyle::Cyan);
    deps.ui.print("");

    deps.session.logout()?;

    deps.ui
        .print_styled("✅ Successfully logged out!", MessageStyle::Success);
    deps.ui.print("Run `solar login` to sign in again.");
    Ok(())
}

/// Execute the logout command with default dependencies
pub fn execute() -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(&AuthDependencies::from_context(&ctx))
}

#[cfg(test)]
#[path = "logout_tests.rs"]
mod tests;
