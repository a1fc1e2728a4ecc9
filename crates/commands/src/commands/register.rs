//! Admin registration command

use std::sync::Arc;

use anyhow::{Result, bail};

use solar_runtime::MessageStyle;

use crate::commands::auth::AuthDependencies;
use crate::context::AppContext;

/// Register command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct RegisterArgs {
    /// Username for the new account; prompted for when absent
    pub username: Option<String>,
    /// Password for the new account; prompted for when absent
    pub password: Option<String>,
}

/// Execute the register command with injected dependencies
pub async fn execute_with_deps(args: RegisterArgs, deps: &Arc<AuthDependencies>) -> Result<()> {
    let interactive = deps.ui.is_interactive();
    let username = match args.username {
        Some(username) => username,
        None if interactive => deps.ui.prompt_input("New admin username", None)?,
        None => bail!("A username is required; pass --username"),
    };
    let password = match args.password {
        Some(password) => password,
        None if interactive => {
            let first = deps.ui.prompt_password("Password")?;
            let second = deps.ui.prompt_password("Confirm password")?;
            if first != second {
                bail!("Passwords do not match");
            }
            first
        }
        None => bail!("A password is required; pass --password or set SOLAR_ADMIN_PASSWORD"),
    };

    let response = deps
        .session
        .register(&username, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Registration failed")))?;

    let message = response
        .message
        .unwrap_or_else(|| format!("Admin {username} registered"));
    deps.ui
        .print_styled(&format!("✅ {message}"), MessageStyle::Success);
    deps.ui.print("Run `solar login` to sign in with the new account.");
    Ok(())
}

/// Execute the register command with default dependencies
pub async fn execute(args: RegisterArgs) -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(args, &AuthDependencies::from_context(&ctx)).await
}

#[cfg(test)]
mod tests {
    use solar_runtime::api_client::types::AuthResponse;
    use solar_runtime::{MemoryTokenStore, SessionManager, UserInterface};

    use super::*;
    use crate::test_helpers::{MockAdminApiMock, TestUserInterface, server_error};

    fn deps(ui: &Arc<TestUserInterface>, admin: MockAdminApiMock) -> Arc<AuthDependencies> {
        Arc::new(AuthDependencies {
            ui: ui.clone() as Arc<dyn UserInterface>,
            session: Arc::new(SessionManager::new(
                Arc::new(admin),
                Arc::new(MemoryTokenStore::default()),
            )),
        })
    }

    #[tokio::test]
    async fn test_register_reports_server_message() {
        let ui = Arc::new(TestUserInterface::new());
        let mut admin = MockAdminApiMock::new();
        admin
            .expect_register()
            .withf(|c| c.username == "ops" && c.password == "pw")
            .times(1)
            .returning(|_| {
                Ok(AuthResponse {
                    success: true,
                    message: Some("Admin registered successfully".into()),
                    ..AuthResponse::default()
                })
            });

        let args = RegisterArgs {
            username: Some("ops".into()),
            password: Some("pw".into()),
        };
        execute_with_deps(args, &deps(&ui, admin)).await.unwrap();

        assert!(ui.printed("Admin registered successfully"));
    }

    #[tokio::test]
    async fn test_register_rejected_by_backend() {
        let ui = Arc::new(TestUserInterface::new());
        let mut admin = MockAdminApiMock::new();
        admin
            .expect_register()
            .returning(|_| Err(server_error(400, "Admin already exists")));

        let args = RegisterArgs {
            username: Some("ops".into()),
            password: Some("pw".into()),
        };
        let err = execute_with_deps(args, &deps(&ui, admin))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Admin already exists");
    }

    #[tokio::test]
    async fn test_register_mismatched_passwords() {
        let ui = Arc::new(TestUserInterface::with_answers(["ops", "one", "two"]));
        let mut admin = MockAdminApiMock::new();
        admin.expect_register().never();

        let err = execute_with_deps(RegisterArgs::default(), &deps(&ui, admin))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Passwords do not match");
    }
}
