//! Backend health check

use std::sync::Arc;

use anyhow::{Result, bail};

use solar_runtime::{MessageStyle, UserInterface};

use crate::context::{AppContext, HealthProbe};

/// Dependencies for the health command
pub struct HealthDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// Liveness probe
    pub probe: Arc<dyn HealthProbe>,
    /// Base URL shown to the user
    pub base_url: String,
}

/// Probe the backend root route once
pub async fn execute_with_deps(deps: &Arc<HealthDependencies>) -> Result<()> {
    let spinner = deps.ui.create_spinner();
    spinner.set_message(&format!("Checking {}...", deps.base_url));
    let healthy = deps.probe.is_healthy().await;
    spinner.finish_and_clear();

    if healthy {
        deps.ui.print_styled(
            &format!("✅ Backend is up at {}", deps.base_url),
            MessageStyle::Success,
        );
        Ok(())
    } else {
        deps.ui.print_styled(
            &format!("❌ Backend is not responding at {}", deps.base_url),
            MessageStyle::Error,
        );
        bail!("Health check failed")
    }
}

/// Probe the configured backend
pub async fn execute() -> Result<()> {
    let ctx = AppContext::from_environment();
    let deps = Arc::new(HealthDependencies {
        ui: ctx.ui.clone(),
        probe: Arc::new(ctx.http.clone()),
        base_url: ctx.config.base_url.clone(),
    });
    execute_with_deps(&deps).await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::test_helpers::TestUserInterface;

    struct FixedProbe(bool);

    #[async_trait]
    impl HealthProbe for FixedProbe {
        async fn is_healthy(&self) -> bool {
            self.0
        }
    }

    fn deps(ui: &Arc<TestUserInterface>, healthy: bool) -> Arc<HealthDependencies> {
        Arc::new(HealthDependencies {
            ui: ui.clone() as Arc<dyn UserInterface>,
            probe: Arc::new(FixedProbe(healthy)),
            base_url: "http://localhost:5000".into(),
        })
    }

    #[tokio::test]
    async fn test_healthy_backend() {
        let ui = Arc::new(TestUserInterface::new());

        execute_with_deps(&deps(&ui, true)).await.unwrap();

        assert!(ui.printed("Backend is up at http://localhost:5000"));
    }

    #[tokio::test]
    async fn test_unhealthy_backend_fails() {
        let ui = Arc::new(TestUserInterface::new());

        let result = execute_with_deps(&deps(&ui, false)).await;

        assert!(result.is_err());
        let styled = ui.get_styled_output();
        assert!(
            styled
                .iter()
                .any(|(line, style)| line.contains("not responding")
                    && matches!(style, MessageStyle::Error))
        );
    }
}
