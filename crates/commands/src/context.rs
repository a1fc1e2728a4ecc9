//! Wiring of real dependencies for command execution

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;

use solar_common::RealUserInterface;
use solar_runtime::{
    AUTH_TOKEN_ENV_VAR, ApiConfig, CatalogApi, CategoriesApi, FeatureFlags, HttpClient,
    KeyringTokenStore, ProductsApi, RestoreOutcome, Session, SessionManager, UserInterface,
};

use crate::view::CatalogView;

/// Backend liveness check
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Whether the backend answered its root route with a 2xx
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for HttpClient {
    async fn is_healthy(&self) -> bool {
        self.check_health().await
    }
}

/// Dependencies shared by the product, category and dashboard commands
pub struct CatalogDependencies {
    /// User interface for output and interaction
    pub ui: Arc<dyn UserInterface>,
    /// Product endpoints
    pub products: Arc<dyn ProductsApi>,
    /// Category endpoints
    pub categories: Arc<dyn CategoriesApi>,
    /// Session used to authorize writes
    pub session: Arc<SessionManager>,
    /// Enabled surfaces
    pub features: FeatureFlags,
}

impl CatalogDependencies {
    /// Fresh, empty view over these clients
    pub fn view(&self) -> CatalogView {
        CatalogView::new(self.products.clone(), self.categories.clone())
    }

    /// Refuse when category surfaces are switched off
    pub fn require_categories(&self) -> Result<()> {
        if !self.features.categories {
            bail!("Categories are disabled (SOLAR_FEATURE_CATEGORIES=false)");
        }
        Ok(())
    }

    /// Restore the saved session and insist that it is a verified admin
    pub async fn require_admin(&self) -> Result<Session> {
        require_admin(&self.session, &self.features).await
    }
}

/// Restore the saved session and insist that it is a verified admin
pub async fn require_admin(session: &SessionManager, features: &FeatureFlags) -> Result<Session> {
    if !features.admin_panel {
        bail!("The admin panel is disabled (SOLAR_FEATURE_ADMIN_PANEL=false)");
    }

    match session.restore().await {
        RestoreOutcome::Verified { .. } => Ok(session.current()),
        RestoreOutcome::NoToken => bail!("Not logged in. Run `solar login` first."),
        RestoreOutcome::Rejected => {
            bail!("Your session has expired. Run `solar login` to sign in again.")
        }
        RestoreOutcome::Unverified { error } => bail!(
            "Not logged in: the saved session could not be verified ({error}). \
             Check the backend with `solar health` or run `solar login`."
        ),
    }
}

/// Everything a command needs, built from the environment
pub struct AppContext {
    /// Resolved configuration
    pub config: ApiConfig,
    /// Shared HTTP client
    pub http: HttpClient,
    /// Resource clients
    pub api: CatalogApi,
    /// Session manager backed by the platform keyring
    pub session: Arc<SessionManager>,
    /// Terminal user interface
    pub ui: Arc<dyn UserInterface>,
}

impl AppContext {
    /// Resolve configuration from `~/.solar/config.toml` and the environment
    pub fn from_environment() -> Self {
        let config = solar_common::load_api_config();
        config.log_config();
        Self::with_config(config)
    }

    /// Build clients for an explicit configuration
    pub fn with_config(config: ApiConfig) -> Self {
        let http = HttpClient::new(config.clone());
        let api = CatalogApi::new(http.clone());
        let session = SessionManager::new(
            Arc::new(api.admin.clone()),
            Arc::new(KeyringTokenStore::default()),
        )
        .with_token_override(std::env::var(AUTH_TOKEN_ENV_VAR).ok());

        Self {
            config,
            http,
            api,
            session: Arc::new(session),
            ui: Arc::new(RealUserInterface),
        }
    }

    /// Dependencies for catalog commands
    pub fn catalog_deps(&self) -> Arc<CatalogDependencies> {
        Arc::new(CatalogDependencies {
            ui: self.ui.clone(),
            products: Arc::new(self.api.products.clone()),
            categories: Arc::new(self.api.categories.clone()),
            session: self.session.clone(),
            features: self.config.features,
        })
    }
}
