//! Catalog view state and its mutation flows
//!
//! [`CatalogView`] holds the products and categories last loaded from the
//! backend plus the outcome of the most recent mutation. Every successful
//! mutation is followed by a full refetch, and a failed one leaves the loaded
//! data exactly as it was.

use std::sync::Arc;

use solar_runtime::{
    CategoriesApi, Category, CategoryPayload, HttpError, Product, ProductPayload, ProductsApi,
    Session,
};

use crate::catalog::{pluralize_products, products_in_category};

/// User-facing result of the last mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The mutation was applied
    Success(String),
    /// The mutation failed; nothing changed
    Error(String),
}

impl Notice {
    /// Message text
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Whether this notice reports a failure
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Loaded catalog data plus mutation flows
pub struct CatalogView {
    products_api: Arc<dyn ProductsApi>,
    categories_api: Arc<dyn CategoriesApi>,
    products: Vec<Product>,
    categories: Vec<Category>,
    notice: Option<Notice>,
}

impl CatalogView {
    /// Empty view over the given resource clients
    pub fn new(products_api: Arc<dyn ProductsApi>, categories_api: Arc<dyn CategoriesApi>) -> Self {
        Self {
            products_api,
            categories_api,
            products: Vec::new(),
            categories: Vec::new(),
            notice: None,
        }
    }

    /// Products as last loaded
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Categories as last loaded
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Outcome of the last mutation
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Find a loaded product by id
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a loaded category by id or exact name
    pub fn category(&self, id_or_name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id_or_name)
            .or_else(|| self.categories.iter().find(|c| c.name == id_or_name))
    }

    /// Reload products
    pub async fn refresh_products(&mut self) -> Result<(), HttpError> {
        self.products = self.products_api.get_all().await?;
        Ok(())
    }

    /// Reload categories
    pub async fn refresh_categories(&mut self) -> Result<(), HttpError> {
        self.categories = self.categories_api.get_all().await?;
        Ok(())
    }

    /// Reload products and categories concurrently
    pub async fn refresh(&mut self) -> Result<(), HttpError> {
        let (products, categories) = tokio::try_join!(
            self.products_api.get_all(),
            self.categories_api.get_all()
        )?;
        self.products = products;
        self.categories = categories;
        Ok(())
    }

    /// Create a product, then reload the listing
    pub async fn create_product(&mut self, session: &Session, payload: &ProductPayload) -> bool {
        match self.products_api.create(session, payload).await {
            Ok(product) => {
                tracing::info!(id = %product.id, "Product created");
                self.succeed("Product created successfully!").await;
                true
            }
            Err(err) => self.fail(&err, "Error creating product"),
        }
    }

    /// Replace a product's fields, then reload the listing
    pub async fn update_product(
        &mut self,
        session: &Session,
        id: &str,
        payload: &ProductPayload,
    ) -> bool {
        match self.products_api.update(session, id, payload).await {
            Ok(_) => {
                tracing::info!(%id, "Product updated");
                self.succeed("Product updated successfully!").await;
                true
            }
            Err(err) => self.fail(&err, "Error updating product"),
        }
    }

    /// Delete a product, then reload the listing
    pub async fn delete_product(&mut self, session: &Session, id: &str) -> bool {
        match self.products_api.delete(session, id).await {
            Ok(_) => {
                tracing::info!(%id, "Product deleted");
                self.succeed("Product deleted successfully!").await;
                true
            }
            Err(err) => self.fail(&err, "Error deleting product"),
        }
    }

    /// Create a category, then reload categories
    pub async fn create_category(&mut self, session: &Session, name: &str) -> bool {
        let payload = CategoryPayload {
            name: name.to_string(),
        };
        match self.categories_api.create(session, &payload).await {
            Ok(category) => {
                tracing::info!(id = %category.id, "Category created");
                self.notice = Some(Notice::Success("Category created successfully!".into()));
                self.refetch_categories().await;
                true
            }
            Err(err) => self.fail(&err, "Error creating category"),
        }
    }

    /// Delete a category that no loaded product references
    ///
    /// Products must be loaded first; a category still in use is refused
    /// without contacting the backend.
    pub async fn delete_category(&mut self, session: &Session, id: &str) -> bool {
        let in_use = products_in_category(&self.products, id);
        if in_use > 0 {
            self.notice = Some(Notice::Error(format!(
                "Category is still used by {}; reassign or delete them first",
                pluralize_products(in_use)
            )));
            return false;
        }

        match self.categories_api.delete(session, id).await {
            Ok(_) => {
                tracing::info!(%id, "Category deleted");
                self.notice = Some(Notice::Success("Category deleted successfully!".into()));
                self.refetch_categories().await;
                true
            }
            Err(err) => self.fail(&err, "Error deleting category"),
        }
    }

    async fn succeed(&mut self, message: &str) {
        self.notice = Some(Notice::Success(message.to_string()));
        if let Err(e) = self.refresh_products().await {
            tracing::warn!(error = %e, "Could not reload products");
        }
    }

    async fn refetch_categories(&mut self) {
        if let Err(e) = self.refresh_categories().await {
            tracing::warn!(error = %e, "Could not reload categories");
        }
    }

    fn fail(&mut self, err: &HttpError, fallback: &str) -> bool {
        tracing::warn!(error = %err, "{fallback}");
        self.notice = Some(Notice::Error(err.user_message(fallback)));
        false
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
