//! Category management commands

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;

use solar_runtime::MessageStyle;

use crate::catalog;
use crate::commands::products::report;
use crate::context::{AppContext, CatalogDependencies};

/// Categories subcommands
#[derive(Debug, Clone)]
pub enum CategoriesCommand {
    /// List categories with their product counts
    List {
        /// Print JSON
        json: bool,
    },
    /// Create a category
    Create {
        /// Category name
        name: String,
    },
    /// Delete a category no product references
    Delete {
        /// Category id or name
        id_or_name: String,
        /// Skip the confirmation prompt
        yes: bool,
    },
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    name: &'a str,
    product_count: usize,
}

/// Execute a categories subcommand with injected dependencies
pub async fn execute_with_deps(
    command: CategoriesCommand,
    deps: &Arc<CatalogDependencies>,
) -> Result<()> {
    deps.require_categories()?;
    match command {
        CategoriesCommand::List { json } => list_with_deps(json, deps).await,
        CategoriesCommand::Create { name } => create_with_deps(&name, deps).await,
        CategoriesCommand::Delete { id_or_name, yes } => {
            delete_with_deps(&id_or_name, yes, deps).await
        }
    }
}

/// List categories alongside how many products use each
pub async fn list_with_deps(json: bool, deps: &Arc<CatalogDependencies>) -> Result<()> {
    let mut view = deps.view();
    view.refresh().await.context("Failed to load categories")?;

    let rows: Vec<CategoryRow<'_>> = view
        .categories()
        .iter()
        .map(|c| CategoryRow {
            id: &c.id,
            name: &c.name,
            product_count: catalog::products_in_category(view.products(), &c.id),
        })
        .collect();

    if json {
        deps.ui.print(&serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        deps.ui
            .print_styled("No categories found.", MessageStyle::Warning);
        return Ok(());
    }

    deps.ui.print_styled(
        &format!("{:<24} {:>10}  {}", "NAME", "PRODUCTS", "ID"),
        MessageStyle::Bold,
    );
    for row in &rows {
        deps.ui.print(&format!(
            "{:<24} {:>10}  {}",
            row.name, row.product_count, row.id
        ));
    }
    Ok(())
}

/// Create a category
pub async fn create_with_deps(name: &str, deps: &Arc<CatalogDependencies>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("A category name is required");
    }
    let session = deps.require_admin().await?;

    let mut view = deps.view();
    deps.ui
        .print_styled(&format!("→ Creating category {name}"), MessageStyle::Cyan);
    view.create_category(&session, name).await;
    report(&view, deps.ui.as_ref())
}

/// Delete a category after confirmation; refused while products use it
pub async fn delete_with_deps(
    id_or_name: &str,
    yes: bool,
    deps: &Arc<CatalogDependencies>,
) -> Result<()> {
    let session = deps.require_admin().await?;
    let mut view = deps.view();
    view.refresh().await.context("Failed to load the catalog")?;

    let (id, name) = view
        .category(id_or_name)
        .map(|c| (c.id.clone(), c.name.clone()))
        .ok_or_else(|| anyhow!("Category '{id_or_name}' not found"))?;

    deps.ui
        .print(&format!("Category to be deleted: {name} ({id})"));
    if !yes {
        if !deps.ui.is_interactive() {
            bail!("Refusing to delete without confirmation; pass --yes");
        }
        if !deps
            .ui
            .prompt_confirm("Are you sure you want to delete this category?", false)?
        {
            deps.ui
                .print_styled("Deletion cancelled.", MessageStyle::Warning);
            return Ok(());
        }
    }

    view.delete_category(&session, &id).await;
    report(&view, deps.ui.as_ref())
}

/// Execute a categories subcommand with default dependencies
pub async fn execute(command: CategoriesCommand) -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(command, &ctx.catalog_deps()).await
}

#[cfg(test)]
mod tests {
    use solar_runtime::api_client::types::MessageResponse;
    use solar_runtime::{FeatureFlags, UserInterface};

    use super::*;
    use crate::test_helpers::{
        MockCategoriesApiMock, MockProductsApiMock, TestUserInterface, category, product,
        server_error, signed_in_manager, signed_out_manager,
    };

    fn deps_with(
        ui: &Arc<TestUserInterface>,
        products: MockProductsApiMock,
        categories: MockCategoriesApiMock,
        signed_in: bool,
    ) -> Arc<CatalogDependencies> {
        Arc::new(CatalogDependencies {
            ui: ui.clone() as Arc<dyn UserInterface>,
            products: Arc::new(products),
            categories: Arc::new(categories),
            session: if signed_in {
                signed_in_manager("admin")
            } else {
                signed_out_manager()
            },
            features: FeatureFlags::default(),
        })
    }

    fn loaded_catalog() -> (MockProductsApiMock, MockCategoriesApiMock) {
        let mut products = MockProductsApiMock::new();
        products.expect_get_all().returning(|| {
            Ok(vec![
                product("p1", "Mono Panel", Some("c1")),
                product("p2", "Bifacial Panel", Some("c1")),
            ])
        });
        let mut categories = MockCategoriesApiMock::new();
        categories
            .expect_get_all()
            .returning(|| Ok(vec![category("c1", "Panels"), category("c2", "Inverters")]));
        (products, categories)
    }

    #[tokio::test]
    async fn test_list_shows_product_counts() {
        let ui = Arc::new(TestUserInterface::new());
        let (products, categories) = loaded_catalog();
        let deps = deps_with(&ui, products, categories, false);

        list_with_deps(false, &deps).await.unwrap();

        let output = ui.get_output();
        let panels = output.iter().find(|l| l.starts_with("Panels")).unwrap();
        assert!(panels.contains(" 2 "));
        assert!(ui.printed("Inverters"));
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let ui = Arc::new(TestUserInterface::new());
        let products = MockProductsApiMock::new();
        let mut categories = MockCategoriesApiMock::new();
        categories
            .expect_create()
            .withf(|_, payload| payload.name == "Batteries")
            .times(1)
            .returning(|_, _| Ok(category("c3", "Batteries")));
        categories
            .expect_get_all()
            .returning(|| Ok(vec![category("c3", "Batteries")]));
        let deps = deps_with(&ui, products, categories, true);

        create_with_deps("  Batteries ", &deps).await.unwrap();

        assert!(ui.printed("Category created successfully!"));
    }

    #[tokio::test]
    async fn test_create_blank_name_is_rejected() {
        let ui = Arc::new(TestUserInterface::new());
        let mut categories = MockCategoriesApiMock::new();
        categories.expect_create().never();
        let deps = deps_with(&ui, MockProductsApiMock::new(), categories, true);

        let err = create_with_deps("   ", &deps).await.unwrap_err();

        assert_eq!(err.to_string(), "A category name is required");
    }

    #[tokio::test]
    async fn test_create_surfaces_server_message() {
        let ui = Arc::new(TestUserInterface::new());
        let mut categories = MockCategoriesApiMock::new();
        categories
            .expect_create()
            .returning(|_, _| Err(server_error(409, "Category already exists")));
        let deps = deps_with(&ui, MockProductsApiMock::new(), categories, true);

        let err = create_with_deps("Panels", &deps).await.unwrap_err();

        assert_eq!(err.to_string(), "Category already exists");
    }

    #[tokio::test]
    async fn test_delete_in_use_category_is_refused() {
        let ui = Arc::new(TestUserInterface::new());
        let (products, mut categories) = loaded_catalog();
        categories.expect_delete().never();
        let deps = deps_with(&ui, products, categories, true);

        let err = delete_with_deps("Panels", true, &deps).await.unwrap_err();

        assert!(err.to_string().contains("still used by 2 products"));
    }

    #[tokio::test]
    async fn test_delete_unused_category_by_name() {
        let ui = Arc::new(TestUserInterface::new());
        let (products, mut categories) = loaded_catalog();
        categories
            .expect_delete()
            .withf(|_, id| id == "c2")
            .times(1)
            .returning(|_, _| Ok(MessageResponse::default()));
        let deps = deps_with(&ui, products, categories, true);

        delete_with_deps("Inverters", true, &deps).await.unwrap();

        assert!(ui.printed("Category to be deleted: Inverters (c2)"));
        assert!(ui.printed("Category deleted successfully!"));
    }

    #[tokio::test]
    async fn test_delete_requires_login() {
        let ui = Arc::new(TestUserInterface::new());
        let deps = deps_with(
            &ui,
            MockProductsApiMock::new(),
            MockCategoriesApiMock::new(),
            false,
        );

        let err = delete_with_deps("c2", true, &deps).await.unwrap_err();

        assert!(err.to_string().contains("Not logged in"));
    }

    #[tokio::test]
    async fn test_disabled_categories_refuse_everything() {
        let ui = Arc::new(TestUserInterface::new());
        let mut categories = MockCategoriesApiMock::new();
        categories.expect_get_all().never();
        let deps = Arc::new(CatalogDependencies {
            ui: ui.clone() as Arc<dyn UserInterface>,
            products: Arc::new(MockProductsApiMock::new()),
            categories: Arc::new(categories),
            session: signed_out_manager(),
            features: FeatureFlags {
                categories: false,
                ..FeatureFlags::default()
            },
        });

        let err = execute_with_deps(CategoriesCommand::List { json: false }, &deps)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Categories are disabled"));
    }
}
