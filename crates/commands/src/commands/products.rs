//! Product catalog commands

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};

use solar_runtime::{MessageStyle, Product, UserInterface};

use crate::catalog::{self, ALL_CATEGORIES, SortKey};
use crate::context::{AppContext, CatalogDependencies};
use crate::form::ProductForm;
use crate::view::{CatalogView, Notice};

/// Listing options
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    /// Free-text search over name, description and category name
    pub search: Option<String>,
    /// Category name to filter by, `All` for none
    pub category: Option<String>,
    /// Sort order
    pub sort: SortKey,
    /// Print JSON instead of a table
    pub json: bool,
}

/// Product fields given on the command line; `None` means not given
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    /// Product name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Unit price
    pub price: Option<String>,
    /// Category id or name
    pub category: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Stock quantity
    pub quantity: Option<String>,
}

impl ProductFields {
    fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.description,
            &self.price,
            &self.category,
            &self.image,
            &self.quantity,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    fn apply_to(self, form: &mut ProductForm) {
        let targets = [
            (self.name, &mut form.name),
            (self.description, &mut form.description),
            (self.price, &mut form.price),
            (self.category, &mut form.category),
            (self.image, &mut form.image),
            (self.quantity, &mut form.quantity),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Products subcommands
#[derive(Debug, Clone)]
pub enum ProductsCommand {
    /// List the catalog
    List(ListArgs),
    /// Show one product
    Show {
        /// Product id
        id: String,
        /// Print JSON
        json: bool,
    },
    /// Create a product
    Create(ProductFields),
    /// Update a product
    Update {
        /// Product id
        id: String,
        /// Fields to change
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
        /// Skip the confirmation prompt
        yes: bool,
    },
    /// Show when the catalog last changed
    LastUpdate,
}

/// Execute a products subcommand with injected dependencies
pub async fn execute_with_deps(
    command: ProductsCommand,
    deps: &Arc<CatalogDependencies>,
) -> Result<()> {
    match command {
        ProductsCommand::List(args) => list_with_deps(args, deps).await,
        ProductsCommand::Show { id, json } => show_with_deps(&id, json, deps).await,
        ProductsCommand::Create(fields) => create_with_deps(fields, deps).await,
        ProductsCommand::Update { id, fields } => update_with_deps(&id, fields, deps).await,
        ProductsCommand::Delete { id, yes } => delete_with_deps(&id, yes, deps).await,
        ProductsCommand::LastUpdate => last_update_with_deps(deps).await,
    }
}

/// List products with optional search, category filter and sort
pub async fn list_with_deps(args: ListArgs, deps: &Arc<CatalogDependencies>) -> Result<()> {
    if args.search.is_some() && !deps.features.search {
        bail!("Search is disabled (SOLAR_FEATURE_SEARCH=false)");
    }
    let category = args.category.as_deref().unwrap_or(ALL_CATEGORIES);
    if category != ALL_CATEGORIES {
        deps.require_categories()?;
    }

    let mut view = deps.view();
    view.refresh_products()
        .await
        .context("Failed to load products")?;

    let mut listing = match &args.search {
        Some(term) => catalog::search(view.products(), term),
        None => view.products().iter().collect(),
    };
    listing.retain(|p| catalog::matches_category(p, category));
    catalog::sort_products(&mut listing, args.sort);

    if args.json {
        deps.ui.print(&serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    print_table(&listing, deps.ui.as_ref());

    let updated_at = match deps.products.last_update().await {
        Ok(last) => last.updated_at,
        Err(e) => {
            tracing::debug!(error = %e, "Could not load last update time");
            None
        }
    };
    deps.ui.print("");
    deps.ui.print_styled(
        &format!("Last updated: {}", catalog::format_timestamp(updated_at)),
        MessageStyle::Dim,
    );
    Ok(())
}

pub(crate) fn print_table(products: &[&Product], ui: &dyn UserInterface) {
    if products.is_empty() {
        ui.print_styled("No products found.", MessageStyle::Warning);
        return;
    }

    ui.print_styled(
        &format!(
            "{:<28} {:<16} {:>10} {:>6}  {}",
            "NAME", "CATEGORY", "PRICE", "QTY", "ID"
        ),
        MessageStyle::Bold,
    );
    for product in products {
        ui.print(&format!(
            "{:<28} {:<16} {:>10.2} {:>6}  {}",
            truncate(&product.name, 28),
            truncate(product.category_label().unwrap_or("-"), 16),
            product.price,
            product.quantity,
            product.id
        ));
    }
    ui.print("");
    ui.print(&catalog::pluralize_products(products.len()));
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Show a single product
pub async fn show_with_deps(id: &str, json: bool, deps: &Arc<CatalogDependencies>) -> Result<()> {
    let product = deps
        .products
        .get_by_id(id)
        .await
        .map_err(|e| anyhow!(e.user_message(&format!("Product '{id}' not found"))))?;

    if json {
        deps.ui.print(&serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    deps.ui.print_styled(&product.name, MessageStyle::Bold);
    deps.ui.print(&format!("  ID:          {}", product.id));
    deps.ui.print(&format!(
        "  Category:    {}",
        product.category_label().unwrap_or("-")
    ));
    deps.ui.print(&format!("  Price:       {:.2}", product.price));
    deps.ui.print(&format!("  Quantity:    {}", product.quantity));
    deps.ui
        .print(&format!("  Image:       {}", product.image_url().unwrap_or("-")));
    deps.ui.print(&format!("  Description: {}", product.description));
    Ok(())
}

/// Create a product from flags, prompting for anything missing
pub async fn create_with_deps(fields: ProductFields, deps: &Arc<CatalogDependencies>) -> Result<()> {
    let session = deps.require_admin().await?;
    let mut view = load_view(deps).await?;

    let mut form = ProductForm::default();
    fields.apply_to(&mut form);
    if deps.ui.is_interactive() {
        fill_missing(&mut form, &view, deps.ui.as_ref())?;
    }
    resolve_category(&mut form, &view);
    let payload = form.to_payload()?;

    deps.ui
        .print_styled(&format!("→ Creating {}", payload.name), MessageStyle::Cyan);
    view.create_product(&session, &payload).await;
    report(&view, deps.ui.as_ref())
}

/// Update a product; fields not given keep their current value
pub async fn update_with_deps(
    id: &str,
    fields: ProductFields,
    deps: &Arc<CatalogDependencies>,
) -> Result<()> {
    let session = deps.require_admin().await?;
    let mut view = load_view(deps).await?;

    let current = view
        .product(id)
        .ok_or_else(|| anyhow!("Product '{id}' not found"))?;
    let mut form = ProductForm::from_product(current);
    if fields.is_empty() && deps.ui.is_interactive() {
        edit_all(&mut form, &view, deps.ui.as_ref())?;
    } else {
        fields.apply_to(&mut form);
    }
    resolve_category(&mut form, &view);
    let payload = form.to_payload()?;

    deps.ui
        .print_styled(&format!("→ Updating {id}"), MessageStyle::Cyan);
    view.update_product(&session, id, &payload).await;
    report(&view, deps.ui.as_ref())
}

/// Delete a product after confirmation
pub async fn delete_with_deps(id: &str, yes: bool, deps: &Arc<CatalogDependencies>) -> Result<()> {
    let session = deps.require_admin().await?;
    let mut view = deps.view();
    view.refresh_products()
        .await
        .context("Failed to load products")?;

    let name = view
        .product(id)
        .map(|p| p.name.clone())
        .ok_or_else(|| anyhow!("Product '{id}' not found"))?;

    deps.ui.print(&format!("Product to be deleted: {name} ({id})"));
    if !yes {
        if !deps.ui.is_interactive() {
            bail!("Refusing to delete without confirmation; pass --yes");
        }
        if !deps
            .ui
            .prompt_confirm("Are you sure you want to delete this product?", false)?
        {
            deps.ui.print_styled("Deletion cancelled.", MessageStyle::Warning);
            return Ok(());
        }
    }

    view.delete_product(&session, id).await;
    report(&view, deps.ui.as_ref())
}

/// Print the catalog's last change time
pub async fn last_update_with_deps(deps: &Arc<CatalogDependencies>) -> Result<()> {
    let last = deps
        .products
        .last_update()
        .await
        .map_err(|e| anyhow!(e.user_message("Failed to load last update time")))?;
    deps.ui.print(&format!(
        "Last updated: {}",
        catalog::format_timestamp(last.updated_at)
    ));
    Ok(())
}

async fn load_view(deps: &CatalogDependencies) -> Result<CatalogView> {
    let mut view = deps.view();
    let loaded = if deps.features.categories {
        view.refresh().await
    } else {
        view.refresh_products().await
    };
    loaded.context("Failed to load the catalog")?;
    Ok(view)
}

/// Turn a category name into its id when it matches a loaded category
fn resolve_category(form: &mut ProductForm, view: &CatalogView) {
    if let Some(category) = view.category(&form.category) {
        form.category.clone_from(&category.id);
    }
}

fn print_categories(view: &CatalogView, ui: &dyn UserInterface) {
    if view.categories().is_empty() {
        return;
    }
    let names: Vec<&str> = view.categories().iter().map(|c| c.name.as_str()).collect();
    ui.print_styled(
        &format!("Categories: {}", names.join(", ")),
        MessageStyle::Dim,
    );
}

fn fill_missing(form: &mut ProductForm, view: &CatalogView, ui: &dyn UserInterface) -> Result<()> {
    let prompts = [
        ("Product name", &mut form.name),
        ("Description", &mut form.description),
        ("Price", &mut form.price),
        ("Quantity", &mut form.quantity),
    ];
    for (prompt, value) in prompts {
        if value.is_empty() {
            *value = ui.prompt_input(prompt, None)?;
        }
    }
    if form.category.is_empty() {
        print_categories(view, ui);
        form.category = ui.prompt_input("Category", None)?;
    }
    if form.image.is_empty() {
        form.image = ui.prompt_input("Image URL", Some(""))?;
    }
    Ok(())
}

fn edit_all(form: &mut ProductForm, view: &CatalogView, ui: &dyn UserInterface) -> Result<()> {
    if let Some(category) = view.categories().iter().find(|c| c.id == form.category) {
        form.category.clone_from(&category.name);
    }
    print_categories(view, ui);
    let prompts = [
        ("Product name", &mut form.name),
        ("Description", &mut form.description),
        ("Price", &mut form.price),
        ("Quantity", &mut form.quantity),
        ("Category", &mut form.category),
        ("Image URL", &mut form.image),
    ];
    for (prompt, value) in prompts {
        *value = ui.prompt_input(prompt, Some(value.as_str()))?;
    }
    Ok(())
}

/// Print a success notice, or turn an error notice into the command's error
pub(crate) fn report(view: &CatalogView, ui: &dyn UserInterface) -> Result<()> {
    match view.notice() {
        Some(Notice::Success(message)) => {
            ui.print_styled(&format!("✅ {message}"), MessageStyle::Success);
            Ok(())
        }
        Some(Notice::Error(message)) => Err(anyhow!("{message}")),
        None => Ok(()),
    }
}

/// Execute a products subcommand with default dependencies
pub async fn execute(command: ProductsCommand) -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(command, &ctx.catalog_deps()).await
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
