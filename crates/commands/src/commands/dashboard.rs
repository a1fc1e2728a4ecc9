//! Admin dashboard: catalog totals, per-category breakdown and a filtered listing

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use solar_runtime::{MessageStyle, Product};

use crate::catalog::{self, ALL_CATEGORIES, DashboardStats, SortKey};
use crate::commands::products::print_table;
use crate::context::{AppContext, CatalogDependencies};

/// Dashboard options
#[derive(Debug, Clone, Default)]
pub struct DashboardArgs {
    /// Case-insensitive product name filter
    pub filter: Option<String>,
    /// Category name to restrict the listing to
    pub category: Option<String>,
    /// Listing order
    pub sort: SortKey,
    /// Print JSON
    pub json: bool,
}

#[derive(Serialize)]
struct DashboardReport<'a> {
    stats: &'a DashboardStats,
    products: &'a [&'a Product],
}

/// Render the dashboard with injected dependencies
pub async fn execute_with_deps(args: DashboardArgs, deps: &Arc<CatalogDependencies>) -> Result<()> {
    deps.require_admin().await?;
    let category = args.category.as_deref().unwrap_or(ALL_CATEGORIES);
    if category != ALL_CATEGORIES {
        deps.require_categories()?;
    }

    let spinner = deps.ui.create_spinner();
    spinner.set_message("Loading dashboard...");
    let mut view = deps.view();
    let loaded = if deps.features.categories {
        view.refresh().await
    } else {
        view.refresh_products().await
    };
    spinner.finish_and_clear();
    loaded.context("Failed to load the dashboard")?;

    let stats = DashboardStats::compute(view.products(), view.categories());
    let mut listing = match &args.filter {
        Some(term) => catalog::filter_by_name(view.products(), term),
        None => view.products().iter().collect(),
    };
    listing.retain(|p| catalog::matches_category(p, category));
    catalog::sort_products(&mut listing, args.sort);

    if args.json {
        let report = DashboardReport {
            stats: &stats,
            products: &listing,
        };
        deps.ui.print(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    deps.ui.print_styled("Catalog overview", MessageStyle::Bold);
    deps.ui
        .print(&format!("  Total products:   {}", stats.total_products));
    if deps.features.categories {
        deps.ui
            .print(&format!("  Total categories: {}", stats.total_categories));
        deps.ui.print("");
        deps.ui
            .print_styled("Products by category", MessageStyle::Bold);
        for stat in &stats.categories {
            deps.ui.print(&format!(
                "  {:<24} {:>12}  {:>5.1}%",
                stat.name,
                catalog::pluralize_products(stat.product_count),
                stats.share(stat)
            ));
        }
    }
    deps.ui.print("");
    print_table(&listing, deps.ui.as_ref());
    Ok(())
}

/// Render the dashboard with default dependencies
pub async fn execute(args: DashboardArgs) -> Result<()> {
    let ctx = AppContext::from_environment();
    execute_with_deps(args, &ctx.catalog_deps()).await
}
