//! Read-side catalog views: filtering, sorting and dashboard statistics
//!
//! Everything here works on borrowed slices of what the backend returned and
//! never mutates a [`Product`] or [`Category`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use solar_runtime::{Category, Product};

/// Category filter value that disables category filtering
pub const ALL_CATEGORIES: &str = "All";

/// Sort order for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical by name
    #[default]
    Name,
    /// Alphabetical by category name (raw id when not expanded)
    Category,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
}

/// Case-insensitive substring match on the product name
pub fn filter_by_name<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Catalog search over name, description and category name
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p
                    .category_name()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Whether a product belongs to the selected category
///
/// The selection is compared against the category name, or the raw id when
/// the backend did not expand the reference. [`ALL_CATEGORIES`] matches
/// everything.
pub fn matches_category(product: &Product, selected: &str) -> bool {
    selected == ALL_CATEGORIES || product.category_label() == Some(selected)
}

/// Sort a listing in place
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Name => products.sort_by(|a, b| compare_text(&a.name, &b.name)),
        SortKey::Category => products.sort_by(|a, b| {
            compare_text(
                a.category_label().unwrap_or_default(),
                b.category_label().unwrap_or_default(),
            )
        }),
        SortKey::PriceLow => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Product count for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    /// Category id
    pub id: String,
    /// Category name
    pub name: String,
    /// Products referencing this category
    pub product_count: usize,
}

/// Admin dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Number of products
    pub total_products: usize,
    /// Number of categories
    pub total_categories: usize,
    /// Per-category breakdown, in category order
    pub categories: Vec<CategoryStat>,
}

impl DashboardStats {
    /// Compute the summary from freshly loaded data
    pub fn compute(products: &[Product], categories: &[Category]) -> Self {
        Self {
            total_products: products.len(),
            total_categories: categories.len(),
            categories: categories
                .iter()
                .map(|category| CategoryStat {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    product_count: products_in_category(products, &category.id),
                })
                .collect(),
        }
    }

    /// Share of all products in a category, in percent
    pub fn share(&self, stat: &CategoryStat) -> f64 {
        if self.total_products == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let share = stat.product_count as f64 / self.total_products as f64;
            share * 100.0
        }
    }
}

/// Number of products referencing a category, expanded or by raw id
pub fn products_in_category(products: &[Product], category_id: &str) -> usize {
    products
        .iter()
        .filter(|p| p.category_id() == Some(category_id))
        .count()
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM UTC`, `N/A` when absent
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "N/A".to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// `1 product`, `3 products`
pub fn pluralize_products(count: usize) -> String {
    if count == 1 {
        "1 product".to_string()
    } else {
        format!("{count} products")
    }
}
