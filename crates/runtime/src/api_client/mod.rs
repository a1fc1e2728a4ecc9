//! Typed resource clients for the catalog backend
//!
//! Each client is a thin wrapper over [`HttpClient`](crate::http::HttpClient)
//! with fixed path templates. Reads are anonymous; writes send the bearer
//! token of the session passed in by the caller. Clients never validate
//! payload ranges and never reinterpret backend errors.

pub mod admin;
pub mod categories;
pub mod products;
pub mod types;

pub use admin::{AdminApi, AdminClient};
pub use categories::{CategoriesApi, CategoriesClient};
pub use products::{ProductsApi, ProductsClient};

use crate::http::HttpClient;

/// Fixed backend paths
pub mod paths {
    use super::encode_segment;

    /// Product collection
    pub const PRODUCTS: &str = "/api/products";
    /// Timestamp of the last catalog change
    pub const PRODUCTS_LAST_UPDATE: &str = "/api/products/last-update";
    /// Category collection
    pub const CATEGORIES: &str = "/api/categories";
    /// Admin login
    pub const ADMIN_LOGIN: &str = "/api/admin/login";
    /// Admin registration
    pub const ADMIN_REGISTER: &str = "/api/admin/register";
    /// Profile of the authenticated admin
    pub const ADMIN_PROFILE: &str = "/api/admin/profile";

    /// Single product
    pub fn product(id: &str) -> String {
        encode_segment(PRODUCTS, id)
    }

    /// Single category
    pub fn category(id: &str) -> String {
        encode_segment(CATEGORIES, id)
    }
}

/// Append `segment` to `collection` as one percent-encoded path segment
fn encode_segment(collection: &str, segment: &str) -> String {
    let Ok(mut url) = reqwest::Url::parse(&format!("http://catalog{collection}")) else {
        return format!("{collection}/{segment}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(segment);
    }
    url.path().to_string()
}

/// All resource clients sharing one HTTP client
#[derive(Clone)]
pub struct CatalogApi {
    /// Product endpoints
    pub products: ProductsClient,
    /// Category endpoints
    pub categories: CategoriesClient,
    /// Admin endpoints
    pub admin: AdminClient,
}

impl CatalogApi {
    /// Build every resource client on top of `http`
    pub fn new(http: HttpClient) -> Self {
        Self {
            products: ProductsClient::new(http.clone()),
            categories: CategoriesClient::new(http.clone()),
            admin: AdminClient::new(http),
        }
    }
}

#[cfg(test)]
#[path = "api_client_tests.rs"]
mod tests;

