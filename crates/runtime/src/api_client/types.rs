//! Wire types of the catalog backend

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Display name
    pub name: String,
}

/// Category of a product: expanded by the backend or a raw id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Populated category document
    Expanded(Category),
    /// Bare category id
    Id(String),
}

impl CategoryRef {
    /// Category id in either form
    pub fn id(&self) -> &str {
        match self {
            Self::Expanded(category) => &category.id,
            Self::Id(id) => id,
        }
    }

    /// Category name, only known when expanded
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Expanded(category) => Some(&category.name),
            Self::Id(_) => None,
        }
    }

    /// Name when expanded, otherwise the raw id
    pub fn label(&self) -> &str {
        self.name().unwrap_or_else(|| self.id())
    }
}

/// Catalog product as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Unit price
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    /// Units in stock
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u64,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Category reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

/// Number from a JSON number or numeric string
fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Price that never fails the enclosing listing; unusable values read as 0
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(loose_number(&value).unwrap_or_else(|| {
        tracing::warn!(%value, "Unusable product price, reading as 0");
        0.0
    }))
}

/// Quantity that never fails the enclosing listing; fractions are truncated
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    Ok(match loose_number(&value) {
        Some(n) if n >= 0.0 => n.trunc() as u64,
        _ => {
            tracing::warn!(%value, "Unusable product quantity, reading as 0");
            0
        }
    })
}

impl Product {
    /// Id of the referenced category
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(CategoryRef::id)
    }

    /// Name of the referenced category, when expanded
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(CategoryRef::name)
    }

    /// Category name, falling back to the raw id
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_ref().map(CategoryRef::label)
    }

    /// Image URL, treating an empty string as absent
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|url| !url.is_empty())
    }
}

/// Body of product create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Category id
    pub category: String,
    /// Image URL, empty when none
    pub image: String,
    /// Units in stock
    pub quantity: i64,
}

/// Body of category create requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    /// Display name
    pub name: String,
}

/// Timestamp of the most recent catalog change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdate {
    /// Time of the last product change, absent for an empty catalog
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
}

/// Admin account identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Login name
    pub username: String,
}

/// Username and password for login and registration
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Plain-text password, only ever sent to the backend
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the backend accepted the request
    #[serde(default)]
    pub success: bool,
    /// Issued bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Authenticated account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminUser>,
    /// Human readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Profile endpoint body, either wrapped in `admin` or bare
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    /// `{ "admin": { "username": .. } }`
    Wrapped {
        /// Account
        admin: AdminUser,
    },
    /// `{ "username": .. }`
    Bare(AdminUser),
}

impl ProfileResponse {
    /// The account described by the response
    pub fn into_user(self) -> AdminUser {
        match self {
            Self::Wrapped { admin } | Self::Bare(admin) => admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_product_accepts_expanded_and_raw_categories() {
        let expanded: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Panel X",
            "description": "400W mono",
            "price": 120.5,
            "quantity": 5,
            "image": "https://cdn.example.com/p1.png",
            "category": { "_id": "c1", "name": "Panels" }
        }))
        .unwrap();
        assert_eq!(expanded.category_id(), Some("c1"));
        assert_eq!(expanded.category_label(), Some("Panels"));

        let raw: Product = serde_json::from_value(json!({
            "id": "p2",
            "name": "Inverter",
            "price": 300,
            "category": "c2"
        }))
        .unwrap();
        assert_eq!(raw.id, "p2");
        assert_eq!(raw.category_name(), None);
        assert_eq!(raw.category_label(), Some("c2"));
        assert_eq!(raw.quantity, 0);
        assert_eq!(raw.image_url(), None);
    }

    #[test]
    fn test_out_of_shape_numbers_do_not_fail_the_listing() {
        let listing: Vec<Product> = serde_json::from_value(json!([
            { "_id": "p1", "name": "Panel", "price": 120.5, "quantity": 2.5 },
            { "_id": "p2", "name": "Cable", "price": "19.90", "quantity": "4" },
            { "_id": "p3", "name": "Kit", "price": null, "quantity": -3 },
            { "_id": "p4", "name": "Fuse", "price": "n/a", "quantity": { "n": 1 } }
        ]))
        .unwrap();

        assert_eq!(listing.len(), 4);
        assert_eq!(listing[0].quantity, 2);
        assert!((listing[1].price - 19.9).abs() < 1e-9);
        assert_eq!(listing[1].quantity, 4);
        assert_eq!(listing[2].quantity, 0);
        assert!(listing[2].price.abs() < f64::EPSILON);
        assert!(listing[3].price.abs() < f64::EPSILON);
        assert_eq!(listing[3].quantity, 0);
    }

    #[test]
    fn test_payload_serializes_exactly_the_documented_fields() {
        let payload = ProductPayload {
            name: "Panel X".into(),
            description: "d".into(),
            price: 120.5,
            category: "c1".into(),
            image: String::new(),
            quantity: 5,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Panel X",
                "description": "d",
                "price": 120.5,
                "category": "c1",
                "image": "",
                "quantity": 5
            })
        );
    }

    #[test]
    fn test_profile_response_shapes() {
        let wrapped: ProfileResponse =
            serde_json::from_value(json!({ "admin": { "username": "root" } })).unwrap();
        assert_eq!(wrapped.into_user().username, "root");

        let bare: ProfileResponse = serde_json::from_value(json!({ "username": "ops" })).unwrap();
        assert_eq!(bare.into_user().username, "ops");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_last_update_parses_timestamp() {
        let update: LastUpdate =
            serde_json::from_value(json!({ "updatedAt": "2024-05-01T10:00:00Z" })).unwrap();
        assert!(update.updated_at.is_some());

        let empty: LastUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.updated_at, None);
    }
}
