//! Test helper utilities and mock implementations for solar-commands
//!
//! Mocks for the resource-client traits plus small builders for backend
//! documents, shared by the command and view tests.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use solar_runtime::api_client::types::{
    AdminUser, AuthResponse, CategoryRef, Credentials, LastUpdate, MessageResponse,
};
use solar_runtime::{
    AdminApi, CategoriesApi, Category, CategoryPayload, HttpError, MemoryTokenStore, Product,
    ProductPayload, ProductsApi, Session, SessionManager,
};

/// Test implementation of the `UserInterface` trait that captures all output.
pub use solar_common::ui::TestUserInterface;

// Mock implementation of the `ProductsApi` trait.
//
// # Example
//
// ```rust
// let mut products = MockProductsApiMock::new();
// products
//     .expect_get_all()
//     .returning(|| Ok(vec![product("p1", "Panel", Some("c1"))]));
// ```
mock! {
    pub ProductsApiMock {}

    #[async_trait]
    impl ProductsApi for ProductsApiMock {
        async fn get_all(&self) -> Result<Vec<Product>, HttpError>;
        async fn get_by_id(&self, id: &str) -> Result<Product, HttpError>;
        async fn create(&self, session: &Session, payload: &ProductPayload)
            -> Result<Product, HttpError>;
        async fn update(
            &self,
            session: &Session,
            id: &str,
            payload: &ProductPayload,
        ) -> Result<Product, HttpError>;
        async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError>;
        async fn last_update(&self) -> Result<LastUpdate, HttpError>;
    }
}

// Mock implementation of the `CategoriesApi` trait.
mock! {
    pub CategoriesApiMock {}

    #[async_trait]
    impl CategoriesApi for CategoriesApiMock {
        async fn get_all(&self) -> Result<Vec<Category>, HttpError>;
        async fn create(&self, session: &Session, payload: &CategoryPayload)
            -> Result<Category, HttpError>;
        async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError>;
    }
}

// Mock implementation of the `AdminApi` trait.
mock! {
    pub AdminApiMock {}

    #[async_trait]
    impl AdminApi for AdminApiMock {
        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;
        async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;
        async fn profile(&self, session: &Session) -> Result<AdminUser, HttpError>;
    }
}

/// Category document
pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Product document referencing a category by raw id
pub fn product(id: &str, name: &str, category_id: Option<&str>) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        price: 100.0,
        quantity: 1,
        image: None,
        category: category_id.map(|c| CategoryRef::Id(c.to_string())),
    }
}

/// Product document with an expanded category
pub fn product_in(id: &str, name: &str, category: &Category) -> Product {
    Product {
        category: Some(CategoryRef::Expanded(category.clone())),
        ..product(id, name, None)
    }
}

/// Error carrying a backend message
pub fn server_error(status: u16, message: &str) -> HttpError {
    HttpError::from_status(status, Some(serde_json::json!({ "message": message })))
}

/// Session manager whose token store already holds a token the admin mock accepts
pub fn signed_in_manager(username: &'static str) -> Arc<SessionManager> {
    let mut admin = MockAdminApiMock::new();
    admin.expect_profile().returning(move |_| {
        Ok(AdminUser {
            username: username.to_string(),
        })
    });
    Arc::new(SessionManager::new(
        Arc::new(admin),
        Arc::new(MemoryTokenStore::with_token("tok")),
    ))
}

/// Session manager with nothing persisted
pub fn signed_out_manager() -> Arc<SessionManager> {
    let mut admin = MockAdminApiMock::new();
    admin.expect_profile().never();
    Arc::new(SessionManager::new(
        Arc::new(admin),
        Arc::new(MemoryTokenStore::default()),
    ))
}
