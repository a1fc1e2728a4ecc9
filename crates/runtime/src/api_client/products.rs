//! Product endpoints

use async_trait::async_trait;

use super::paths;
use super::types::{LastUpdate, MessageResponse, Product, ProductPayload};
use crate::error::HttpError;
use crate::http::{ApiRequest, HttpClient};
use crate::session::Session;

/// Product resource operations
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// List every product
    async fn get_all(&self) -> Result<Vec<Product>, HttpError>;

    /// Fetch one product
    async fn get_by_id(&self, id: &str) -> Result<Product, HttpError>;

    /// Create a product and return it as stored
    async fn create(&self, session: &Session, payload: &ProductPayload)
    -> Result<Product, HttpError>;

    /// Replace a product and return it as stored
    async fn update(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<Product, HttpError>;

    /// Delete a product
    async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError>;

    /// Timestamp of the most recent catalog change
    async fn last_update(&self) -> Result<LastUpdate, HttpError>;
}

/// HTTP implementation of [`ProductsApi`]
#[derive(Clone)]
pub struct ProductsClient {
    http: HttpClient,
}

impl ProductsClient {
    /// Create a client on top of `http`
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProductsApi for ProductsClient {
    async fn get_all(&self) -> Result<Vec<Product>, HttpError> {
        self.http
            .send(&ApiRequest::get(paths::PRODUCTS), &Session::anonymous())
            .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Product, HttpError> {
        self.http
            .send(&ApiRequest::get(paths::product(id)), &Session::anonymous())
            .await
    }

    async fn create(
        &self,
        session: &Session,
        payload: &ProductPayload,
    ) -> Result<Product, HttpError> {
        let request = ApiRequest::post(paths::PRODUCTS)
            .json(payload)?
            .authenticated()
            .with_idempotency_key();
        self.http.send(&request, session).await
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<Product, HttpError> {
        let request = ApiRequest::put(paths::product(id))
            .json(payload)?
            .authenticated();
        self.http.send(&request, session).await
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError> {
        let request = ApiRequest::delete(paths::product(id)).authenticated();
        let body = self.http.execute(&request, session).await?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    async fn last_update(&self) -> Result<LastUpdate, HttpError> {
        self.http
            .send(&ApiRequest::get(paths::PRODUCTS_LAST_UPDATE), &Session::anonymous())
            .await
    }
}
