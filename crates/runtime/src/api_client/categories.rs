//! Category endpoints

use async_trait::async_trait;

use super::paths;
use super::types::{Category, CategoryPayload, MessageResponse};
use crate::error::HttpError;
use crate::http::{ApiRequest, HttpClient};
use crate::session::Session;

/// Category resource operations
#[async_trait]
pub trait CategoriesApi: Send + Sync {
    /// List every category
    async fn get_all(&self) -> Result<Vec<Category>, HttpError>;

    /// Create a category and return it as stored
    async fn create(
        &self,
        session: &Session,
        payload: &CategoryPayload,
    ) -> Result<Category, HttpError>;

    /// Delete a category
    async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError>;
}

/// HTTP implementation of [`CategoriesApi`]
#[derive(Clone)]
pub struct CategoriesClient {
    http: HttpClient,
}

impl CategoriesClient {
    /// Create a client on top of `http`
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CategoriesApi for CategoriesClient {
    async fn get_all(&self) -> Result<Vec<Category>, HttpError> {
        self.http
            .send(&ApiRequest::get(paths::CATEGORIES), &Session::anonymous())
            .await
    }

    async fn create(
        &self,
        session: &Session,
        payload: &CategoryPayload,
    ) -> Result<Category, HttpError> {
        let request = ApiRequest::post(paths::CATEGORIES)
            .json(payload)?
            .authenticated()
            .with_idempotency_key();
        self.http.send(&request, session).await
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse, HttpError> {
        let request = ApiRequest::delete(paths::category(id)).authenticated();
        let body = self.http.execute(&request, session).await?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}
