//! Admin account endpoints

use async_trait::async_trait;

use super::paths;
use super::types::{AdminUser, AuthResponse, Credentials, ProfileResponse};
use crate::error::HttpError;
use crate::http::{ApiRequest, HttpClient};
use crate::session::Session;

/// Admin account operations
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Exchange credentials for a token; attempted once
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;

    /// Create an admin account; attempted once
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError>;

    /// Account behind the session's token
    async fn profile(&self, session: &Session) -> Result<AdminUser, HttpError>;
}

/// HTTP implementation of [`AdminApi`]
#[derive(Clone)]
pub struct AdminClient {
    http: HttpClient,
}

impl AdminClient {
    /// Create a client on top of `http`
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError> {
        let request = ApiRequest::post(paths::ADMIN_LOGIN).json(credentials)?;
        self.http.send(&request, &Session::anonymous()).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, HttpError> {
        let request = ApiRequest::post(paths::ADMIN_REGISTER).json(credentials)?;
        self.http.send(&request, &Session::anonymous()).await
    }

    async fn profile(&self, session: &Session) -> Result<AdminUser, HttpError> {
        let request = ApiRequest::get(paths::ADMIN_PROFILE).authenticated();
        self.http
            .send::<ProfileResponse>(&request, session)
            .await
            .map(ProfileResponse::into_user)
    }
}
