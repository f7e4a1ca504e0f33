use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::interceptor::{is_public_endpoint, AuthInterceptor};
use super::request::{ApiRequest, ApiResponse, Method};
use super::transport::Transport;
use crate::domain::TokenPair;
use crate::error::ApiError;
use crate::session::SessionStore;

/// `{success, message, data}` wrapper used by several backend modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode(self.message.unwrap_or_else(|| "response has no data".to_string())))
    }
}

impl<T: Default> Envelope<T> {
    pub fn data_or_default(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// Base URL, transport and session glued together. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    interceptor: AuthInterceptor,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            interceptor: AuthInterceptor::new(session.clone()),
            session,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::new(Method::Get, self.url(path))).await?.json()
    }

    pub async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ApiError> {
        self.get(path).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(Method::Post, path, body).await?.json()
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(Method::Put, path, body).await?.json()
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(Method::Patch, path, body).await?.json()
    }

    /// Any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::new(Method::Delete, self.url(path))).await?;
        Ok(())
    }

    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::new(method, self.url(path)).with_body(body)).await
    }

    /// Sends through the interceptor. A 401 on a protected URL triggers one
    /// token refresh and one retry; a failed refresh ends the session.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.dispatch(request.clone()).await?;
        if response.status != 401 || is_public_endpoint(&request.url) || self.session.refresh_token().is_none() {
            return response.into_result();
        }

        warn!(url = %request.url, "Access token rejected, refreshing");
        if let Err(e) = self.refresh_tokens().await {
            warn!(error = %e, "Token refresh failed, clearing session");
            self.session.clear()?;
            return Err(ApiError::Unauthorized);
        }
        self.dispatch(request).await?.into_result()
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let authorized = self.interceptor.intercept(&mut request);
        debug!(method = %request.method, url = %request.url, authorized, "Dispatching request");
        self.transport.send(request).await
    }

    /// `POST /auth/refresh` with the stored refresh token; stores the new pair.
    pub async fn refresh_tokens(&self) -> Result<TokenPair, ApiError> {
        let refresh_token = self.session.refresh_token().ok_or(ApiError::Unauthorized)?;
        let request = ApiRequest::new(Method::Post, self.url("/auth/refresh"))
            .with_body(json!({ "refreshToken": refresh_token }));
        let tokens: TokenPair = self.dispatch(request).await?.into_result()?.json()?;
        self.session.store_tokens(&tokens)?;
        Ok(tokens)
    }

    /// Raw JSON access for endpoints without a fixed shape.
    pub async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        self.get(path).await
    }
}
