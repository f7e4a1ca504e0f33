use tokio::sync::watch;
use tracing::{info, instrument};

use crate::domain::{AuthResponse, LoginRequest, RegisterRequest, TokenPair, User};
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::SessionStore;

/// Login, registration and logout. Successful calls update the session.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl_client_new!(AuthClient);

impl AuthClient {
    fn session(&self) -> &SessionStore {
        self.api.session()
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        info!("Registering account");
        let response: AuthResponse = self.api.post("/auth/register", request).await?;
        self.session().establish(&response)?;
        Ok(response)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        info!("Logging in");
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.api.post("/auth/login", &request).await?;
        self.session().establish(&response)?;
        info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        info!("Logging out");
        Ok(self.session().clear()?)
    }

    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<TokenPair, ApiError> {
        self.api.refresh_tokens().await
    }

    pub fn access_token(&self) -> Option<String> {
        self.session().access_token()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().current_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.session().subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }
}
