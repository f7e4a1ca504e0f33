use super::request::ApiRequest;
use crate::session::SessionStore;

const PUBLIC_ENDPOINTS: [&str; 3] = ["/auth/", "/products", "/quotes"];

/// Public unless the URL goes through an `/admin/` route.
pub fn is_public_endpoint(url: &str) -> bool {
    PUBLIC_ENDPOINTS
        .iter()
        .any(|endpoint| url.contains(endpoint) && !url.contains("/admin/"))
}

/// The single place bearer tokens are attached.
#[derive(Clone)]
pub struct AuthInterceptor {
    session: SessionStore,
}

impl AuthInterceptor {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Returns whether an `Authorization` header was set.
    pub fn intercept(&self, request: &mut ApiRequest) -> bool {
        if is_public_endpoint(&request.url) {
            return false;
        }
        match self.session.access_token() {
            Some(token) => {
                request.set_header("Authorization", format!("Bearer {}", token));
                true
            }
            None => false,
        }
    }
}
