use serde_json::json;
use tracing::{debug, instrument};

use crate::domain::{CreateUserDto, UpdateUserDto, User};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient};

/// Client for the `/users` administration endpoints.
#[derive(Clone)]
pub struct UserClient {
    api: ApiClient,
}

impl_basic_client!(UserClient, User, "/users", user);

impl UserClient {
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        debug!("Sending request");
        self.api.get("/users").await
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &CreateUserDto) -> Result<User, ApiError> {
        debug!("Sending request");
        self.api.post("/users", user).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: &str, update: &UpdateUserDto) -> Result<User, ApiError> {
        debug!("Sending request");
        self.api.put(&format!("/users/{}", encode_component(id)), update).await
    }

    #[instrument(skip(self))]
    pub async fn activate_user(&self, id: &str) -> Result<User, ApiError> {
        debug!("Sending request");
        self.api.put(&format!("/users/{}/activate", encode_component(id)), &json!({})).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: &str) -> Result<User, ApiError> {
        debug!("Sending request");
        self.api.put(&format!("/users/{}/deactivate", encode_component(id)), &json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::mock_framework::{mock_api, respond_next};

    #[tokio::test]
    async fn test_deactivate_user_sends_empty_put() {
        let (api, _storage, mut receiver) = mock_api();
        let client = UserClient::new(api);

        let task = tokio::spawn(async move { client.deactivate_user("u1").await });

        let request = respond_next(
            &mut receiver,
            200,
            json!({ "_id": "u1", "email": "a@x.test", "role": "user", "isActive": false }),
        )
        .await;
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://api.test/users/u1/deactivate");
        assert_eq!(request.body, Some(json!({})));

        let user = task.await.unwrap().unwrap();
        assert!(!user.is_active);
    }

    #[tokio::test]
    async fn test_get_user_surfaces_status_errors() {
        let (api, _storage, mut receiver) = mock_api();
        let client = UserClient::new(api);

        let task = tokio::spawn(async move { client.get_user("missing").await });
        respond_next(&mut receiver, 404, json!({ "message": "User not found" })).await;

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "User not found".into()
            }
        );
    }
}
