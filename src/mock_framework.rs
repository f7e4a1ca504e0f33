//! # Mock Framework
//!
//! Utilities for testing clients and pages without a backend.
//!
//! Use [`mock_api`] to get an [`ApiClient`] wired to a channel, then use
//! [`expect_request`] or [`respond_next`] to assert on each outgoing request
//! and script its response.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest, ApiResponse, Transport};
use crate::session::{MemoryStorage, SessionStore};

pub type Responder = oneshot::Sender<Result<ApiResponse, ApiError>>;
pub type PendingRequest = (ApiRequest, Responder);

/// Transport that forwards every request to a test-owned receiver.
pub struct MockTransport {
    sender: mpsc::Sender<PendingRequest>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send((request, respond_to))
            .await
            .map_err(|_| ApiError::Transport("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Transport("Mock dropped".to_string()))?
    }
}

/// Creates a mock transport and the receiver the test drives.
pub fn create_mock_transport(buffer_size: usize) -> (Arc<MockTransport>, mpsc::Receiver<PendingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(MockTransport { sender }), receiver)
}

/// An `ApiClient` on the mock transport with in-memory session storage.
pub fn mock_api() -> (ApiClient, Arc<MemoryStorage>, mpsc::Receiver<PendingRequest>) {
    let (transport, receiver) = create_mock_transport(16);
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::new(storage.clone());
    let api = ApiClient::new("http://api.test", transport, session);
    (api, storage, receiver)
}

/// Helper to take the next request together with its responder.
pub async fn expect_request(receiver: &mut mpsc::Receiver<PendingRequest>) -> Option<PendingRequest> {
    receiver.recv().await
}

pub fn json_response(status: u16, body: Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::new(status, body.to_string()))
}

/// Answers the next request with `status` and `body`, returning the request.
pub async fn respond_next(receiver: &mut mpsc::Receiver<PendingRequest>, status: u16, body: Value) -> ApiRequest {
    let (request, responder) = expect_request(receiver).await.expect("Expected a request");
    responder.send(json_response(status, body)).expect("Caller went away");
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_round_trip() {
        let (api, _storage, mut receiver) = mock_api();

        let task = tokio::spawn(async move { api.get::<Value>("/users").await });

        let request = respond_next(&mut receiver, 200, json!([{ "id": "u1" }])).await;
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://api.test/users");

        let result = task.await.unwrap().unwrap();
        assert_eq!(result, json!([{ "id": "u1" }]));
    }
}
