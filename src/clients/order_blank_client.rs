use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::{OrderBlank, OrderBlankSubmission};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient};

/// Client for the printable order sheet (`/api/orders`).
#[derive(Clone)]
pub struct OrderBlankClient {
    api: ApiClient,
}

impl_client_new!(OrderBlankClient);

impl OrderBlankClient {
    #[instrument(skip(self))]
    pub async fn load_order_blank(&self, id: &str) -> Result<OrderBlank, ApiError> {
        debug!("Sending request");
        self.api
            .get_enveloped(&format!("/api/orders/{}", encode_component(id)))
            .await?
            .into_data()
    }

    /// Forwards the sheet to the team chat.
    #[instrument(skip(self, submission), fields(order_number = %submission.blank.order_number))]
    pub async fn send_order_blank(&self, submission: &OrderBlankSubmission) -> Result<Value, ApiError> {
        info!(grand_total = submission.grand_total, "Sending order blank");
        self.api.post("/api/orders/send-telegram", submission).await
    }
}
