use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::domain::{ManufacturingNote, ManufacturingStatus, OrderStatus, Priority, ProductDetails};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient, Envelope};

const BASE: &str = "/product-details";

/// Search endpoints answer with either one record or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(Box<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![*item],
        }
    }
}

/// Client for manufacturing orders (`/product-details`). Every response is
/// wrapped in the `{success, message, data}` envelope.
#[derive(Clone)]
pub struct OrderClient {
    api: ApiClient,
}

impl_client_new!(OrderClient);

impl OrderClient {
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn submit_order(&self, order: &ProductDetails) -> Result<ProductDetails, ApiError> {
        info!("Submitting order");
        let envelope: Envelope<ProductDetails> = self.api.post(BASE, order).await?;
        envelope.into_data()
    }

    /// A missing `data` field reads as no orders.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        Ok(self.api.get_enveloped::<Vec<ProductDetails>>(BASE).await?.data_or_default())
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Result<ProductDetails, ApiError> {
        debug!("Sending request");
        self.api
            .get_enveloped::<ProductDetails>(&format!("{}/{}", BASE, encode_component(id)))
            .await?
            .into_data()
    }

    #[instrument(skip(self))]
    pub async fn find_by_order_number(&self, order_number: &str) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.search(&format!("{}/search/order/{}", BASE, encode_component(order_number))).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_client(&self, client_name: &str) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.search(&format!("{}/search/client?name={}", BASE, encode_component(client_name))).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_priority(&self, priority: Priority) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.search(&format!("{}/search/priority/{}", BASE, priority.as_str())).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_cloth_type(&self, cloth_type: &str) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.search(&format!("{}/search/cloth-type/{}", BASE, encode_component(cloth_type))).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_manufacturing_status(&self, status: ManufacturingStatus) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.search(&format!("{}/manufacturing/status/{}", BASE, status.as_str())).await
    }

    /// Backend-defined aggregate; the shape is not fixed.
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<Value, ApiError> {
        debug!("Sending request");
        Ok(self
            .api
            .get_enveloped::<Value>(&format!("{}/statistics", BASE))
            .await?
            .data
            .unwrap_or(Value::Null))
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Option<ProductDetails>, ApiError> {
        debug!("Sending request");
        let envelope: Envelope<ProductDetails> = self
            .api
            .patch(&format!("{}/{}/status", BASE, encode_component(id)), &json!({ "status": status }))
            .await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self))]
    pub async fn update_manufacturing_status(
        &self,
        id: &str,
        status: ManufacturingStatus,
        updated_by: &str,
    ) -> Result<Option<ProductDetails>, ApiError> {
        debug!("Sending request");
        let envelope: Envelope<ProductDetails> = self
            .api
            .patch(
                &format!("{}/{}/manufacturing-status", BASE, encode_component(id)),
                &json!({ "manufacturingStatus": status, "updatedBy": updated_by }),
            )
            .await?;
        Ok(envelope.data)
    }

    /// Appends a note and returns the order's full note list as stored.
    #[instrument(skip(self, content))]
    pub async fn add_manufacturing_note(
        &self,
        id: &str,
        content: &str,
        author: &str,
    ) -> Result<Vec<ManufacturingNote>, ApiError> {
        debug!("Sending request");
        let envelope: Envelope<ProductDetails> = self
            .api
            .post(
                &format!("{}/{}/manufacturing-notes", BASE, encode_component(id)),
                &json!({ "content": content, "author": author }),
            )
            .await?;
        Ok(envelope.into_data()?.manufacturing_notes)
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        debug!("Sending request");
        self.api.delete(&format!("{}/{}", BASE, encode_component(id))).await
    }

    async fn search(&self, path: &str) -> Result<Vec<ProductDetails>, ApiError> {
        let envelope: Envelope<OneOrMany<ProductDetails>> = self.api.get_enveloped(path).await?;
        Ok(envelope.data.map(OneOrMany::into_vec).unwrap_or_default())
    }
}
