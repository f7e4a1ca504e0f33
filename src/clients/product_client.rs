use serde_json::json;
use tracing::{debug, instrument};

use crate::domain::{Product, ProductPatch};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient};

/// Client for the product catalog. Listing is public; the rest is admin-only.
#[derive(Clone)]
pub struct ProductClient {
    api: ApiClient,
}

impl_basic_client!(ProductClient, Product, "/products", product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        self.api.get("/products").await
    }

    /// Includes inactive products.
    #[instrument(skip(self))]
    pub async fn list_all_products(&self) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        self.api.get("/products/admin/all").await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        debug!("Sending request");
        self.api.post("/products", product).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product, ApiError> {
        debug!("Sending request");
        self.api.patch(&format!("/products/{}", encode_component(id)), patch).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: &str) -> Result<Product, ApiError> {
        debug!("Sending request");
        self.api
            .patch(&format!("/products/{}/toggle-active", encode_component(id)), &json!({}))
            .await
    }

    pub fn variant_image_url(&self, filename: &str) -> String {
        self.api
            .url(&format!("/products/variant-image/{}", encode_component(filename)))
    }
}
