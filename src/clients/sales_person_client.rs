use serde_json::json;
use tracing::{debug, instrument};

use crate::domain::{CreateSalesPersonDto, SalesPerson};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient};

#[derive(Clone)]
pub struct SalesPersonClient {
    api: ApiClient,
}

impl_basic_client!(SalesPersonClient, SalesPerson, "/api/sales-persons", sales_person);

impl SalesPersonClient {
    #[instrument(skip(self))]
    pub async fn list_sales_persons(&self, include_inactive: bool) -> Result<Vec<SalesPerson>, ApiError> {
        debug!("Sending request");
        let path = if include_inactive {
            "/api/sales-persons?includeInactive=true"
        } else {
            "/api/sales-persons"
        };
        self.api.get(path).await
    }

    #[instrument(skip(self))]
    pub async fn search_sales_persons(&self, query: &str) -> Result<Vec<SalesPerson>, ApiError> {
        debug!("Sending request");
        self.api
            .get(&format!("/api/sales-persons/search?q={}", encode_component(query)))
            .await
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create_sales_person(&self, dto: &CreateSalesPersonDto) -> Result<SalesPerson, ApiError> {
        debug!("Sending request");
        self.api.post("/api/sales-persons", dto).await
    }

    #[instrument(skip(self, dto))]
    pub async fn update_sales_person(&self, id: &str, dto: &CreateSalesPersonDto) -> Result<SalesPerson, ApiError> {
        debug!("Sending request");
        self.api
            .put(&format!("/api/sales-persons/{}", encode_component(id)), dto)
            .await
    }

    #[instrument(skip(self))]
    pub async fn activate_sales_person(&self, id: &str) -> Result<SalesPerson, ApiError> {
        debug!("Sending request");
        self.api
            .put(&format!("/api/sales-persons/{}/activate", encode_component(id)), &json!({}))
            .await
    }

    #[instrument(skip(self))]
    pub async fn deactivate_sales_person(&self, id: &str) -> Result<SalesPerson, ApiError> {
        debug!("Sending request");
        self.api
            .put(&format!("/api/sales-persons/{}/deactivate", encode_component(id)), &json!({}))
            .await
    }
}
