use serde::{Deserialize, Serialize};

/// Payload for `POST /quotes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub product_type: String,
    pub quantity: u32,
    pub additional_services: Vec<String>,
    pub message: String,
    pub budget: String,
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
}

/// Product picked on the catalog page, handed to the quote form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProductInfo {
    pub product_name: String,
    pub category: String,
}
