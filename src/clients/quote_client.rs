use tracing::{info, instrument};

use crate::domain::{QuoteRequest, QuoteResponse};
use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct QuoteClient {
    api: ApiClient,
}

impl_client_new!(QuoteClient);

impl QuoteClient {
    #[instrument(skip(self, quote), fields(company = %quote.company_name))]
    pub async fn submit_quote(&self, quote: &QuoteRequest) -> Result<QuoteResponse, ApiError> {
        info!("Submitting quote request");
        self.api.post("/quotes", quote).await
    }
}
