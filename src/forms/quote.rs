use tracing::{info, instrument, warn};

use super::validation::{FieldError, FormError, Pattern, Rule, Touched, ValidationErrors};
use crate::clients::QuoteClient;
use crate::domain::{QuoteRequest, QuoteResponse, SelectedProductInfo};
use crate::session::ProductQuoteHandoff;

/// `(value, label)` pairs offered by the select controls.
pub type OptionTable = [(&'static str, &'static str)];

pub const PRODUCT_TYPES: &OptionTable = &[
    ("t-shirts", "Custom T-Shirts"),
    ("polo-shirts", "Polo Shirts"),
    ("hoodies", "Hoodies & Sweatshirts"),
    ("caps", "Custom Caps"),
    ("jackets", "Jackets & Outerwear"),
    ("promotional", "Promotional Items"),
    ("other", "Other (specify in message)"),
];

pub const BUDGET_RANGES: &OptionTable = &[
    ("under-1000", "Under $1,000"),
    ("1000-5000", "$1,000 - $5,000"),
    ("5000-10000", "$5,000 - $10,000"),
    ("10000-25000", "$10,000 - $25,000"),
    ("over-25000", "Over $25,000"),
];

pub const TIMELINES: &OptionTable = &[
    ("asap", "ASAP"),
    ("1-week", "Within 1 week"),
    ("2-weeks", "Within 2 weeks"),
    ("1-month", "Within 1 month"),
    ("flexible", "Flexible timeline"),
];

pub const ADDITIONAL_SERVICES: &OptionTable = &[
    ("logo-design", "Logo Design Assistance"),
    ("rush-delivery", "Rush Delivery"),
    ("sample-creation", "Sample Creation"),
    ("packaging", "Custom Packaging"),
    ("shipping", "Shipping Coordination"),
];

const FIELDS: [&str; 9] = [
    "companyName",
    "contactName",
    "email",
    "phone",
    "productType",
    "quantity",
    "message",
    "budget",
    "timeline",
];

fn label(field: &str) -> &str {
    match field {
        "companyName" => "Company name",
        "contactName" => "Contact name",
        "email" => "Email",
        "phone" => "Phone",
        "productType" => "Product type",
        "quantity" => "Quantity",
        "message" => "Message",
        "budget" => "Budget",
        "timeline" => "Timeline",
        other => other,
    }
}

/// Maps a catalog category onto the closest product type.
fn product_type_for(category: &str) -> &'static str {
    let normalized = category.trim().to_lowercase();
    PRODUCT_TYPES
        .iter()
        .find(|(value, label)| {
            *value == normalized || label.to_lowercase() == normalized || normalized.contains(value.trim_end_matches('s'))
        })
        .map(|(value, _)| *value)
        .unwrap_or("other")
}

/// The "request a quote" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteForm {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub product_type: String,
    /// Raw input; validated as an integer in `1..=10000`.
    pub quantity: String,
    pub additional_services: Vec<String>,
    pub message: String,
    pub budget: String,
    pub timeline: String,
    touched: Touched,
}

impl QuoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A blank form pre-filled from the product picked on the catalog page.
    /// The selection is consumed.
    pub fn from_handoff(handoff: &ProductQuoteHandoff) -> Self {
        let mut form = Self::new();
        if let Some(selected) = handoff.selected() {
            form.prefill(&selected);
            handoff.clear();
        }
        form
    }

    pub fn prefill(&mut self, product: &SelectedProductInfo) {
        self.product_type = product_type_for(&product.category).to_string();
        if self.message.is_empty() {
            self.message = format!("I'm interested in {} ({}).", product.product_name, product.category);
        }
    }

    /// Adds the service when `selected`, removes it otherwise.
    pub fn set_service(&mut self, service: &str, selected: bool) {
        let present = self.is_service_selected(service);
        if selected && !present {
            self.additional_services.push(service.to_string());
        } else if !selected && present {
            self.additional_services.retain(|s| s != service);
        }
    }

    pub fn is_service_selected(&self, service: &str) -> bool {
        self.additional_services.iter().any(|s| s == service)
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.mark(field);
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("companyName", &self.company_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("contactName", &self.contact_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("email", &self.email, &[Rule::Required, Rule::Email]);
        errors.check("phone", &self.phone, &[Rule::Required, Rule::Pattern(Pattern::ContactPhone)]);
        errors.check("productType", &self.product_type, &[Rule::Required]);
        errors.check("quantity", &self.quantity, &[Rule::Required, Rule::Min(1), Rule::Max(10_000)]);
        errors.check("message", &self.message, &[Rule::Required, Rule::MinLength(10)]);
        errors.check("budget", &self.budget, &[Rule::Required]);
        errors.check("timeline", &self.timeline, &[Rule::Required]);
        errors
    }

    pub fn field_error(&self, field: &'static str) -> Option<String> {
        let errors = self.validate();
        let error = errors.get(field)?;
        if !self.touched.is_touched(field) {
            return None;
        }
        Some(match error {
            FieldError::Min(_) => "Quantity must be at least 1".to_string(),
            FieldError::Max(_) => "Please contact us directly for quantities over 10,000".to_string(),
            other => other.message(label(field)),
        })
    }

    pub fn to_request(&self) -> Result<QuoteRequest, ValidationErrors> {
        self.validate().into_result()?;
        let quantity = self.quantity.trim().parse::<u32>().map_err(|_| {
            let mut errors = ValidationErrors::new();
            errors.add("quantity", FieldError::Min(1));
            errors
        })?;
        Ok(QuoteRequest {
            company_name: self.company_name.clone(),
            contact_name: self.contact_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            product_type: self.product_type.clone(),
            quantity,
            additional_services: self.additional_services.clone(),
            message: self.message.clone(),
            budget: self.budget.clone(),
            timeline: self.timeline.clone(),
        })
    }

    /// Sends the quote. On success the selected services are reset; the
    /// other fields are kept.
    #[instrument(skip(self, quotes), fields(company = %self.company_name))]
    pub async fn submit(&mut self, quotes: &QuoteClient) -> Result<QuoteResponse, FormError> {
        let request = match self.to_request() {
            Ok(request) => request,
            Err(errors) => {
                self.touched.mark_all(&FIELDS);
                return Err(FormError::Invalid(errors));
            }
        };
        match quotes.submit_quote(&request).await {
            Ok(response) => {
                info!("Quote submitted");
                self.additional_services.clear();
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Error submitting quote");
                Err(FormError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::mock_framework::{mock_api, respond_next};
    use serde_json::json;

    fn valid_form() -> QuoteForm {
        QuoteForm {
            company_name: "Bright Co".into(),
            contact_name: "Lee Park".into(),
            email: "lee@bright.test".into(),
            phone: "+1 (415) 555-0123".into(),
            product_type: "hoodies".into(),
            quantity: "150".into(),
            message: "Team hoodies for the spring event".into(),
            budget: "1000-5000".into(),
            timeline: "1-month".into(),
            ..QuoteForm::default()
        }
    }

    #[test]
    fn test_quantity_bounds_messages() {
        let mut form = valid_form();
        form.quantity = "20000".into();
        form.touch("quantity");
        assert_eq!(
            form.field_error("quantity").as_deref(),
            Some("Please contact us directly for quantities over 10,000")
        );
        form.quantity = "0".into();
        assert_eq!(form.field_error("quantity").as_deref(), Some("Quantity must be at least 1"));
    }

    #[test]
    fn test_services_toggle() {
        let mut form = QuoteForm::new();
        form.set_service("rush-delivery", true);
        form.set_service("rush-delivery", true);
        form.set_service("packaging", true);
        assert_eq!(form.additional_services, vec!["rush-delivery", "packaging"]);
        form.set_service("rush-delivery", false);
        assert!(!form.is_service_selected("rush-delivery"));
    }

    #[test]
    fn test_prefill_from_handoff_consumes_selection() {
        let handoff = ProductQuoteHandoff::new();
        handoff.select(Some(SelectedProductInfo {
            product_name: "Heavy Hoodie".into(),
            category: "Hoodies".into(),
        }));
        let form = QuoteForm::from_handoff(&handoff);
        assert_eq!(form.product_type, "hoodies");
        assert!(form.message.contains("Heavy Hoodie"));
        assert_eq!(handoff.selected(), None);
    }

    #[tokio::test]
    async fn test_submit_posts_quote() {
        let (api, _storage, mut receiver) = mock_api();
        let client = QuoteClient::new(api);
        let mut form = valid_form();
        form.set_service("shipping", true);

        let task = tokio::spawn(async move {
            let result = form.submit(&client).await;
            (form, result)
        });
        let request = respond_next(&mut receiver, 201, json!({ "success": true, "message": "Thanks", "quoteId": "q1" })).await;
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://api.test/quotes");
        assert_eq!(request.body.as_ref().and_then(|b| b.get("quantity")), Some(&json!(150)));
        assert!(request.header("authorization").is_none());

        let (form, result) = task.await.unwrap();
        assert_eq!(result.unwrap().quote_id.as_deref(), Some("q1"));
        assert!(form.additional_services.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_never_sends() {
        let (api, _storage, _receiver) = mock_api();
        let client = QuoteClient::new(api);
        let mut form = QuoteForm::new();
        let err = form.submit(&client).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(ref errors) if errors.len() == 9));
        assert!(form.field_error("email").is_some());
    }
}
