//! The printable order sheet: load an existing one, fill the size grid and
//! forward it to the production chat.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, instrument, warn};

use super::validation::{FormError, Rule, Touched, ValidationErrors};
use crate::clients::{OrderBlankClient, SalesPersonClient};
use crate::domain::{Gender, OrderBlank, OrderBlankSubmission, SalesPerson, User};
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load order details";
const SEND_FAILED: &str = "Failed to send order to Telegram. Please try again.";
const SENT: &str = "Order sent to Telegram successfully!";

const FIELDS: [&str; 5] = ["orderNumber", "clientName", "salesPerson", "deadline", "clothType"];

/// Reduces a stored deadline to its UTC calendar date, `YYYY-MM-DD`.
/// Unparseable values become empty.
pub fn normalize_deadline(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Only staff may forward a sheet.
pub fn can_send(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role.is_admin_or_manager())
}

/// Autocomplete suggestions: names containing `query`, case-insensitively.
/// A typed value with no exact match is offered first.
pub fn suggest_sales_persons(sales_persons: &[SalesPerson], query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return sales_persons.iter().map(|sp| sp.name.clone()).collect();
    }
    let mut names: Vec<String> = sales_persons
        .iter()
        .filter(|sp| sp.name.to_lowercase().contains(&query))
        .map(|sp| sp.name.clone())
        .collect();
    if !names.iter().any(|name| name.to_lowercase() == query) {
        names.insert(0, query);
    }
    names
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBlankForm {
    pub blank: OrderBlank,
    order_id: Option<String>,
    loading: bool,
    sending: bool,
    error: Option<String>,
    success_message: Option<String>,
    sales_persons: Vec<SalesPerson>,
    touched: Touched,
}

impl OrderBlankForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// A sheet opened from an existing order.
    pub fn is_view_mode(&self) -> bool {
        self.order_id.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn total(&self, gender: Gender) -> u32 {
        self.blank.sizes.total(gender)
    }

    pub fn grand_total(&self) -> u32 {
        self.blank.sizes.grand_total()
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.mark(field);
    }

    #[instrument(skip(self, client))]
    pub async fn load(&mut self, client: &OrderBlankClient, order_id: &str) -> Result<(), FormError> {
        self.order_id = Some(order_id.to_string());
        self.loading = true;
        self.error = None;
        let result = client.load_order_blank(order_id).await;
        self.loading = false;
        match result {
            Ok(mut blank) => {
                blank.deadline = normalize_deadline(&blank.deadline);
                self.blank = blank;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error loading order");
                self.error = Some(LOAD_FAILED.to_string());
                Err(FormError::Api(e))
            }
        }
    }

    /// Autocomplete source. A failure leaves the list empty.
    #[instrument(skip(self, client))]
    pub async fn load_sales_persons(&mut self, client: &SalesPersonClient) {
        match client.list_sales_persons(false).await {
            Ok(sales_persons) => self.sales_persons = sales_persons,
            Err(e) => warn!(error = %e, "Error loading sales persons"),
        }
    }

    pub fn suggest_sales_persons(&self, query: &str) -> Vec<String> {
        suggest_sales_persons(&self.sales_persons, query)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("orderNumber", &self.blank.order_number, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("clientName", &self.blank.client_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("salesPerson", &self.blank.sales_person, &[Rule::Required]);
        errors.check("deadline", &self.blank.deadline, &[Rule::Required]);
        errors.check("clothType", &self.blank.cloth_type, &[Rule::Required]);
        errors
    }

    pub fn field_error(&self, field: &'static str) -> Option<String> {
        self.touched.visible_error(&self.validate(), field, field)
    }

    /// Forwards the sheet with its grand total. Requires a staff session.
    #[instrument(skip(self, client, session), fields(order_number = %self.blank.order_number))]
    pub async fn send(&mut self, client: &OrderBlankClient, session: &SessionStore) -> Result<(), FormError> {
        if !can_send(session.current_user().as_ref()) {
            self.error = Some(FormError::PermissionDenied.to_string());
            return Err(FormError::PermissionDenied);
        }
        self.touched.mark_all(&FIELDS);
        self.validate().into_result()?;

        self.sending = true;
        self.error = None;
        self.success_message = None;
        let submission = OrderBlankSubmission {
            grand_total: self.grand_total(),
            blank: self.blank.clone(),
        };
        let result = client.send_order_blank(&submission).await;
        self.sending = false;

        match result {
            Ok(_) => {
                info!("Order sent");
                self.success_message = Some(SENT.to_string());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error sending order");
                self.error = Some(SEND_FAILED.to_string());
                Err(FormError::Api(e))
            }
        }
    }
}
