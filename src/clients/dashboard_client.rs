use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{
    AdminDashboardData, Company, CompanyOrderSummary, DashboardStats, MonthlyOrders, ProductDetails, User,
    UserActivitySummary, UserDashboardData,
};
use crate::error::ApiError;
use crate::http::{encode_component, ApiClient};

/// Client for the `/dashboard` aggregates. All responses are enveloped.
#[derive(Clone)]
pub struct DashboardClient {
    api: ApiClient,
}

impl_client_new!(DashboardClient);

impl DashboardClient {
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/stats").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/users").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn companies(&self) -> Result<Vec<Company>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/companies").await?.into_data()
    }

    /// Orders as the dashboard sees them: the product-details list.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<ProductDetails>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/product-details").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn top_companies(&self) -> Result<Vec<CompanyOrderSummary>, ApiError> {
        debug!("Sending request");
        let rows: Vec<Value> = self.api.get_enveloped("/dashboard/top-companies").await?.into_data()?;
        rows.into_iter()
            .map(|row| -> Result<CompanyOrderSummary, ApiError> {
                Ok(CompanyOrderSummary {
                    order_count: count(&row, "orderCount"),
                    total_value: amount(&row, "totalOrderValue"),
                    company: serde_json::from_value(row)?,
                })
            })
            .collect()
    }

    /// Rows carry the user either nested under `user` or as the row itself.
    #[instrument(skip(self))]
    pub async fn user_activity(&self) -> Result<Vec<UserActivitySummary>, ApiError> {
        debug!("Sending request");
        let rows: Vec<Value> = self.api.get_enveloped("/dashboard/user-activity").await?.into_data()?;
        rows.into_iter()
            .map(|mut row| -> Result<UserActivitySummary, ApiError> {
                let order_count = count(&row, "orderCount");
                let total_value = amount(&row, "totalValue");
                let user = match row.get_mut("user").map(Value::take) {
                    Some(nested) if !nested.is_null() => nested,
                    _ => row,
                };
                Ok(UserActivitySummary {
                    user: serde_json::from_value(user)?,
                    order_count,
                    total_value,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn monthly_orders(&self) -> Result<Vec<MonthlyOrders>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/monthly-orders").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn recent_users(&self) -> Result<Vec<User>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/recent-users").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn recent_companies(&self) -> Result<Vec<Company>, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/recent-companies").await?.into_data()
    }

    #[instrument(skip(self))]
    pub async fn user_dashboard(&self, user_id: &str) -> Result<UserDashboardData, ApiError> {
        debug!("Sending request");
        self.api
            .get_enveloped(&format!("/dashboard/user/{}", encode_component(user_id)))
            .await?
            .into_data()
    }

    #[instrument(skip(self))]
    pub async fn admin_dashboard(&self) -> Result<AdminDashboardData, ApiError> {
        debug!("Sending request");
        self.api.get_enveloped("/dashboard/admin").await?.into_data()
    }
}

fn count(row: &Value, key: &str) -> u64 {
    row.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn amount(row: &Value, key: &str) -> f64 {
    row.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
