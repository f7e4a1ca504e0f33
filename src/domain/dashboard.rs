use serde::{Deserialize, Serialize};

use super::{Company, ProductDetails, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_companies: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub active_users: u64,
    pub recent_registrations: u64,
    pub completed_orders: u64,
    pub monthly_growth: f64,
}

/// Row of `GET /dashboard/top-companies`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyOrderSummary {
    pub company: Company,
    pub order_count: u64,
    pub total_value: f64,
}

/// Row of `GET /dashboard/user-activity`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserActivitySummary {
    pub user: User,
    pub order_count: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyOrders {
    pub month: String,
    pub orders: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationActivity {
    pub date: String,
    pub registrations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodTotals {
    pub orders: u64,
    pub spent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPeriodStats {
    pub this_month: PeriodTotals,
    pub last_month: PeriodTotals,
}

/// Payload of `GET /dashboard/user/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardData {
    pub user: User,
    #[serde(default)]
    pub recent_orders: Vec<ProductDetails>,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub stats: UserPeriodStats,
}

/// Payload of `GET /dashboard/admin`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminDashboardData {
    pub stats: DashboardStats,
    pub recent_users: Vec<User>,
    pub recent_companies: Vec<Company>,
    pub recent_orders: Vec<ProductDetails>,
    pub top_companies: Vec<Company>,
    pub user_activity: Vec<RegistrationActivity>,
    pub monthly_order_data: Vec<MonthlyOrders>,
}
