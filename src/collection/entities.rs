use std::cmp::Ordering;
use std::convert::Infallible;

use chrono::NaiveDate;

use super::{compare_number, compare_text, compare_time, contains_term, ViewSpec};
use crate::domain::{
    Company, CompanySize, DeadlineWindow, ManufacturingStatus, OrderStatus, OrderUser, Populated, Priority,
    ProductDetails, User, UserRole,
};

// -----------------------------------------------------------------------------
// Orders
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortKey {
    OrderNumber,
    User,
    Status,
    TotalAmount,
    CreatedAt,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersView;

fn order_company_name(order: &ProductDetails) -> &str {
    order
        .company
        .as_ref()
        .and_then(Populated::embedded)
        .map(|c| c.name.as_str())
        .unwrap_or("")
}

fn order_user(order: &ProductDetails) -> Option<&OrderUser> {
    order.user.as_ref().and_then(Populated::embedded)
}

fn order_status_key(order: &ProductDetails) -> &'static str {
    order.status.map(|s| s.as_str()).unwrap_or("")
}

impl ViewSpec for OrdersView {
    type Item = ProductDetails;
    type Filter = OrderFilter;
    type SortKey = OrderSortKey;

    fn matches_search(&self, order: &ProductDetails, term: &str) -> bool {
        contains_term(&order.order_number, term)
            || contains_term(&order.client_name, term)
            || contains_term(&order.sales_person, term)
            || order_user(order).is_some_and(|u| contains_term(&u.full_name(), term))
            || order_user(order).is_some_and(|u| contains_term(&u.email, term))
            || contains_term(order_company_name(order), term)
    }

    fn matches_filter(&self, order: &ProductDetails, filter: &OrderFilter) -> bool {
        filter.status.map_or(true, |status| order.status == Some(status))
    }

    fn compare(&self, a: &ProductDetails, b: &ProductDetails, key: OrderSortKey) -> Ordering {
        match key {
            OrderSortKey::OrderNumber => compare_text(&a.order_number, &b.order_number),
            OrderSortKey::User => compare_text(&a.requester_name(), &b.requester_name()),
            OrderSortKey::Status => compare_text(order_status_key(a), order_status_key(b)),
            OrderSortKey::TotalAmount => compare_number(a.total_amount.unwrap_or(0.0), b.total_amount.unwrap_or(0.0)),
            OrderSortKey::CreatedAt => compare_time(a.created_at, b.created_at),
        }
    }
}

// -----------------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    Name,
    Email,
    Role,
    Company,
    LastLogin,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    /// `Some(true)` keeps active accounts only.
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersView;

impl ViewSpec for UsersView {
    type Item = User;
    type Filter = UserFilter;
    type SortKey = UserSortKey;

    fn matches_search(&self, user: &User, term: &str) -> bool {
        contains_term(&user.first_name, term)
            || contains_term(&user.last_name, term)
            || contains_term(&user.email, term)
            || contains_term(user.company_name(), term)
    }

    fn matches_filter(&self, user: &User, filter: &UserFilter) -> bool {
        filter.role.map_or(true, |role| user.role == role) && filter.active.map_or(true, |active| user.is_active == active)
    }

    fn compare(&self, a: &User, b: &User, key: UserSortKey) -> Ordering {
        match key {
            UserSortKey::Name => compare_text(&a.full_name(), &b.full_name()),
            UserSortKey::Email => compare_text(&a.email, &b.email),
            UserSortKey::Role => compare_text(a.role.as_str(), b.role.as_str()),
            UserSortKey::Company => compare_text(a.company_name(), b.company_name()),
            UserSortKey::LastLogin => compare_time(a.last_login, b.last_login),
        }
    }
}

// -----------------------------------------------------------------------------
// Companies
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySortKey {
    Name,
    Industry,
    Size,
    Employees,
    Orders,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFilter {
    pub industry: Option<String>,
    pub size: Option<CompanySize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompaniesView;

fn size_key(company: &Company) -> &'static str {
    company.size.map(|s| s.as_str()).unwrap_or("")
}

impl ViewSpec for CompaniesView {
    type Item = Company;
    type Filter = CompanyFilter;
    type SortKey = CompanySortKey;

    fn matches_search(&self, company: &Company, term: &str) -> bool {
        contains_term(&company.name, term) || contains_term(&company.email, term) || contains_term(&company.industry, term)
    }

    fn matches_filter(&self, company: &Company, filter: &CompanyFilter) -> bool {
        let industry_ok = match filter.industry.as_deref() {
            None | Some("") => true,
            Some(industry) => company.industry == industry,
        };
        industry_ok && filter.size.map_or(true, |size| company.size == Some(size))
    }

    /// Size sorts by its label, so "1000+" lands before "11-50".
    fn compare(&self, a: &Company, b: &Company, key: CompanySortKey) -> Ordering {
        match key {
            CompanySortKey::Name => compare_text(&a.name, &b.name),
            CompanySortKey::Industry => compare_text(&a.industry, &b.industry),
            CompanySortKey::Size => compare_text(size_key(a), size_key(b)),
            CompanySortKey::Employees => a.total_employees.cmp(&b.total_employees),
            CompanySortKey::Orders => a.total_orders.cmp(&b.total_orders),
        }
    }
}

// -----------------------------------------------------------------------------
// Manufacturing
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManufacturingFilter {
    pub status: Option<ManufacturingStatus>,
    pub priority: Option<Priority>,
    pub deadline: Option<DeadlineWindow>,
}

/// Manufacturing has no sortable columns.
#[derive(Debug, Clone, Copy)]
pub struct ManufacturingView {
    pub today: NaiveDate,
}

impl ViewSpec for ManufacturingView {
    type Item = ProductDetails;
    type Filter = ManufacturingFilter;
    type SortKey = Infallible;

    fn matches_search(&self, order: &ProductDetails, term: &str) -> bool {
        contains_term(&order.order_number, term) || contains_term(&order.client_name, term)
    }

    fn matches_filter(&self, order: &ProductDetails, filter: &ManufacturingFilter) -> bool {
        filter.status.map_or(true, |s| order.manufacturing_status == s)
            && filter.priority.map_or(true, |p| order.priority == p)
            && filter.deadline.map_or(true, |w| w.contains(&order.deadline, self.today))
    }

    fn compare(&self, _: &ProductDetails, _: &ProductDetails, key: Infallible) -> Ordering {
        match key {}
    }
}
