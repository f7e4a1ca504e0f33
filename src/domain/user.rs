use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Company;

/// Access level of an account. The backend accepts exactly these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    User,
    Customer,
    BusinessUser,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Manager,
        UserRole::User,
        UserRole::Customer,
        UserRole::BusinessUser,
    ];

    /// Wire value, also used as the sort key for the role column.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::User => "user",
            UserRole::Customer => "customer",
            UserRole::BusinessUser => "business_user",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::User => "User",
            UserRole::Customer => "Customer",
            UserRole::BusinessUser => "Business User",
        }
    }

    /// Staff roles that may see management actions and send order blanks.
    pub fn is_admin_or_manager(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A user's company is either embedded by the dashboard endpoints or
/// referenced by id from the users endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompanyRef {
    Embedded(Box<Company>),
    Id(String),
}

impl CompanyRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            CompanyRef::Embedded(company) => Some(company.name.as_str()),
            CompanyRef::Id(_) => None,
        }
    }
}

/// Represents a registered account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id", default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Creates a user with the minimal required fields.
    ///
    /// The `id` is left empty; the backend assigns it.
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: String::new(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
            phone: None,
            job_title: None,
            department: None,
            employee_id: None,
            company: None,
            created_at: None,
            last_login: None,
            is_active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn company_name(&self) -> &str {
        self.company.as_ref().and_then(CompanyRef::name).unwrap_or("")
    }
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

/// Payload for `PUT /users/:id`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_mongo_id_and_embedded_company() {
        let json = serde_json::json!({
            "_id": "u1",
            "email": "ana@acme.test",
            "firstName": "Ana",
            "lastName": "Lopez",
            "role": "business_user",
            "company": { "id": "c1", "name": "Acme", "industry": "Retail", "size": "11-50" }
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, UserRole::BusinessUser);
        assert_eq!(user.company_name(), "Acme");
        assert!(user.is_active);
    }

    #[test]
    fn test_company_reference_by_id_has_no_name() {
        let json = serde_json::json!({
            "id": "u2", "email": "b@x.test", "role": "user", "company": "c9", "isActive": false
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.company, Some(CompanyRef::Id("c9".into())));
        assert_eq!(user.company_name(), "");
        assert!(!user.is_active);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = serde_json::json!({ "id": "u3", "email": "c@x.test", "role": "root" });
        assert!(serde_json::from_value::<User>(json).is_err());
        assert!("root".parse::<UserRole>().is_err());
        assert_eq!("Manager".parse::<UserRole>(), Ok(UserRole::Manager));
    }
}
