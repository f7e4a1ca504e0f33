use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headcount bucket a company registers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    OneToTen,
    #[serde(rename = "11-50")]
    ElevenToFifty,
    #[serde(rename = "51-200")]
    FiftyOneToTwoHundred,
    #[serde(rename = "201-500")]
    TwoHundredOneToFiveHundred,
    #[serde(rename = "501-1000")]
    FiveHundredOneToThousand,
    #[serde(rename = "1000+")]
    ThousandPlus,
}

impl CompanySize {
    pub const ALL: [CompanySize; 6] = [
        CompanySize::OneToTen,
        CompanySize::ElevenToFifty,
        CompanySize::FiftyOneToTwoHundred,
        CompanySize::TwoHundredOneToFiveHundred,
        CompanySize::FiveHundredOneToThousand,
        CompanySize::ThousandPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::OneToTen => "1-10",
            CompanySize::ElevenToFifty => "11-50",
            CompanySize::FiftyOneToTwoHundred => "51-200",
            CompanySize::TwoHundredOneToFiveHundred => "201-500",
            CompanySize::FiveHundredOneToThousand => "501-1000",
            CompanySize::ThousandPlus => "1000+",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CompanySize::OneToTen => "1-10 employees",
            CompanySize::ElevenToFifty => "11-50 employees",
            CompanySize::FiftyOneToTwoHundred => "51-200 employees",
            CompanySize::TwoHundredOneToFiveHundred => "201-500 employees",
            CompanySize::FiveHundredOneToThousand => "501-1000 employees",
            CompanySize::ThousandPlus => "1000+ employees",
        }
    }
}

impl std::str::FromStr for CompanySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompanySize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| format!("Unknown company size: {}", s))
    }
}

/// Customer company with backend-computed aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(alias = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CompanySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub total_employees: u32,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub total_order_value: f64,
}

fn default_active() -> bool {
    true
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>, industry: impl Into<String>, size: Option<CompanySize>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            industry: industry.into(),
            size,
            website: None,
            created_at: None,
            is_active: true,
            total_employees: 0,
            total_orders: 0,
            total_order_value: 0.0,
        }
    }
}
