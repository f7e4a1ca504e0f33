use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};


/// An order's owner or company: the populated document, or just its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populated<T> {
    Embedded(Box<T>),
    Id(String),
}

impl<T> Populated<T> {
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Populated::Embedded(inner) => Some(inner.as_ref()),
            Populated::Id(_) => None,
        }
    }
}

/// The ordering account as populated on an order. Projections may omit
/// any field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl OrderUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderCompany {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// Commercial lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProgress,
    ReadyForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
        OrderStatus::ReadyForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::ReadyForDelivery => "ready_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::ReadyForDelivery => "Ready for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}

/// Production stage of an order, tracked separately from [`OrderStatus`].
///
/// The nominal flow is `pending → waiting_for_info | in_progress → printing →
/// quality_check → packaging → done`, with `on_hold` reachable from any stage
/// before `done`. Staff may set any stage directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingStatus {
    #[default]
    Pending,
    WaitingForInfo,
    InProgress,
    Printing,
    QualityCheck,
    Packaging,
    Done,
    OnHold,
}

impl ManufacturingStatus {
    pub const ALL: [ManufacturingStatus; 8] = [
        ManufacturingStatus::Pending,
        ManufacturingStatus::WaitingForInfo,
        ManufacturingStatus::InProgress,
        ManufacturingStatus::Printing,
        ManufacturingStatus::QualityCheck,
        ManufacturingStatus::Packaging,
        ManufacturingStatus::Done,
        ManufacturingStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManufacturingStatus::Pending => "pending",
            ManufacturingStatus::WaitingForInfo => "waiting_for_info",
            ManufacturingStatus::InProgress => "in_progress",
            ManufacturingStatus::Printing => "printing",
            ManufacturingStatus::QualityCheck => "quality_check",
            ManufacturingStatus::Packaging => "packaging",
            ManufacturingStatus::Done => "done",
            ManufacturingStatus::OnHold => "on_hold",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ManufacturingStatus::Pending => "Pending",
            ManufacturingStatus::WaitingForInfo => "Waiting for Info",
            ManufacturingStatus::InProgress => "In Progress",
            ManufacturingStatus::Printing => "Printing",
            ManufacturingStatus::QualityCheck => "Quality Check",
            ManufacturingStatus::Packaging => "Packaging",
            ManufacturingStatus::Done => "Done",
            ManufacturingStatus::OnHold => "On Hold",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ManufacturingStatus::Done)
    }

    /// Counted as "in progress" by the manufacturing stats.
    pub fn is_active_production(&self) -> bool {
        matches!(self, ManufacturingStatus::InProgress | ManufacturingStatus::Printing)
    }
}

impl std::str::FromStr for ManufacturingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManufacturingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown manufacturing status: {}", s))
    }
}

/// Order priority. Unrecognized values read as [`Priority::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Normal, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low Priority",
            Priority::Normal => "Normal Priority",
            Priority::High => "High Priority",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::parse_lenient(&raw))
    }
}

/// One entry of an order's append-only production log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingNote {
    pub date: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

/// Garment-specific specification fields. Which ones are required depends on
/// the cloth type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GarmentField {
    NeckStyle,
    SleeveType,
    Fit,
    HoodieStyle,
    PocketType,
    ZipperType,
    CollarStyle,
    ButtonCount,
    PlacketStyle,
    BagStyle,
    HandleType,
    BagDimensions,
    Reinforcement,
    CapStyle,
    VisorType,
    Closure,
    ApronStyle,
    NeckStrap,
    WaistTie,
    PocketDetails,
}

impl GarmentField {
    /// Form field name on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            GarmentField::NeckStyle => "neckStyle",
            GarmentField::SleeveType => "sleeveType",
            GarmentField::Fit => "fit",
            GarmentField::HoodieStyle => "hoodieStyle",
            GarmentField::PocketType => "pocketType",
            GarmentField::ZipperType => "zipperType",
            GarmentField::CollarStyle => "collarStyle",
            GarmentField::ButtonCount => "buttonCount",
            GarmentField::PlacketStyle => "placketStyle",
            GarmentField::BagStyle => "bagStyle",
            GarmentField::HandleType => "handleType",
            GarmentField::BagDimensions => "bagDimensions",
            GarmentField::Reinforcement => "reinforcement",
            GarmentField::CapStyle => "capStyle",
            GarmentField::VisorType => "visorType",
            GarmentField::Closure => "closure",
            GarmentField::ApronStyle => "apronStyle",
            GarmentField::NeckStrap => "neckStrap",
            GarmentField::WaistTie => "waistTie",
            GarmentField::PocketDetails => "pocketDetails",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeve_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoodie_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipper_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collar_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placket_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinforcement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apron_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck_strap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist_tie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_details: Option<String>,
}

impl GarmentSpec {
    pub fn get(&self, field: GarmentField) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, field: GarmentField, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = if value.is_empty() { None } else { Some(value) };
    }

    pub fn is_empty(&self) -> bool {
        ALL_GARMENT_FIELDS.iter().all(|field| self.get(*field).is_none())
    }

    fn slot(&self, field: GarmentField) -> &Option<String> {
        match field {
            GarmentField::NeckStyle => &self.neck_style,
            GarmentField::SleeveType => &self.sleeve_type,
            GarmentField::Fit => &self.fit,
            GarmentField::HoodieStyle => &self.hoodie_style,
            GarmentField::PocketType => &self.pocket_type,
            GarmentField::ZipperType => &self.zipper_type,
            GarmentField::CollarStyle => &self.collar_style,
            GarmentField::ButtonCount => &self.button_count,
            GarmentField::PlacketStyle => &self.placket_style,
            GarmentField::BagStyle => &self.bag_style,
            GarmentField::HandleType => &self.handle_type,
            GarmentField::BagDimensions => &self.bag_dimensions,
            GarmentField::Reinforcement => &self.reinforcement,
            GarmentField::CapStyle => &self.cap_style,
            GarmentField::VisorType => &self.visor_type,
            GarmentField::Closure => &self.closure,
            GarmentField::ApronStyle => &self.apron_style,
            GarmentField::NeckStrap => &self.neck_strap,
            GarmentField::WaistTie => &self.waist_tie,
            GarmentField::PocketDetails => &self.pocket_details,
        }
    }

    fn slot_mut(&mut self, field: GarmentField) -> &mut Option<String> {
        match field {
            GarmentField::NeckStyle => &mut self.neck_style,
            GarmentField::SleeveType => &mut self.sleeve_type,
            GarmentField::Fit => &mut self.fit,
            GarmentField::HoodieStyle => &mut self.hoodie_style,
            GarmentField::PocketType => &mut self.pocket_type,
            GarmentField::ZipperType => &mut self.zipper_type,
            GarmentField::CollarStyle => &mut self.collar_style,
            GarmentField::ButtonCount => &mut self.button_count,
            GarmentField::PlacketStyle => &mut self.placket_style,
            GarmentField::BagStyle => &mut self.bag_style,
            GarmentField::HandleType => &mut self.handle_type,
            GarmentField::BagDimensions => &mut self.bag_dimensions,
            GarmentField::Reinforcement => &mut self.reinforcement,
            GarmentField::CapStyle => &mut self.cap_style,
            GarmentField::VisorType => &mut self.visor_type,
            GarmentField::Closure => &mut self.closure,
            GarmentField::ApronStyle => &mut self.apron_style,
            GarmentField::NeckStrap => &mut self.neck_strap,
            GarmentField::WaistTie => &mut self.waist_tie,
            GarmentField::PocketDetails => &mut self.pocket_details,
        }
    }
}

pub const ALL_GARMENT_FIELDS: [GarmentField; 20] = [
    GarmentField::NeckStyle,
    GarmentField::SleeveType,
    GarmentField::Fit,
    GarmentField::HoodieStyle,
    GarmentField::PocketType,
    GarmentField::ZipperType,
    GarmentField::CollarStyle,
    GarmentField::ButtonCount,
    GarmentField::PlacketStyle,
    GarmentField::BagStyle,
    GarmentField::HandleType,
    GarmentField::BagDimensions,
    GarmentField::Reinforcement,
    GarmentField::CapStyle,
    GarmentField::VisorType,
    GarmentField::Closure,
    GarmentField::ApronStyle,
    GarmentField::NeckStrap,
    GarmentField::WaistTie,
    GarmentField::PocketDetails,
];

/// A manufacturing work order ("product details") as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(alias = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Empty until the backend assigns one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_number: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub sales_person: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub cloth_type: String,
    #[serde(default)]
    pub textile_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_weight: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color_details: Option<String>,
    #[serde(default)]
    pub size_quantities: BTreeMap<String, u32>,
    #[serde(default)]
    pub printing_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_size: Option<String>,
    #[serde(default)]
    pub logo_files: Vec<String>,
    #[serde(default)]
    pub design_files: Vec<String>,
    #[serde(default)]
    pub reference_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantone_colors: Option<String>,
    #[serde(flatten)]
    pub garment: GarmentSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub manufacturing_status: ManufacturingStatus,
    #[serde(default)]
    pub manufacturing_notes: Vec<ManufacturingNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Populated<OrderUser>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Populated<OrderCompany>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductDetails {
    pub fn new(
        id: impl Into<String>,
        order_number: impl Into<String>,
        client_name: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            order_number: order_number.into(),
            client_name: client_name.into(),
            sales_person: String::new(),
            deadline: deadline.into(),
            quantity: 0,
            priority: Priority::Normal,
            cloth_type: String::new(),
            textile_type: String::new(),
            fabric_weight: None,
            colors: Vec::new(),
            custom_color_details: None,
            size_quantities: BTreeMap::new(),
            printing_method: String::new(),
            logo_position: None,
            logo_size: None,
            logo_files: Vec::new(),
            design_files: Vec::new(),
            reference_images: Vec::new(),
            pantone_colors: None,
            garment: GarmentSpec::default(),
            special_instructions: None,
            packaging_requirements: None,
            shipping_address: None,
            manufacturing_status: ManufacturingStatus::Pending,
            manufacturing_notes: Vec::new(),
            status: None,
            total_amount: None,
            user: None,
            company: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Identity used to match local copies against backend responses.
    pub fn identity(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Name shown in the "user" column: the ordering user when populated,
    /// else the client.
    pub fn requester_name(&self) -> String {
        match self.user.as_ref().and_then(Populated::embedded) {
            Some(user) => user.full_name(),
            None => self.client_name.clone(),
        }
    }

    pub fn has_garment_specs(&self) -> bool {
        !self.garment.is_empty()
    }

    pub fn has_files(&self) -> bool {
        !self.logo_files.is_empty() || !self.design_files.is_empty() || !self.reference_images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_falls_back_to_normal() {
        let p: Priority = serde_json::from_str("\"URGENT\"").unwrap();
        assert_eq!(p, Priority::Urgent);
        let p: Priority = serde_json::from_str("\"whenever\"").unwrap();
        assert_eq!(p, Priority::Normal);
        assert_eq!(Priority::High.display_name(), "High Priority");
    }

    #[test]
    fn test_product_details_defaults_and_flattened_garment() {
        let json = serde_json::json!({
            "_id": "o1",
            "orderNumber": "ORD-1",
            "clientName": "Acme",
            "deadline": "2026-10-20",
            "priority": "high",
            "neckStyle": "crew",
            "sizeQuantities": { "M": 10, "L": 5 }
        });
        let order: ProductDetails = serde_json::from_value(json).unwrap();
        assert_eq!(order.identity(), Some("o1"));
        assert_eq!(order.manufacturing_status, ManufacturingStatus::Pending);
        assert_eq!(order.garment.get(GarmentField::NeckStyle), Some("crew"));
        assert!(order.has_garment_specs());
        assert!(!order.has_files());
        assert_eq!(order.size_quantities.values().sum::<u32>(), 15);
        assert_eq!(order.status, None);
    }

    #[test]
    fn test_manufacturing_status_wire_values() {
        for status in ManufacturingStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, serde_json::Value::String(status.as_str().to_string()));
            assert_eq!(status.as_str().parse::<ManufacturingStatus>(), Ok(status));
        }
        assert!(ManufacturingStatus::Done.is_terminal());
        assert!(ManufacturingStatus::Printing.is_active_production());
    }

    #[test]
    fn test_requester_name_prefers_user() {
        let mut order = ProductDetails::new("o1", "ORD-1", "Acme", "2026-10-20");
        assert_eq!(order.requester_name(), "Acme");
        order.user = Some(Populated::Id("64ab00".into()));
        assert_eq!(order.requester_name(), "Acme");
        order.user = Some(Populated::Embedded(Box::new(OrderUser {
            first_name: "Zoe".into(),
            last_name: "Park".into(),
            ..OrderUser::default()
        })));
        assert_eq!(order.requester_name(), "Zoe Park");
    }

    #[test]
    fn test_partial_and_unpopulated_references_decode() {
        let json = serde_json::json!([
            { "orderNumber": "ORD-1", "clientName": "Acme", "deadline": "2026-10-20",
              "user": { "_id": "u1", "firstName": "Zoe", "lastName": "Park" },
              "company": { "_id": "c1" } },
            { "orderNumber": "ORD-2", "clientName": "Globex", "deadline": "2026-10-21",
              "user": "64ab00", "company": "c9" }
        ]);
        let orders: Vec<ProductDetails> = serde_json::from_value(json).unwrap();
        assert_eq!(orders[0].requester_name(), "Zoe Park");
        assert_eq!(orders[0].company.as_ref().and_then(Populated::embedded).map(|c| c.name.as_str()), Some(""));
        assert_eq!(orders[1].user, Some(Populated::Id("64ab00".into())));
        assert_eq!(orders[1].company, Some(Populated::Id("c9".into())));
        assert_eq!(orders[1].requester_name(), "Globex");
    }
}
