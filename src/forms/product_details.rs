use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use super::validation::{FieldError, FormError, Rule, Touched, ValidationErrors};
use crate::clients::OrderClient;
use crate::domain::{GarmentField, GarmentSpec, Priority, ProductDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClothType {
    TShirts,
    Hoodies,
    Polos,
    Ecobags,
    Caps,
    Aprons,
}

impl ClothType {
    pub const ALL: [ClothType; 6] = [
        ClothType::TShirts,
        ClothType::Hoodies,
        ClothType::Polos,
        ClothType::Ecobags,
        ClothType::Caps,
        ClothType::Aprons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothType::TShirts => "t-shirts",
            ClothType::Hoodies => "hoodies",
            ClothType::Polos => "polos",
            ClothType::Ecobags => "ecobags",
            ClothType::Caps => "caps",
            ClothType::Aprons => "aprons",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClothType::TShirts => "T-Shirts",
            ClothType::Hoodies => "Hoodies",
            ClothType::Polos => "Polo Shirts",
            ClothType::Ecobags => "Eco Bags",
            ClothType::Caps => "Caps",
            ClothType::Aprons => "Aprons",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClothType::TShirts => "Cotton, Poly-cotton, Performance fabrics",
            ClothType::Hoodies => "Fleece, Cotton blends, Sweatshirt materials",
            ClothType::Polos => "Pique cotton, Performance polo fabrics",
            ClothType::Ecobags => "Canvas, Non-woven, Recycled materials",
            ClothType::Caps => "Cotton twill, Mesh, Performance materials",
            ClothType::Aprons => "Canvas, Poly-cotton, Waterproof materials",
        }
    }

    /// Garment fields that must be filled for this cloth type.
    pub fn required_fields(&self) -> &'static [GarmentField] {
        match self {
            ClothType::TShirts => &[GarmentField::NeckStyle, GarmentField::SleeveType, GarmentField::Fit],
            ClothType::Hoodies => &[GarmentField::HoodieStyle, GarmentField::PocketType],
            ClothType::Polos => &[GarmentField::CollarStyle, GarmentField::ButtonCount],
            ClothType::Ecobags => &[GarmentField::BagStyle, GarmentField::HandleType, GarmentField::BagDimensions],
            ClothType::Caps => &[GarmentField::CapStyle, GarmentField::VisorType],
            ClothType::Aprons => &[GarmentField::ApronStyle],
        }
    }

    pub fn sizes(&self) -> &'static [&'static str] {
        match self {
            ClothType::Caps => &CAP_SIZES,
            ClothType::Ecobags => &BAG_SIZES,
            _ => &APPAREL_SIZES,
        }
    }
}

impl std::str::FromStr for ClothType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClothType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown cloth type: {}", s))
    }
}

pub const APPAREL_SIZES: [&str; 8] = ["XS", "S", "M", "L", "XL", "2XL", "3XL", "4XL"];
pub const CAP_SIZES: [&str; 4] = ["One Size", "Adjustable", "S/M", "L/XL"];
pub const BAG_SIZES: [&str; 4] = ["Small", "Medium", "Large", "Custom"];

pub const TEXTILE_TYPES: &[(&str, &str)] = &[
    ("cotton", "100% Cotton"),
    ("poly-cotton", "Poly-Cotton Blend"),
    ("polyester", "100% Polyester"),
    ("performance", "Performance Fabric"),
    ("organic-cotton", "Organic Cotton"),
    ("bamboo", "Bamboo Fiber"),
    ("fleece", "Fleece"),
    ("canvas", "Canvas"),
    ("non-woven", "Non-Woven"),
    ("mesh", "Mesh"),
];

/// `(value, label, hex)`.
pub const COLOR_OPTIONS: &[(&str, &str, &str)] = &[
    ("white", "White", "#FFFFFF"),
    ("black", "Black", "#000000"),
    ("navy", "Navy Blue", "#000080"),
    ("royal-blue", "Royal Blue", "#4169E1"),
    ("red", "Red", "#FF0000"),
    ("forest-green", "Forest Green", "#228B22"),
    ("gray", "Gray", "#808080"),
    ("maroon", "Maroon", "#800000"),
    ("yellow", "Yellow", "#FFFF00"),
    ("orange", "Orange", "#FFA500"),
    ("purple", "Purple", "#800080"),
    ("pink", "Pink", "#FFC0CB"),
    ("brown", "Brown", "#A52A2A"),
    ("custom", "Custom Color", "#CCCCCC"),
];

pub const PRINTING_METHODS: &[(&str, &str)] = &[
    ("screen-printing", "Screen Printing"),
    ("embroidery", "Embroidery"),
    ("heat-transfer", "Heat Transfer"),
    ("vinyl", "Vinyl Printing"),
    ("digital-print", "Digital Print"),
    ("sublimation", "Sublimation"),
    ("debossed", "Debossed"),
    ("laser-engraving", "Laser Engraving"),
];

const BASE_FIELDS: [&str; 9] = [
    "clientName",
    "salesPerson",
    "deadline",
    "quantity",
    "clothType",
    "textileType",
    "colors",
    "printingMethod",
    "priority",
];

/// Detailed production order entered by staff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDetailsForm {
    /// Optional; the backend generates one when blank.
    pub order_number: String,
    pub client_name: String,
    pub sales_person: String,
    pub deadline: String,
    pub cloth_type: Option<ClothType>,
    pub textile_type: String,
    pub fabric_weight: Option<f64>,
    colors: Vec<String>,
    pub custom_color_details: String,
    size_quantities: BTreeMap<String, u32>,
    pub printing_method: String,
    pub logo_position: String,
    pub logo_size: String,
    pub pantone_colors: String,
    pub garment: GarmentSpec,
    pub special_instructions: String,
    pub packaging_requirements: String,
    pub shipping_address: String,
    pub priority: Priority,
    touched: Touched,
    submitted_order_id: Option<String>,
}

impl ProductDetailsForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn set_color(&mut self, color: &str, selected: bool) {
        let present = self.colors.iter().any(|c| c == color);
        if selected && !present {
            self.colors.push(color.to_string());
        } else if !selected {
            self.colors.retain(|c| c != color);
        }
    }

    pub fn sizes(&self) -> &'static [&'static str] {
        self.cloth_type.map(|c| c.sizes()).unwrap_or(&APPAREL_SIZES)
    }

    /// A quantity of zero removes the size.
    pub fn set_size_quantity(&mut self, size: &str, quantity: u32) {
        if quantity > 0 {
            self.size_quantities.insert(size.to_string(), quantity);
        } else {
            self.size_quantities.remove(size);
        }
    }

    pub fn size_quantity(&self, size: &str) -> u32 {
        self.size_quantities.get(size).copied().unwrap_or(0)
    }

    /// Order quantity: the sum of the per-size quantities.
    pub fn quantity(&self) -> u32 {
        self.size_quantities.values().sum()
    }

    pub fn has_size_quantities(&self) -> bool {
        self.size_quantities.values().any(|q| *q > 0)
    }

    pub fn submitted_order_id(&self) -> Option<&str> {
        self.submitted_order_id.as_deref()
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.mark(field);
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("clientName", &self.client_name, &[Rule::Required]);
        errors.check("salesPerson", &self.sales_person, &[Rule::Required]);
        errors.check("deadline", &self.deadline, &[Rule::Required]);
        errors.check("quantity", &self.quantity().to_string(), &[Rule::Required, Rule::Min(1)]);
        if self.cloth_type.is_none() {
            errors.add("clothType", FieldError::Required);
        }
        errors.check("textileType", &self.textile_type, &[Rule::Required]);
        if self.colors.is_empty() {
            errors.add("colors", FieldError::Required);
        }
        if self.colors.iter().any(|c| c == "custom") {
            errors.check("customColorDetails", &self.custom_color_details, &[Rule::Required]);
        }
        errors.check("printingMethod", &self.printing_method, &[Rule::Required]);
        if let Some(cloth_type) = self.cloth_type {
            for field in cloth_type.required_fields() {
                if self.garment.get(*field).is_none() {
                    errors.add(field.name(), FieldError::Required);
                }
            }
        }
        errors
    }

    pub fn field_error(&self, field: &'static str) -> Option<String> {
        let errors = self.validate();
        let error = errors.get(field)?;
        if !self.touched.is_touched(field) {
            return None;
        }
        Some(match error {
            FieldError::Min(n) => format!("Minimum value is {}", n),
            other => other.message(field),
        })
    }

    pub fn to_order(&self) -> Result<ProductDetails, ValidationErrors> {
        self.validate().into_result()?;
        let optional = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string);

        let mut order = ProductDetails::new("", self.order_number.trim(), self.client_name.clone(), self.deadline.clone());
        order.id = None;
        order.sales_person = self.sales_person.clone();
        order.quantity = self.quantity();
        order.priority = self.priority;
        order.cloth_type = self.cloth_type.map(|c| c.as_str().to_string()).unwrap_or_default();
        order.textile_type = self.textile_type.clone();
        order.fabric_weight = self.fabric_weight;
        order.colors = self.colors.clone();
        order.custom_color_details = optional(&self.custom_color_details);
        order.size_quantities = self.size_quantities.clone();
        order.printing_method = self.printing_method.clone();
        order.logo_position = optional(&self.logo_position);
        order.logo_size = optional(&self.logo_size);
        order.pantone_colors = optional(&self.pantone_colors);
        order.garment = self.garment.clone();
        order.special_instructions = optional(&self.special_instructions);
        order.packaging_requirements = optional(&self.packaging_requirements);
        order.shipping_address = optional(&self.shipping_address);
        Ok(order)
    }

    #[instrument(skip(self, orders), fields(client = %self.client_name))]
    pub async fn submit(&mut self, orders: &OrderClient) -> Result<ProductDetails, FormError> {
        let order = match self.to_order() {
            Ok(order) => order,
            Err(errors) => {
                self.touched.mark_all(&BASE_FIELDS);
                for field in errors.fields() {
                    self.touched.mark(field);
                }
                return Err(FormError::Invalid(errors));
            }
        };
        match orders.submit_order(&order).await {
            Ok(created) => {
                info!(order_number = %created.order_number, "Product details submitted");
                self.submitted_order_id = created.identity().map(str::to_string);
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "Error submitting product details");
                Err(FormError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{mock_api, respond_next};
    use serde_json::json;

    fn hoodie_form() -> ProductDetailsForm {
        let mut form = ProductDetailsForm::new();
        form.client_name = "Acme".into();
        form.sales_person = "Dana".into();
        form.deadline = "2026-11-30".into();
        form.cloth_type = Some(ClothType::Hoodies);
        form.textile_type = "fleece".into();
        form.printing_method = "embroidery".into();
        form.set_color("black", true);
        form.set_size_quantity("M", 20);
        form.set_size_quantity("L", 15);
        form.garment.set(GarmentField::HoodieStyle, "pullover");
        form.garment.set(GarmentField::PocketType, "kangaroo");
        form
    }

    #[test]
    fn test_quantity_is_sum_of_sizes() {
        let mut form = hoodie_form();
        assert_eq!(form.quantity(), 35);
        form.set_size_quantity("L", 0);
        assert_eq!(form.quantity(), 20);
        assert!(form.has_size_quantities());
    }

    #[test]
    fn test_garment_fields_follow_cloth_type() {
        let mut form = hoodie_form();
        assert!(form.validate().is_empty());

        form.cloth_type = Some(ClothType::TShirts);
        let errors = form.validate();
        assert!(errors.contains("neckStyle"));
        assert!(errors.contains("sleeveType"));
        assert!(errors.contains("fit"));
        assert!(!errors.contains("hoodieStyle"));

        form.cloth_type = Some(ClothType::Caps);
        assert_eq!(form.sizes(), &CAP_SIZES);
    }

    #[test]
    fn test_custom_color_requires_details() {
        let mut form = hoodie_form();
        form.set_color("custom", true);
        assert_eq!(form.validate().get("customColorDetails"), Some(&FieldError::Required));
        form.custom_color_details = "Pantone 7621 C".into();
        assert!(form.validate().is_empty());
    }

    #[tokio::test]
    async fn test_submit_omits_blank_order_number() {
        let (api, _storage, mut receiver) = mock_api();
        let client = OrderClient::new(api);
        let mut form = hoodie_form();

        let task = tokio::spawn(async move {
            let result = form.submit(&client).await;
            (form, result)
        });
        let request = respond_next(
            &mut receiver,
            201,
            json!({ "success": true, "data": { "_id": "pd9", "orderNumber": "ORD-2026-009" } }),
        )
        .await;
        let body = request.body.unwrap();
        assert!(body.get("orderNumber").is_none());
        assert_eq!(body["quantity"], json!(35));
        assert_eq!(body["hoodieStyle"], json!("pullover"));
        assert_eq!(body["clothType"], json!("hoodies"));

        let (form, result) = task.await.unwrap();
        assert_eq!(result.unwrap().order_number, "ORD-2026-009");
        assert_eq!(form.submitted_order_id(), Some("pd9"));
    }
}
