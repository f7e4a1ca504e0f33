use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Men,
    Women,
    Uni,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Men, Gender::Women, Gender::Uni];
}

/// Rows of the order blank's size grid, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlankSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
    Xxxxl,
}

impl BlankSize {
    pub const ALL: [BlankSize; 8] = [
        BlankSize::Xs,
        BlankSize::S,
        BlankSize::M,
        BlankSize::L,
        BlankSize::Xl,
        BlankSize::Xxl,
        BlankSize::Xxxl,
        BlankSize::Xxxxl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlankSize::Xs => "xs",
            BlankSize::S => "s",
            BlankSize::M => "m",
            BlankSize::L => "l",
            BlankSize::Xl => "xl",
            BlankSize::Xxl => "xxl",
            BlankSize::Xxxl => "xxxl",
            BlankSize::Xxxxl => "xxxxl",
        }
    }
}

/// Form inputs arrive as numbers, numeric strings or `""`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCounts {
    #[serde(default, deserialize_with = "lenient_count")]
    pub men: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub women: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub uni: u32,
}

impl SizeCounts {
    pub fn get(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Men => self.men,
            Gender::Women => self.women,
            Gender::Uni => self.uni,
        }
    }

    pub fn set(&mut self, gender: Gender, count: u32) {
        match gender {
            Gender::Men => self.men = count,
            Gender::Women => self.women = count,
            Gender::Uni => self.uni = count,
        }
    }

    pub fn has_values(&self) -> bool {
        self.men > 0 || self.women > 0 || self.uni > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeGrid {
    pub xs: SizeCounts,
    pub s: SizeCounts,
    pub m: SizeCounts,
    pub l: SizeCounts,
    pub xl: SizeCounts,
    pub xxl: SizeCounts,
    pub xxxl: SizeCounts,
    pub xxxxl: SizeCounts,
}

impl SizeGrid {
    pub fn row(&self, size: BlankSize) -> &SizeCounts {
        match size {
            BlankSize::Xs => &self.xs,
            BlankSize::S => &self.s,
            BlankSize::M => &self.m,
            BlankSize::L => &self.l,
            BlankSize::Xl => &self.xl,
            BlankSize::Xxl => &self.xxl,
            BlankSize::Xxxl => &self.xxxl,
            BlankSize::Xxxxl => &self.xxxxl,
        }
    }

    pub fn row_mut(&mut self, size: BlankSize) -> &mut SizeCounts {
        match size {
            BlankSize::Xs => &mut self.xs,
            BlankSize::S => &mut self.s,
            BlankSize::M => &mut self.m,
            BlankSize::L => &mut self.l,
            BlankSize::Xl => &mut self.xl,
            BlankSize::Xxl => &mut self.xxl,
            BlankSize::Xxxl => &mut self.xxxl,
            BlankSize::Xxxxl => &mut self.xxxxl,
        }
    }

    pub fn total(&self, gender: Gender) -> u32 {
        BlankSize::ALL.iter().map(|size| self.row(*size).get(gender)).sum()
    }

    pub fn grand_total(&self) -> u32 {
        Gender::ALL.iter().map(|gender| self.total(*gender)).sum()
    }
}

/// Printable order sheet, as stored under `/api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderBlank {
    pub order_number: String,
    pub client_name: String,
    pub sales_person: String,
    /// `YYYY-MM-DD`.
    pub deadline: String,
    #[serde(deserialize_with = "lenient_count")]
    pub quantity: u32,
    pub priority: Priority,
    pub cloth_type: String,
    pub textile_type: String,
    pub colors: String,
    pub custom_color_details: String,
    pub logo_position: String,
    pub logo_size: String,
    pub special_instructions: String,
    pub packaging_requirements: String,
    pub shipping_address: String,
    pub sizes: SizeGrid,
}

/// Body of `POST /api/orders/send-telegram`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBlankSubmission {
    #[serde(flatten)]
    pub blank: OrderBlank,
    pub grand_total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_totals_accept_string_inputs() {
        let json = serde_json::json!({
            "orderNumber": "B-7",
            "sizes": {
                "m": { "men": "10", "women": 4, "uni": "" },
                "xxl": { "uni": 3 }
            }
        });
        let blank: OrderBlank = serde_json::from_value(json).unwrap();
        assert_eq!(blank.sizes.total(Gender::Men), 10);
        assert_eq!(blank.sizes.total(Gender::Women), 4);
        assert_eq!(blank.sizes.total(Gender::Uni), 3);
        assert_eq!(blank.sizes.grand_total(), 17);
        assert!(blank.sizes.row(BlankSize::M).has_values());
        assert!(!blank.sizes.row(BlankSize::Xs).has_values());
        assert_eq!(blank.priority, Priority::Normal);
    }

    #[test]
    fn test_submission_flattens_blank() {
        let mut blank = OrderBlank {
            order_number: "B-1".into(),
            ..OrderBlank::default()
        };
        blank.sizes.row_mut(BlankSize::S).set(Gender::Uni, 2);
        let body = serde_json::to_value(OrderBlankSubmission {
            grand_total: blank.sizes.grand_total(),
            blank,
        })
        .unwrap();
        assert_eq!(body["orderNumber"], "B-1");
        assert_eq!(body["grandTotal"], 2);
        assert_eq!(body["sizes"]["s"]["uni"], 2);
    }
}
