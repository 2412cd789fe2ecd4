//! Cost estimate model - priced line items rolled up into a quote.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::id::{CostEstimateId, LineItemId, ProjectId};
use crate::Time;

/// A cost estimate for (part of) a project.
///
/// All cost fields are derived from `line_items`, `overhead_cost` and
/// `profit_margin`; they are computed once when the estimate is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Unique identifier
    pub id: CostEstimateId,

    /// Estimate name
    pub name: String,

    /// Estimated project
    pub project_id: ProjectId,

    /// Approval status
    pub status: EstimateStatus,

    /// Grand total including overhead and profit
    pub total_cost: f64,

    /// Sum of `Labor` line items
    pub labor_cost: f64,

    /// Sum of `Materials` line items
    pub material_cost: f64,

    /// Sum of `Equipment` line items
    pub equipment_cost: f64,

    /// Sum of line items with an unrecognized category
    #[serde(default)]
    pub other_cost: f64,

    /// Flat overhead added before profit
    pub overhead_cost: f64,

    /// Profit margin in percent
    pub profit_margin: f64,

    /// Quote expiry
    pub valid_until: Option<Time>,

    /// Priced items, in submission order
    pub line_items: Vec<LineItem>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// Estimate approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimateStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    Expired,
}

/// A priced line on an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier
    pub id: LineItemId,

    /// What is being priced
    pub description: String,

    /// Quantity
    pub quantity: f64,

    /// Unit of measure
    pub unit: String,

    /// Price per unit
    pub unit_price: f64,

    /// `quantity * unit_price`
    pub total_price: f64,

    /// Cost bucket
    pub category: CostCategory,
}

/// Cost bucket of a line item.
///
/// Labels are matched exactly (`"Labor"`, `"Materials"`, `"Equipment"`);
/// anything else, including a different casing, is kept verbatim in
/// `Other` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CostCategory {
    Labor,
    Materials,
    Equipment,
    Other(String),
}

impl CostCategory {
    /// The wire label.
    pub fn as_str(&self) -> &str {
        match self {
            CostCategory::Labor => "Labor",
            CostCategory::Materials => "Materials",
            CostCategory::Equipment => "Equipment",
            CostCategory::Other(label) => label,
        }
    }

    /// Parse a label with exact, case-sensitive matching.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Labor" => CostCategory::Labor,
            "Materials" => CostCategory::Materials,
            "Equipment" => CostCategory::Equipment,
            other => CostCategory::Other(other.to_string()),
        }
    }

    /// One of the three named buckets.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, CostCategory::Other(_))
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CostCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CostCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(CostCategory::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_matching_is_exact() {
        assert_eq!(CostCategory::from_label("Labor"), CostCategory::Labor);
        assert_eq!(CostCategory::from_label("labor"), CostCategory::Other("labor".into()));
        assert_eq!(CostCategory::from_label("Material"), CostCategory::Other("Material".into()));
        assert!(!CostCategory::from_label("Equipment ").is_recognized());
    }

    #[test]
    fn test_unrecognized_label_survives_serialization() {
        let cat: CostCategory = serde_json::from_str("\"Permits\"").unwrap();
        assert_eq!(cat, CostCategory::Other("Permits".into()));
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"Permits\"");
    }

    #[test]
    fn test_line_item_wire_names() {
        let item = LineItem {
            id: LineItemId::new(),
            description: "Rebar".into(),
            quantity: 2.0,
            unit: "t".into(),
            unit_price: 900.0,
            total_price: 1800.0,
            category: CostCategory::Materials,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["unitPrice"], 900.0);
        assert_eq!(json["totalPrice"], 1800.0);
        assert_eq!(json["category"], "Materials");
    }
}
