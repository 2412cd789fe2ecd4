//! Building stored estimates from submitted quotes.

use buildwise_core::{
    CostCategory, CostEstimate, CostEstimateId, EstimateStatus, LineItem, LineItemId, ProjectId,
    Time,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{aggregate, CostParameters, Priced};

/// A line item as submitted, before it is priced and given an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    /// What is being priced
    pub description: String,

    /// Quantity
    pub quantity: f64,

    /// Unit of measure
    pub unit: String,

    /// Price per unit
    pub unit_price: f64,

    /// Cost bucket label
    pub category: CostCategory,
}

impl Priced for LineItemDraft {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn category(&self) -> &CostCategory {
        &self.category
    }
}

impl LineItemDraft {
    fn priced(self) -> LineItem {
        LineItem {
            id: LineItemId::new(),
            total_price: self.line_total(),
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            category: self.category,
        }
    }
}

/// Request body for creating a cost estimate.
///
/// Missing `overheadCost` and `profitMargin` count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCostEstimate {
    /// Estimate name
    pub name: String,

    /// Estimated project
    pub project_id: ProjectId,

    /// Items to price, in order
    pub line_items: Vec<LineItemDraft>,

    /// Profit margin in percent
    #[serde(default)]
    pub profit_margin: Option<f64>,

    /// Flat overhead
    #[serde(default)]
    pub overhead_cost: Option<f64>,

    /// Quote expiry
    #[serde(default)]
    pub valid_until: Option<Time>,
}

impl NewCostEstimate {
    /// Overhead and margin with their defaults applied.
    pub fn parameters(&self) -> CostParameters {
        CostParameters {
            overhead_cost: self.overhead_cost.unwrap_or(0.0),
            profit_margin_percent: self.profit_margin.unwrap_or(0.0),
        }
    }

    /// Price every line item and produce a `Draft` estimate stamped `now`.
    pub fn into_estimate(self, now: Time) -> CostEstimate {
        let params = self.parameters();
        let breakdown = aggregate(&self.line_items, params);

        debug!(
            "Priced {} line items for {:?}: subtotal {}, total {}",
            self.line_items.len(),
            self.name,
            breakdown.subtotal,
            breakdown.grand_total
        );

        CostEstimate {
            id: CostEstimateId::new(),
            name: self.name,
            project_id: self.project_id,
            status: EstimateStatus::Draft,
            total_cost: breakdown.grand_total,
            labor_cost: breakdown.labor,
            material_cost: breakdown.materials,
            equipment_cost: breakdown.equipment,
            other_cost: breakdown.unrecognized,
            overhead_cost: params.overhead_cost,
            profit_margin: params.profit_margin_percent,
            valid_until: self.valid_until,
            line_items: self.line_items.into_iter().map(LineItemDraft::priced).collect(),
            created_at: now,
            updated_at: now,
        }
    }
}
