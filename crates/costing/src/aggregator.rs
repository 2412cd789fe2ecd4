//! Cost aggregation for estimates.

use buildwise_core::CostCategory;
use serde::{Deserialize, Serialize};

/// Anything that can be priced as `quantity * unit_price` in a category.
pub trait Priced {
    /// Quantity
    fn quantity(&self) -> f64;

    /// Price per unit
    fn unit_price(&self) -> f64;

    /// Cost bucket
    fn category(&self) -> &CostCategory;

    /// `quantity * unit_price`.
    fn line_total(&self) -> f64 {
        self.quantity() * self.unit_price()
    }
}

impl Priced for buildwise_core::LineItem {
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

/// Overhead and profit applied on top of the line items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostParameters {
    /// Flat overhead added to the subtotal
    pub overhead_cost: f64,

    /// Profit margin in percent of subtotal plus overhead
    pub profit_margin_percent: f64,
}

/// Totals derived from a set of line items.
///
/// Values are not rounded; currency rounding belongs to whoever displays
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// `Labor` items
    pub labor: f64,

    /// `Materials` items
    pub materials: f64,

    /// `Equipment` items
    pub equipment: f64,

    /// Items whose category is none of the three above
    pub unrecognized: f64,

    /// Every item
    pub subtotal: f64,

    /// Overhead as given
    pub overhead: f64,

    /// `(subtotal + overhead) * margin / 100`
    pub profit: f64,

    /// `subtotal + overhead + profit`
    pub grand_total: f64,
}

impl CostBreakdown {
    /// Sum of the three named buckets.
    pub fn categorized(&self) -> f64 {
        self.labor + self.materials + self.equipment
    }
}

/// Roll line items up into category sums and a grand total.
///
/// Categories are matched exactly; an item with any other label still
/// counts toward `subtotal` and lands in `unrecognized`. Inputs are not
/// validated, so negative quantities or prices flow through arithmetically.
pub fn aggregate<'a, T, I>(items: I, params: CostParameters) -> CostBreakdown
where
    T: Priced + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut breakdown = CostBreakdown::default();

    for item in items {
        let total = item.line_total();
        match item.category() {
            CostCategory::Labor => breakdown.labor += total,
            CostCategory::Materials => breakdown.materials += total,
            CostCategory::Equipment => breakdown.equipment += total,
            CostCategory::Other(_) => breakdown.unrecognized += total,
        }
        breakdown.subtotal += total;
    }

    let with_overhead = breakdown.subtotal + params.overhead_cost;
    breakdown.overhead = params.overhead_cost;
    breakdown.profit = with_overhead * params.profit_margin_percent / 100.0;
    breakdown.grand_total = with_overhead + breakdown.profit;
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(f64, f64, CostCategory);

    impl Priced for Item {
        fn quantity(&self) -> f64 {
            self.0
        }
        fn unit_price(&self) -> f64 {
            self.1
        }
        fn category(&self) -> &CostCategory {
            &self.2
        }
    }

    fn params(overhead_cost: f64, profit_margin_percent: f64) -> CostParameters {
        CostParameters { overhead_cost, profit_margin_percent }
    }

    #[test]
    fn test_worked_example() {
        let items = [
            Item(300.0, 175.0, CostCategory::Materials),
            Item(500.0, 50.0, CostCategory::Labor),
        ];
        let b = aggregate(&items, params(0.0, 20.0));

        assert_eq!(b.materials, 52_500.0);
        assert_eq!(b.labor, 25_000.0);
        assert_eq!(b.equipment, 0.0);
        assert_eq!(b.subtotal, 77_500.0);
        assert_eq!(b.profit, 15_500.0);
        assert_eq!(b.grand_total, 93_000.0);
    }

    #[test]
    fn test_empty_items_total_is_overhead() {
        let items: [Item; 0] = [];
        let b = aggregate(&items, params(1_250.0, 0.0));
        assert_eq!(b.subtotal, 0.0);
        assert_eq!(b.categorized(), 0.0);
        assert_eq!(b.grand_total, 1_250.0);
    }

    #[test]
    fn test_margin_applies_to_overhead_too() {
        let items = [Item(10.0, 10.0, CostCategory::Equipment)];
        let b = aggregate(&items, params(100.0, 10.0));
        assert_eq!(b.profit, 20.0);
        assert_eq!(b.grand_total, 220.0);
    }

    #[test]
    fn test_unrecognized_category_counts_only_toward_subtotal() {
        let items = [
            Item(1.0, 100.0, CostCategory::Labor),
            Item(2.0, 50.0, CostCategory::from_label("labor")),
            Item(1.0, 25.0, CostCategory::from_label("Permits")),
        ];
        let b = aggregate(&items, CostParameters::default());

        assert_eq!(b.labor, 100.0);
        assert_eq!(b.unrecognized, 125.0);
        assert_eq!(b.subtotal, 225.0);
        assert!(b.categorized() < b.subtotal);
    }

    #[test]
    fn test_categorized_equals_subtotal_when_all_recognized() {
        let items = [
            Item(3.0, 12.5, CostCategory::Labor),
            Item(7.0, 3.0, CostCategory::Materials),
            Item(1.0, 900.0, CostCategory::Equipment),
        ];
        let b = aggregate(&items, params(50.0, 15.0));
        assert_eq!(b.categorized(), b.subtotal);
        assert!(b.grand_total >= b.subtotal && b.subtotal >= 0.0);
    }

    #[test]
    fn test_negative_inputs_propagate() {
        let items = [
            Item(-2.0, 10.0, CostCategory::Materials),
            Item(1.0, 5.0, CostCategory::Materials),
        ];
        let b = aggregate(&items, CostParameters::default());
        assert_eq!(b.materials, -15.0);
        assert_eq!(b.grand_total, -15.0);
    }

    #[test]
    fn test_items_are_borrowed_from_line_items() {
        let item = buildwise_core::LineItem {
            id: buildwise_core::LineItemId::new(),
            description: "Excavator day".into(),
            quantity: 2.0,
            unit: "day".into(),
            unit_price: 650.0,
            total_price: 1300.0,
            category: CostCategory::Equipment,
        };
        let b = aggregate(std::slice::from_ref(&item), CostParameters::default());
        assert_eq!(b.equipment, 1300.0);
    }
}
