//! Cost estimating for Buildwise.
//!
//! [`aggregate`] rolls priced line items into category sums and a grand
//! total; [`NewCostEstimate`] turns a submitted quote into a stored
//! [`buildwise_core::CostEstimate`]; [`format_usd`] renders amounts for
//! display.

#![warn(missing_docs)]

pub mod aggregator;
pub mod currency;
pub mod estimate;

pub use aggregator::{aggregate, CostBreakdown, CostParameters, Priced};
pub use currency::format_usd;
pub use estimate::{LineItemDraft, NewCostEstimate};
