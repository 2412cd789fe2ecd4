//! Progress Tracking
//!
//! Project completion figures and the dashboard summaries built on top of
//! stored records.

#![warn(missing_docs)]

pub mod calculator;
pub mod tracker;
pub mod dashboard;

pub use calculator::ProjectProgress;
pub use tracker::{ProgressTracker, ProjectOverview, BasicProgressTracker};
pub use dashboard::{Dashboard, ProjectStats, SafetyStats, EquipmentStats, EstimateStats};
