//! Buildwise core data models.
//!
//! This crate defines the records shared by storage, the progress and
//! costing calculators, and the HTTP server.

#![warn(missing_docs)]

// Core identities
mod id;

// People and projects
mod user;
mod project;

// Site work
mod task;
mod equipment;
mod safety;

// Estimating
mod estimate;

// Re-exports
pub use id::*;

pub use user::{User, UserRole, UserSummary};
pub use project::{Project, ProjectStatus, ProjectRef, ProjectMember};
pub use task::{Task, TaskStatus, TaskPriority, TaskAssignment, TaskFilter};
pub use equipment::{
    Equipment, EquipmentType, EquipmentStatus, EquipmentFilter,
    MaintenanceRecord, MaintenanceOutlook, MaintenanceState, DUE_SOON_DAYS,
};
pub use safety::{SafetyReport, Severity, ReportStatus, SafetyReportFilter};
pub use estimate::{CostEstimate, EstimateStatus, LineItem, CostCategory};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
