//! Unique identifiers for Buildwise records.
//!
//! Every record is keyed by a ULID wrapped in its own newtype so that a
//! `TaskId` can never be passed where a `ProjectId` is expected.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier.
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

record_id!(
    /// Unique identifier for a User
    UserId
);
record_id!(
    /// Unique identifier for a Project
    ProjectId
);
record_id!(
    /// Unique identifier for a ProjectMember link
    ProjectMemberId
);
record_id!(
    /// Unique identifier for a Task
    TaskId
);
record_id!(
    /// Unique identifier for a TaskAssignment link
    TaskAssignmentId
);
record_id!(
    /// Unique identifier for a piece of Equipment
    EquipmentId
);
record_id!(
    /// Unique identifier for a MaintenanceRecord
    MaintenanceRecordId
);
record_id!(
    /// Unique identifier for a SafetyReport
    SafetyReportId
);
record_id!(
    /// Unique identifier for a CostEstimate
    CostEstimateId
);
record_id!(
    /// Unique identifier for a LineItem
    LineItemId
);
