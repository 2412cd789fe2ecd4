//! Project model - a construction job and the people attached to it.

use serde::{Deserialize, Serialize};
use crate::id::{ProjectId, ProjectMemberId, UserId};
use crate::Time;

/// A construction project.
///
/// Progress is deliberately absent: it is derived from the project's tasks
/// on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Planned start
    pub start_date: Option<Time>,

    /// Planned end
    pub end_date: Option<Time>,

    /// Approved budget
    pub budget: Option<f64>,

    /// Spend to date
    #[serde(default)]
    pub actual_cost: f64,

    /// Site address
    pub address: Option<String>,

    /// Owning user
    pub owner_id: UserId,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Project {
    /// Create a project in the planning state.
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            budget: None,
            actual_cost: 0.0,
            address: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reference embedded in child records.
    pub fn reference(&self) -> ProjectRef {
        ProjectRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

/// The id / name pair embedded in task, equipment, report and estimate
/// responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,
}

/// Membership of a user in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Unique identifier
    pub id: ProjectMemberId,

    /// Project joined
    pub project_id: ProjectId,

    /// Member
    pub user_id: UserId,

    /// When the user joined
    pub joined_at: Time,
}

impl ProjectMember {
    /// Link a user to a project now.
    pub fn new(project_id: ProjectId, user_id: UserId) -> Self {
        Self {
            id: ProjectMemberId::new(),
            project_id,
            user_id,
            joined_at: chrono::Utc::now(),
        }
    }
}
