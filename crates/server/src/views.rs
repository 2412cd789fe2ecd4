//! Response bodies that embed related records.
//!
//! Stored records reference each other by id; these views resolve the
//! references the client needs so a single request renders a page.

use buildwise_core::{
    CostEstimate, Equipment, MaintenanceOutlook, MaintenanceRecord, ProjectId, ProjectRef,
    SafetyReport, Task, TaskAssignment, Time, UserId, UserSummary,
};
use buildwise_storage::{Result, Storage};
use serde::Serialize;

/// Maintenance records embedded in an equipment listing.
pub const LISTED_MAINTENANCE_RECORDS: usize = 10;

/// Confirmation body for deletes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Human-readable confirmation
    pub message: String,
}

impl Message {
    /// Wrap `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// An assignment with its assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentView {
    /// The stored assignment
    #[serde(flatten)]
    pub assignment: TaskAssignment,
    /// Assignee, if the user still exists
    pub user: Option<UserSummary>,
}

/// A task with its assignments and project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetail {
    /// The stored task
    #[serde(flatten)]
    pub task: Task,
    /// Assignments, oldest first
    pub assignments: Vec<AssignmentView>,
    /// Owning project
    pub project: Option<ProjectRef>,
}

/// Equipment with its project, operator and maintenance state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentView {
    /// The stored equipment
    #[serde(flatten)]
    pub equipment: Equipment,
    /// Project it is deployed to
    pub project: Option<ProjectRef>,
    /// Current operator
    pub operator: Option<UserSummary>,
    /// Maintenance history, most recent first
    pub maintenance_records: Vec<MaintenanceRecord>,
    /// Next-service outlook, when one is scheduled
    pub maintenance: Option<MaintenanceOutlook>,
}

/// A safety report with its project and reporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyReportView {
    /// The stored report
    #[serde(flatten)]
    pub report: SafetyReport,
    /// Project the report belongs to
    pub project: Option<ProjectRef>,
    /// Who filed it
    pub reporter: Option<UserSummary>,
}

/// An estimate with its project. Line items are part of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimateView {
    /// The stored estimate, line items included
    #[serde(flatten)]
    pub estimate: CostEstimate,
    /// Estimated project
    pub project: Option<ProjectRef>,
}

async fn project_ref(storage: &dyn Storage, id: ProjectId) -> Result<Option<ProjectRef>> {
    Ok(storage.load_project(id).await?.map(|p| p.reference()))
}

async fn user_summary(storage: &dyn Storage, id: UserId) -> Result<Option<UserSummary>> {
    Ok(storage.load_user(id).await?.map(|u| u.summary()))
}

impl TaskDetail {
    /// Resolve a task's assignees and project.
    pub async fn load(storage: &dyn Storage, task: Task) -> Result<Self> {
        let mut assignments = Vec::new();
        for assignment in storage.list_task_assignments(task.id).await? {
            let user = user_summary(storage, assignment.user_id).await?;
            assignments.push(AssignmentView { assignment, user });
        }
        let project = project_ref(storage, task.project_id).await?;
        Ok(Self { task, assignments, project })
    }
}

impl EquipmentView {
    /// Resolve references and attach up to `history` maintenance records
    /// (all of them when `None`).
    pub async fn load(
        storage: &dyn Storage,
        equipment: Equipment,
        history: Option<usize>,
        now: Time,
    ) -> Result<Self> {
        let project = match equipment.project_id {
            Some(id) => project_ref(storage, id).await?,
            None => None,
        };
        let operator = match equipment.operator_id {
            Some(id) => user_summary(storage, id).await?,
            None => None,
        };

        let mut maintenance_records = storage.list_maintenance_records(equipment.id).await?;
        if let Some(limit) = history {
            maintenance_records.truncate(limit);
        }

        Ok(Self {
            maintenance: equipment.maintenance_outlook(now),
            equipment,
            project,
            operator,
            maintenance_records,
        })
    }
}

impl SafetyReportView {
    /// Resolve a report's project and reporter.
    pub async fn load(storage: &dyn Storage, report: SafetyReport) -> Result<Self> {
        let project = project_ref(storage, report.project_id).await?;
        let reporter = user_summary(storage, report.reporter_id).await?;
        Ok(Self { report, project, reporter })
    }
}

impl CostEstimateView {
    /// Resolve an estimate's project.
    pub async fn load(storage: &dyn Storage, estimate: CostEstimate) -> Result<Self> {
        let project = project_ref(storage, estimate.project_id).await?;
        Ok(Self { estimate, project })
    }
}
