//! Task model - a unit of site work inside a project.

use serde::{Deserialize, Serialize};
use crate::id::{ProjectId, TaskAssignmentId, TaskId, UserId};
use crate::Time;

/// A task belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Owning project
    pub project_id: ProjectId,

    /// Task title
    pub title: String,

    /// Detailed description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Planned start
    pub start_date: Option<Time>,

    /// Due date
    pub due_date: Option<Time>,

    /// Estimated effort in hours
    pub estimated_hours: Option<f64>,

    /// Logged effort in hours
    pub actual_hours: Option<f64>,

    /// Set when the task enters `Completed`
    pub completed_at: Option<Time>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl Task {
    /// Create a `Todo` task with medium priority.
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: TaskId::new(),
            project_id,
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            start_date: None,
            due_date: None,
            estimated_hours: None,
            actual_hours: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the task to `status`, stamping or clearing `completed_at`.
    ///
    /// Completion is stamped on every transition into `Completed`, and any
    /// other status clears it.
    pub fn set_status(&mut self, status: TaskStatus, now: Time) {
        self.status = status;
        self.completed_at = status.is_completed().then_some(now);
        self.updated_at = now;
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Awaiting sign-off
    Review,
    /// Done
    Completed,
    /// Waiting on something outside the crew's control
    Blocked,
}

impl TaskStatus {
    /// Only `Completed` counts toward project progress.
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Assignment of a user to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    /// Unique identifier
    pub id: TaskAssignmentId,

    /// Assigned task
    pub task_id: TaskId,

    /// Assignee
    pub user_id: UserId,

    /// When assigned
    pub assigned_at: Time,
}

impl TaskAssignment {
    /// Assign `user_id` to `task_id` now.
    pub fn new(task_id: TaskId, user_id: UserId) -> Self {
        Self {
            id: TaskAssignmentId::new(),
            task_id,
            user_id,
            assigned_at: chrono::Utc::now(),
        }
    }
}

/// Filter for querying tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Filter by project
    pub project_id: Option<ProjectId>,

    /// Filter by status
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Whether `task` passes every set criterion.
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.map_or(true, |id| task.project_id == id)
            && self.status.map_or(true, |s| task.status == s)
    }
}
