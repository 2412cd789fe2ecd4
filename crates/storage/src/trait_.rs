//! Storage trait abstraction.

use async_trait::async_trait;
use buildwise_core::{
    CostEstimate, CostEstimateId, Equipment, EquipmentFilter, EquipmentId, MaintenanceRecord,
    Project, ProjectId, ProjectMember, SafetyReport, SafetyReportFilter, SafetyReportId, Task,
    TaskAssignment, TaskFilter, TaskId, User, UserId,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// The kinds of record a backend has to keep apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `User`
    User,
    /// `Project`
    Project,
    /// `ProjectMember`
    ProjectMember,
    /// `Task`
    Task,
    /// `TaskAssignment`
    TaskAssignment,
    /// `Equipment`
    Equipment,
    /// `MaintenanceRecord`
    MaintenanceRecord,
    /// `SafetyReport`
    SafetyReport,
    /// `CostEstimate`, line items included
    CostEstimate,
}

impl RecordKind {
    /// Every kind, in creation order of their directories / tables.
    pub const ALL: [RecordKind; 9] = [
        RecordKind::User,
        RecordKind::Project,
        RecordKind::ProjectMember,
        RecordKind::Task,
        RecordKind::TaskAssignment,
        RecordKind::Equipment,
        RecordKind::MaintenanceRecord,
        RecordKind::SafetyReport,
        RecordKind::CostEstimate,
    ];

    /// Stable name used as directory / entity type.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::User => "users",
            RecordKind::Project => "projects",
            RecordKind::ProjectMember => "project_members",
            RecordKind::Task => "tasks",
            RecordKind::TaskAssignment => "task_assignments",
            RecordKind::Equipment => "equipment",
            RecordKind::MaintenanceRecord => "maintenance_records",
            RecordKind::SafetyReport => "safety_reports",
            RecordKind::CostEstimate => "cost_estimates",
        }
    }
}

/// Storage abstraction for Buildwise data.
///
/// Backends implement the record primitives (`put_record` and friends)
/// which move opaque JSON documents keyed by kind and id. The typed
/// operations, list orderings and cascading deletes are provided on top
/// of them so every backend behaves the same.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Record primitives ===

    /// Insert or replace the JSON document for `(kind, id)`.
    async fn put_record(&mut self, kind: RecordKind, id: &str, json: String) -> Result<()>;

    /// Fetch the JSON document for `(kind, id)`.
    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<String>>;

    /// All JSON documents of `kind`, in no particular order.
    async fn scan_records(&self, kind: RecordKind) -> Result<Vec<String>>;

    /// Remove `(kind, id)`. Returns whether anything was removed.
    async fn remove_record(&mut self, kind: RecordKind, id: &str) -> Result<bool>;

    // === Transaction support ===

    /// Commit pending changes with a message.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Rollback pending changes.
    async fn rollback(&mut self) -> Result<()>;

    // === User operations ===

    /// Save a user (create or update).
    async fn save_user(&mut self, user: &User) -> Result<()> {
        put(self, RecordKind::User, user.id, user).await
    }

    /// Load a user by ID.
    async fn load_user(&self, id: UserId) -> Result<Option<User>> {
        get(self, RecordKind::User, id).await
    }

    /// List all users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = scan(self, RecordKind::User).await?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    // === Project operations ===

    /// Save a project (create or update).
    async fn save_project(&mut self, project: &Project) -> Result<()> {
        put(self, RecordKind::Project, project.id, project).await
    }

    /// Load a project by ID.
    async fn load_project(&self, id: ProjectId) -> Result<Option<Project>> {
        get(self, RecordKind::Project, id).await
    }

    /// List projects, most recently updated first.
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = scan(self, RecordKind::Project).await?;
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    /// Delete a project with its tasks, members, safety reports and
    /// estimates. Equipment deployed to it is detached, not deleted.
    async fn delete_project(&mut self, id: ProjectId) -> Result<bool> {
        let filter = TaskFilter { project_id: Some(id), status: None };
        for task in self.list_tasks(&filter).await? {
            self.delete_task(task.id).await?;
        }
        for member in self.list_project_members(id).await? {
            self.remove_record(RecordKind::ProjectMember, &member.id.to_string()).await?;
        }
        let reports = SafetyReportFilter { project_id: Some(id), ..Default::default() };
        for report in self.list_safety_reports(&reports).await? {
            self.delete_safety_report(report.id).await?;
        }
        for estimate in self.list_cost_estimates().await? {
            if estimate.project_id == id {
                self.delete_cost_estimate(estimate.id).await?;
            }
        }
        for mut equipment in self.list_equipment(&EquipmentFilter::default()).await? {
            if equipment.project_id == Some(id) {
                equipment.project_id = None;
                equipment.updated_at = chrono::Utc::now();
                self.save_equipment(&equipment).await?;
            }
        }
        debug!("Cascaded project {} delete", id);
        self.remove_record(RecordKind::Project, &id.to_string()).await
    }

    // === Project member operations ===

    /// Save a project membership.
    async fn save_project_member(&mut self, member: &ProjectMember) -> Result<()> {
        put(self, RecordKind::ProjectMember, member.id, member).await
    }

    /// Members of a project, in joining order.
    async fn list_project_members(&self, project_id: ProjectId) -> Result<Vec<ProjectMember>> {
        let mut members: Vec<ProjectMember> = scan(self, RecordKind::ProjectMember).await?;
        members.retain(|m| m.project_id == project_id);
        members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(members)
    }

    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()> {
        put(self, RecordKind::Task, task.id, task).await
    }

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        get(self, RecordKind::Task, id).await
    }

    /// List tasks matching the filter, oldest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = scan(self, RecordKind::Task).await?;
        tasks.retain(|t| filter.matches(t));
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    /// Delete a task and its assignments.
    async fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        for assignment in self.list_task_assignments(id).await? {
            self.remove_record(RecordKind::TaskAssignment, &assignment.id.to_string()).await?;
        }
        self.remove_record(RecordKind::Task, &id.to_string()).await
    }

    // === Task assignment operations ===

    /// Save a task assignment.
    async fn save_task_assignment(&mut self, assignment: &TaskAssignment) -> Result<()> {
        put(self, RecordKind::TaskAssignment, assignment.id, assignment).await
    }

    /// Assignments of a task, oldest first.
    async fn list_task_assignments(&self, task_id: TaskId) -> Result<Vec<TaskAssignment>> {
        let mut assignments: Vec<TaskAssignment> = scan(self, RecordKind::TaskAssignment).await?;
        assignments.retain(|a| a.task_id == task_id);
        assignments.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(assignments)
    }

    // === Equipment operations ===

    /// Save equipment (create or update).
    async fn save_equipment(&mut self, equipment: &Equipment) -> Result<()> {
        put(self, RecordKind::Equipment, equipment.id, equipment).await
    }

    /// Load equipment by ID.
    async fn load_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>> {
        get(self, RecordKind::Equipment, id).await
    }

    /// List equipment matching the filter, most recently updated first.
    async fn list_equipment(&self, filter: &EquipmentFilter) -> Result<Vec<Equipment>> {
        let mut equipment: Vec<Equipment> = scan(self, RecordKind::Equipment).await?;
        equipment.retain(|e| filter.matches(e));
        equipment.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(equipment)
    }

    /// Delete equipment and its maintenance history.
    async fn delete_equipment(&mut self, id: EquipmentId) -> Result<bool> {
        for record in self.list_maintenance_records(id).await? {
            self.remove_record(RecordKind::MaintenanceRecord, &record.id.to_string()).await?;
        }
        self.remove_record(RecordKind::Equipment, &id.to_string()).await
    }

    // === Maintenance record operations ===

    /// Save a maintenance record.
    async fn save_maintenance_record(&mut self, record: &MaintenanceRecord) -> Result<()> {
        put(self, RecordKind::MaintenanceRecord, record.id, record).await
    }

    /// Maintenance history of a piece of equipment, most recent first.
    async fn list_maintenance_records(&self, equipment_id: EquipmentId) -> Result<Vec<MaintenanceRecord>> {
        let mut records: Vec<MaintenanceRecord> = scan(self, RecordKind::MaintenanceRecord).await?;
        records.retain(|r| r.equipment_id == equipment_id);
        records.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        Ok(records)
    }

    // === Safety report operations ===

    /// Save a safety report (create or update).
    async fn save_safety_report(&mut self, report: &SafetyReport) -> Result<()> {
        put(self, RecordKind::SafetyReport, report.id, report).await
    }

    /// Load a safety report by ID.
    async fn load_safety_report(&self, id: SafetyReportId) -> Result<Option<SafetyReport>> {
        get(self, RecordKind::SafetyReport, id).await
    }

    /// List safety reports matching the filter, newest first.
    async fn list_safety_reports(&self, filter: &SafetyReportFilter) -> Result<Vec<SafetyReport>> {
        let mut reports: Vec<SafetyReport> = scan(self, RecordKind::SafetyReport).await?;
        reports.retain(|r| filter.matches(r));
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    /// Delete a safety report.
    async fn delete_safety_report(&mut self, id: SafetyReportId) -> Result<bool> {
        self.remove_record(RecordKind::SafetyReport, &id.to_string()).await
    }

    // === Cost estimate operations ===

    /// Save a cost estimate together with its line items.
    async fn save_cost_estimate(&mut self, estimate: &CostEstimate) -> Result<()> {
        put(self, RecordKind::CostEstimate, estimate.id, estimate).await
    }

    /// Load a cost estimate by ID.
    async fn load_cost_estimate(&self, id: CostEstimateId) -> Result<Option<CostEstimate>> {
        get(self, RecordKind::CostEstimate, id).await
    }

    /// List cost estimates, most recently updated first.
    async fn list_cost_estimates(&self) -> Result<Vec<CostEstimate>> {
        let mut estimates: Vec<CostEstimate> = scan(self, RecordKind::CostEstimate).await?;
        estimates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(estimates)
    }

    /// Delete a cost estimate. Its line items live in the same record.
    async fn delete_cost_estimate(&mut self, id: CostEstimateId) -> Result<bool> {
        self.remove_record(RecordKind::CostEstimate, &id.to_string()).await
    }
}

async fn put<S, T>(storage: &mut S, kind: RecordKind, id: impl std::fmt::Display, value: &T) -> Result<()>
where
    S: Storage + ?Sized,
    T: Serialize + Sync,
{
    let json = serde_json::to_string_pretty(value)?;
    storage.put_record(kind, &id.to_string(), json).await
}

async fn get<S, T>(storage: &S, kind: RecordKind, id: impl std::fmt::Display) -> Result<Option<T>>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    match storage.get_record(kind, &id.to_string()).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

async fn scan<S, T>(storage: &S, kind: RecordKind) -> Result<Vec<T>>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    storage
        .scan_records(kind)
        .await?
        .iter()
        .map(|json| serde_json::from_str(json).map_err(StorageError::from))
        .collect()
}
