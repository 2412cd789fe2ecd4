//! JSON file storage implementation.
//!
//! Stores each record as a pretty-printed JSON file under
//! `<root>/<kind>/<id>.json` and keeps small per-record meta markers
//! (version + updated_at) under `<root>/meta/<kind>/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::trait_::{RecordKind, Result, Storage};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    pending: Arc<Mutex<bool>>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the per-kind data and meta
    /// directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for kind in RecordKind::ALL {
            fs::create_dir_all(root.join(kind.as_str())).await?;
            fs::create_dir_all(root.join("meta").join(kind.as_str())).await?;
        }

        debug!("Opened JSON storage at {}", root.display());
        Ok(Self {
            root,
            pending: Arc::new(Mutex::new(false)),
        })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, kind: RecordKind, id: &str) -> PathBuf {
        self.root.join(kind.as_str()).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: RecordKind, id: &str) -> PathBuf {
        self.root.join("meta").join(kind.as_str()).join(format!("{}.meta.json", id))
    }

    async fn set_pending(&self) {
        *self.pending.lock().await = true;
    }

    /// Whether writes happened since the last commit / rollback.
    pub async fn is_pending(&self) -> bool {
        *self.pending.lock().await
    }

    /// Read and increment per-record version, return new version.
    async fn bump_version(&self, kind: RecordKind, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn put_record(&mut self, kind: RecordKind, id: &str, json: String) -> Result<()> {
        fs::write(self.record_path(kind, id), json.as_bytes()).await?;
        let version = self.bump_version(kind, id).await?;
        debug!("Wrote {}/{} v{}", kind.as_str(), id, version);

        self.set_pending().await;
        Ok(())
    }

    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<String>> {
        read_file(&self.record_path(kind, id)).await
    }

    async fn scan_records(&self, kind: RecordKind) -> Result<Vec<String>> {
        list_dir(&self.root.join(kind.as_str())).await
    }

    async fn remove_record(&mut self, kind: RecordKind, id: &str) -> Result<bool> {
        let removed = match fs::remove_file(self.record_path(kind, id)).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if removed {
            let _ = fs::remove_file(self.meta_path(kind, id)).await;
            self.set_pending().await;
        }
        Ok(removed)
    }

    async fn commit(&mut self, _message: &str) -> Result<()> {
        // Files are written eagerly; commit only clears the pending marker.
        *self.pending.lock().await = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        *self.pending.lock().await = false;
        Ok(())
    }
}

async fn read_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(Some(json)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Some(item) = read_file(&entry.path()).await? {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_core::{
        CostCategory, CostEstimate, CostEstimateId, EquipmentFilter, EquipmentType, Equipment,
        EstimateStatus, LineItem, LineItemId, MaintenanceRecord, MaintenanceRecordId, Project,
        ProjectMember, SafetyReport, SafetyReportFilter, Severity, Task, TaskAssignment, TaskFilter,
        TaskStatus, User, UserRole,
    };
    use chrono::{Duration, Utc};

    async fn storage() -> (tempfile::TempDir, JsonStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join(".buildwise")).await.unwrap();
        (dir, storage)
    }

    fn estimate(project: &Project, updated_offset_minutes: i64) -> CostEstimate {
        let at = Utc::now() + Duration::minutes(updated_offset_minutes);
        CostEstimate {
            id: CostEstimateId::new(),
            name: format!("Estimate {}", updated_offset_minutes),
            project_id: project.id,
            status: EstimateStatus::Draft,
            total_cost: 100.0,
            labor_cost: 100.0,
            material_cost: 0.0,
            equipment_cost: 0.0,
            other_cost: 0.0,
            overhead_cost: 0.0,
            profit_margin: 0.0,
            valid_until: None,
            line_items: vec![LineItem {
                id: LineItemId::new(),
                description: "Crew day".into(),
                quantity: 1.0,
                unit: "day".into(),
                unit_price: 100.0,
                total_price: 100.0,
                category: CostCategory::Labor,
            }],
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let (_dir, mut storage) = storage().await;
        let user = User::new("john@site.test", Some("John".into()), UserRole::ProjectManager);

        storage.save_user(&user).await.unwrap();
        let loaded = storage.load_user(user.id).await.unwrap().unwrap();
        assert_eq!(loaded, user);
        assert!(storage.is_pending().await);

        storage.commit("add user").await.unwrap();
        assert!(!storage.is_pending().await);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let (_dir, storage) = storage().await;
        assert!(storage.load_project(buildwise_core::ProjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_projects_listed_most_recent_first() {
        let (_dir, mut storage) = storage().await;
        let owner = User::new("o@site.test", None, UserRole::ProjectManager);

        let mut older = Project::new("Older", owner.id);
        older.updated_at = Utc::now() - Duration::hours(2);
        let newer = Project::new("Newer", owner.id);

        storage.save_project(&older).await.unwrap();
        storage.save_project(&newer).await.unwrap();

        let names: Vec<_> = storage.list_projects().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_estimates_keep_line_items_and_order() {
        let (_dir, mut storage) = storage().await;
        let project = Project::new("Depot", buildwise_core::UserId::new());
        let first = estimate(&project, -10);
        let second = estimate(&project, 0);

        storage.save_cost_estimate(&first).await.unwrap();
        storage.save_cost_estimate(&second).await.unwrap();

        let listed = storage.list_cost_estimates().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].line_items, first.line_items);

        assert!(storage.delete_cost_estimate(first.id).await.unwrap());
        assert!(!storage.delete_cost_estimate(first.id).await.unwrap());
        assert_eq!(storage.list_cost_estimates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_task_filter_and_assignment_cascade() {
        let (_dir, mut storage) = storage().await;
        let project = Project::new("Bridge", buildwise_core::UserId::new());
        let worker = User::new("w@site.test", None, UserRole::Worker);

        let mut done = Task::new(project.id, "Piles");
        done.status = TaskStatus::Completed;
        let open = Task::new(project.id, "Deck");
        let elsewhere = Task::new(buildwise_core::ProjectId::new(), "Other job");
        for t in [&done, &open, &elsewhere] {
            storage.save_task(t).await.unwrap();
        }
        storage.save_task_assignment(&TaskAssignment::new(open.id, worker.id)).await.unwrap();

        let filter = TaskFilter { project_id: Some(project.id), status: None };
        assert_eq!(storage.list_tasks(&filter).await.unwrap().len(), 2);
        let filter = TaskFilter { project_id: Some(project.id), status: Some(TaskStatus::Completed) };
        assert_eq!(storage.list_tasks(&filter).await.unwrap()[0].id, done.id);

        assert_eq!(storage.list_task_assignments(open.id).await.unwrap().len(), 1);
        assert!(storage.delete_task(open.id).await.unwrap());
        assert!(storage.list_task_assignments(open.id).await.unwrap().is_empty());
        assert!(storage.load_task(open.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_equipment_delete_cascades_maintenance() {
        let (_dir, mut storage) = storage().await;
        let equipment = Equipment::new("Loader 7", EquipmentType::Loader);
        storage.save_equipment(&equipment).await.unwrap();

        for days_ago in [30, 5] {
            let record = MaintenanceRecord {
                id: MaintenanceRecordId::new(),
                equipment_id: equipment.id,
                maintenance_type: "Service".into(),
                description: format!("Service {} days ago", days_ago),
                cost: Some(250.0),
                performed_at: Utc::now() - Duration::days(days_ago),
                performed_by: None,
                next_due: None,
            };
            storage.save_maintenance_record(&record).await.unwrap();
        }

        let history = storage.list_maintenance_records(equipment.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].performed_at > history[1].performed_at);

        assert!(storage.delete_equipment(equipment.id).await.unwrap());
        assert!(storage.list_maintenance_records(equipment.id).await.unwrap().is_empty());
        assert!(storage.list_equipment(&EquipmentFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_project_delete_cascades() {
        let (_dir, mut storage) = storage().await;
        let owner = User::new("o@site.test", None, UserRole::ProjectManager);
        let project = Project::new("Tower", owner.id);
        storage.save_project(&project).await.unwrap();
        storage.save_project_member(&ProjectMember::new(project.id, owner.id)).await.unwrap();
        storage.save_task(&Task::new(project.id, "Excavate")).await.unwrap();
        storage
            .save_safety_report(&SafetyReport::new(project.id, owner.id, "Trip hazard", "Cables", Severity::Low))
            .await
            .unwrap();
        storage.save_cost_estimate(&estimate(&project, 0)).await.unwrap();
        let mut crane = Equipment::new("Crane", EquipmentType::Crane);
        crane.project_id = Some(project.id);
        storage.save_equipment(&crane).await.unwrap();

        assert!(storage.delete_project(project.id).await.unwrap());

        assert!(storage.load_project(project.id).await.unwrap().is_none());
        assert!(storage.list_project_members(project.id).await.unwrap().is_empty());
        assert!(storage.list_tasks(&TaskFilter::default()).await.unwrap().is_empty());
        assert!(storage.list_safety_reports(&SafetyReportFilter::default()).await.unwrap().is_empty());
        assert!(storage.list_cost_estimates().await.unwrap().is_empty());
        let crane = storage.load_equipment(crane.id).await.unwrap().unwrap();
        assert_eq!(crane.project_id, None);
    }

    #[tokio::test]
    async fn test_reports_listed_newest_first() {
        let (_dir, mut storage) = storage().await;
        let project = Project::new("Yard", buildwise_core::UserId::new());
        let mut old = SafetyReport::new(project.id, project.owner_id, "Old", "d", Severity::High);
        old.created_at = Utc::now() - Duration::days(1);
        let new = SafetyReport::new(project.id, project.owner_id, "New", "d", Severity::Critical);
        storage.save_safety_report(&old).await.unwrap();
        storage.save_safety_report(&new).await.unwrap();

        let titles: Vec<_> = storage
            .list_safety_reports(&SafetyReportFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);

        let critical = SafetyReportFilter { severity: Some(Severity::Critical), ..Default::default() };
        assert_eq!(storage.list_safety_reports(&critical).await.unwrap().len(), 1);
    }
}
