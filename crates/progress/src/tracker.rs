//! Progress tracking service.

use async_trait::async_trait;
use buildwise_core::{Project, ProjectId, TaskFilter, UserSummary};
use buildwise_storage::{Result, Storage};
use serde::Serialize;
use tracing::debug;

use crate::calculator::ProjectProgress;

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Progress of one project, `None` if the project does not exist.
    async fn project_progress(&self, project_id: ProjectId) -> Result<Option<ProjectProgress>>;

    /// A project with its owner, member count and progress.
    async fn overview(&self, project: Project) -> Result<ProjectOverview>;

    /// Overviews of every project, most recently updated first.
    async fn overviews(&self) -> Result<Vec<ProjectOverview>>;
}

/// A project as the project list shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    /// The stored project
    #[serde(flatten)]
    pub project: Project,

    /// Owner, if the user still exists
    pub owner: Option<UserSummary>,

    /// Members, in joining order
    pub members: Vec<UserSummary>,

    /// Percentage complete (0-100)
    pub progress: u8,

    /// All tasks of the project
    pub tasks_count: usize,

    /// Completed tasks of the project
    pub completed_tasks_count: usize,

    /// Number of members
    pub members_count: usize,
}

/// Progress tracker reading straight from storage.
///
/// Nothing is cached: every call recomputes from the current tasks.
pub struct BasicProgressTracker<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> BasicProgressTracker<'a, S> {
    /// Create a new progress tracker over `storage`.
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Calculate project progress from its tasks.
    async fn calculate_progress(&self, project_id: ProjectId) -> Result<ProjectProgress> {
        let filter = TaskFilter { project_id: Some(project_id), status: None };
        let tasks = self.storage.list_tasks(&filter).await?;
        Ok(ProjectProgress::from_statuses(tasks.iter().map(|t| t.status)))
    }
}

#[async_trait]
impl<'a, S: Storage + ?Sized> ProgressTracker for BasicProgressTracker<'a, S> {
    async fn project_progress(&self, project_id: ProjectId) -> Result<Option<ProjectProgress>> {
        if self.storage.load_project(project_id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(self.calculate_progress(project_id).await?))
    }

    async fn overview(&self, project: Project) -> Result<ProjectOverview> {
        let progress = self.calculate_progress(project.id).await?;
        let owner = self.storage.load_user(project.owner_id).await?.map(|u| u.summary());

        let mut members = Vec::new();
        for member in self.storage.list_project_members(project.id).await? {
            if let Some(user) = self.storage.load_user(member.user_id).await? {
                members.push(user.summary());
            }
        }

        debug!(
            "Project {} at {}% ({}/{} tasks)",
            project.id, progress.progress, progress.completed_tasks, progress.total_tasks
        );

        Ok(ProjectOverview {
            project,
            owner,
            members_count: members.len(),
            members,
            progress: progress.progress,
            tasks_count: progress.total_tasks,
            completed_tasks_count: progress.completed_tasks,
        })
    }

    async fn overviews(&self) -> Result<Vec<ProjectOverview>> {
        let projects = self.storage.list_projects().await?;
        let mut overviews = Vec::with_capacity(projects.len());
        for project in projects {
            overviews.push(self.overview(project).await?);
        }
        Ok(overviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_core::{ProjectMember, Task, TaskStatus, User, UserRole};
    use buildwise_storage::MemoryStorage;

    async fn seeded() -> (MemoryStorage, Project, Project) {
        let mut storage = MemoryStorage::new();
        let owner = User::new("john@site.test", Some("John Smith".into()), UserRole::ProjectManager);
        storage.save_user(&owner).await.unwrap();

        let mut busy = Project::new("Office Complex", owner.id);
        busy.updated_at = chrono::Utc::now() - chrono::Duration::hours(1);
        let empty = Project::new("Parking Deck", owner.id);
        storage.save_project(&busy).await.unwrap();
        storage.save_project(&empty).await.unwrap();
        storage.save_project_member(&ProjectMember::new(busy.id, owner.id)).await.unwrap();

        for status in [TaskStatus::Completed, TaskStatus::Todo, TaskStatus::Blocked, TaskStatus::Review] {
            let mut task = Task::new(busy.id, format!("{:?}", status));
            task.status = status;
            storage.save_task(&task).await.unwrap();
        }

        (storage, busy, empty)
    }

    #[tokio::test]
    async fn test_project_progress() {
        let (storage, busy, empty) = seeded().await;
        let tracker = BasicProgressTracker::new(&storage);

        let p = tracker.project_progress(busy.id).await.unwrap().unwrap();
        assert_eq!((p.progress, p.total_tasks, p.completed_tasks), (25, 4, 1));

        let p = tracker.project_progress(empty.id).await.unwrap().unwrap();
        assert_eq!(p.progress, 0);

        assert!(tracker.project_progress(ProjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overviews_are_ordered_and_populated() {
        let (storage, busy, empty) = seeded().await;
        let tracker = BasicProgressTracker::new(&storage);

        let overviews = tracker.overviews().await.unwrap();
        assert_eq!(overviews.len(), 2);
        assert_eq!(overviews[0].project.id, empty.id);
        assert_eq!(overviews[1].project.id, busy.id);

        let busy = &overviews[1];
        assert_eq!(busy.progress, 25);
        assert_eq!(busy.tasks_count, 4);
        assert_eq!(busy.completed_tasks_count, 1);
        assert_eq!(busy.members_count, 1);
        assert_eq!(busy.owner.as_ref().and_then(|o| o.name.as_deref()), Some("John Smith"));
    }

    #[tokio::test]
    async fn test_overview_json_shape() {
        let (storage, busy, _) = seeded().await;
        let tracker = BasicProgressTracker::new(&storage);

        let overview = tracker.overview(busy).await.unwrap();
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["name"], "Office Complex");
        assert_eq!(json["progress"], 25);
        assert_eq!(json["tasksCount"], 4);
        assert_eq!(json["completedTasksCount"], 1);
        assert_eq!(json["owner"]["email"], "john@site.test");
    }
}
