//! `/projects` handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildwise_core::{
    Project, ProjectId, ProjectMember, ProjectStatus, Task, TaskAssignment, TaskFilter,
    TaskPriority, TaskStatus, Time, UserId,
};
use buildwise_progress::{BasicProgressTracker, ProgressTracker, ProjectOverview};
use buildwise_storage::{Result as StorageResult, Storage};
use serde::Deserialize;
use tracing::{debug, info};

use super::{discard_partial, parse_body, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views::Message;

/// Body of `POST /projects`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    name: String,
    description: Option<String>,
    status: Option<ProjectStatus>,
    start_date: Option<Time>,
    end_date: Option<Time>,
    budget: Option<f64>,
    actual_cost: Option<f64>,
    address: Option<String>,
    owner_id: UserId,
    #[serde(default)]
    member_ids: Vec<UserId>,
}

/// Body of `POST /projects/{id}/tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    start_date: Option<Time>,
    due_date: Option<Time>,
    estimated_hours: Option<f64>,
    actual_hours: Option<f64>,
    #[serde(default)]
    assignee_ids: Vec<UserId>,
}

/// Query of `GET /projects/{id}/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    status: Option<TaskStatus>,
}

/// Check that every user in `ids` exists before anything is written.
async fn require_users(storage: &dyn Storage, ids: &[UserId], failure: &'static str) -> ApiResult<()> {
    for &id in ids {
        if storage.load_user(id).await.map_err(ApiError::internal(failure))?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }
    }
    Ok(())
}

async fn insert_project(storage: &mut dyn Storage, project: &Project, member_ids: &[UserId]) -> StorageResult<()> {
    storage.save_project(project).await?;
    for &user_id in member_ids {
        storage.save_project_member(&ProjectMember::new(project.id, user_id)).await?;
    }
    Ok(())
}

async fn insert_task(storage: &mut dyn Storage, task: &Task, assignee_ids: &[UserId]) -> StorageResult<()> {
    storage.save_task(task).await?;
    for &user_id in assignee_ids {
        storage.save_task_assignment(&TaskAssignment::new(task.id, user_id)).await?;
    }
    Ok(())
}

/// `GET /projects`: every project with owner, members and progress.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectOverview>>> {
    let storage = state.read().await;
    let overviews = BasicProgressTracker::new(&**storage)
        .overviews()
        .await
        .map_err(ApiError::internal("Failed to fetch projects"))?;
    debug!("Listed {} projects", overviews.len());
    Ok(Json(overviews))
}

/// `POST /projects`
pub async fn create_project(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Project>)> {
    const FAILURE: &str = "Failed to create project";
    let req: NewProject = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    if storage.load_user(req.owner_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Owner not found"));
    }
    require_users(&**storage, &req.member_ids, FAILURE).await?;

    let mut project = Project::new(req.name, req.owner_id);
    project.description = req.description;
    project.status = req.status.unwrap_or(ProjectStatus::Planning);
    project.start_date = req.start_date;
    project.end_date = req.end_date;
    project.budget = req.budget;
    project.actual_cost = req.actual_cost.unwrap_or(0.0);
    project.address = req.address;

    if let Err(e) = insert_project(&mut **storage, &project, &req.member_ids).await {
        let undo = storage.delete_project(project.id).await;
        discard_partial(&mut **storage, "project create", undo).await;
        return Err(ApiError::internal(FAILURE)(e));
    }
    storage
        .commit(&format!("Create project {}", project.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Created project {} ({})", project.id, project.name);
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/{id}`
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectOverview>> {
    const FAILURE: &str = "Failed to fetch project";
    let id: ProjectId = parse_id(&id, "Project not found")?;

    let storage = state.read().await;
    let Some(project) = storage.load_project(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Project not found"));
    };
    let overview = BasicProgressTracker::new(&**storage)
        .overview(project)
        .await
        .map_err(ApiError::internal(FAILURE))?;
    Ok(Json(overview))
}

/// `DELETE /projects/{id}`: removes the project with everything it owns.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    const FAILURE: &str = "Failed to delete project";
    let id: ProjectId = parse_id(&id, "Project not found")?;

    let mut storage = state.write().await;
    if !storage.delete_project(id).await.map_err(ApiError::internal(FAILURE))? {
        return Err(ApiError::not_found("Project not found"));
    }
    storage
        .commit(&format!("Delete project {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Deleted project {}", id);
    Ok(Json(Message::new("Project deleted successfully")))
}

/// `GET /projects/{id}/tasks`, oldest first, optionally by status.
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    const FAILURE: &str = "Failed to fetch tasks";
    let id: ProjectId = parse_id(&id, "Project not found")?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let storage = state.read().await;
    if storage.load_project(id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Project not found"));
    }
    let filter = TaskFilter { project_id: Some(id), status: query.status };
    let tasks = storage.list_tasks(&filter).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(tasks))
}

/// `POST /projects/{id}/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Task>)> {
    const FAILURE: &str = "Failed to create task";
    let project_id: ProjectId = parse_id(&id, "Project not found")?;
    let req: NewTask = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    if storage.load_project(project_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Project not found"));
    }
    require_users(&**storage, &req.assignee_ids, FAILURE).await?;

    let mut task = Task::new(project_id, req.title);
    task.description = req.description;
    task.priority = req.priority.unwrap_or(TaskPriority::Medium);
    task.start_date = req.start_date;
    task.due_date = req.due_date;
    task.estimated_hours = req.estimated_hours;
    task.actual_hours = req.actual_hours;
    if let Some(status) = req.status {
        task.set_status(status, task.created_at);
    }

    if let Err(e) = insert_task(&mut **storage, &task, &req.assignee_ids).await {
        let undo = storage.delete_task(task.id).await;
        discard_partial(&mut **storage, "task create", undo).await;
        return Err(ApiError::internal(FAILURE)(e));
    }
    storage
        .commit(&format!("Create task {}", task.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Created task {} in project {}", task.id, project_id);
    Ok((StatusCode::CREATED, Json(task)))
}
