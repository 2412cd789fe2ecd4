//! `/tasks/{id}` handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildwise_core::{Task, TaskAssignment, TaskId, TaskPriority, TaskStatus, Time, UserId};
use serde::Deserialize;
use tracing::info;

use super::{parse_body, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views::{Message, TaskDetail};

/// Body of `PUT /tasks/{id}`.
///
/// Title, description, status and priority keep their value when absent;
/// the schedule and effort fields are replaced, so leaving one out clears
/// it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    start_date: Option<Time>,
    due_date: Option<Time>,
    estimated_hours: Option<f64>,
    actual_hours: Option<f64>,
}

/// Body of `POST /tasks/{id}/assignments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    user_id: UserId,
}

/// `GET /tasks/{id}`: the task with assignees and project.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskDetail>> {
    const FAILURE: &str = "Failed to fetch task";
    let id: TaskId = parse_id(&id, "Task not found")?;

    let storage = state.read().await;
    let Some(task) = storage.load_task(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Task not found"));
    };
    let detail = TaskDetail::load(&**storage, task).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(detail))
}

/// `PUT /tasks/{id}`
///
/// `completedAt` is stamped with the update time when the resulting status
/// is `COMPLETED` and cleared for any other status.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TaskDetail>> {
    const FAILURE: &str = "Failed to update task";
    let id: TaskId = parse_id(&id, "Task not found")?;
    let update: TaskUpdate = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    let Some(mut task) = storage.load_task(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Task not found"));
    };

    apply_update(&mut task, update, chrono::Utc::now());

    storage.save_task(&task).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Update task {}", task.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Updated task {} -> {:?}", task.id, task.status);
    let detail = TaskDetail::load(&**storage, task).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(detail))
}

fn apply_update(task: &mut Task, update: TaskUpdate, now: Time) {
    if let Some(title) = update.title {
        task.title = title;
    }
    if update.description.is_some() {
        task.description = update.description;
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    task.start_date = update.start_date;
    task.due_date = update.due_date;
    task.estimated_hours = update.estimated_hours;
    task.actual_hours = update.actual_hours;
    task.set_status(update.status.unwrap_or(task.status), now);
}

/// `DELETE /tasks/{id}`: removes the task and its assignments.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    const FAILURE: &str = "Failed to delete task";
    let id: TaskId = parse_id(&id, "Task not found")?;

    let mut storage = state.write().await;
    if !storage.delete_task(id).await.map_err(ApiError::internal(FAILURE))? {
        return Err(ApiError::not_found("Task not found"));
    }
    storage
        .commit(&format!("Delete task {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Deleted task {}", id);
    Ok(Json(Message::new("Task deleted successfully")))
}

/// `POST /tasks/{id}/assignments`
pub async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<TaskAssignment>)> {
    const FAILURE: &str = "Failed to assign task";
    let task_id: TaskId = parse_id(&id, "Task not found")?;
    let req: NewAssignment = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    if storage.load_task(task_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Task not found"));
    }
    if storage.load_user(req.user_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let assignment = TaskAssignment::new(task_id, req.user_id);
    storage.save_task_assignment(&assignment).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Assign task {}", task_id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Assigned user {} to task {}", req.user_id, task_id);
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body, fixture};
    use serde_json::json;

    async fn stored_task(state: &AppState, project: buildwise_core::ProjectId) -> Task {
        let mut task = Task::new(project, "Frame level 3");
        task.estimated_hours = Some(120.0);
        state.write().await.save_task(&task).await.unwrap();
        task
    }

    #[tokio::test]
    async fn test_get_task_with_assignments_and_project() {
        let f = fixture().await;
        let task = stored_task(&f.state, f.project.id).await;

        let (code, _) = assign_task(
            State(f.state.clone()),
            Path(task.id.to_string()),
            body(json!({ "userId": f.foreman.id })),
        )
        .await
        .unwrap();
        assert_eq!(code, StatusCode::CREATED);

        let Json(detail) = get_task(State(f.state.clone()), Path(task.id.to_string())).await.unwrap();
        assert_eq!(detail.project.unwrap().name, "Downtown Office Complex");
        assert_eq!(detail.assignments.len(), 1);
        assert_eq!(detail.assignments[0].user.as_ref().unwrap().id, f.foreman.id);

        let json = serde_json::to_value(&detail.assignments[0]).unwrap();
        assert_eq!(json["taskId"], task.id.to_string());
        assert_eq!(json["user"]["email"], "foreman@site.test");
    }

    #[tokio::test]
    async fn test_update_sets_and_clears_completed_at() {
        let f = fixture().await;
        let task = stored_task(&f.state, f.project.id).await;
        let path = || Path(task.id.to_string());

        let Json(done) = update_task(State(f.state.clone()), path(), body(json!({ "status": "COMPLETED" })))
            .await
            .unwrap();
        assert_eq!(done.task.status, TaskStatus::Completed);
        assert!(done.task.completed_at.is_some());
        assert_eq!(done.task.title, "Frame level 3");

        let Json(reopened) = update_task(State(f.state.clone()), path(), body(json!({ "status": "REVIEW" })))
            .await
            .unwrap();
        assert!(reopened.task.completed_at.is_none());

        let stored = f.state.read().await.load_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Review);
        assert!(stored.completed_at.is_none());
    }

    #[test]
    fn test_update_replaces_schedule_fields() {
        let mut task = Task::new(buildwise_core::ProjectId::new(), "Roof");
        task.estimated_hours = Some(10.0);
        task.status = TaskStatus::InProgress;

        let update: TaskUpdate = serde_json::from_value(json!({ "title": "Roof membrane" })).unwrap();
        let now = chrono::Utc::now();
        apply_update(&mut task, update, now);

        assert_eq!(task.title, "Roof membrane");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.estimated_hours, None);
        assert_eq!(task.updated_at, now);
    }

    #[tokio::test]
    async fn test_delete_task_removes_assignments() {
        let f = fixture().await;
        let task = stored_task(&f.state, f.project.id).await;
        let (code, Json(assignment)) = assign_task(
            State(f.state.clone()),
            Path(task.id.to_string()),
            body(json!({ "userId": f.manager.id })),
        )
        .await
        .unwrap();
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(assignment.user_id, f.manager.id);

        let Json(message) = delete_task(State(f.state.clone()), Path(task.id.to_string())).await.unwrap();
        assert_eq!(message.message, "Task deleted successfully");
        assert!(f.state.read().await.list_task_assignments(task.id).await.unwrap().is_empty());

        let err = get_task(State(f.state.clone()), Path(task.id.to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_assign_unknown_user() {
        let f = fixture().await;
        let task = stored_task(&f.state, f.project.id).await;
        let err = assign_task(
            State(f.state.clone()),
            Path(task.id.to_string()),
            body(json!({ "userId": UserId::new() })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
