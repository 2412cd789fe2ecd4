//! Route table and request helpers.

use std::str::FromStr;

use axum::routing::{get, post};
use axum::Router;
use buildwise_storage::Storage;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub mod cost_estimates;
pub mod dashboard;
pub mod equipment;
pub mod projects;
pub mod safety_reports;
pub mod tasks;
pub mod users;

/// Header naming the acting user when the body does not.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Build the API router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route(
            "/projects/:id",
            get(projects::get_project).delete(projects::delete_project),
        )
        .route(
            "/projects/:id/tasks",
            get(projects::list_project_tasks).post(projects::create_task),
        )
        .route(
            "/tasks/:id",
            get(tasks::get_task).put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/tasks/:id/assignments", post(tasks::assign_task))
        .route(
            "/cost-estimates",
            get(cost_estimates::list_cost_estimates).post(cost_estimates::create_cost_estimate),
        )
        .route(
            "/cost-estimates/:id",
            get(cost_estimates::get_cost_estimate).delete(cost_estimates::delete_cost_estimate),
        )
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipment/:id/maintenance", post(equipment::record_maintenance))
        .route(
            "/safety-reports",
            get(safety_reports::list_safety_reports).post(safety_reports::create_safety_report),
        )
        .route(
            "/safety-reports/:id",
            get(safety_reports::get_safety_report)
                .put(safety_reports::update_safety_report)
                .delete(safety_reports::delete_safety_report),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/dashboard", get(dashboard::get_dashboard))
        .with_state(state)
}

/// Parse a path id. Anything that is not a valid id cannot name a stored
/// record, so it is reported the same way as a missing one.
pub(crate) fn parse_id<T: FromStr>(raw: &str, not_found: &str) -> ApiResult<T> {
    raw.parse().map_err(|_| ApiError::not_found(not_found))
}

/// Decode a JSON body; failures surface as the route's generic error.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8], failure: &'static str) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(ApiError::internal(failure))
}

/// Clean up after a multi-record write failed part way. `undo` removes
/// what was stored; its own failure is logged since the write error is
/// what the caller reports.
pub(crate) async fn discard_partial<T, E: std::fmt::Display>(
    storage: &mut dyn Storage,
    what: &str,
    undo: Result<T, E>,
) {
    if let Err(e) = undo {
        warn!("Failed to undo partial {}: {}", what, e);
    }
    if let Err(e) = storage.rollback().await {
        warn!("Rollback after partial {} failed: {}", what, e);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_core::TaskId;

    #[test]
    fn test_parse_id_rejects_garbage_as_not_found() {
        let err = parse_id::<TaskId>("not-a-ulid", "Task not found").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Task not found"));
    }

    #[test]
    fn test_parse_body_failure_is_generic() {
        let err = parse_body::<serde_json::Value>(b"{", "Failed to create task").unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "Failed to create task"));
    }

    #[test]
    fn test_router_builds() {
        let state = AppState::new(buildwise_storage::MemoryStorage::new());
        let _ = router(state);
    }
}
