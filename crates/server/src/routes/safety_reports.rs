//! `/safety-reports` handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use buildwise_core::{
    ProjectId, ReportStatus, SafetyReport, SafetyReportFilter, SafetyReportId, Severity, Time,
    UserId,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{parse_body, parse_id, ACTOR_HEADER};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views::{Message, SafetyReportView};

/// Body of `POST /safety-reports`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSafetyReport {
    title: String,
    description: String,
    severity: Severity,
    location: Option<String>,
    #[serde(default)]
    photos: Vec<String>,
    project_id: ProjectId,
    reporter_id: Option<UserId>,
}

/// Body of `PUT /safety-reports/{id}`.
///
/// Absent fields keep their value except `resolvedAt`, which is replaced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReportUpdate {
    title: Option<String>,
    description: Option<String>,
    severity: Option<Severity>,
    status: Option<ReportStatus>,
    location: Option<String>,
    photos: Option<Vec<String>>,
    resolution: Option<String>,
    resolved_at: Option<Time>,
}

/// The user filing a report: the body's `reporterId`, else the actor
/// header. There is no fallback identity.
fn resolve_actor(body: Option<UserId>, headers: &HeaderMap) -> ApiResult<UserId> {
    if let Some(id) = body {
        return Ok(id);
    }
    let Some(raw) = headers.get(ACTOR_HEADER) else {
        warn!("Safety report without reporter");
        return Err(ApiError::BadRequest(format!(
            "reporterId or {} header is required",
            ACTOR_HEADER
        )));
    };
    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is not a valid user id", ACTOR_HEADER)))
}

/// `GET /safety-reports`, newest first, filtered by `status`, `severity`
/// and `projectId`.
pub async fn list_safety_reports(
    State(state): State<AppState>,
    query: Result<Query<SafetyReportFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<SafetyReportView>>> {
    const FAILURE: &str = "Failed to fetch safety reports";
    let Query(filter) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let storage = state.read().await;
    let reports = storage.list_safety_reports(&filter).await.map_err(ApiError::internal(FAILURE))?;

    let mut views = Vec::with_capacity(reports.len());
    for report in reports {
        views.push(
            SafetyReportView::load(&**storage, report)
                .await
                .map_err(ApiError::internal(FAILURE))?,
        );
    }
    debug!("Listed {} safety reports", views.len());
    Ok(Json(views))
}

/// `POST /safety-reports`: filed as `OPEN`.
pub async fn create_safety_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SafetyReportView>)> {
    const FAILURE: &str = "Failed to create safety report";
    let req: NewSafetyReport = parse_body(&body, FAILURE)?;
    let reporter_id = resolve_actor(req.reporter_id, &headers)?;

    let mut storage = state.write().await;
    if storage.load_project(req.project_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Project not found"));
    }
    if storage.load_user(reporter_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Reporter not found"));
    }

    let mut report = SafetyReport::new(req.project_id, reporter_id, req.title, req.description, req.severity);
    report.location = req.location;
    report.photos = req.photos;

    storage.save_safety_report(&report).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("File safety report {}", report.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Filed {:?} safety report {} on project {}", report.severity, report.id, report.project_id);
    let view = SafetyReportView::load(&**storage, report).await.map_err(ApiError::internal(FAILURE))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /safety-reports/{id}`
pub async fn get_safety_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SafetyReportView>> {
    const FAILURE: &str = "Failed to fetch safety report";
    let id: SafetyReportId = parse_id(&id, "Safety report not found")?;

    let storage = state.read().await;
    let Some(report) = storage.load_safety_report(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Safety report not found"));
    };
    let view = SafetyReportView::load(&**storage, report).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(view))
}

/// `PUT /safety-reports/{id}`
pub async fn update_safety_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<SafetyReportView>> {
    const FAILURE: &str = "Failed to update safety report";
    let id: SafetyReportId = parse_id(&id, "Safety report not found")?;
    let update: SafetyReportUpdate = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    let Some(mut report) = storage.load_safety_report(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Safety report not found"));
    };

    apply_update(&mut report, update, chrono::Utc::now());
    storage.save_safety_report(&report).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Update safety report {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Updated safety report {} -> {:?}", id, report.status);
    let view = SafetyReportView::load(&**storage, report).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(view))
}

fn apply_update(report: &mut SafetyReport, update: SafetyReportUpdate, now: Time) {
    if let Some(title) = update.title {
        report.title = title;
    }
    if let Some(description) = update.description {
        report.description = description;
    }
    if let Some(severity) = update.severity {
        report.severity = severity;
    }
    if let Some(status) = update.status {
        report.status = status;
    }
    if update.location.is_some() {
        report.location = update.location;
    }
    if let Some(photos) = update.photos {
        report.photos = photos;
    }
    if update.resolution.is_some() {
        report.resolution = update.resolution;
    }
    report.resolved_at = update.resolved_at;
    report.updated_at = now;
}

/// `DELETE /safety-reports/{id}`
pub async fn delete_safety_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    const FAILURE: &str = "Failed to delete safety report";
    let id: SafetyReportId = parse_id(&id, "Safety report not found")?;

    let mut storage = state.write().await;
    if !storage.delete_safety_report(id).await.map_err(ApiError::internal(FAILURE))? {
        return Err(ApiError::not_found("Safety report not found"));
    }
    storage
        .commit(&format!("Delete safety report {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Deleted safety report {}", id);
    Ok(Json(Message::new("Safety report deleted successfully")))
}
