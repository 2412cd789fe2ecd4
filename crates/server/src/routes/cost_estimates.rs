//! `/cost-estimates` handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildwise_core::CostEstimateId;
use buildwise_costing::{format_usd, NewCostEstimate};
use tracing::{debug, info};

use super::{parse_body, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views::{CostEstimateView, Message};

/// `GET /cost-estimates`: most recently updated first, with line items.
pub async fn list_cost_estimates(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CostEstimateView>>> {
    const FAILURE: &str = "Failed to fetch cost estimates";
    let storage = state.read().await;

    let estimates = storage.list_cost_estimates().await.map_err(ApiError::internal(FAILURE))?;
    let mut views = Vec::with_capacity(estimates.len());
    for estimate in estimates {
        views.push(
            CostEstimateView::load(&**storage, estimate)
                .await
                .map_err(ApiError::internal(FAILURE))?,
        );
    }
    debug!("Listed {} cost estimates", views.len());
    Ok(Json(views))
}

/// `POST /cost-estimates`
///
/// Prices the submitted line items and stores the estimate together with
/// them as a single `DRAFT` record.
pub async fn create_cost_estimate(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CostEstimateView>)> {
    const FAILURE: &str = "Failed to create cost estimate";
    let req: NewCostEstimate = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    if storage.load_project(req.project_id).await.map_err(ApiError::internal(FAILURE))?.is_none() {
        return Err(ApiError::not_found("Project not found"));
    }

    let estimate = req.into_estimate(chrono::Utc::now());
    storage.save_cost_estimate(&estimate).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Create cost estimate {}", estimate.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!(
        "Created cost estimate {} ({}, {} line items, total {})",
        estimate.id,
        estimate.name,
        estimate.line_items.len(),
        format_usd(Some(estimate.total_cost))
    );
    let view = CostEstimateView::load(&**storage, estimate).await.map_err(ApiError::internal(FAILURE))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /cost-estimates/{id}`
pub async fn get_cost_estimate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CostEstimateView>> {
    const FAILURE: &str = "Failed to fetch cost estimate";
    let id: CostEstimateId = parse_id(&id, "Cost estimate not found")?;

    let storage = state.read().await;
    let Some(estimate) = storage.load_cost_estimate(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Cost estimate not found"));
    };
    let view = CostEstimateView::load(&**storage, estimate).await.map_err(ApiError::internal(FAILURE))?;
    Ok(Json(view))
}

/// `DELETE /cost-estimates/{id}`: the line items go with it.
pub async fn delete_cost_estimate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    const FAILURE: &str = "Failed to delete cost estimate";
    let id: CostEstimateId = parse_id(&id, "Cost estimate not found")?;

    let mut storage = state.write().await;
    if !storage.delete_cost_estimate(id).await.map_err(ApiError::internal(FAILURE))? {
        return Err(ApiError::not_found("Cost estimate not found"));
    }
    storage
        .commit(&format!("Delete cost estimate {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Deleted cost estimate {}", id);
    Ok(Json(Message::new("Cost estimate deleted successfully")))
}
