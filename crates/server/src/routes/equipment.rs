//! `/equipment` handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildwise_core::{
    Equipment, EquipmentFilter, EquipmentId, EquipmentStatus, EquipmentType, MaintenanceRecord,
    MaintenanceRecordId, ProjectId, Time, UserId,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::{discard_partial, parse_body, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views::{EquipmentView, Message, LISTED_MAINTENANCE_RECORDS};

/// Editable equipment fields, shared by create and update.
///
/// On update, `name`, `type` and `status` keep their value when absent;
/// every other field is replaced, so leaving one out clears it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFields {
    name: Option<String>,
    #[serde(rename = "type")]
    equipment_type: Option<EquipmentType>,
    status: Option<EquipmentStatus>,
    model: Option<String>,
    serial_number: Option<String>,
    purchase_date: Option<Time>,
    purchase_price: Option<f64>,
    hourly_rate: Option<f64>,
    daily_rate: Option<f64>,
    last_maintenance: Option<Time>,
    next_maintenance: Option<Time>,
    location: Option<String>,
    notes: Option<String>,
    project_id: Option<ProjectId>,
    operator_id: Option<UserId>,
}

impl EquipmentFields {
    fn apply(self, equipment: &mut Equipment, now: Time) {
        if let Some(name) = self.name {
            equipment.name = name;
        }
        if let Some(equipment_type) = self.equipment_type {
            equipment.equipment_type = equipment_type;
        }
        if let Some(status) = self.status {
            equipment.status = status;
        }
        equipment.model = self.model;
        equipment.serial_number = self.serial_number;
        equipment.purchase_date = self.purchase_date;
        equipment.purchase_price = self.purchase_price;
        equipment.hourly_rate = self.hourly_rate;
        equipment.daily_rate = self.daily_rate;
        equipment.last_maintenance = self.last_maintenance;
        equipment.next_maintenance = self.next_maintenance;
        equipment.location = self.location;
        equipment.notes = self.notes;
        equipment.project_id = self.project_id;
        equipment.operator_id = self.operator_id;
        equipment.updated_at = now;
    }
}

/// Body of `POST /equipment/{id}/maintenance`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenance {
    #[serde(rename = "type")]
    maintenance_type: String,
    description: String,
    cost: Option<f64>,
    performed_at: Option<Time>,
    performed_by: Option<String>,
    next_due: Option<Time>,
}

/// `GET /equipment`, optionally filtered by `status` and `type`.
///
/// Each entry carries its ten most recent maintenance records.
pub async fn list_equipment(
    State(state): State<AppState>,
    query: Result<Query<EquipmentFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<EquipmentView>>> {
    const FAILURE: &str = "Failed to fetch equipment";
    let Query(filter) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let storage = state.read().await;
    let now = chrono::Utc::now();
    let equipment = storage.list_equipment(&filter).await.map_err(ApiError::internal(FAILURE))?;

    let mut views = Vec::with_capacity(equipment.len());
    for item in equipment {
        views.push(
            EquipmentView::load(&**storage, item, Some(LISTED_MAINTENANCE_RECORDS), now)
                .await
                .map_err(ApiError::internal(FAILURE))?,
        );
    }
    debug!("Listed {} pieces of equipment", views.len());
    Ok(Json(views))
}

/// `POST /equipment`: registered as `AVAILABLE` unless a status is given.
pub async fn create_equipment(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<EquipmentView>)> {
    const FAILURE: &str = "Failed to create equipment";
    let fields: EquipmentFields = parse_body(&body, FAILURE)?;
    let (Some(name), Some(equipment_type)) = (fields.name.clone(), fields.equipment_type) else {
        return Err(ApiError::internal(FAILURE)("name and type are required"));
    };

    let mut storage = state.write().await;
    let mut equipment = Equipment::new(name, equipment_type);
    let now = equipment.created_at;
    fields.apply(&mut equipment, now);

    storage.save_equipment(&equipment).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Create equipment {}", equipment.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Registered equipment {} ({})", equipment.id, equipment.name);
    let view = EquipmentView::load(&**storage, equipment, Some(LISTED_MAINTENANCE_RECORDS), now)
        .await
        .map_err(ApiError::internal(FAILURE))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /equipment/{id}` with the full maintenance history.
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EquipmentView>> {
    const FAILURE: &str = "Failed to fetch equipment";
    let id: EquipmentId = parse_id(&id, "Equipment not found")?;

    let storage = state.read().await;
    let Some(equipment) = storage.load_equipment(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Equipment not found"));
    };
    let view = EquipmentView::load(&**storage, equipment, None, chrono::Utc::now())
        .await
        .map_err(ApiError::internal(FAILURE))?;
    Ok(Json(view))
}

/// `PUT /equipment/{id}`
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<EquipmentView>> {
    const FAILURE: &str = "Failed to update equipment";
    let id: EquipmentId = parse_id(&id, "Equipment not found")?;
    let fields: EquipmentFields = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    let Some(mut equipment) = storage.load_equipment(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Equipment not found"));
    };

    let now = chrono::Utc::now();
    fields.apply(&mut equipment, now);
    storage.save_equipment(&equipment).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Update equipment {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Updated equipment {} -> {:?}", id, equipment.status);
    let view = EquipmentView::load(&**storage, equipment, None, now)
        .await
        .map_err(ApiError::internal(FAILURE))?;
    Ok(Json(view))
}

/// `DELETE /equipment/{id}`: the maintenance history goes with it.
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    const FAILURE: &str = "Failed to delete equipment";
    let id: EquipmentId = parse_id(&id, "Equipment not found")?;

    let mut storage = state.write().await;
    if !storage.delete_equipment(id).await.map_err(ApiError::internal(FAILURE))? {
        return Err(ApiError::not_found("Equipment not found"));
    }
    storage
        .commit(&format!("Delete equipment {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Deleted equipment {}", id);
    Ok(Json(Message::new("Equipment deleted successfully")))
}

/// `POST /equipment/{id}/maintenance`
///
/// Logs a service and moves the equipment's `lastMaintenance` forward to
/// it; a given `nextDue` becomes the new `nextMaintenance`.
pub async fn record_maintenance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<MaintenanceRecord>)> {
    const FAILURE: &str = "Failed to record maintenance";
    let id: EquipmentId = parse_id(&id, "Equipment not found")?;
    let req: NewMaintenance = parse_body(&body, FAILURE)?;

    let mut storage = state.write().await;
    let Some(mut equipment) = storage.load_equipment(id).await.map_err(ApiError::internal(FAILURE))? else {
        return Err(ApiError::not_found("Equipment not found"));
    };

    let before = equipment.clone();
    let now = chrono::Utc::now();
    let record = MaintenanceRecord {
        id: MaintenanceRecordId::new(),
        equipment_id: id,
        maintenance_type: req.maintenance_type,
        description: req.description,
        cost: req.cost,
        performed_at: req.performed_at.unwrap_or(now),
        performed_by: req.performed_by,
        next_due: req.next_due,
    };

    if equipment.last_maintenance.map_or(true, |last| last < record.performed_at) {
        equipment.last_maintenance = Some(record.performed_at);
    }
    if record.next_due.is_some() {
        equipment.next_maintenance = record.next_due;
    }
    equipment.updated_at = now;

    storage.save_equipment(&equipment).await.map_err(ApiError::internal(FAILURE))?;
    if let Err(e) = storage.save_maintenance_record(&record).await {
        let undo = storage.save_equipment(&before).await;
        discard_partial(&mut **storage, "maintenance record", undo).await;
        return Err(ApiError::internal(FAILURE)(e));
    }
    storage
        .commit(&format!("Record maintenance on {}", id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Recorded {} on equipment {}", record.maintenance_type, id);
    Ok((StatusCode::CREATED, Json(record)))
}
