//! `/dashboard` handler.

use axum::extract::State;
use axum::Json;
use buildwise_progress::Dashboard;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /dashboard`: every headline summary as of now.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    let storage = state.read().await;
    let dashboard = Dashboard::collect(&**storage, chrono::Utc::now())
        .await
        .map_err(ApiError::internal("Failed to fetch dashboard"))?;
    Ok(Json(dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::fixture;
    use buildwise_core::{Equipment, EquipmentType, SafetyReport, Severity};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_dashboard_counts() {
        let f = fixture().await;
        {
            let mut storage = f.state.write().await;
            let mut crane = Equipment::new("Tower crane", EquipmentType::Crane);
            crane.next_maintenance = Some(Utc::now() - Duration::days(1));
            storage.save_equipment(&crane).await.unwrap();

            let report = SafetyReport::new(f.project.id, f.foreman.id, "Fall hazard", "Open edge", Severity::Critical);
            storage.save_safety_report(&report).await.unwrap();
        }

        let Json(dashboard) = get_dashboard(State(f.state.clone())).await.unwrap();
        assert_eq!(dashboard.projects.total, 1);
        assert_eq!(dashboard.projects.active, 1);
        assert_eq!(dashboard.projects.total_budget, 2_500_000.0);
        assert_eq!(dashboard.safety.critical_unresolved, 1);
        assert_eq!(dashboard.equipment.available, 1);
        assert_eq!(dashboard.equipment.maintenance_overdue, 1);
        assert_eq!(dashboard.estimates.total, 0);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["safety"]["criticalUnresolved"], 1);
    }
}
