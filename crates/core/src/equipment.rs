//! Equipment model - machines and tooling, plus their maintenance history.

use serde::{Deserialize, Serialize};
use crate::id::{EquipmentId, MaintenanceRecordId, ProjectId, UserId};
use crate::Time;

/// A piece of equipment tracked by the yard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Unique identifier
    pub id: EquipmentId,

    /// Name
    pub name: String,

    /// Kind of machine
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,

    /// Manufacturer model
    pub model: Option<String>,

    /// Serial number
    pub serial_number: Option<String>,

    /// Availability status
    pub status: EquipmentStatus,

    /// When purchased
    pub purchase_date: Option<Time>,

    /// Purchase price
    pub purchase_price: Option<f64>,

    /// Hourly rental rate
    pub hourly_rate: Option<f64>,

    /// Daily rental rate
    pub daily_rate: Option<f64>,

    /// Last service
    pub last_maintenance: Option<Time>,

    /// Next scheduled service
    pub next_maintenance: Option<Time>,

    /// Where it is parked
    pub location: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Project it is deployed to
    pub project_id: Option<ProjectId>,

    /// Current operator
    pub operator_id: Option<UserId>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Equipment {
    /// Register new equipment as available.
    pub fn new(name: impl Into<String>, equipment_type: EquipmentType) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: EquipmentId::new(),
            name: name.into(),
            equipment_type,
            model: None,
            serial_number: None,
            status: EquipmentStatus::Available,
            purchase_date: None,
            purchase_price: None,
            hourly_rate: None,
            daily_rate: None,
            last_maintenance: None,
            next_maintenance: None,
            location: None,
            notes: None,
            project_id: None,
            operator_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Maintenance outlook relative to `now`, if a service is scheduled.
    pub fn maintenance_outlook(&self, now: Time) -> Option<MaintenanceOutlook> {
        self.next_maintenance.map(|next| MaintenanceOutlook::between(next, now))
    }
}

/// Kinds of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    Excavator,
    Bulldozer,
    Crane,
    Loader,
    DumpTruck,
    ConcreteMixer,
    Generator,
    Compressor,
    Scaffolding,
    Tools,
    Other,
}

/// Equipment availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
    OutOfOrder,
    RentedOut,
}

impl EquipmentStatus {
    /// Out of service, either for planned maintenance or a breakdown.
    pub fn is_out_of_service(self) -> bool {
        matches!(self, EquipmentStatus::Maintenance | EquipmentStatus::OutOfOrder)
    }
}

/// A service performed on a piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    /// Unique identifier
    pub id: MaintenanceRecordId,

    /// Serviced equipment
    pub equipment_id: EquipmentId,

    /// Kind of service (oil change, inspection, ...)
    #[serde(rename = "type")]
    pub maintenance_type: String,

    /// What was done
    pub description: String,

    /// Cost of the service
    pub cost: Option<f64>,

    /// When it was performed
    pub performed_at: Time,

    /// Who performed it
    pub performed_by: Option<String>,

    /// When the next service is due
    pub next_due: Option<Time>,
}

/// How close a piece of equipment is to its next service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOutlook {
    /// Bucket
    pub status: MaintenanceState,

    /// Days overdue (for `Overdue`) or days remaining otherwise
    pub days: i64,
}

/// Maintenance schedule bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceState {
    Overdue,
    DueSoon,
    Scheduled,
}

/// Services due within this many days are flagged as due soon.
pub const DUE_SOON_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

impl MaintenanceOutlook {
    /// Classify a service due at `next` as seen from `now`.
    ///
    /// Day counts round up, so a service due in a few hours is one day away
    /// and one due a few hours ago is zero days away (and therefore due soon).
    pub fn between(next: Time, now: Time) -> Self {
        let millis = (next - now).num_milliseconds();
        let days_until = ceil_div(millis, MILLIS_PER_DAY);

        if days_until < 0 {
            Self { status: MaintenanceState::Overdue, days: days_until.abs() }
        } else if days_until <= DUE_SOON_DAYS {
            Self { status: MaintenanceState::DueSoon, days: days_until }
        } else {
            Self { status: MaintenanceState::Scheduled, days: days_until }
        }
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n.div_euclid(d);
    if n.rem_euclid(d) == 0 { q } else { q + 1 }
}

/// Filter for equipment listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFilter {
    /// Filter by status
    pub status: Option<EquipmentStatus>,

    /// Filter by type
    #[serde(rename = "type")]
    pub equipment_type: Option<EquipmentType>,
}

impl EquipmentFilter {
    /// Whether `equipment` passes every set criterion.
    pub fn matches(&self, equipment: &Equipment) -> bool {
        self.status.map_or(true, |s| equipment.status == s)
            && self.equipment_type.map_or(true, |t| equipment.equipment_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_outlook_overdue() {
        let now = chrono::Utc::now();
        let outlook = MaintenanceOutlook::between(now - Duration::days(3), now);
        assert_eq!(outlook.status, MaintenanceState::Overdue);
        assert_eq!(outlook.days, 3);
    }

    #[test]
    fn test_outlook_due_soon_boundary() {
        let now = chrono::Utc::now();
        let outlook = MaintenanceOutlook::between(now + Duration::days(7), now);
        assert_eq!(outlook.status, MaintenanceState::DueSoon);
        assert_eq!(outlook.days, 7);

        let outlook = MaintenanceOutlook::between(now + Duration::days(7) + Duration::hours(1), now);
        assert_eq!(outlook.status, MaintenanceState::Scheduled);
        assert_eq!(outlook.days, 8);
    }

    #[test]
    fn test_outlook_rounds_partial_days_up() {
        let now = chrono::Utc::now();
        let outlook = MaintenanceOutlook::between(now + Duration::hours(5), now);
        assert_eq!(outlook, MaintenanceOutlook { status: MaintenanceState::DueSoon, days: 1 });

        let outlook = MaintenanceOutlook::between(now - Duration::hours(5), now);
        assert_eq!(outlook, MaintenanceOutlook { status: MaintenanceState::DueSoon, days: 0 });
    }

    #[test]
    fn test_no_schedule_no_outlook() {
        let equipment = Equipment::new("Generator 2", EquipmentType::Generator);
        assert!(equipment.maintenance_outlook(chrono::Utc::now()).is_none());
    }

    #[test]
    fn test_type_field_is_renamed_on_the_wire() {
        let equipment = Equipment::new("CAT 320", EquipmentType::Excavator);
        let json = serde_json::to_value(&equipment).unwrap();
        assert_eq!(json["type"], "EXCAVATOR");
        assert_eq!(json["status"], "AVAILABLE");
        assert!(json.get("serialNumber").is_some());
    }

    #[test]
    fn test_filter() {
        let mut crane = Equipment::new("Tower crane", EquipmentType::Crane);
        crane.status = EquipmentStatus::InUse;

        let filter = EquipmentFilter { status: Some(EquipmentStatus::InUse), equipment_type: None };
        assert!(filter.matches(&crane));

        let filter = EquipmentFilter { status: None, equipment_type: Some(EquipmentType::Loader) };
        assert!(!filter.matches(&crane));
    }
}
