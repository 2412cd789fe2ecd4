//! Dashboard summaries.
//!
//! Each summary is an immutable view-model built from a slice of records;
//! [`Dashboard::collect`] gathers all of them from storage in one pass.

use buildwise_core::{
    CostEstimate, Equipment, EquipmentFilter, EquipmentStatus, EstimateStatus, MaintenanceState,
    Project, ProjectStatus, ReportStatus, SafetyReport, SafetyReportFilter, Time,
};
use buildwise_storage::{Result, Storage};
use serde::Serialize;

/// Headline project counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    /// `InProgress`
    pub active: usize,
    pub completed: usize,
    /// Sum of budgets; projects without one count as zero
    pub total_budget: f64,
}

impl ProjectStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        Self {
            total: projects.len(),
            active: count(projects, |p| p.status == ProjectStatus::InProgress),
            completed: count(projects, |p| p.status == ProjectStatus::Completed),
            total_budget: projects.iter().map(|p| p.budget.unwrap_or(0.0)).sum(),
        }
    }
}

/// Headline safety report counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyStats {
    pub total: usize,
    pub open: usize,
    /// Critical reports that are neither resolved nor closed
    pub critical_unresolved: usize,
    pub resolved: usize,
}

impl SafetyStats {
    pub fn from_reports(reports: &[SafetyReport]) -> Self {
        Self {
            total: reports.len(),
            open: count(reports, |r| r.status == ReportStatus::Open),
            critical_unresolved: count(reports, SafetyReport::is_critical_unresolved),
            resolved: count(reports, |r| r.status == ReportStatus::Resolved),
        }
    }
}

/// Headline equipment counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentStats {
    pub total: usize,
    pub in_use: usize,
    pub available: usize,
    /// In maintenance or out of order
    pub in_maintenance: usize,
    /// Past their next scheduled service as of `now`
    pub maintenance_overdue: usize,
}

impl EquipmentStats {
    pub fn from_equipment(equipment: &[Equipment], now: Time) -> Self {
        Self {
            total: equipment.len(),
            in_use: count(equipment, |e| e.status == EquipmentStatus::InUse),
            available: count(equipment, |e| e.status == EquipmentStatus::Available),
            in_maintenance: count(equipment, |e| e.status.is_out_of_service()),
            maintenance_overdue: count(equipment, |e| {
                e.maintenance_outlook(now)
                    .map_or(false, |o| o.status == MaintenanceState::Overdue)
            }),
        }
    }
}

/// Headline estimate counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateStats {
    pub total: usize,
    pub submitted: usize,
    pub approved: usize,
    /// Sum of `totalCost` over every estimate
    pub total_value: f64,
}

impl EstimateStats {
    pub fn from_estimates(estimates: &[CostEstimate]) -> Self {
        Self {
            total: estimates.len(),
            submitted: count(estimates, |e| e.status == EstimateStatus::Submitted),
            approved: count(estimates, |e| e.status == EstimateStatus::Approved),
            total_value: estimates.iter().map(|e| e.total_cost).sum(),
        }
    }
}

/// Everything the landing page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub projects: ProjectStats,
    pub safety: SafetyStats,
    pub equipment: EquipmentStats,
    pub estimates: EstimateStats,
    /// The instant maintenance was judged against
    pub generated_at: Time,
}

impl Dashboard {
    /// Build every summary from the current contents of `storage`.
    pub async fn collect<S: Storage + ?Sized>(storage: &S, now: Time) -> Result<Self> {
        let projects = storage.list_projects().await?;
        let reports = storage.list_safety_reports(&SafetyReportFilter::default()).await?;
        let equipment = storage.list_equipment(&EquipmentFilter::default()).await?;
        let estimates = storage.list_cost_estimates().await?;

        Ok(Self {
            projects: ProjectStats::from_projects(&projects),
            safety: SafetyStats::from_reports(&reports),
            equipment: EquipmentStats::from_equipment(&equipment, now),
            estimates: EstimateStats::from_estimates(&estimates),
            generated_at: now,
        })
    }
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(*item)).count()
}
