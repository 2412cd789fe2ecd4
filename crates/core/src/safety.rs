//! Safety report model - incidents and hazards raised on site.

use serde::{Deserialize, Serialize};
use crate::id::{ProjectId, SafetyReportId, UserId};
use crate::Time;

/// A safety incident or hazard report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    /// Unique identifier
    pub id: SafetyReportId,

    /// Project the report belongs to
    pub project_id: ProjectId,

    /// Who filed it
    pub reporter_id: UserId,

    /// Short title
    pub title: String,

    /// Full description
    pub description: String,

    /// How serious it is
    pub severity: Severity,

    /// Handling status
    pub status: ReportStatus,

    /// Where on site
    pub location: Option<String>,

    /// Photo URLs; uploads are handled elsewhere
    #[serde(default)]
    pub photos: Vec<String>,

    /// How it was resolved
    pub resolution: Option<String>,

    /// When it was resolved
    pub resolved_at: Option<Time>,

    /// When filed
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl SafetyReport {
    /// File a new open report.
    pub fn new(
        project_id: ProjectId,
        reporter_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: SafetyReportId::new(),
            project_id,
            reporter_id,
            title: title.into(),
            description: description.into(),
            severity,
            status: ReportStatus::Open,
            location: None,
            photos: Vec::new(),
            resolution: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Critical and still being handled.
    pub fn is_critical_unresolved(&self) -> bool {
        self.severity == Severity::Critical && !self.status.is_closed()
    }
}

/// Report severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Report handling status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    /// `Resolved` or `Closed`.
    pub fn is_closed(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Closed)
    }
}

/// Filter for safety report listings. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReportFilter {
    /// Filter by status
    pub status: Option<ReportStatus>,

    /// Filter by severity
    pub severity: Option<Severity>,

    /// Filter by project
    pub project_id: Option<ProjectId>,
}

impl SafetyReportFilter {
    /// Whether `report` passes every set criterion.
    pub fn matches(&self, report: &SafetyReport) -> bool {
        self.status.map_or(true, |s| report.status == s)
            && self.severity.map_or(true, |s| report.severity == s)
            && self.project_id.map_or(true, |p| report.project_id == p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(severity: Severity, status: ReportStatus) -> SafetyReport {
        let mut r = SafetyReport::new(ProjectId::new(), UserId::new(), "Loose rail", "Guard rail on level 3", severity);
        r.status = status;
        r
    }

    #[test]
    fn test_new_report_is_open() {
        let r = SafetyReport::new(ProjectId::new(), UserId::new(), "t", "d", Severity::Low);
        assert_eq!(r.status, ReportStatus::Open);
        assert!(r.photos.is_empty());
    }

    #[test]
    fn test_critical_unresolved() {
        assert!(report(Severity::Critical, ReportStatus::Open).is_critical_unresolved());
        assert!(report(Severity::Critical, ReportStatus::InProgress).is_critical_unresolved());
        assert!(!report(Severity::Critical, ReportStatus::Resolved).is_critical_unresolved());
        assert!(!report(Severity::Critical, ReportStatus::Closed).is_critical_unresolved());
        assert!(!report(Severity::High, ReportStatus::Open).is_critical_unresolved());
    }

    #[test]
    fn test_filter_combines_criteria() {
        let r = report(Severity::High, ReportStatus::Open);
        assert!(SafetyReportFilter::default().matches(&r));
        assert!(SafetyReportFilter {
            status: Some(ReportStatus::Open),
            severity: Some(Severity::High),
            project_id: Some(r.project_id),
        }
        .matches(&r));
        assert!(!SafetyReportFilter { severity: Some(Severity::Low), ..Default::default() }.matches(&r));
    }

    #[test]
    fn test_photos_default_when_missing() {
        let r = report(Severity::Low, ReportStatus::Open);
        let mut json = serde_json::to_value(&r).unwrap();
        json.as_object_mut().unwrap().remove("photos");
        let back: SafetyReport = serde_json::from_value(json).unwrap();
        assert!(back.photos.is_empty());
    }
}
