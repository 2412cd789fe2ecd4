//! User model - people who own projects, file reports and operate equipment.

use serde::{Deserialize, Serialize};
use crate::id::UserId;
use crate::Time;

/// A person known to the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Email address
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Role on the job site
    pub role: UserRole,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl User {
    /// Create a new user with fresh timestamps.
    pub fn new(email: impl Into<String>, name: Option<String>, role: UserRole) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: UserId::new(),
            email: email.into(),
            name,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Compact reference used when a user is embedded in another record.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Job-site roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    ProjectManager,
    Foreman,
    Worker,
    Operator,
    SafetyInspector,
}

/// The id / name / email triple embedded in project, task, equipment and
/// safety report responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User identifier
    pub id: UserId,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_uses_screaming_snake_case() {
        let json = serde_json::to_string(&UserRole::SafetyInspector).unwrap();
        assert_eq!(json, "\"SAFETY_INSPECTOR\"");
    }

    #[test]
    fn test_summary_copies_identity_fields() {
        let user = User::new("sarah@site.test", Some("Sarah".into()), UserRole::Foreman);
        let summary = user.summary();
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.email, "sarah@site.test");
        assert_eq!(summary.name.as_deref(), Some("Sarah"));
    }
}
