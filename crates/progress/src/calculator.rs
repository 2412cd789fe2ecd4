//! Project progress calculation.

use buildwise_core::TaskStatus;
use serde::{Deserialize, Serialize};

/// Completion figures for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    /// Percentage complete (0-100)
    pub progress: u8,

    /// All tasks
    pub total_tasks: usize,

    /// Tasks in `Completed`
    pub completed_tasks: usize,
}

impl ProjectProgress {
    /// Compute progress from a project's task statuses.
    ///
    /// `progress` is `completed / total` as a percentage rounded half up,
    /// and 0 for a project without tasks.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        let (total_tasks, completed_tasks) = statuses
            .into_iter()
            .fold((0usize, 0usize), |(total, done), status| {
                (total + 1, done + usize::from(status.is_completed()))
            });

        Self {
            progress: percent_rounded(completed_tasks, total_tasks),
            total_tasks,
            completed_tasks,
        }
    }
}

/// `round_half_up(100 * part / whole)` in integer arithmetic.
fn percent_rounded(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let scaled = (200 * part + whole) / (2 * whole);
    scaled.min(100) as u8
}
