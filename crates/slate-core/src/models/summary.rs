//! Task summary types for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Task, TaskId};

/// Summary information about a task with board statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSummary {
    /// Task ID
    pub id: TaskId,
    /// Title of the task, possibly empty
    pub title: String,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Total number of boards
    pub total_boards: u32,
    /// Number of completed boards
    pub completed_boards: u32,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        let (completed, total) = task.progress();

        Self {
            id: task.id,
            title: task.title.clone(),
            created_at: task.created_at,
            total_boards: total as u32,
            completed_boards: completed as u32,
        }
    }
}

/// Builds summaries ordered newest first. Equal timestamps fall back to the
/// higher id first.
pub fn newest_first(tasks: &[Task]) -> Vec<TaskSummary> {
    let mut summaries: Vec<TaskSummary> = tasks.iter().map(Into::into).collect();
    summaries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    summaries
}
