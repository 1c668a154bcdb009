//! Task model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::Board;

/// Store-assigned task identifier.
pub type TaskId = u64;

/// Represents a task row with its embedded boards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier assigned by the store
    pub id: TaskId,

    /// Title of the task (empty until the user saves one)
    pub title: String,

    /// First day of the task
    pub start_date: Option<Date>,

    /// Last day of the task
    pub end_date: Option<Date>,

    /// Ordered boards, persisted as a single JSON column
    #[serde(default)]
    pub boards: Vec<Board>,

    /// Timestamp when the task was inserted (UTC)
    pub created_at: Timestamp,
}

impl Task {
    /// A freshly inserted row that has not yet received a title or dates.
    pub fn is_placeholder(&self) -> bool {
        self.title.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Number of completed boards and total boards.
    pub fn progress(&self) -> (usize, usize) {
        board_progress(&self.boards)
    }
}

/// Counts completed boards against the total.
pub fn board_progress(boards: &[Board]) -> (usize, usize) {
    let completed = boards.iter().filter(|b| b.is_completed).count();
    (completed, boards.len())
}
