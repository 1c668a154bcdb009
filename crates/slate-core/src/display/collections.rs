//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::{models::TaskSummary, notify::Notification};

/// Newtype wrapper for displaying a task list.
///
/// # Examples
///
/// ```rust
/// use slate_core::{display::TaskSummaries, models::TaskSummary};
/// use jiff::Timestamp;
///
/// let summary = TaskSummary {
///     id: 1,
///     title: "Trip".to_string(),
///     created_at: Timestamp::now(),
///     total_boards: 2,
///     completed_boards: 1,
/// };
///
/// let output = TaskSummaries(vec![summary]).to_string();
/// assert!(output.contains("Trip (ID: 1) (1/2)"));
/// assert_eq!(TaskSummaries(vec![]).to_string(), "No tasks found.\n");
/// ```
pub struct TaskSummaries(pub Vec<TaskSummary>);

impl TaskSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskSummary> {
        self.0.iter()
    }
}

impl From<&[TaskSummary]> for TaskSummaries {
    fn from(tasks: &[TaskSummary]) -> Self {
        Self(tasks.to_vec())
    }
}

impl fmt::Display for TaskSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tasks found.")
        } else {
            for task in &self.0 {
                write!(f, "{task}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for printing drained notifications, one per line.
pub struct Notifications(pub Vec<Notification>);

impl fmt::Display for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notification in &self.0 {
            writeln!(f, "{notification}")?;
        }
        Ok(())
    }
}
