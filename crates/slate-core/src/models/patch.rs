//! Partial column updates for a task row.

use jiff::civil::Date;

use super::Board;

/// A partial update naming one or more task columns.
///
/// `None` leaves a column untouched. For the date columns the inner option is
/// the value to write, so `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub start_date: Option<Option<Date>>,
    pub end_date: Option<Option<Date>>,
    pub boards: Option<Vec<Board>>,
}

impl TaskPatch {
    /// Patch writing the three scalar columns together.
    pub fn scalars(title: impl Into<String>, start_date: Date, end_date: Date) -> Self {
        Self {
            title: Some(title.into()),
            start_date: Some(Some(start_date)),
            end_date: Some(Some(end_date)),
            boards: None,
        }
    }

    /// Patch writing only the boards column.
    pub fn boards(boards: Vec<Board>) -> Self {
        Self {
            boards: Some(boards),
            ..Default::default()
        }
    }

    /// Whether the patch names no column at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.boards.is_none()
    }
}
