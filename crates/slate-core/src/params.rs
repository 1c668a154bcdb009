//! Parameter structures shared by the CLI and the MCP server.
//!
//! These types carry no framework derives beyond serde and the optional
//! `schema` feature. Interface layers wrap them (clap `Args` structs, MCP
//! transparent wrappers) and convert into them, so the conversion from user
//! text to typed values lives here once.
//!
//! Dates travel as `YYYY-MM-DD` strings. An empty string clears an optional
//! date.
//!
//! ```rust
//! use slate_core::params::EditTask;
//!
//! let edit = EditTask {
//!     id: 1,
//!     title: Some("Trip".to_string()),
//!     start_date: Some("2025-05-01".to_string()),
//!     end_date: Some(String::new()),
//! };
//! let patch = edit.to_patch().unwrap();
//! assert_eq!(patch.end_date, Some(None));
//! ```

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    editor::BoardEdit,
    error::{Result, SlateError},
    models::{TaskId, TaskPatch},
};

/// Generic parameters for operations requiring just a task ID.
///
/// Used for select_task, show_task, delete_task and add_board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the task to operate on
    pub id: TaskId,
}

/// Parameters for searching tasks by title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SearchTasks {
    /// Case-insensitive text to find in task titles; blank lists every task
    pub query: String,
}

/// Parameters for editing the scalar fields of a task.
///
/// Fields left out are not touched. The edits go through the task editor
/// and are saved together, so the saved task must end up with a title and
/// both dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EditTask {
    /// The ID of the task to edit
    pub id: TaskId,
    /// New title
    pub title: Option<String>,
    /// New start date (YYYY-MM-DD, empty to clear)
    pub start_date: Option<String>,
    /// New end date (YYYY-MM-DD, empty to clear)
    pub end_date: Option<String>,
}

impl EditTask {
    /// Converts the submitted text into a patch of scalar columns.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a date is not `YYYY-MM-DD` or nothing would change.
    pub fn to_patch(&self) -> Result<TaskPatch> {
        let patch = TaskPatch {
            title: self.title.clone(),
            start_date: optional_date("start_date", self.start_date.as_deref())?,
            end_date: optional_date("end_date", self.end_date.as_deref())?,
            boards: None,
        };

        if patch.is_empty() {
            return Err(SlateError::invalid_input("edit")
                .with_reason("Provide at least one of title, start_date or end_date"));
        }
        Ok(patch)
    }
}

/// Parameters naming one board inside a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct BoardRef {
    /// The ID of the task holding the board
    pub task_id: TaskId,
    /// The ID of the board
    pub board_id: String,
}

/// Parameters for marking a board complete or incomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ToggleBoard {
    /// The ID of the task holding the board
    pub task_id: TaskId,
    /// The ID of the board
    pub board_id: String,
    /// `true` to complete the board, `false` to reopen it
    pub completed: bool,
}

/// Parameters for replacing a board's fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateBoard {
    /// The ID of the task holding the board
    pub task_id: TaskId,
    /// The ID of the board
    pub board_id: String,
    /// Board title (required)
    pub title: String,
    /// Markdown content (required)
    pub content: String,
    /// Optional start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Optional end date (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Whether the board is complete
    #[serde(default)]
    pub completed: bool,
}

impl UpdateBoard {
    /// Converts the submitted text into dialog values.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a date is not `YYYY-MM-DD`.
    pub fn to_edit(&self) -> Result<BoardEdit> {
        Ok(BoardEdit {
            title: self.title.clone(),
            start_date: optional_date("start_date", self.start_date.as_deref())?.flatten(),
            end_date: optional_date("end_date", self.end_date.as_deref())?.flatten(),
            content: self.content.clone(),
            is_completed: self.completed,
        })
    }
}

/// How to resolve a navigation waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// Save the open task, then navigate
    SaveAndGo,
    /// Drop the open task's edits, then navigate
    DiscardAndGo,
    /// Stay on the open task
    #[default]
    Cancel,
}

/// Parameters for resolving a pending navigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct NavigationChoice {
    /// One of save_and_go, discard_and_go or cancel
    pub choice: Choice,
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// `InvalidInput` naming `field` when the text is not a valid date.
pub fn parse_date(field: &str, value: &str) -> Result<Date> {
    value.trim().parse::<Date>().map_err(|e| {
        SlateError::invalid_input(field).with_reason(format!(
            "'{value}' is not a date in YYYY-MM-DD form: {e}"
        ))
    })
}

/// Parses an optional date field where an empty string means "clear".
pub fn optional_date(field: &str, value: Option<&str>) -> Result<Option<Option<Date>>> {
    match value {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(Some(None)),
        Some(text) => parse_date(field, text).map(|date| Some(Some(date))),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("start_date", "2025-02-28").unwrap(), date(2025, 2, 28));
        assert_eq!(parse_date("start_date", " 2025-02-28 ").unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("end_date", "next tuesday").unwrap_err();
        match err {
            SlateError::InvalidInput { field, reason } => {
                assert_eq!(field, "end_date");
                assert!(reason.contains("next tuesday"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(parse_date("end_date", "2025-02-30").is_err());
    }

    #[test]
    fn test_edit_task_builds_patch() {
        let edit = EditTask {
            id: 3,
            title: None,
            start_date: Some("2025-01-01".to_string()),
            end_date: None,
        };
        let patch = edit.to_patch().unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.start_date, Some(Some(date(2025, 1, 1))));
        assert_eq!(patch.end_date, None);
    }

    #[test]
    fn test_edit_task_without_changes_is_invalid() {
        let edit = EditTask {
            id: 3,
            ..Default::default()
        };
        assert!(edit.to_patch().is_err());
    }

    #[test]
    fn test_update_board_to_edit() {
        let params = UpdateBoard {
            task_id: 1,
            board_id: "b".to_string(),
            title: "Research".to_string(),
            content: "notes".to_string(),
            start_date: Some(String::new()),
            end_date: Some("2025-04-02".to_string()),
            completed: true,
        };
        let edit = params.to_edit().unwrap();
        assert_eq!(edit.start_date, None);
        assert_eq!(edit.end_date, Some(date(2025, 4, 2)));
        assert!(edit.is_completed);
    }

    #[test]
    fn test_choice_uses_snake_case() {
        let choice: NavigationChoice =
            serde_json::from_str(r#"{"choice":"discard_and_go"}"#).unwrap();
        assert_eq!(choice.choice, Choice::DiscardAndGo);
    }
}
