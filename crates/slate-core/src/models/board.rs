//! Board model definition.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A sub-item of a task with its own date range and markdown content.
///
/// Field names follow the persisted JSON layout of the `boards` column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Client-generated identifier, unique within the task
    pub id: String,

    /// Short title shown on the board card
    #[serde(default)]
    pub title: String,

    /// Optional first day
    #[serde(default)]
    pub start_date: Option<Date>,

    /// Optional last day
    #[serde(default)]
    pub end_date: Option<Date>,

    /// Markdown body
    #[serde(default)]
    pub content: String,

    /// Completion flag, only meaningful when content is present
    #[serde(default)]
    pub is_completed: bool,
}

impl Board {
    /// Creates an empty, incomplete board with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            start_date: None,
            end_date: None,
            content: String::new(),
            is_completed: false,
        }
    }

    /// Whether the board carries non-blank markdown content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}
