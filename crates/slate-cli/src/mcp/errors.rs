//! Error handling utilities for MCP server

use rmcp::ErrorData;
use slate_core::{FailureKind, SlateError, TaskId};

/// Converts a core error into an MCP error; bad input maps to invalid params.
pub fn to_mcp_error(message: &str, error: &SlateError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error.kind() {
        FailureKind::Validation => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}

pub fn not_found(id: TaskId) -> ErrorData {
    ErrorData::resource_not_found(format!("Task with ID {id} not found"), None)
}

/// Editing tools act on the open task only.
pub fn not_open(id: TaskId) -> ErrorData {
    ErrorData::invalid_params(
        format!("Task {id} is not open. Call select_task with its ID first."),
        None,
    )
}
