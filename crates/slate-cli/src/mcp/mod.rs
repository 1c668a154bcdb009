//! MCP server implementation for Slate
//!
//! Exposes one long-lived workspace to MCP clients. Unlike the one-shot CLI
//! commands, the open task and its unsaved edits persist between tool calls,
//! so navigation away from a dirty task must be confirmed with
//! `resolve_navigation`.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use slate_core::{NotificationLog, SqliteGateway, Workspace};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use handlers::{
    BoardRef, EditTask, Id, McpResult, NavigationChoice, SearchTasks, ToggleBoard, UpdateBoard,
};

const INSTRUCTIONS: &str = r#"Slate manages tasks made of a title, a start and end date, and an ordered list of boards (titled Markdown notes that can be marked complete).

## Working with the open task
The server keeps one task open at a time, like an editor window:
1. `create_task` creates an empty task and opens it, or `select_task` opens an existing one
2. `edit_task` changes the title and dates of the open task without saving
3. `save_task` stores them; title, start date and end date are all required
4. Board tools (`add_board`, `update_board`, `toggle_board`, `delete_board`) act on the open task and are stored immediately

## Unsaved changes
When the open task has unsaved edits, `select_task` for another task does not switch. Answer with `resolve_navigation`:
- `save_and_go`: save, then open the other task (stays if the save fails)
- `discard_and_go`: drop the edits; a task that was never saved is deleted
- `cancel`: stay on the open task

`go_home` closes the open task without asking."#;

/// MCP server for Slate
#[derive(Clone)]
pub struct SlateMcpServer {
    workspace: Arc<Mutex<Workspace<SqliteGateway>>>,
    log: NotificationLog,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SlateMcpServer {
    /// Create a new Slate MCP server
    pub fn new(workspace: Workspace<SqliteGateway>, log: NotificationLog) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            log,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.workspace.clone(), self.log.clone())
    }

    #[tool(
        name = "list_tasks",
        description = "List all tasks, newest first, with their IDs and board progress (completed/total)."
    )]
    async fn list_tasks(&self) -> McpResult {
        self.handlers().list_tasks().await
    }

    #[tool(
        name = "search_tasks",
        description = "Find tasks whose title contains the query, ignoring case. A blank query lists every task."
    )]
    async fn search_tasks(&self, params: Parameters<SearchTasks>) -> McpResult {
        self.handlers().search_tasks(params).await
    }

    #[tool(
        name = "create_task",
        description = "Create an empty task and open it. The new task has no title or dates yet: follow up with edit_task and save_task. Returns the new task ID."
    )]
    async fn create_task(&self) -> McpResult {
        self.handlers().create_task().await
    }

    #[tool(
        name = "select_task",
        description = "Open a task by ID. If the open task has unsaved changes the switch is held back until resolve_navigation is called."
    )]
    async fn select_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().select_task(params).await
    }

    #[tool(
        name = "resolve_navigation",
        description = "Answer a held-back select_task: save_and_go saves the open task and switches, discard_and_go drops its edits and switches (deleting it if it was never saved), cancel stays."
    )]
    async fn resolve_navigation(&self, params: Parameters<NavigationChoice>) -> McpResult {
        self.handlers().resolve_navigation(params).await
    }

    #[tool(
        name = "show_task",
        description = "Show a task with its dates, progress and boards. For the open task this includes unsaved edits and the save state."
    )]
    async fn show_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_task(params).await
    }

    #[tool(
        name = "edit_task",
        description = "Change the title and/or dates (YYYY-MM-DD, empty string clears) of the open task. Edits stay unsaved until save_task."
    )]
    async fn edit_task(&self, params: Parameters<EditTask>) -> McpResult {
        self.handlers().edit_task(params).await
    }

    #[tool(
        name = "save_task",
        description = "Save the open task's title and dates. Fails without changes if the title or either date is missing."
    )]
    async fn save_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().save_task(params).await
    }

    #[tool(
        name = "add_board",
        description = "Append an empty board to the open task and store it. Returns the board ID used by the other board tools."
    )]
    async fn add_board(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().add_board(params).await
    }

    #[tool(
        name = "update_board",
        description = "Replace a board's title, Markdown content, dates and completion on the open task. Title and content are required."
    )]
    async fn update_board(&self, params: Parameters<UpdateBoard>) -> McpResult {
        self.handlers().update_board(params).await
    }

    #[tool(
        name = "toggle_board",
        description = "Mark a board of the open task complete (completed=true) or reopen it. Only boards with content can be completed."
    )]
    async fn toggle_board(&self, params: Parameters<ToggleBoard>) -> McpResult {
        self.handlers().toggle_board(params).await
    }

    #[tool(
        name = "delete_board",
        description = "Remove a board from the open task. This cannot be undone."
    )]
    async fn delete_board(&self, params: Parameters<BoardRef>) -> McpResult {
        self.handlers().delete_board(params).await
    }

    #[tool(
        name = "delete_task",
        description = "Permanently delete a task and its boards. Deleting the open task closes it. This cannot be undone."
    )]
    async fn delete_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_task(params).await
    }

    #[tool(
        name = "go_home",
        description = "Close the open task, dropping any unsaved edits, and list all tasks."
    )]
    async fn go_home(&self) -> McpResult {
        self.handlers().go_home().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SlateMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "slate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                website_url: None,
                icons: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: SlateMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Slate MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use slate_core::GatewayBuilder;
    use tempfile::TempDir;

    use super::*;

    async fn create_server() -> (TempDir, SlateMcpServer, NotificationLog) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("slate.db");
        let gateway = GatewayBuilder::new()
            .with_database_path(Some(&db_path))
            .build()
            .await
            .expect("Failed to build gateway");
        let log = NotificationLog::new();
        let workspace = Workspace::new(Arc::new(gateway), Arc::new(log.clone()));
        (temp_dir, SlateMcpServer::new(workspace, log.clone()), log)
    }

    #[tokio::test]
    async fn test_all_tools_are_routed() {
        let (_dir, server, _log) = create_server().await;
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        for expected in [
            "list_tasks",
            "search_tasks",
            "create_task",
            "select_task",
            "resolve_navigation",
            "show_task",
            "edit_task",
            "save_task",
            "add_board",
            "update_board",
            "toggle_board",
            "delete_board",
            "delete_task",
            "go_home",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[tokio::test]
    async fn test_server_info_enables_tools() {
        let (_dir, server, _log) = create_server().await;
        let info = server.get_info();
        assert_eq!(info.server_info.name, "slate");
        assert!(info.capabilities.tools.is_some());
    }
}
