//! MCP tool handlers implementation
//!
//! Every handler locks the shared workspace, runs one operation, and answers
//! with the operation's own output followed by the notifications it
//! produced. An operation reported as failed by its notifications becomes an
//! error tool result rather than a protocol error, so the client still sees
//! the explanation.

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use slate_core::{
    display::{OperationStatus, TaskSummaries},
    guard::{DiscardOutcome, GuardState},
    params::{self as core, Choice},
    EditorHandle, Gateway, Navigation, NotificationLog, SqliteGateway, TaskId, Workspace,
};
use tokio::sync::Mutex;

use super::errors::{not_found, not_open, to_mcp_error};

/// Generic MCP wrapper for core parameter types with serde integration
///
/// Provides JSON deserialization and schema generation for any parameter
/// type, so the core types stay free of MCP concerns.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type SearchTasks = McpParams<core::SearchTasks>;
pub type EditTask = McpParams<core::EditTask>;
pub type BoardRef = McpParams<core::BoardRef>;
pub type ToggleBoard = McpParams<core::ToggleBoard>;
pub type UpdateBoard = McpParams<core::UpdateBoard>;
pub type NavigationChoice = McpParams<core::NavigationChoice>;

pub type McpResult = Result<CallToolResult, ErrorData>;

type SharedWorkspace = Arc<Mutex<Workspace<SqliteGateway>>>;

/// Handler implementations for the MCP server
pub struct McpHandlers {
    workspace: SharedWorkspace,
    log: NotificationLog,
}

impl McpHandlers {
    pub fn new(workspace: SharedWorkspace, log: NotificationLog) -> Self {
        Self { workspace, log }
    }

    /// Builds the tool result from `body` plus the drained notifications.
    fn respond(&self, succeeded: bool, body: impl Into<String>) -> McpResult {
        let mut text = body.into();
        let notifications = self.log.drain();
        if !notifications.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            for notification in &notifications {
                text.push_str(&OperationStatus::from(notification).to_string());
            }
        }

        let content = vec![Content::text(text)];
        Ok(if succeeded {
            CallToolResult::success(content)
        } else {
            CallToolResult::error(content)
        })
    }

    fn task_list(workspace: &Workspace<SqliteGateway>, title: &str) -> String {
        let tasks = TaskSummaries::from(workspace.tasks());
        if tasks.is_empty() {
            tasks.to_string()
        } else {
            format!("# {title}\n\n{tasks}")
        }
    }

    fn open_editor(
        workspace: &Workspace<SqliteGateway>,
        id: TaskId,
    ) -> Result<EditorHandle<SqliteGateway>, ErrorData> {
        workspace
            .editor()
            .filter(|editor| editor.task_id() == id)
            .cloned()
            .ok_or_else(|| not_open(id))
    }

    /// Describes where a navigation request left the workspace.
    fn describe_navigation(workspace: &Workspace<SqliteGateway>, navigation: Navigation) -> String {
        match navigation {
            Navigation::Go(_) => workspace
                .editor()
                .map(|editor| editor.snapshot().to_string())
                .unwrap_or_default(),
            Navigation::Stay if workspace.guard_state() == GuardState::Idle => {
                let open = workspace
                    .route()
                    .task_id()
                    .map_or_else(|| "No task".to_string(), |id| format!("Task {id}"));
                format!("{open} is open; nothing changed.")
            }
            Navigation::Stay => "Navigation is still waiting for confirmation. \
                 Call resolve_navigation with save_and_go, discard_and_go or cancel."
                .to_string(),
            Navigation::Confirm(target) => format!(
                "The open task has unsaved changes. Call resolve_navigation with \
                 save_and_go, discard_and_go or cancel before task {target} can be opened."
            ),
        }
    }

    pub async fn list_tasks(&self) -> McpResult {
        debug!("list_tasks");

        let mut workspace = self.workspace.lock().await;
        let listed = workspace.refresh_tasks().await;
        let body = Self::task_list(&workspace, "Tasks");
        self.respond(listed, body)
    }

    pub async fn search_tasks(&self, Parameters(params): Parameters<SearchTasks>) -> McpResult {
        debug!("search_tasks: {:?}", params);

        let query = params.as_ref().query.trim();
        let mut workspace = self.workspace.lock().await;
        let found = workspace.search(query).await;
        let title = if query.is_empty() {
            "Tasks".to_string()
        } else {
            format!("Tasks matching '{query}'")
        };
        let body = Self::task_list(&workspace, &title);
        self.respond(found, body)
    }

    pub async fn create_task(&self) -> McpResult {
        debug!("create_task");

        let mut workspace = self.workspace.lock().await;
        let Some(id) = workspace.create_task().await else {
            return self.respond(false, "");
        };

        let body = format!(
            "Created task with ID: {id}. It is now open; set its title and dates with \
             edit_task, then call save_task.\n"
        );
        self.respond(true, body)
    }

    pub async fn select_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("select_task: {:?}", params);

        let id = params.as_ref().id;
        let mut workspace = self.workspace.lock().await;
        workspace
            .gateway()
            .fetch_task(id)
            .await
            .map_err(|e| to_mcp_error("Failed to load task", &e))?
            .ok_or_else(|| not_found(id))?;

        let navigation = workspace.select_task(id).await;
        let body = Self::describe_navigation(&workspace, navigation);
        self.respond(!matches!(navigation, Navigation::Confirm(_)), body)
    }

    pub async fn resolve_navigation(
        &self,
        Parameters(params): Parameters<NavigationChoice>,
    ) -> McpResult {
        debug!("resolve_navigation: {:?}", params);

        let mut workspace = self.workspace.lock().await;
        if workspace.guard_state() == GuardState::Idle {
            return Err(ErrorData::invalid_params(
                "No navigation is waiting for confirmation",
                None,
            ));
        }

        match params.as_ref().choice {
            Choice::SaveAndGo => {
                let navigation = workspace.save_and_go().await;
                let body = Self::describe_navigation(&workspace, navigation);
                self.respond(matches!(navigation, Navigation::Go(_)), body)
            }
            Choice::DiscardAndGo => {
                let Some(discarded) = workspace.discard_and_go().await else {
                    return self.respond(false, "");
                };
                let mut body = Self::describe_navigation(&workspace, Navigation::Go(discarded.target));
                if discarded.outcome == DiscardOutcome::DeleteFailed {
                    body.push_str("\nThe abandoned task could not be deleted and is still stored.\n");
                }
                self.respond(true, body)
            }
            Choice::Cancel => {
                workspace.cancel_navigation();
                self.respond(true, "Navigation cancelled; the open task keeps its edits.\n")
            }
        }
    }

    pub async fn show_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_task: {:?}", params);

        let id = params.as_ref().id;
        let workspace = self.workspace.lock().await;
        if let Ok(editor) = Self::open_editor(&workspace, id) {
            return self.respond(true, editor.snapshot().to_string());
        }

        let task = workspace
            .gateway()
            .fetch_task(id)
            .await
            .map_err(|e| to_mcp_error("Failed to load task", &e))?
            .ok_or_else(|| not_found(id))?;
        self.respond(true, task.to_string())
    }

    pub async fn edit_task(&self, Parameters(params): Parameters<EditTask>) -> McpResult {
        debug!("edit_task: {:?}", params);

        let params = params.as_ref();
        let patch = params
            .to_patch()
            .map_err(|e| to_mcp_error("Failed to edit task", &e))?;
        let workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.id)?;

        editor.apply_edits(&patch);
        self.respond(true, editor.snapshot().to_string())
    }

    pub async fn save_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("save_task: {:?}", params);

        let mut workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.as_ref().id)?;
        let saved = editor.save().await;
        workspace.sync().await;
        self.respond(saved, editor.snapshot().to_string())
    }

    pub async fn add_board(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("add_board: {:?}", params);

        let workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.as_ref().id)?;
        let Some(added) = editor.add_board().await else {
            return self.respond(false, "");
        };

        let body = if added.persisted {
            format!("Created board with ID: `{}`\n", added.id)
        } else {
            format!(
                "Board `{}` was added locally but could not be stored.\n",
                added.id
            )
        };
        self.respond(added.persisted, body)
    }

    pub async fn update_board(&self, Parameters(params): Parameters<UpdateBoard>) -> McpResult {
        debug!("update_board: {:?}", params);

        let params = params.as_ref();
        let edit = params
            .to_edit()
            .map_err(|e| to_mcp_error("Failed to update board", &e))?;
        let workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.task_id)?;

        let updated = editor.update_board(&params.board_id, &edit).await;
        self.respond(updated, editor.snapshot().to_string())
    }

    pub async fn toggle_board(&self, Parameters(params): Parameters<ToggleBoard>) -> McpResult {
        debug!("toggle_board: {:?}", params);

        let params = params.as_ref();
        let workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.task_id)?;

        let toggled = editor
            .toggle_board(&params.board_id, params.completed)
            .await;
        let (completed, total) = editor.progress();
        self.respond(toggled, format!("Progress: {completed}/{total} Completed\n"))
    }

    pub async fn delete_board(&self, Parameters(params): Parameters<BoardRef>) -> McpResult {
        debug!("delete_board: {:?}", params);

        let params = params.as_ref();
        let workspace = self.workspace.lock().await;
        let editor = Self::open_editor(&workspace, params.task_id)?;

        let deleted = editor.delete_board(&params.board_id).await;
        self.respond(deleted, editor.snapshot().to_string())
    }

    pub async fn delete_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_task: {:?}", params);

        let mut workspace = self.workspace.lock().await;
        let deleted = workspace.delete_task(params.as_ref().id).await;
        self.respond(deleted, "")
    }

    pub async fn go_home(&self) -> McpResult {
        debug!("go_home");

        let mut workspace = self.workspace.lock().await;
        let had_edits = workspace.is_dirty();
        workspace.go_home();
        workspace.refresh_tasks().await;

        let mut body = String::new();
        if had_edits {
            body.push_str("Closed the open task; its unsaved edits were dropped.\n\n");
        }
        body.push_str(&Self::task_list(&workspace, "Tasks"));
        self.respond(true, body)
    }
}
