//! One-shot task and board commands.
//!
//! Clap argument structs convert into the core parameter types from
//! [`slate_core::params`], so parsing of dates and validation of edits is
//! shared with the MCP server. Every command runs against a fresh
//! [`Workspace`]: board and edit commands open the task through the same
//! editor the shell uses, then print the notifications it produced.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use log::debug;
use slate_core::{
    display::TaskSummaries, params::*, EditorHandle, Gateway, Navigation, NotificationLog,
    SqliteGateway, TaskId, Workspace,
};

use crate::renderer::TerminalRenderer;

/// Search tasks by title
#[derive(Args)]
pub struct SearchTasksArgs {
    /// Text to find in task titles, ignoring case
    pub query: String,
}

impl From<SearchTasksArgs> for SearchTasks {
    fn from(val: SearchTasksArgs) -> Self {
        SearchTasks { query: val.query }
    }
}

/// Show a task with its boards
#[derive(Args)]
pub struct ShowTaskArgs {
    /// ID of the task to display
    pub id: TaskId,
}

impl From<ShowTaskArgs> for Id {
    fn from(val: ShowTaskArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a task permanently
#[derive(Args)]
pub struct DeleteTaskArgs {
    /// ID of the task to delete
    pub id: TaskId,
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

/// Edit a task's title and dates, then save
#[derive(Args)]
pub struct EditTaskArgs {
    /// ID of the task to edit
    pub id: TaskId,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New start date (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    pub start: Option<String>,
    /// New end date (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    pub end: Option<String>,
}

impl From<EditTaskArgs> for EditTask {
    fn from(val: EditTaskArgs) -> Self {
        EditTask {
            id: val.id,
            title: val.title,
            start_date: val.start,
            end_date: val.end,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List all tasks, newest first
    #[command(aliases = ["l", "ls"])]
    List,
    /// Search tasks by title
    #[command(alias = "f")]
    Search(SearchTasksArgs),
    /// Show a task with its boards
    #[command(alias = "s")]
    Show(ShowTaskArgs),
    /// Create a new empty task
    #[command(alias = "c")]
    Create,
    /// Delete a task permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTaskArgs),
    /// Edit a task's title and dates, then save
    #[command(alias = "e")]
    Edit(EditTaskArgs),
}

/// Append an empty board to a task
#[derive(Args)]
pub struct AddBoardArgs {
    /// ID of the task
    pub task_id: TaskId,
}

/// Replace a board's fields
#[derive(Args)]
pub struct UpdateBoardArgs {
    /// ID of the task
    pub task_id: TaskId,
    /// ID of the board
    pub board_id: String,
    /// Board title
    #[arg(long)]
    pub title: String,
    /// Markdown content
    #[arg(long)]
    pub content: String,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Mark the board complete
    #[arg(long)]
    pub completed: bool,
}

impl From<UpdateBoardArgs> for UpdateBoard {
    fn from(val: UpdateBoardArgs) -> Self {
        UpdateBoard {
            task_id: val.task_id,
            board_id: val.board_id,
            title: val.title,
            content: val.content,
            start_date: val.start,
            end_date: val.end,
            completed: val.completed,
        }
    }
}

/// Mark a board complete, or incomplete with --undo
#[derive(Args)]
pub struct ToggleBoardArgs {
    /// ID of the task
    pub task_id: TaskId,
    /// ID of the board
    pub board_id: String,
    /// Reopen the board instead of completing it
    #[arg(long)]
    pub undo: bool,
}

impl From<ToggleBoardArgs> for ToggleBoard {
    fn from(val: ToggleBoardArgs) -> Self {
        ToggleBoard {
            task_id: val.task_id,
            board_id: val.board_id,
            completed: !val.undo,
        }
    }
}

/// Remove a board from a task
#[derive(Args)]
pub struct DeleteBoardArgs {
    /// ID of the task
    pub task_id: TaskId,
    /// ID of the board
    pub board_id: String,
}

impl From<DeleteBoardArgs> for BoardRef {
    fn from(val: DeleteBoardArgs) -> Self {
        BoardRef {
            task_id: val.task_id,
            board_id: val.board_id,
        }
    }
}

#[derive(Subcommand)]
pub enum BoardCommands {
    /// Append an empty board to a task
    #[command(alias = "a")]
    Add(AddBoardArgs),
    /// Replace a board's title, content, dates and completion
    #[command(alias = "u")]
    Update(UpdateBoardArgs),
    /// Mark a board complete, or incomplete with --undo
    #[command(alias = "t")]
    Toggle(ToggleBoardArgs),
    /// Remove a board from a task
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteBoardArgs),
}

/// Runs one command against a workspace and prints its notifications.
pub struct Cli {
    workspace: Workspace<SqliteGateway>,
    log: NotificationLog,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        workspace: Workspace<SqliteGateway>,
        log: NotificationLog,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            workspace,
            log,
            renderer,
        }
    }

    pub async fn handle_task_command(mut self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::List => self.list_tasks().await,
            TaskCommands::Search(args) => self.search_tasks(&args.into()).await,
            TaskCommands::Show(args) => self.show_task(&args.into()).await,
            TaskCommands::Create => self.create_task().await,
            TaskCommands::Delete(args) => self.delete_task(args).await,
            TaskCommands::Edit(args) => self.edit_task(&args.into()).await,
        }
    }

    pub async fn handle_board_command(mut self, command: BoardCommands) -> Result<()> {
        match command {
            BoardCommands::Add(args) => self.add_board(args.task_id).await,
            BoardCommands::Update(args) => self.update_board(&args.into()).await,
            BoardCommands::Toggle(args) => self.toggle_board(&args.into()).await,
            BoardCommands::Delete(args) => self.delete_board(&args.into()).await,
        }
    }

    pub async fn list_tasks(&mut self) -> Result<()> {
        let listed = self.workspace.refresh_tasks().await;
        self.finish(listed, "Failed to list tasks")?;
        self.print_tasks("Tasks");
        Ok(())
    }

    async fn search_tasks(&mut self, params: &SearchTasks) -> Result<()> {
        let found = self.workspace.search(&params.query).await;
        self.finish(found, "Failed to search tasks")?;
        self.print_tasks(&format!("Tasks matching '{}'", params.query.trim()));
        Ok(())
    }

    async fn show_task(&mut self, params: &Id) -> Result<()> {
        let task = self
            .workspace
            .gateway()
            .fetch_task(params.id)
            .await
            .with_context(|| format!("Failed to load task {}", params.id))?
            .ok_or_else(|| anyhow!("Task with ID {} not found", params.id))?;

        self.renderer.render(&task.to_string());
        Ok(())
    }

    async fn create_task(&mut self) -> Result<()> {
        let created = self.workspace.create_task().await;
        self.finish(created.is_some(), "Failed to create task")?;
        if let Some(id) = created {
            self.renderer.render(&format!("Created task with ID: {id}\n"));
        }
        Ok(())
    }

    async fn delete_task(&mut self, args: DeleteTaskArgs) -> Result<()> {
        if !args.yes {
            bail!(
                "Refusing to delete task {} without --yes; this cannot be undone",
                args.id
            );
        }

        let deleted = self.workspace.delete_task(args.id).await;
        self.finish(deleted, "Failed to delete task")
    }

    async fn edit_task(&mut self, params: &EditTask) -> Result<()> {
        let patch = params.to_patch()?;
        let editor = self.open(params.id).await?;

        editor.apply_edits(&patch);
        let saved = editor.save().await;
        self.finish(saved, "Failed to save task")?;
        self.renderer.render(&editor.snapshot().to_string());
        Ok(())
    }

    async fn add_board(&mut self, task_id: TaskId) -> Result<()> {
        let editor = self.open(task_id).await?;
        let added = editor
            .add_board()
            .await
            .ok_or_else(|| anyhow!("Task {task_id} is no longer open"))?;

        self.finish(added.persisted, "Failed to add board")?;
        self.renderer
            .render(&format!("Created board with ID: `{}`\n", added.id));
        Ok(())
    }

    async fn update_board(&mut self, params: &UpdateBoard) -> Result<()> {
        let edit = params.to_edit()?;
        let editor = self.open(params.task_id).await?;
        let updated = editor.update_board(&params.board_id, &edit).await;
        self.finish(updated, "Failed to update board")
    }

    async fn toggle_board(&mut self, params: &ToggleBoard) -> Result<()> {
        let editor = self.open(params.task_id).await?;
        let toggled = editor
            .toggle_board(&params.board_id, params.completed)
            .await;
        self.finish(toggled, "Failed to update board")?;

        let (completed, total) = editor.progress();
        self.renderer
            .render(&format!("Progress: {completed}/{total} Completed\n"));
        Ok(())
    }

    async fn delete_board(&mut self, params: &BoardRef) -> Result<()> {
        let editor = self.open(params.task_id).await?;
        let deleted = editor.delete_board(&params.board_id).await;
        self.finish(deleted, "Failed to delete board")
    }

    /// Opens `id` in the workspace editor after checking that it exists.
    async fn open(&mut self, id: TaskId) -> Result<EditorHandle<SqliteGateway>> {
        self.workspace
            .gateway()
            .fetch_task(id)
            .await
            .with_context(|| format!("Failed to load task {id}"))?
            .ok_or_else(|| anyhow!("Task with ID {id} not found"))?;

        match self.workspace.select_task(id).await {
            Navigation::Go(_) | Navigation::Stay => {}
            Navigation::Confirm(_) => bail!("Another task has unsaved changes"),
        }
        debug!("opened task {id}");

        self.workspace
            .editor()
            .cloned()
            .ok_or_else(|| anyhow!("Task {id} could not be opened"))
    }

    fn print_tasks(&self, title: &str) {
        let tasks = TaskSummaries::from(self.workspace.tasks());
        if tasks.is_empty() {
            self.renderer.render(&tasks.to_string());
        } else {
            self.renderer.render(&format!("# {title}\n\n{tasks}"));
        }
    }

    /// Prints pending notifications and turns a failed outcome into an error.
    fn finish(&self, succeeded: bool, message: &str) -> Result<()> {
        self.renderer.render_notifications(self.log.drain());
        if succeeded {
            Ok(())
        } else {
            bail!("{message}")
        }
    }
}
