//! Interactive session over a single workspace.
//!
//! Unlike the one-shot commands, the shell keeps one editor mounted across
//! lines, so unsaved edits are tracked and leaving a dirty task asks for
//! confirmation.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;
use slate_core::{
    display::TaskSummaries, guard::GuardState, params::parse_date, BoardEdit, EditorHandle,
    Navigation, NotificationLog, Route, SqliteGateway, TaskId, Workspace,
};

use crate::renderer::TerminalRenderer;

const HELP: &str = "\
# Commands

- `list` / `search <text>`: show tasks, newest first
- `new`: create a task and open it
- `open <id>`: open a task (asks first when there are unsaved edits)
- `title <text>`, `start <YYYY-MM-DD|->`, `end <YYYY-MM-DD|->`: edit the open task
- `save`: save title and dates
- `show`: show the open task
- `add-board`: append an empty board
- `board-edit <board> <title> | <content>`: fill in a board
- `board-done <board>`, `board-undo <board>`, `board-delete <board>`
- `save-and-go`, `discard-and-go`, `cancel`: answer a pending confirmation
- `home`: close the open task
- `delete`: delete the open task
- `quit`
";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    List,
    Search(String),
    New,
    Open(TaskId),
    Title(String),
    Start(Option<String>),
    End(Option<String>),
    Save,
    Show,
    AddBoard,
    BoardEdit {
        board: String,
        title: String,
        content: String,
    },
    BoardDone(String),
    BoardUndo(String),
    BoardDelete(String),
    SaveAndGo,
    DiscardAndGo,
    Cancel,
    Home,
    Delete,
    Help,
    Quit,
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(arg.to_string())
    }
}

fn date_arg(arg: &str, usage: &str) -> Result<Option<String>, String> {
    match arg {
        "" => Err(format!("Usage: {usage}")),
        "-" => Ok(None),
        other => Ok(Some(other.to_string())),
    }
}

fn parse(line: &str) -> Result<Command, String> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "list" | "ls" => Command::List,
        "search" => Command::Search(rest.to_string()),
        "new" => Command::New,
        "open" | "select" => {
            let id = rest
                .parse()
                .map_err(|_| "Usage: open <task id>".to_string())?;
            Command::Open(id)
        }
        "title" => Command::Title(required(rest, "title <text>")?),
        "start" => Command::Start(date_arg(rest, "start <YYYY-MM-DD|->")?),
        "end" => Command::End(date_arg(rest, "end <YYYY-MM-DD|->")?),
        "save" => Command::Save,
        "show" => Command::Show,
        "add-board" => Command::AddBoard,
        "board-edit" => {
            let usage = "Usage: board-edit <board> <title> | <content>";
            let (board, fields) = rest.split_once(char::is_whitespace).ok_or(usage)?;
            let (title, content) = fields.split_once('|').ok_or(usage)?;
            Command::BoardEdit {
                board: board.to_string(),
                title: title.trim().to_string(),
                content: content.trim().to_string(),
            }
        }
        "board-done" => Command::BoardDone(required(rest, "board-done <board>")?),
        "board-undo" => Command::BoardUndo(required(rest, "board-undo <board>")?),
        "board-delete" => Command::BoardDelete(required(rest, "board-delete <board>")?),
        "save-and-go" => Command::SaveAndGo,
        "discard-and-go" => Command::DiscardAndGo,
        "cancel" => Command::Cancel,
        "home" => Command::Home,
        "delete" => Command::Delete,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type `help` for a list.")),
    };
    Ok(command)
}

pub struct Shell {
    workspace: Workspace<SqliteGateway>,
    log: NotificationLog,
    renderer: TerminalRenderer,
}

impl Shell {
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

    /// Reads commands from `input` until it ends or `quit` is entered.
    pub async fn run(mut self, input: impl BufRead) -> Result<()> {
        self.workspace.refresh_tasks().await;
        self.print_tasks();
        self.flush_notifications();
        self.prompt()?;

        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            let line = line.trim();

            if !line.is_empty() {
                match parse(line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        debug!("shell command: {command:?}");
                        self.execute(command).await;
                        self.workspace.sync().await;
                    }
                    Err(message) => self.renderer.render(&format!("{message}\n")),
                }
                self.flush_notifications();
            }
            self.prompt()?;
        }

        if self.workspace.is_dirty() {
            self.renderer
                .render("Leaving with unsaved changes in the open task.\n");
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::List => {
                self.workspace.refresh_tasks().await;
                self.print_tasks();
            }
            Command::Search(term) => {
                self.workspace.search(&term).await;
                self.print_tasks();
            }
            Command::New => {
                if self.workspace.create_task().await.is_some() {
                    self.show();
                }
            }
            Command::Open(id) => {
                let navigation = self.workspace.select_task(id).await;
                self.report_navigation(navigation);
            }
            Command::SaveAndGo => {
                let navigation = self.workspace.save_and_go().await;
                self.report_navigation(navigation);
            }
            Command::DiscardAndGo => {
                if self.workspace.discard_and_go().await.is_some() {
                    self.show();
                } else {
                    self.renderer.render("Nothing is waiting for confirmation.\n");
                }
            }
            Command::Cancel => {
                self.workspace.cancel_navigation();
                self.renderer.render("Staying on the open task.\n");
            }
            Command::Home => {
                self.workspace.go_home();
                self.print_tasks();
            }
            Command::Delete => {
                if self.workspace.delete_current_task().await {
                    self.print_tasks();
                }
            }
            Command::Help => self.renderer.render(HELP),
            Command::Quit => {}
            editing => self.edit(editing).await,
        }
    }

    /// Commands that act on the open editor.
    async fn edit(&mut self, command: Command) {
        let Some(editor) = self.workspace.editor().cloned() else {
            self.renderer
                .render("No task is open. Use `new` or `open <id>` first.\n");
            return;
        };

        match command {
            Command::Title(title) => editor.edit_title(title),
            Command::Start(date) => match self.date(date) {
                Some(date) => editor.edit_start_date(date),
                None => return,
            },
            Command::End(date) => match self.date(date) {
                Some(date) => editor.edit_end_date(date),
                None => return,
            },
            Command::Save => {
                editor.save().await;
            }
            Command::AddBoard => {
                if let Some(added) = editor.add_board().await {
                    self.renderer
                        .render(&format!("Board `{}` added.\n", added.id));
                }
            }
            Command::BoardEdit {
                board,
                title,
                content,
            } => {
                let edit = BoardEdit {
                    title,
                    content,
                    ..Default::default()
                };
                editor.update_board(&board, &edit).await;
            }
            Command::BoardDone(board) => {
                editor.toggle_board(&board, true).await;
            }
            Command::BoardUndo(board) => {
                editor.toggle_board(&board, false).await;
            }
            Command::BoardDelete(board) => {
                editor.delete_board(&board).await;
            }
            Command::Show => {}
            other => debug!("not an editor command: {other:?}"),
        }

        self.show_editor(&editor);
    }

    /// Parses a date argument, reporting bad input. `None` means abort.
    fn date(&self, value: Option<String>) -> Option<Option<jiff::civil::Date>> {
        match value {
            None => Some(None),
            Some(text) => match parse_date("date", &text) {
                Ok(date) => Some(Some(date)),
                Err(e) => {
                    self.renderer.render(&format!("{e}\n"));
                    None
                }
            },
        }
    }

    fn report_navigation(&self, navigation: Navigation) {
        match navigation {
            Navigation::Go(_) => self.show(),
            Navigation::Stay if self.workspace.guard_state() == GuardState::Idle => {
                self.renderer.render("That task is already open.\n");
            }
            Navigation::Stay => self.renderer.render(
                "Still waiting: use `save-and-go`, `discard-and-go` or `cancel`.\n",
            ),
            Navigation::Confirm(target) => self.renderer.render(&format!(
                "The open task has unsaved changes. Before opening task {target}, \
                 use `save-and-go`, `discard-and-go` or `cancel`.\n"
            )),
        }
    }

    fn show(&self) {
        if let Some(editor) = self.workspace.editor() {
            self.show_editor(editor);
        }
    }

    fn show_editor(&self, editor: &EditorHandle<SqliteGateway>) {
        self.renderer.render(&editor.snapshot().to_string());
    }

    fn print_tasks(&self) {
        self.renderer
            .render(&TaskSummaries::from(self.workspace.tasks()).to_string());
    }

    fn flush_notifications(&self) {
        self.renderer.render_notifications(self.log.drain());
    }

    fn prompt(&self) -> Result<()> {
        let marker = if self.workspace.is_dirty() { "*" } else { "" };
        match self.workspace.route() {
            Route::Home => print!("slate> "),
            Route::Task(id) => print!("slate[{id}{marker}]> "),
        }
        std::io::stdout().flush().context("Failed to write prompt")
    }
}
