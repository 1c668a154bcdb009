//! Synchronous editor state machine.
//!
//! [`TaskEditor`] holds the draft of one open task and decides how fetch
//! results, edits and save completions change it. It performs no I/O; the
//! async driver in [`super::handle`] calls the store between these
//! transitions.

use std::fmt;

use jiff::civil::Date;
use log::debug;

use super::signals::DirtyFlag;
use crate::{
    error::{Result, SlateError},
    models::{task::board_progress, Board, Task, TaskId, TaskPatch},
};

/// Local copy of the editable task columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub boards: Vec<Board>,
}

/// Progress of the scalar-column save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    SaveFailed,
}

/// How a fetch result was reconciled with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The row has no title or dates yet; the scalars were cleared and the
    /// row's boards taken as they are.
    Placeholder,
    /// Scalars were taken from the row; `boards_kept` tells whether the local
    /// boards were preserved instead of being replaced.
    Synced { boards_kept: bool },
    /// The editor was torn down before the result arrived.
    Ignored,
}

/// Why a save was not sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveBlocked {
    /// Required columns are empty.
    MissingFields(Vec<&'static str>),
    /// Another save for this editor has not completed yet.
    InFlight,
    /// The editor is no longer mounted.
    Unmounted,
}

impl fmt::Display for SaveBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveBlocked::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            SaveBlocked::InFlight => write!(f, "a save is already in progress"),
            SaveBlocked::Unmounted => write!(f, "the editor is closed"),
        }
    }
}

/// Values submitted from the board dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardEdit {
    pub title: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub content: String,
    pub is_completed: bool,
}

/// Draft, dirty flag and save state of one open task.
#[derive(Debug)]
pub struct TaskEditor {
    task_id: TaskId,
    draft: Draft,
    dirty: DirtyFlag,
    save_state: SaveState,
    /// Bumped by every scalar edit so a save only clears the dirty flag when
    /// nothing changed while it was in flight.
    revision: u64,
    saving_revision: u64,
    persisted: bool,
    mounted: bool,
}

impl TaskEditor {
    /// Creates a mounted editor with an empty draft.
    pub fn new(task_id: TaskId, dirty: DirtyFlag) -> Self {
        Self {
            task_id,
            draft: Draft::default(),
            dirty,
            save_state: SaveState::Idle,
            revision: 0,
            saving_revision: 0,
            persisted: false,
            mounted: true,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the row is known to hold user-entered data, either because
    /// it was fetched with a title or dates or because a save succeeded.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Completed and total board counts of the draft.
    pub fn progress(&self) -> (usize, usize) {
        board_progress(&self.draft.boards)
    }

    /// Reconciles a fetched row with the draft.
    pub fn apply_fetch(&mut self, task: &Task) -> FetchOutcome {
        if !self.mounted {
            return FetchOutcome::Ignored;
        }

        if task.is_placeholder() {
            self.draft = Draft {
                boards: task.boards.clone(),
                ..Draft::default()
            };
            self.persisted = false;
            self.dirty.set(true);
            debug!("task {} fetched as placeholder", self.task_id);
            return FetchOutcome::Placeholder;
        }

        self.draft.title = task.title.clone();
        self.draft.start_date = task.start_date;
        self.draft.end_date = task.end_date;

        let boards_kept = !self.draft.boards.is_empty();
        if !boards_kept {
            self.draft.boards = task.boards.clone();
        }

        self.persisted = true;
        self.dirty.set(false);
        debug!("task {} synced, local boards kept: {boards_kept}", self.task_id);
        FetchOutcome::Synced { boards_kept }
    }

    pub fn edit_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.touch();
    }

    pub fn edit_start_date(&mut self, date: Option<Date>) {
        self.draft.start_date = date;
        self.touch();
    }

    pub fn edit_end_date(&mut self, date: Option<Date>) {
        self.draft.end_date = date;
        self.touch();
    }

    fn touch(&mut self) {
        if self.mounted {
            self.revision += 1;
            self.dirty.set(true);
        }
    }

    /// Appends an empty board and returns the list to persist.
    ///
    /// Returns `None` once the editor is unmounted.
    pub fn push_board(&mut self, board_id: impl Into<String>) -> Option<Vec<Board>> {
        if !self.mounted {
            return None;
        }
        self.draft.boards.push(Board::new(board_id));
        self.touch();
        Some(self.draft.boards.clone())
    }

    /// Validates the draft and moves into `Saving`.
    pub fn begin_save(&mut self) -> std::result::Result<TaskPatch, SaveBlocked> {
        if !self.mounted {
            return Err(SaveBlocked::Unmounted);
        }
        if self.save_state == SaveState::Saving {
            return Err(SaveBlocked::InFlight);
        }

        let mut missing = Vec::new();
        if self.draft.title.is_empty() {
            missing.push("title");
        }
        if self.draft.start_date.is_none() {
            missing.push("start_date");
        }
        if self.draft.end_date.is_none() {
            missing.push("end_date");
        }

        match (self.draft.start_date, self.draft.end_date) {
            (Some(start), Some(end)) if missing.is_empty() => {
                self.save_state = SaveState::Saving;
                self.saving_revision = self.revision;
                Ok(TaskPatch::scalars(self.draft.title.clone(), start, end))
            }
            _ => Err(SaveBlocked::MissingFields(missing)),
        }
    }

    /// Records the store's answer to the save started by `begin_save`.
    ///
    /// Returns `false` when the editor was torn down and nothing changed.
    pub fn finish_save(&mut self, succeeded: bool) -> bool {
        if !self.mounted {
            return false;
        }

        if succeeded {
            self.save_state = SaveState::Idle;
            self.persisted = true;
            if self.revision == self.saving_revision {
                self.dirty.set(false);
            }
        } else {
            self.save_state = SaveState::SaveFailed;
        }
        true
    }

    /// Boards with one board's completion flag changed.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when marking a board without content as complete,
    /// `BoardNotFound` for an unknown id.
    pub fn boards_with_completion(&self, board_id: &str, completed: bool) -> Result<Vec<Board>> {
        let board = self.board(board_id)?;
        if completed && !board.has_content() {
            return Err(SlateError::invalid_input("content")
                .with_reason("Write some content before marking this board complete"));
        }

        Ok(self.map_board(board_id, |b| b.is_completed = completed))
    }

    /// Boards with one board replaced by the dialog values.
    ///
    /// Title and content are both required.
    pub fn boards_with_edit(&self, board_id: &str, edit: &BoardEdit) -> Result<Vec<Board>> {
        self.board(board_id)?;
        if edit.title.trim().is_empty() || edit.content.trim().is_empty() {
            return Err(SlateError::invalid_input("board")
                .with_reason("Both the board title and content are required"));
        }

        Ok(self.map_board(board_id, |b| {
            b.title = edit.title.clone();
            b.start_date = edit.start_date;
            b.end_date = edit.end_date;
            b.content = edit.content.clone();
            b.is_completed = edit.is_completed;
        }))
    }

    /// Boards without the given board.
    pub fn boards_without(&self, board_id: &str) -> Result<Vec<Board>> {
        self.board(board_id)?;
        Ok(self
            .draft
            .boards
            .iter()
            .filter(|b| b.id != board_id)
            .cloned()
            .collect())
    }

    /// Installs a board list the store has accepted.
    pub fn replace_boards(&mut self, boards: Vec<Board>) {
        if self.mounted {
            self.draft.boards = boards;
        }
    }

    /// Tears the editor down; late results are ignored from now on.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    fn board(&self, board_id: &str) -> Result<&Board> {
        self.draft
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .ok_or_else(|| SlateError::BoardNotFound {
                id: board_id.to_string(),
            })
    }

    fn map_board(&self, board_id: &str, change: impl FnOnce(&mut Board)) -> Vec<Board> {
        let mut boards = self.draft.boards.clone();
        if let Some(board) = boards.iter_mut().find(|b| b.id == board_id) {
            change(board);
        }
        boards
    }
}
