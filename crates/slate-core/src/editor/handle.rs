//! Async driver around [`TaskEditor`].
//!
//! [`EditorHandle`] owns the shared editor state and performs the store calls
//! the state machine asks for. The state lock is taken only inside short
//! synchronous sections, so every future returned here is `Send`.

use std::sync::{Arc, Mutex};

use log::debug;
use uuid::Uuid;

use super::{
    signals::{DirtyFlag, ReloadTrigger},
    state::{BoardEdit, Draft, FetchOutcome, SaveBlocked, SaveState, TaskEditor},
};
use crate::{
    error::{Result, SlateError},
    gateway::Gateway,
    models::{Board, TaskId, TaskPatch},
    notify::{Notification, Notifier},
    registry::{SaveAction, SaveFuture, SaveRegistry},
};

/// Everything an editor needs from its surroundings.
pub struct EditorContext<G> {
    pub gateway: Arc<G>,
    pub notifier: Arc<dyn Notifier>,
    pub dirty: DirtyFlag,
    pub reload: ReloadTrigger,
    pub registry: SaveRegistry,
}

impl<G> Clone for EditorContext<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
            dirty: self.dirty.clone(),
            reload: self.reload.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// Point-in-time copy of the editor for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub task_id: TaskId,
    pub draft: Draft,
    pub dirty: bool,
    pub save_state: SaveState,
    pub persisted: bool,
    pub mounted: bool,
}

impl EditorSnapshot {
    /// Completed and total board counts.
    pub fn progress(&self) -> (usize, usize) {
        crate::models::task::board_progress(&self.draft.boards)
    }
}

/// Board appended by [`EditorHandle::add_board`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedBoard {
    pub id: String,
    /// Whether the store accepted the new board list.
    pub persisted: bool,
}

struct Shared<G> {
    state: Mutex<TaskEditor>,
    gateway: Arc<G>,
    notifier: Arc<dyn Notifier>,
    reload: ReloadTrigger,
}

/// Handle to the editor of one open task.
///
/// Clones share the same state. The handle registered in the
/// [`SaveRegistry`] is one of those clones.
pub struct EditorHandle<G> {
    shared: Arc<Shared<G>>,
}

impl<G> Clone for EditorHandle<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: Gateway> EditorHandle<G> {
    /// Creates an editor for `task_id` and registers its save action.
    ///
    /// The draft stays empty until [`EditorHandle::load`] runs.
    pub fn mount(task_id: TaskId, context: &EditorContext<G>) -> Self {
        let handle = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TaskEditor::new(task_id, context.dirty.clone())),
                gateway: Arc::clone(&context.gateway),
                notifier: Arc::clone(&context.notifier),
                reload: context.reload.clone(),
            }),
        };

        context.registry.register(Arc::new(handle.clone()));
        debug!("editor mounted for task {task_id}");
        handle
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut TaskEditor) -> R) -> R {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn notify(&self, notification: Notification) {
        self.shared.notifier.notify(notification);
    }

    pub fn task_id(&self) -> TaskId {
        self.with_state(|s| s.task_id())
    }

    pub fn is_dirty(&self) -> bool {
        self.with_state(|s| s.is_dirty())
    }

    pub fn is_mounted(&self) -> bool {
        self.with_state(|s| s.is_mounted())
    }

    pub fn save_state(&self) -> SaveState {
        self.with_state(|s| s.save_state())
    }

    pub fn progress(&self) -> (usize, usize) {
        self.with_state(|s| s.progress())
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        self.with_state(|s| EditorSnapshot {
            task_id: s.task_id(),
            draft: s.draft().clone(),
            dirty: s.is_dirty(),
            save_state: s.save_state(),
            persisted: s.is_persisted(),
            mounted: s.is_mounted(),
        })
    }

    /// Fetches the task and reconciles it with the draft.
    ///
    /// Returns `false` when the fetch failed, the row is gone, or the editor
    /// was unmounted before the answer arrived.
    pub async fn load(&self) -> bool {
        let id = self.task_id();
        match self.shared.gateway.fetch_task(id).await {
            Ok(Some(task)) => {
                let outcome = self.with_state(|s| s.apply_fetch(&task));
                outcome != FetchOutcome::Ignored
            }
            Ok(None) => {
                if self.is_mounted() {
                    self.notify(Notification::failure(
                        "Task not found",
                        format!("Task {id} no longer exists."),
                    ));
                }
                false
            }
            Err(e) => {
                if self.is_mounted() {
                    self.notify(Notification::from_error("load the task", &e));
                }
                false
            }
        }
    }

    pub fn edit_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.with_state(|s| s.edit_title(title));
    }

    pub fn edit_start_date(&self, date: Option<jiff::civil::Date>) {
        self.with_state(|s| s.edit_start_date(date));
    }

    pub fn edit_end_date(&self, date: Option<jiff::civil::Date>) {
        self.with_state(|s| s.edit_end_date(date));
    }

    /// Applies the scalar columns named by `patch` as user edits.
    pub fn apply_edits(&self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.edit_title(title.clone());
        }
        if let Some(start) = patch.start_date {
            self.edit_start_date(start);
        }
        if let Some(end) = patch.end_date {
            self.edit_end_date(end);
        }
    }

    /// Appends an empty board and persists the whole board list.
    ///
    /// The board stays in the draft even when persisting it fails. Returns
    /// `None` when the editor is unmounted.
    pub async fn add_board(&self) -> Option<AddedBoard> {
        let board_id = Uuid::new_v4().to_string();
        let boards = self.with_state(|s| s.push_board(board_id.clone()))?;
        let id = self.task_id();

        let persisted = match self
            .shared
            .gateway
            .update_task(id, TaskPatch::boards(boards))
            .await
        {
            Ok(()) => {
                self.notify(Notification::success(
                    "New board created",
                    "Fill in your new board!",
                ));
                true
            }
            Err(e) => {
                self.notify(Notification::from_error("create the board", &e));
                false
            }
        };

        Some(AddedBoard {
            id: board_id,
            persisted,
        })
    }

    /// Saves title and dates.
    ///
    /// Returns `true` only when the store accepted the update while the
    /// editor was still mounted.
    pub async fn save(&self) -> bool {
        let patch = match self.with_state(|s| s.begin_save()) {
            Ok(patch) => patch,
            Err(SaveBlocked::MissingFields(fields)) => {
                debug!("save blocked, missing {fields:?}");
                self.notify(Notification::failure(
                    "Required fields missing",
                    "Title, start date and end date are all required.",
                ));
                return false;
            }
            Err(SaveBlocked::InFlight) => {
                self.notify(Notification::failure(
                    "Save in progress",
                    "Wait for the current save to finish.",
                ));
                return false;
            }
            Err(blocked @ SaveBlocked::Unmounted) => {
                debug!("save skipped: {blocked}");
                return false;
            }
        };

        let id = self.task_id();
        let result = self.shared.gateway.update_task(id, patch).await;
        if !self.with_state(|s| s.finish_save(result.is_ok())) {
            debug!("save of task {id} finished after unmount, result dropped");
            return false;
        }

        match result {
            Ok(()) => {
                self.shared.reload.bump();
                self.notify(Notification::success(
                    "Task saved",
                    "Your changes have been saved.",
                ));
                true
            }
            Err(e) => {
                self.notify(Notification::from_error("save the task", &e));
                false
            }
        }
    }

    /// Marks a board complete or incomplete.
    pub async fn toggle_board(&self, board_id: &str, completed: bool) -> bool {
        match self.with_state(|s| s.boards_with_completion(board_id, completed)) {
            Ok(boards) => {
                let headline = if completed {
                    "Board completed"
                } else {
                    "Board reopened"
                };
                self.persist_boards(boards, "update the board", headline)
                    .await
            }
            Err(SlateError::InvalidInput { reason, .. }) => {
                self.notify(Notification::failure("No content", reason));
                false
            }
            Err(e) => self.reject(&e),
        }
    }

    /// Replaces a board's fields with the dialog values.
    pub async fn update_board(&self, board_id: &str, edit: &BoardEdit) -> bool {
        match self.with_state(|s| s.boards_with_edit(board_id, edit)) {
            Ok(boards) => {
                self.persist_boards(boards, "update the board", "Board updated")
                    .await
            }
            Err(e) => self.reject(&e),
        }
    }

    /// Removes a board. On failure the draft keeps it.
    pub async fn delete_board(&self, board_id: &str) -> bool {
        match self.with_state(|s| s.boards_without(board_id)) {
            Ok(boards) => {
                self.persist_boards(boards, "delete the board", "Board deleted")
                    .await
            }
            Err(e) => self.reject(&e),
        }
    }

    fn reject(&self, error: &SlateError) -> bool {
        self.notify(Notification::from_error("change the board", error));
        false
    }

    async fn persist_boards(&self, boards: Vec<Board>, action: &str, headline: &str) -> bool {
        if !self.is_mounted() {
            return false;
        }

        let id = self.task_id();
        let result: Result<()> = self
            .shared
            .gateway
            .update_task(id, TaskPatch::boards(boards.clone()))
            .await;

        match result {
            Ok(()) => {
                self.with_state(|s| s.replace_boards(boards));
                self.notify(Notification::success(headline, "Board changes saved."));
                true
            }
            Err(e) => {
                self.notify(Notification::from_error(action, &e));
                false
            }
        }
    }

    /// Tears the editor down. Results that arrive afterwards are dropped.
    pub fn unmount(&self) {
        self.with_state(|s| s.unmount());
        debug!("editor unmounted for task {}", self.task_id());
    }
}

impl<G: Gateway> SaveAction for EditorHandle<G> {
    fn task_id(&self) -> TaskId {
        EditorHandle::task_id(self)
    }

    fn is_persisted(&self) -> bool {
        self.with_state(|s| s.is_persisted())
    }

    fn save(&self) -> SaveFuture<'_> {
        Box::pin(EditorHandle::save(self))
    }
}
