//! Application shell: route, task list, mounted editor and navigation guard.

use std::sync::Arc;

use log::debug;

use crate::{
    editor::{DirtyFlag, EditorContext, EditorHandle, ReloadTrigger},
    gateway::Gateway,
    guard::{DiscardOutcome, Discarded, GuardState, Navigation, NavigationGuard},
    models::{summary::newest_first, TaskId, TaskSummary},
    notify::{Notification, Notifier},
    registry::SaveRegistry,
};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Task(TaskId),
}

impl Route {
    /// Id of the open task, if any.
    pub fn task_id(self) -> Option<TaskId> {
        match self {
            Route::Task(id) => Some(id),
            Route::Home => None,
        }
    }
}

/// One session over a store.
///
/// Holds at most one mounted editor. All navigation between tasks goes
/// through [`Workspace::select_task`] so the guard can intercept it.
pub struct Workspace<G> {
    context: EditorContext<G>,
    route: Route,
    tasks: Vec<TaskSummary>,
    search_term: Option<String>,
    seen_generation: u64,
    guard: NavigationGuard,
    editor: Option<EditorHandle<G>>,
}

impl<G: Gateway> Workspace<G> {
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        let reload = ReloadTrigger::new();
        Self {
            seen_generation: reload.generation(),
            context: EditorContext {
                gateway,
                notifier,
                dirty: DirtyFlag::new(),
                reload,
                registry: SaveRegistry::new(),
            },
            route: Route::Home,
            tasks: Vec::new(),
            search_term: None,
            guard: NavigationGuard::new(),
            editor: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Task list as last fetched, newest first.
    pub fn tasks(&self) -> &[TaskSummary] {
        &self.tasks
    }

    /// Active search term; `None` when the full list is shown.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn editor(&self) -> Option<&EditorHandle<G>> {
        self.editor.as_ref()
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.context.dirty.get()
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.context.gateway
    }

    pub fn registry(&self) -> &SaveRegistry {
        &self.context.registry
    }

    pub fn reload_trigger(&self) -> &ReloadTrigger {
        &self.context.reload
    }

    fn notify(&self, notification: Notification) {
        self.context.notifier.notify(notification);
    }

    /// Fetches every task and sorts the list newest first.
    pub async fn refresh_tasks(&mut self) -> bool {
        self.seen_generation = self.context.reload.generation();
        match self.context.gateway.fetch_all_tasks().await {
            Ok(tasks) => {
                self.tasks = newest_first(&tasks);
                self.search_term = None;
                true
            }
            Err(e) => {
                self.notify(Notification::from_error("load the tasks", &e));
                false
            }
        }
    }

    /// Filters the list by title. A blank term shows every task again.
    pub async fn search(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return self.refresh_tasks().await;
        }

        self.seen_generation = self.context.reload.generation();
        match self.context.gateway.search_tasks(term).await {
            Ok(tasks) => {
                self.tasks = newest_first(&tasks);
                self.search_term = Some(term.to_string());
                true
            }
            Err(e) => {
                self.notify(Notification::from_error("search the tasks", &e));
                false
            }
        }
    }

    /// Refetches the list when something bumped the reload trigger since the
    /// last fetch. An active search is re-run instead of the full list.
    pub async fn sync(&mut self) -> bool {
        if self.context.reload.generation() == self.seen_generation {
            return false;
        }

        match self.search_term.clone() {
            Some(term) => self.search(&term).await,
            None => self.refresh_tasks().await,
        }
    }

    /// Inserts a new task and opens it.
    ///
    /// This is not guarded: edits in the task being left are dropped.
    pub async fn create_task(&mut self) -> Option<TaskId> {
        let id = match self.context.gateway.insert_task().await {
            Ok(id) => id,
            Err(e) => {
                self.notify(Notification::from_error("create the task", &e));
                return None;
            }
        };

        self.notify(Notification::success(
            "Task created",
            "Give your new task a title and dates.",
        ));
        self.context.registry.clear();
        self.guard.cancel();
        self.context.reload.bump();

        self.open_editor(id).await;
        // A new task counts as unsaved even if loading it failed.
        self.context.dirty.set(true);
        self.sync().await;
        Some(id)
    }

    /// Asks to open `id`, going through the navigation guard.
    pub async fn select_task(&mut self, id: TaskId) -> Navigation {
        let navigation = self
            .guard
            .request(self.route.task_id(), id, self.context.dirty.get());

        if let Navigation::Go(target) = navigation {
            self.open_editor(target).await;
        }
        navigation
    }

    /// Saves the open task, then follows the pending navigation.
    pub async fn save_and_go(&mut self) -> Navigation {
        let navigation = self
            .guard
            .save_and_go(&self.context.registry, self.context.notifier.as_ref())
            .await;

        if let Navigation::Go(target) = navigation {
            self.open_editor(target).await;
        }
        self.sync().await;
        navigation
    }

    /// Drops the open task's edits, then follows the pending navigation.
    pub async fn discard_and_go(&mut self) -> Option<Discarded> {
        let discarded = self
            .guard
            .discard_and_go(
                self.route.task_id(),
                &self.context.registry,
                self.context.gateway.as_ref(),
                self.context.notifier.as_ref(),
            )
            .await?;

        if discarded.outcome == DiscardOutcome::Deleted {
            self.context.reload.bump();
        }
        self.open_editor(discarded.target).await;
        self.sync().await;
        Some(discarded)
    }

    /// Stays on the current task.
    pub fn cancel_navigation(&mut self) {
        self.guard.cancel();
    }

    /// Closes the editor and shows the task list. Not guarded.
    pub fn go_home(&mut self) {
        self.close_editor();
        self.context.dirty.set(false);
        self.guard.cancel();
        self.route = Route::Home;
    }

    /// Deletes the open task and returns home.
    pub async fn delete_current_task(&mut self) -> bool {
        match self.route.task_id() {
            Some(id) => self.delete_task(id).await,
            None => {
                self.notify(Notification::failure(
                    "No task open",
                    "Open a task before deleting it.",
                ));
                false
            }
        }
    }

    /// Deletes a task by id. Deleting the open task also returns home.
    pub async fn delete_task(&mut self, id: TaskId) -> bool {
        match self.context.gateway.delete_task(id).await {
            Ok(()) => {
                self.notify(Notification::success(
                    "Task deleted",
                    "The task has been removed.",
                ));
                if self.route.task_id() == Some(id) {
                    self.go_home();
                }
                self.context.reload.bump();
                self.sync().await;
                true
            }
            Err(e) => {
                self.notify(Notification::from_error("delete the task", &e));
                false
            }
        }
    }

    /// Mounts an editor on `id` and loads it, replacing the current editor.
    ///
    /// The dirty flag starts clear and stays clear when the load fails.
    async fn open_editor(&mut self, id: TaskId) -> bool {
        self.close_editor();
        self.context.dirty.set(false);

        let editor = EditorHandle::mount(id, &self.context);
        self.route = Route::Task(id);
        self.editor = Some(editor.clone());
        debug!("route is now task {id}");

        editor.load().await
    }

    fn close_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            editor.unmount();
            self.context.registry.clear();
        }
    }
}
