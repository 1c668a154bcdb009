//! Navigation guard for leaving a task with unsaved edits.
//!
//! Selecting another task while the open one is dirty parks the target in
//! [`GuardState::ConfirmPending`]. The user then saves and goes, discards and
//! goes, or cancels.

use log::debug;

use crate::{
    gateway::Gateway,
    models::TaskId,
    notify::{Notification, Notifier},
    registry::SaveRegistry,
};

/// Whether a navigation is waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    ConfirmPending(TaskId),
}

/// What the caller should do after asking the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Remain on the current route.
    Stay,
    /// Open the target task.
    Go(TaskId),
    /// Ask the user to save, discard or cancel before leaving.
    Confirm(TaskId),
}

/// What discarding did to the task being left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardOutcome {
    /// The never-saved task was deleted.
    Deleted,
    /// Reading back or deleting the never-saved task failed; the row was
    /// left alone and navigation went ahead anyway.
    DeleteFailed,
    /// The task already held saved data; only local edits were dropped.
    Reverted,
    /// No task was open.
    NothingOpen,
}

/// Result of [`NavigationGuard::discard_and_go`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    pub target: TaskId,
    pub outcome: DiscardOutcome,
}

#[derive(Debug, Default)]
pub struct NavigationGuard {
    state: GuardState,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Target waiting for confirmation, if any.
    pub fn pending(&self) -> Option<TaskId> {
        match self.state {
            GuardState::ConfirmPending(target) => Some(target),
            GuardState::Idle => None,
        }
    }

    /// Decides whether moving from `current` to `target` needs confirmation.
    pub fn request(&mut self, current: Option<TaskId>, target: TaskId, dirty: bool) -> Navigation {
        if current == Some(target) {
            return Navigation::Stay;
        }

        if !dirty {
            self.state = GuardState::Idle;
            return Navigation::Go(target);
        }

        debug!("navigation to task {target} waits for confirmation");
        self.state = GuardState::ConfirmPending(target);
        Navigation::Confirm(target)
    }

    /// Runs the registered save and navigates only when it succeeds.
    ///
    /// The registry is read here, at confirm time, so the save belongs to
    /// whichever editor is mounted now.
    pub async fn save_and_go(
        &mut self,
        registry: &SaveRegistry,
        notifier: &dyn Notifier,
    ) -> Navigation {
        let Some(target) = self.pending() else {
            return Navigation::Stay;
        };

        let Some(action) = registry.current() else {
            notifier.notify(Notification::failure(
                "Nothing to save",
                "No open task is ready to be saved.",
            ));
            return Navigation::Stay;
        };

        if action.save().await {
            self.state = GuardState::Idle;
            Navigation::Go(target)
        } else {
            debug!("save before navigating to task {target} failed, still pending");
            Navigation::Stay
        }
    }

    /// Drops the open task's edits and navigates.
    ///
    /// Only a row that is still a placeholder in the store is deleted. A task
    /// with saved data keeps its row, and so does one whose row could not be
    /// read back. Navigation happens whatever the store answers. `None` when
    /// nothing was pending.
    pub async fn discard_and_go<G: Gateway>(
        &mut self,
        current: Option<TaskId>,
        registry: &SaveRegistry,
        gateway: &G,
        notifier: &dyn Notifier,
    ) -> Option<Discarded> {
        let target = self.pending()?;

        let outcome = match current {
            None => DiscardOutcome::NothingOpen,
            Some(id) => {
                let persisted = registry
                    .current()
                    .filter(|action| action.task_id() == id)
                    .is_some_and(|action| action.is_persisted());

                if persisted {
                    revert(notifier)
                } else {
                    discard_unsaved(id, gateway, notifier).await
                }
            }
        };

        debug!("discarded task {current:?} ({outcome:?}), going to task {target}");
        self.state = GuardState::Idle;
        Some(Discarded { target, outcome })
    }

    /// Abandons the pending navigation.
    pub fn cancel(&mut self) {
        self.state = GuardState::Idle;
    }
}

fn revert(notifier: &dyn Notifier) -> DiscardOutcome {
    notifier.notify(Notification::success(
        "Changes discarded",
        "Your unsaved changes were dropped.",
    ));
    DiscardOutcome::Reverted
}

/// Deletes `id` only if the store still holds it as a placeholder.
async fn discard_unsaved<G: Gateway>(
    id: TaskId,
    gateway: &G,
    notifier: &dyn Notifier,
) -> DiscardOutcome {
    match gateway.fetch_task(id).await {
        Ok(Some(task)) if task.is_placeholder() => match gateway.delete_task(id).await {
            Ok(()) => {
                notifier.notify(Notification::success(
                    "Task deleted",
                    "The unsaved task was removed.",
                ));
                DiscardOutcome::Deleted
            }
            Err(e) => {
                notifier.notify(Notification::from_error("delete the task", &e));
                DiscardOutcome::DeleteFailed
            }
        },
        Ok(Some(_)) => revert(notifier),
        Ok(None) => {
            debug!("task {id} is already gone, nothing to delete");
            DiscardOutcome::Reverted
        }
        Err(e) => {
            notifier.notify(Notification::from_error("check the task", &e));
            DiscardOutcome::DeleteFailed
        }
    }
}
