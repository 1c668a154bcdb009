//! Save registry: one slot holding the mounted editor's save action.
//!
//! Components that have no reference to the open editor (the task list and
//! its navigation guard) reach the editor's save through this slot. The
//! registry is an explicit handle: the workspace creates it and hands clones
//! to the editor (writer) and the guard (reader).
//!
//! ```rust
//! use std::sync::Arc;
//! use slate_core::registry::{SaveAction, SaveFuture, SaveRegistry};
//!
//! struct AlwaysSaves;
//!
//! impl SaveAction for AlwaysSaves {
//!     fn task_id(&self) -> u64 { 7 }
//!     fn is_persisted(&self) -> bool { true }
//!     fn save(&self) -> SaveFuture<'_> { Box::pin(async { true }) }
//! }
//!
//! let registry = SaveRegistry::new();
//! registry.register(Arc::new(AlwaysSaves));
//! assert_eq!(registry.current().map(|a| a.task_id()), Some(7));
//! ```

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;

use crate::models::TaskId;

/// Boxed future returned by [`SaveAction::save`].
pub type SaveFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// A zero-argument save returning whether the task was persisted.
pub trait SaveAction: Send + Sync {
    /// Task the action saves.
    fn task_id(&self) -> TaskId;

    /// Whether the task row already holds user-entered data.
    fn is_persisted(&self) -> bool;

    /// Saves the editor; `false` on validation or store failure.
    fn save(&self) -> SaveFuture<'_>;
}

/// Cloneable handle to the single save slot.
#[derive(Clone, Default)]
pub struct SaveRegistry {
    slot: Arc<Mutex<Option<Arc<dyn SaveAction>>>>,
}

impl SaveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `action`, replacing whatever was registered before.
    pub fn register(&self, action: Arc<dyn SaveAction>) {
        debug!("save action registered for task {}", action.task_id());
        *self.lock() = Some(action);
    }

    /// Empties the slot.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// The action registered right now.
    ///
    /// Read this inside the confirm action itself; a value kept from earlier
    /// may belong to an editor that has since been replaced.
    pub fn current(&self) -> Option<Arc<dyn SaveAction>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<dyn SaveAction>>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for SaveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveRegistry")
            .field("registered", &self.current().map(|a| a.task_id()))
            .finish()
    }
}
