//! Shared cells written by the editor and read by the rest of the workspace.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

/// Coarse "the open task has unsaved edits" flag.
///
/// One flag lives in the workspace; each mounted editor holds a clone and is
/// its only writer while mounted. The navigation guard reads it.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, dirty: bool) {
        self.0.store(dirty, Ordering::SeqCst);
    }
}

/// Monotonic counter bumped whenever the task list may be stale.
#[derive(Debug, Clone, Default)]
pub struct ReloadTrigger(Arc<AtomicU64>);

impl ReloadTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals that the list must be fetched again.
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Current generation; compare against a previously seen value.
    pub fn generation(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
