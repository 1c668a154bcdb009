//! Editor for one open task.
//!
//! [`TaskEditor`] is the synchronous state machine: draft, dirty flag, save
//! state and teardown. [`EditorHandle`] drives it against a [`Gateway`] and
//! reports every outcome through a [`Notifier`].
//!
//! ```rust
//! use std::sync::Arc;
//! use jiff::civil::date;
//! use slate_core::{
//!     editor::{DirtyFlag, EditorContext, EditorHandle, ReloadTrigger},
//!     gateway::{Gateway, MemoryGateway},
//!     notify::NotificationLog,
//!     registry::SaveRegistry,
//! };
//!
//! # async fn example() -> slate_core::Result<()> {
//! let gateway = Arc::new(MemoryGateway::new());
//! let id = gateway.insert_task().await?;
//! let context = EditorContext {
//!     gateway,
//!     notifier: Arc::new(NotificationLog::new()),
//!     dirty: DirtyFlag::new(),
//!     reload: ReloadTrigger::new(),
//!     registry: SaveRegistry::new(),
//! };
//!
//! let editor = EditorHandle::mount(id, &context);
//! editor.load().await;
//! editor.edit_title("Trip");
//! editor.edit_start_date(Some(date(2025, 5, 1)));
//! editor.edit_end_date(Some(date(2025, 5, 3)));
//! assert!(editor.save().await);
//! assert!(!editor.is_dirty());
//! # Ok(())
//! # }
//! ```
//!
//! [`Gateway`]: crate::gateway::Gateway
//! [`Notifier`]: crate::notify::Notifier

pub mod handle;
pub mod signals;
pub mod state;

pub use handle::{AddedBoard, EditorContext, EditorHandle, EditorSnapshot};
pub use signals::{DirtyFlag, ReloadTrigger};
pub use state::{BoardEdit, Draft, FetchOutcome, SaveBlocked, SaveState, TaskEditor};

#[cfg(test)]
mod tests;
