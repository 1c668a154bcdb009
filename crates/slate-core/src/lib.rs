//! Core library for the Slate task and board manager.
//!
//! A task has a title, a date range and an ordered list of boards. This crate
//! holds the client-side editing core around a task store:
//!
//! - [`gateway`]: the async store boundary, backed by SQLite or memory
//! - [`editor`]: the editor of one open task, with its dirty flag and
//!   save state
//! - [`registry`]: the slot through which the guard reaches the open
//!   editor's save
//! - [`guard`]: confirmation before leaving a task with unsaved edits
//! - [`workspace`]: route, task list, editor and guard tied together
//!
//! Every outcome is reported through a [`notify::Notifier`]; errors are
//! [`SlateError`] values classified by [`FailureKind`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use jiff::civil::date;
//! use slate_core::{GatewayBuilder, NotificationLog, Workspace};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = GatewayBuilder::new()
//!     .with_database_path(Some("slate.db"))
//!     .build()
//!     .await?;
//!
//! let log = NotificationLog::new();
//! let mut workspace = Workspace::new(Arc::new(gateway), Arc::new(log.clone()));
//!
//! let id = workspace.create_task().await.expect("created");
//! let editor = workspace.editor().expect("open").clone();
//! editor.edit_title("Trip");
//! editor.edit_start_date(Some(date(2025, 5, 1)));
//! editor.edit_end_date(Some(date(2025, 5, 3)));
//! editor.save().await;
//!
//! for toast in log.drain() {
//!     println!("{toast}");
//! }
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod notify;
pub mod params;
pub mod registry;
pub mod workspace;

// Re-export commonly used types
pub use db::Database;
pub use display::{LocalDateTime, OperationStatus, TaskSummaries};
pub use editor::{BoardEdit, EditorHandle, EditorSnapshot, SaveState};
pub use error::{FailureKind, Result, SlateError};
pub use gateway::{Gateway, GatewayBuilder, MemoryGateway, SqliteGateway};
pub use guard::{DiscardOutcome, Navigation, NavigationGuard};
pub use models::{Board, Task, TaskId, TaskSummary};
pub use notify::{Notification, NotificationLog, Notifier};
pub use registry::SaveRegistry;
pub use workspace::{Route, Workspace};
