//! Store gateway: the asynchronous CRUD boundary the editor core talks to.
//!
//! The core never sees raw rows. Every implementation hands back typed
//! [`Task`] values and reports failures as [`crate::SlateError`], classified
//! by [`crate::FailureKind`] into store and transport errors.
//!
//! Two implementations ship with the crate:
//!
//! - [`SqliteGateway`]: the persistent store, running each call on the
//!   blocking thread pool
//! - [`MemoryGateway`]: an in-process store with call accounting and failure
//!   injection, used by tests and scripted sessions
//!
//! ```rust
//! use slate_core::gateway::{Gateway, MemoryGateway};
//!
//! # async fn example() -> slate_core::Result<()> {
//! let store = MemoryGateway::new();
//! let id = store.insert_task().await?;
//! let task = store.fetch_task(id).await?.expect("inserted");
//! assert!(task.is_placeholder());
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::{
    error::Result,
    models::{Task, TaskId, TaskPatch},
};

pub mod builder;
pub mod memory;
pub mod sqlite;

pub use builder::GatewayBuilder;
pub use memory::{GatewayOp, MemoryGateway};
pub use sqlite::SqliteGateway;

/// Asynchronous create/read/update/delete operations on task rows.
pub trait Gateway: Send + Sync + 'static {
    /// Inserts an empty task (`title = ""`, no dates, no boards).
    fn insert_task(&self) -> impl Future<Output = Result<TaskId>> + Send;

    /// Fetches one task, `None` when no row has that id.
    fn fetch_task(&self, id: TaskId) -> impl Future<Output = Result<Option<Task>>> + Send;

    /// Fetches every task.
    fn fetch_all_tasks(&self) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// Fetches tasks whose title contains `term`, ignoring case.
    fn search_tasks(&self, term: &str) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// Writes the columns named by `patch`.
    fn update_task(&self, id: TaskId, patch: TaskPatch)
        -> impl Future<Output = Result<()>> + Send;

    /// Deletes a task row.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send;
}
