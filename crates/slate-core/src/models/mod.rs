//! Data models for tasks and boards.
//!
//! A [`Task`] is the unit of persistence: its scalar columns (title and date
//! range) and its ordered [`Board`] list live in one store row. Boards have no
//! identity of their own at the store level and are written back as a whole
//! list whenever one of them changes.
//!
//! Display implementations for these models are located in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use slate_core::models::{Board, Task};
//! use jiff::Timestamp;
//!
//! let task = Task {
//!     id: 1,
//!     title: String::new(),
//!     start_date: None,
//!     end_date: None,
//!     boards: vec![],
//!     created_at: Timestamp::now(),
//! };
//! assert!(task.is_placeholder());
//!
//! let board = Board::new("b-1");
//! assert!(!board.is_completed);
//! assert!(!board.has_content());
//! ```

pub mod board;
pub mod patch;
pub mod summary;
pub mod task;

#[cfg(test)]
mod tests;

pub use board::Board;
pub use patch::TaskPatch;
pub use summary::TaskSummary;
pub use task::{Task, TaskId};
