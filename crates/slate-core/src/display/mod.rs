//! Display formatting for tasks, boards, editor snapshots and notifications.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! are wrapped in newtypes (see [`collections`]). Every formatter produces
//! markdown, rendered by the CLI through termimad and returned verbatim by
//! the MCP server.
//!
//! ```rust
//! use slate_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Task saved".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{Notifications, TaskSummaries};
pub use datetime::{DateRange, LocalDateTime};
pub use status::OperationStatus;
