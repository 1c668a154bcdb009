//! SQLite row store for tasks.
//!
//! This module is the storage engine behind [`crate::gateway::SqliteGateway`].
//! It knows the `tasks` table layout, encodes the boards column as JSON and
//! decodes rows into typed [`crate::models::Task`] values so nothing untyped
//! leaves this layer.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

mod schema;
pub mod task_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).transport_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
