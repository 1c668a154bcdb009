//! Database schema initialization.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Creates the `tasks` table and its index if they do not exist yet.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::super::Database;

    fn column_names(db: &Database) -> Vec<String> {
        let mut statement = db
            .connection
            .prepare("SELECT name FROM pragma_table_info('tasks') ORDER BY cid")
            .expect("prepare");
        statement
            .query_map([], |row| row.get(0))
            .expect("query")
            .collect::<rusqlite::Result<Vec<String>>>()
            .expect("rows")
    }

    #[test]
    fn test_schema_creates_task_columns() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::new(temp_dir.path().join("schema.db")).expect("open");

        assert_eq!(
            column_names(&db),
            vec!["id", "title", "start_date", "end_date", "boards", "created_at"]
        );
    }

    #[test]
    fn test_schema_initialization_is_repeatable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("schema.db");

        let first = Database::new(&path).expect("first open");
        first.initialize_schema().expect("second initialization");
        drop(first);

        let reopened = Database::new(&path).expect("reopen");
        assert_eq!(column_names(&reopened).len(), 6);
    }
}
