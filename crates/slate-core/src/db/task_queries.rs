//! Task CRUD operations and queries.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result, SlateError},
    models::{Board, Task, TaskId, TaskPatch},
};

const INSERT_TASK_SQL: &str =
    "INSERT INTO tasks (title, start_date, end_date, boards, created_at) VALUES ('', NULL, NULL, '[]', ?1)";
const SELECT_TASK_SQL: &str =
    "SELECT id, title, start_date, end_date, boards, created_at FROM tasks WHERE id = ?1";
const SELECT_ALL_TASKS_SQL: &str =
    "SELECT id, title, start_date, end_date, boards, created_at FROM tasks ORDER BY created_at DESC, id DESC";
const SEARCH_TASKS_SQL: &str = "SELECT id, title, start_date, end_date, boards, created_at FROM tasks \
     WHERE instr(lower(title), lower(?1)) > 0 ORDER BY created_at DESC, id DESC";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

impl super::Database {
    /// Inserts an empty task row and returns the new task.
    pub fn insert_task(&mut self) -> Result<Task> {
        let now = Timestamp::now();

        self.connection
            .execute(INSERT_TASK_SQL, params![now.to_string()])
            .db_context("Failed to insert task")?;

        let id = self.connection.last_insert_rowid() as TaskId;

        Ok(Task {
            id,
            title: String::new(),
            start_date: None,
            end_date: None,
            boards: Vec::new(),
            created_at: now,
        })
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.connection
            .query_row(SELECT_TASK_SQL, params![id as i64], task_from_row)
            .optional()
            .db_context("Failed to query task")
    }

    /// Lists every task, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_TASKS_SQL)
            .db_context("Failed to prepare query")?;

        let tasks = stmt
            .query_map([], task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to decode tasks")?;

        Ok(tasks)
    }

    /// Lists tasks whose title contains `term`, ignoring case.
    pub fn search_tasks(&self, term: &str) -> Result<Vec<Task>> {
        let mut stmt = self
            .connection
            .prepare(SEARCH_TASKS_SQL)
            .db_context("Failed to prepare query")?;

        let tasks = stmt
            .query_map(params![term], task_from_row)
            .db_context("Failed to search tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to decode tasks")?;

        Ok(tasks)
    }

    /// Writes the columns named by `patch`.
    ///
    /// # Errors
    ///
    /// Returns `SlateError::InvalidInput` for an empty patch and
    /// `SlateError::TaskNotFound` when no row has the given id.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(SlateError::invalid_input("patch").with_reason("No columns to update"));
        }

        let mut assignments = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = patch.title {
            assignments.push("title = ?");
            params_vec.push(Box::new(title.clone()));
        }

        if let Some(ref start) = patch.start_date {
            assignments.push("start_date = ?");
            params_vec.push(Box::new(start.map(|d| d.to_string())));
        }

        if let Some(ref end) = patch.end_date {
            assignments.push("end_date = ?");
            params_vec.push(Box::new(end.map(|d| d.to_string())));
        }

        if let Some(ref boards) = patch.boards {
            assignments.push("boards = ?");
            params_vec.push(Box::new(serde_json::to_string(boards)?));
        }

        params_vec.push(Box::new(id as i64));
        let query = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let updated = self
            .connection
            .execute(&query, &params_refs[..])
            .db_context("Failed to update task")?;

        if updated == 0 {
            return Err(SlateError::TaskNotFound { id });
        }

        Ok(())
    }

    /// Permanently deletes a task row.
    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let deleted = self
            .connection
            .execute(DELETE_TASK_SQL, params![id as i64])
            .db_context("Failed to delete task")?;

        if deleted == 0 {
            return Err(SlateError::TaskNotFound { id });
        }

        Ok(())
    }
}

/// Decodes one `tasks` row, validating dates and the boards JSON.
fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let boards_json: String = row.get(4)?;
    let boards: Vec<Board> = serde_json::from_str(&boards_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: row.get::<_, i64>(0)? as TaskId,
        title: row.get(1)?,
        start_date: date_column(row, 2)?,
        end_date: date_column(row, 3)?,
        boards,
        created_at: row.get::<_, String>(5)?.parse::<Timestamp>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?,
    })
}

fn date_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Date>> {
    row.get::<_, Option<String>>(index)?
        .map(|s| {
            s.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}
