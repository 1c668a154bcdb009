//! SQLite-backed gateway.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use super::Gateway;
use crate::{
    db::Database,
    error::{join_error, Result},
    models::{Task, TaskId, TaskPatch},
};

/// Gateway that opens the SQLite file per call on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    db_path: PathBuf,
}

impl SqliteGateway {
    /// Creates a gateway for an already initialized database file.
    ///
    /// Use [`super::GatewayBuilder`] to create the file and schema.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the database file.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(join_error)?
    }
}

impl Gateway for SqliteGateway {
    async fn insert_task(&self) -> Result<TaskId> {
        let task = self.run(|db| db.insert_task()).await?;
        debug!("inserted task {}", task.id);
        Ok(task.id)
    }

    async fn fetch_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.run(move |db| db.get_task(id)).await
    }

    async fn fetch_all_tasks(&self) -> Result<Vec<Task>> {
        self.run(|db| db.list_tasks()).await
    }

    async fn search_tasks(&self, term: &str) -> Result<Vec<Task>> {
        let term = term.to_string();
        self.run(move |db| db.search_tasks(&term)).await
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<()> {
        debug!("updating task {id}: {patch:?}");
        self.run(move |db| db.update_task(id, &patch)).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        debug!("deleting task {id}");
        self.run(move |db| db.delete_task(id)).await
    }
}
