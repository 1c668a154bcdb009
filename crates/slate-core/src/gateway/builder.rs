//! Opening a task store on disk.

use std::path::{Path, PathBuf};

use tokio::task;

use super::SqliteGateway;
use crate::{
    db::Database,
    error::{join_error, Result, SlateError},
};

const APP_DIR: &str = "slate";
const STORE_FILE: &str = "slate.db";

/// Resolves where the task store lives and prepares it for a [`SqliteGateway`].
///
/// Nothing touches the disk until [`GatewayBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct GatewayBuilder {
    store_file: Option<PathBuf>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `path` as the store file. `None` keeps the per-user default,
    /// `$XDG_DATA_HOME/slate/slate.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.store_file = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates missing parent directories and the `tasks` table, then hands
    /// back a gateway that opens its own connection per call.
    ///
    /// # Errors
    ///
    /// `XdgDirectory` when no default location can be found, `FileSystem`
    /// when a parent directory cannot be created, and the store's own error
    /// when the file cannot be opened or the table created.
    pub async fn build(self) -> Result<SqliteGateway> {
        let store_file = match self.store_file {
            Some(path) => path,
            None => default_store_file()?,
        };
        create_parent_dir(&store_file)?;

        let schema_target = store_file.clone();
        task::spawn_blocking(move || Database::new(&schema_target).map(drop))
            .await
            .map_err(join_error)??;

        Ok(SqliteGateway::new(store_file))
    }
}

fn default_store_file() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix(APP_DIR)
        .place_data_file(STORE_FILE)
        .map_err(|e| SlateError::XdgDirectory(e.to_string()))
}

/// A bare file name has an empty parent, which needs no directory.
fn create_parent_dir(store_file: &Path) -> Result<()> {
    match store_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| SlateError::FileSystem {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
