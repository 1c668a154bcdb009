use std::sync::Arc;

use slate_core::{GatewayBuilder, NotificationLog, SqliteGateway, Workspace};
use tempfile::TempDir;

/// Helper function to create a gateway over a fresh database file
pub async fn create_test_gateway() -> (TempDir, SqliteGateway) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let gateway = GatewayBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create gateway");
    (temp_dir, gateway)
}

/// Helper function to create a workspace over a fresh database file
#[allow(dead_code)]
pub async fn create_test_workspace() -> (TempDir, Workspace<SqliteGateway>, NotificationLog) {
    let (temp_dir, gateway) = create_test_gateway().await;
    let log = NotificationLog::new();
    let workspace = Workspace::new(Arc::new(gateway), Arc::new(log.clone()));
    (temp_dir, workspace, log)
}
