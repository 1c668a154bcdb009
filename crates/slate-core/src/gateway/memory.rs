//! In-process gateway with call accounting and failure injection.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use jiff::Timestamp;

use super::Gateway;
use crate::{
    error::{FailureKind, Result, SlateError},
    models::{Task, TaskId, TaskPatch},
};

/// Gateway operations, used to count calls and target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Insert,
    Fetch,
    FetchAll,
    Search,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: TaskId,
    rows: BTreeMap<TaskId, Task>,
    calls: HashMap<GatewayOp, usize>,
    failures: HashMap<GatewayOp, FailureKind>,
}

/// A gateway that keeps rows in memory.
///
/// Every call is counted per [`GatewayOp`]. [`MemoryGateway::fail_on`] makes
/// an operation fail with a store or transport error until
/// [`MemoryGateway::recover`] is called, and [`MemoryGateway::with_latency`]
/// delays every call so overlapping operations can be observed.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryGateway {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call by `latency` before it touches the rows.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Inserts or replaces a row as the server would hold it.
    pub fn put(&self, task: Task) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(task.id);
        state.rows.insert(task.id, task);
    }

    /// Current server copy of a row, without counting a call.
    pub fn row(&self, id: TaskId) -> Option<Task> {
        self.lock().rows.get(&id).cloned()
    }

    /// Number of calls made for one operation.
    pub fn calls(&self, op: GatewayOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of calls made across all operations.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Makes `op` fail with the given kind of error until recovered.
    pub fn fail_on(&self, op: GatewayOp, kind: FailureKind) {
        self.lock().failures.insert(op, kind);
    }

    /// Clears an injected failure.
    pub fn recover(&self, op: GatewayOp) {
        self.lock().failures.remove(&op);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test panicked mid-call; the rows are
        // still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self, op: GatewayOp) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;

        match state.failures.get(&op) {
            Some(FailureKind::Transport) => Err(SlateError::transport(format!(
                "{op:?} could not reach the store"
            ))),
            Some(_) => Err(SlateError::database(format!("{op:?} rejected by the store"))
                .with_source(rusqlite::Error::ExecuteReturnedResults)),
            None => Ok(()),
        }
    }
}

impl Gateway for MemoryGateway {
    async fn insert_task(&self) -> Result<TaskId> {
        self.enter(GatewayOp::Insert).await?;

        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.rows.insert(
            id,
            Task {
                id,
                title: String::new(),
                start_date: None,
                end_date: None,
                boards: Vec::new(),
                created_at: Timestamp::now(),
            },
        );
        Ok(id)
    }

    async fn fetch_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.enter(GatewayOp::Fetch).await?;
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn fetch_all_tasks(&self) -> Result<Vec<Task>> {
        self.enter(GatewayOp::FetchAll).await?;
        Ok(self.lock().rows.values().cloned().collect())
    }

    async fn search_tasks(&self, term: &str) -> Result<Vec<Task>> {
        let needle = term.to_lowercase();
        self.enter(GatewayOp::Search).await?;

        Ok(self
            .lock()
            .rows
            .values()
            .filter(|task| task.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<()> {
        self.enter(GatewayOp::Update).await?;

        let mut state = self.lock();
        let task = state
            .rows
            .get_mut(&id)
            .ok_or(SlateError::TaskNotFound { id })?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(start) = patch.start_date {
            task.start_date = start;
        }
        if let Some(end) = patch.end_date {
            task.end_date = end;
        }
        if let Some(boards) = patch.boards {
            task.boards = boards;
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.enter(GatewayOp::Delete).await?;

        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(SlateError::TaskNotFound { id })
    }
}
