use std::{sync::Arc, time::Duration};

use jiff::{civil::date, Timestamp};

use super::*;
use crate::{
    error::FailureKind,
    gateway::{Gateway, GatewayOp, MemoryGateway},
    models::{Board, Task, TaskPatch},
    notify::NotificationLog,
    registry::SaveRegistry,
};

struct Fixture {
    gateway: Arc<MemoryGateway>,
    log: NotificationLog,
    context: EditorContext<MemoryGateway>,
}

fn fixture_with(gateway: MemoryGateway) -> Fixture {
    let gateway = Arc::new(gateway);
    let log = NotificationLog::new();
    let context = EditorContext {
        gateway: Arc::clone(&gateway),
        notifier: Arc::new(log.clone()),
        dirty: DirtyFlag::new(),
        reload: ReloadTrigger::new(),
        registry: SaveRegistry::new(),
    };
    Fixture {
        gateway,
        log,
        context,
    }
}

fn fixture() -> Fixture {
    fixture_with(MemoryGateway::new())
}

fn saved_task(id: u64, boards: Vec<Board>) -> Task {
    Task {
        id,
        title: "Quarterly report".to_string(),
        start_date: Some(date(2025, 3, 1)),
        end_date: Some(date(2025, 3, 31)),
        boards,
        created_at: Timestamp::now(),
    }
}

fn board_with_content(id: &str) -> Board {
    Board {
        content: "- outline\n- draft".to_string(),
        ..Board::new(id)
    }
}

fn fill_required(editor: &EditorHandle<MemoryGateway>) {
    editor.edit_title("Trip");
    editor.edit_start_date(Some(date(2025, 5, 1)));
    editor.edit_end_date(Some(date(2025, 5, 3)));
}

#[tokio::test]
async fn test_edits_stay_dirty_until_a_successful_save() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));

    let editor = EditorHandle::mount(1, &fx.context);
    assert!(editor.load().await);
    assert!(!editor.is_dirty());

    editor.edit_title("Quarterly report v2");
    assert!(editor.is_dirty());
    assert!(fx.context.dirty.get());

    fx.gateway.fail_on(GatewayOp::Update, FailureKind::Store);
    assert!(!editor.save().await);
    assert!(editor.is_dirty());
    assert_eq!(editor.save_state(), SaveState::SaveFailed);
    assert!(fx.log.contains_headline("An error occurred"));

    fx.gateway.recover(GatewayOp::Update);
    assert!(editor.save().await);
    assert!(!editor.is_dirty());
    assert_eq!(editor.save_state(), SaveState::Idle);
    assert_eq!(fx.gateway.row(1).expect("row").title, "Quarterly report v2");
}

#[tokio::test]
async fn test_clearing_a_date_dirties_the_editor() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    editor.edit_end_date(None);
    assert!(editor.is_dirty());
    assert!(!editor.save().await);
    assert_eq!(fx.gateway.calls(GatewayOp::Update), 0);
}

#[tokio::test]
async fn test_fetch_keeps_local_boards() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));

    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;
    let board_id = editor.add_board().await.expect("mounted").id;

    let mut server = saved_task(1, vec![Board::new("server-side")]);
    server.title = "Renamed elsewhere".to_string();
    fx.gateway.put(server);

    assert!(editor.load().await);
    let snapshot = editor.snapshot();
    assert_eq!(snapshot.draft.title, "Renamed elsewhere");
    assert_eq!(snapshot.draft.boards.len(), 1);
    assert_eq!(snapshot.draft.boards[0].id, board_id);
    assert!(!snapshot.dirty);
}

#[tokio::test]
async fn test_fetch_takes_server_boards_when_local_list_is_empty() {
    let fx = fixture();
    fx.gateway
        .put(saved_task(1, vec![board_with_content("b1"), Board::new("b2")]));

    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    let snapshot = editor.snapshot();
    assert_eq!(snapshot.draft.boards.len(), 2);
    assert!(snapshot.persisted);
}

#[tokio::test]
async fn test_placeholder_row_is_treated_as_new() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");

    let editor = EditorHandle::mount(id, &fx.context);
    assert!(editor.load().await);

    let snapshot = editor.snapshot();
    assert!(snapshot.dirty);
    assert!(!snapshot.persisted);
    assert_eq!(snapshot.draft, Draft::default());
}

#[tokio::test]
async fn test_placeholder_row_keeps_its_boards() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let boards = vec![board_with_content("b1")];
    fx.gateway
        .update_task(id, TaskPatch::boards(boards.clone()))
        .await
        .expect("update");

    let editor = EditorHandle::mount(id, &fx.context);
    assert!(editor.load().await);

    let snapshot = editor.snapshot();
    assert!(snapshot.dirty);
    assert!(!snapshot.persisted);
    assert_eq!(snapshot.draft.title, "");
    assert_eq!(snapshot.draft.boards, boards);
}

#[tokio::test]
async fn test_missing_row_notifies_and_keeps_draft() {
    let fx = fixture();
    let editor = EditorHandle::mount(42, &fx.context);
    editor.edit_title("kept");

    assert!(!editor.load().await);
    assert_eq!(editor.snapshot().draft.title, "kept");
    assert!(fx.log.contains_headline("Task not found"));
}

#[tokio::test]
async fn test_save_with_missing_fields_makes_no_store_call() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    editor.edit_title("Only a title");

    let before = fx.gateway.total_calls();
    assert!(!editor.save().await);
    assert_eq!(fx.gateway.total_calls(), before);
    assert!(fx.log.contains_headline("Required fields missing"));
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_successful_save_bumps_the_reload_trigger() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    let seen = fx.context.reload.generation();
    assert!(editor.save().await);
    assert!(fx.context.reload.generation() > seen);
    assert!(fx.log.contains_headline("Task saved"));
    assert!(editor.snapshot().persisted);
}

#[tokio::test]
async fn test_transport_failure_reads_as_network_error() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    fx.gateway.fail_on(GatewayOp::Update, FailureKind::Transport);
    assert!(!editor.save().await);
    assert!(fx.log.contains_headline("Network error"));
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_overlapping_save_is_rejected() {
    let fx = fixture_with(MemoryGateway::new().with_latency(Duration::from_millis(30)));
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    let (first, second) = tokio::join!(editor.save(), editor.save());
    assert!(first);
    assert!(!second);
    assert_eq!(fx.gateway.calls(GatewayOp::Update), 1);
    assert!(fx.log.contains_headline("Save in progress"));
}

#[tokio::test]
async fn test_edit_during_save_keeps_dirty() {
    let fx = fixture_with(MemoryGateway::new().with_latency(Duration::from_millis(30)));
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    let (saved, ()) = tokio::join!(editor.save(), async {
        editor.edit_title("Edited mid-flight");
    });
    assert!(saved);
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_unmounted_editor_drops_late_results() {
    let fx = fixture_with(MemoryGateway::new().with_latency(Duration::from_millis(30)));
    fx.gateway.put(saved_task(1, Vec::new()));
    let editor = EditorHandle::mount(1, &fx.context);
    fx.context.dirty.set(true);

    let (loaded, ()) = tokio::join!(editor.load(), async { editor.unmount() });
    assert!(!loaded);
    assert!(fx.context.dirty.get());
    assert_eq!(editor.snapshot().draft.title, "");
}

#[tokio::test]
async fn test_save_finishing_after_unmount_is_dropped() {
    let fx = fixture_with(MemoryGateway::new().with_latency(Duration::from_millis(30)));
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    let seen = fx.context.reload.generation();
    let (saved, ()) = tokio::join!(editor.save(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        editor.unmount();
    });

    assert!(!saved);
    assert_eq!(fx.context.reload.generation(), seen);
    assert!(!fx.log.contains_headline("Task saved"));
    assert_eq!(fx.gateway.calls(GatewayOp::Update), 1);
}

#[tokio::test]
async fn test_save_through_unmounted_editor_is_a_no_op() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;
    editor.unmount();

    let before = fx.gateway.total_calls();
    assert!(!editor.save().await);
    assert!(editor.add_board().await.is_none());
    assert_eq!(fx.gateway.total_calls(), before);
}

#[tokio::test]
async fn test_added_boards_get_distinct_ids_in_order() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;

    let first = editor.add_board().await.expect("first").id;
    let second = editor.add_board().await.expect("second").id;
    assert_ne!(first, second);

    let ids: Vec<String> = editor
        .snapshot()
        .draft
        .boards
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![first.clone(), second.clone()]);

    let persisted: Vec<String> = fx
        .gateway
        .row(id)
        .expect("row")
        .boards
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(persisted, vec![first, second]);
    assert!(fx.log.contains_headline("New board created"));
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_board_kept_locally_when_persist_fails() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    fx.gateway.fail_on(GatewayOp::Update, FailureKind::Transport);
    let added = editor.add_board().await.expect("mounted");
    assert!(!added.persisted);
    assert_eq!(editor.progress(), (0, 1));
    assert!(fx.gateway.row(1).expect("row").boards.is_empty());
    assert!(fx.log.contains_headline("Network error"));
}

#[tokio::test]
async fn test_toggle_requires_content() {
    let fx = fixture();
    fx.gateway
        .put(saved_task(1, vec![Board::new("empty"), board_with_content("full")]));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    assert!(!editor.toggle_board("empty", true).await);
    assert!(fx.log.contains_headline("No content"));
    assert_eq!(fx.gateway.calls(GatewayOp::Update), 0);

    assert!(editor.toggle_board("full", true).await);
    assert_eq!(editor.progress(), (1, 2));
    assert_eq!(fx.gateway.row(1).expect("row").progress(), (1, 2));

    assert!(editor.toggle_board("full", false).await);
    assert_eq!(editor.progress(), (0, 2));
}

#[tokio::test]
async fn test_board_operations_leave_dirty_alone() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, vec![board_with_content("b1")]));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    assert!(editor.toggle_board("b1", true).await);
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn test_update_board_requires_title_and_content() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, vec![Board::new("b1")]));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    let blank = BoardEdit {
        title: "Research".to_string(),
        ..Default::default()
    };
    assert!(!editor.update_board("b1", &blank).await);
    assert!(fx.log.contains_headline("Invalid input"));

    let edit = BoardEdit {
        title: "Research".to_string(),
        start_date: Some(date(2025, 3, 2)),
        end_date: None,
        content: "Read the papers".to_string(),
        is_completed: true,
    };
    assert!(editor.update_board("b1", &edit).await);

    let board = fx.gateway.row(1).expect("row").boards.remove(0);
    assert_eq!(board.title, "Research");
    assert_eq!(board.start_date, Some(date(2025, 3, 2)));
    assert!(board.is_completed);
}

#[tokio::test]
async fn test_unknown_board_is_rejected() {
    let fx = fixture();
    fx.gateway.put(saved_task(1, Vec::new()));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    assert!(!editor.delete_board("missing").await);
    assert!(!editor.toggle_board("missing", false).await);
    assert_eq!(fx.gateway.calls(GatewayOp::Update), 0);
}

#[tokio::test]
async fn test_failed_board_delete_keeps_the_board() {
    let fx = fixture();
    fx.gateway
        .put(saved_task(1, vec![board_with_content("b1"), Board::new("b2")]));
    let editor = EditorHandle::mount(1, &fx.context);
    editor.load().await;

    fx.gateway.fail_on(GatewayOp::Update, FailureKind::Store);
    assert!(!editor.delete_board("b1").await);
    assert_eq!(editor.progress(), (0, 2));

    fx.gateway.recover(GatewayOp::Update);
    assert!(editor.delete_board("b1").await);
    let snapshot = editor.snapshot();
    assert_eq!(snapshot.draft.boards.len(), 1);
    assert_eq!(snapshot.draft.boards[0].id, "b2");
}

#[tokio::test]
async fn test_mount_registers_the_save_action() {
    let fx = fixture();
    let id = fx.gateway.insert_task().await.expect("insert");
    let editor = EditorHandle::mount(id, &fx.context);
    editor.load().await;
    fill_required(&editor);

    let action = fx.context.registry.current().expect("registered");
    assert_eq!(action.task_id(), id);
    assert!(!action.is_persisted());
    assert!(action.save().await);
    assert!(action.is_persisted());
    assert!(!fx.context.dirty.get());

    let other = EditorHandle::mount(99, &fx.context);
    assert_eq!(
        fx.context.registry.current().map(|a| a.task_id()),
        Some(other.task_id())
    );
}
