mod common;

use common::create_test_workspace;
use jiff::civil::date;
use slate_core::{
    guard::GuardState, params::EditTask, DiscardOutcome, Gateway, Navigation, Route,
};

#[tokio::test]
async fn test_new_task_flow_over_sqlite() {
    let (_dir, mut ws, log) = create_test_workspace().await;

    let id = ws.create_task().await.expect("created");
    assert_eq!(ws.route(), Route::Task(id));
    assert!(ws.is_dirty());

    let editor = ws.editor().expect("open").clone();
    let patch = EditTask {
        id,
        title: Some("Conference".to_string()),
        start_date: Some("2025-10-01".to_string()),
        end_date: Some("2025-10-03".to_string()),
    }
    .to_patch()
    .expect("valid edit");
    editor.apply_edits(&patch);

    let board = editor.add_board().await.expect("board");
    assert!(board.persisted);
    assert!(editor.save().await);
    assert!(!ws.is_dirty());

    ws.sync().await;
    assert_eq!(ws.tasks()[0].title, "Conference");
    assert_eq!(ws.tasks()[0].total_boards, 1);

    let stored = ws.gateway().fetch_task(id).await.expect("fetch").expect("row");
    assert_eq!(stored.end_date, Some(date(2025, 10, 3)));
    assert_eq!(stored.boards[0].id, board.id);
    assert!(log.contains_headline("Task saved"));
}

#[tokio::test]
async fn test_guarded_navigation_over_sqlite() {
    let (_dir, mut ws, _log) = create_test_workspace().await;

    let target = ws.create_task().await.expect("target");
    {
        let editor = ws.editor().expect("open").clone();
        editor.edit_title("Target");
        editor.edit_start_date(Some(date(2025, 1, 1)));
        editor.edit_end_date(Some(date(2025, 1, 2)));
        assert!(editor.save().await);
    }

    let abandoned = ws.create_task().await.expect("abandoned");
    ws.editor().expect("open").edit_title("Half typed");

    assert_eq!(ws.select_task(target).await, Navigation::Confirm(target));
    assert_eq!(ws.guard_state(), GuardState::ConfirmPending(target));

    let discarded = ws.discard_and_go().await.expect("pending");
    assert_eq!(discarded.outcome, DiscardOutcome::Deleted);
    assert_eq!(ws.route(), Route::Task(target));
    assert!(ws
        .gateway()
        .fetch_task(abandoned)
        .await
        .expect("fetch")
        .is_none());
    assert_eq!(ws.tasks().len(), 1);
}

#[tokio::test]
async fn test_list_and_search_over_sqlite() {
    let (_dir, mut ws, _log) = create_test_workspace().await;

    for title in ["Paint fence", "Buy PAINT", "Call plumber"] {
        ws.create_task().await.expect("created");
        let editor = ws.editor().expect("open").clone();
        editor.edit_title(title);
        editor.edit_start_date(Some(date(2025, 4, 1)));
        editor.edit_end_date(Some(date(2025, 4, 2)));
        assert!(editor.save().await);
    }
    ws.go_home();

    assert!(ws.refresh_tasks().await);
    let titles: Vec<&str> = ws.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Call plumber", "Buy PAINT", "Paint fence"]);

    assert!(ws.search("paint").await);
    assert_eq!(ws.tasks().len(), 2);

    assert!(ws.search("").await);
    assert_eq!(ws.tasks().len(), 3);
}
