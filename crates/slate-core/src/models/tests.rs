use jiff::{civil::date, Timestamp};

use super::*;
use crate::models::summary::newest_first;

fn task_with(id: TaskId, title: &str, created_at: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        start_date: None,
        end_date: None,
        boards: Vec::new(),
        created_at: created_at.parse::<Timestamp>().expect("valid timestamp"),
    }
}

#[test]
fn test_board_json_uses_camel_case_fields() {
    let board = Board {
        id: "abc".to_string(),
        title: "Write docs".to_string(),
        start_date: Some(date(2025, 3, 1)),
        end_date: None,
        content: "# Notes".to_string(),
        is_completed: true,
    };

    let json = serde_json::to_value(&board).expect("serialize board");
    assert_eq!(json["startDate"], "2025-03-01");
    assert_eq!(json["endDate"], serde_json::Value::Null);
    assert_eq!(json["isCompleted"], true);
    assert!(json.get("is_completed").is_none());
}

#[test]
fn test_board_json_tolerates_missing_fields() {
    let board: Board = serde_json::from_str(r#"{"id":"x1"}"#).expect("decode board");
    assert_eq!(board, Board::new("x1"));
}

#[test]
fn test_board_has_content_ignores_whitespace() {
    let mut board = Board::new("b");
    assert!(!board.has_content());
    board.content = "  \n\t".to_string();
    assert!(!board.has_content());
    board.content = "done".to_string();
    assert!(board.has_content());
}

#[test]
fn test_placeholder_detection() {
    let mut task = task_with(1, "", "2025-01-01T00:00:00Z");
    assert!(task.is_placeholder());

    task.start_date = Some(date(2025, 1, 2));
    assert!(!task.is_placeholder());

    let titled = task_with(2, "Trip", "2025-01-01T00:00:00Z");
    assert!(!titled.is_placeholder());
}

#[test]
fn test_progress_counts_completed_boards() {
    let mut task = task_with(1, "Trip", "2025-01-01T00:00:00Z");
    let mut done = Board::new("a");
    done.is_completed = true;
    task.boards = vec![done, Board::new("b"), Board::new("c")];

    assert_eq!(task.progress(), (1, 3));

    let summary = TaskSummary::from(&task);
    assert_eq!(summary.total_boards, 3);
    assert_eq!(summary.completed_boards, 1);
}

#[test]
fn test_newest_first_ordering() {
    let tasks = vec![
        task_with(1, "old", "2025-01-01T00:00:00Z"),
        task_with(2, "newest", "2025-03-01T00:00:00Z"),
        task_with(3, "middle", "2025-02-01T00:00:00Z"),
    ];

    let ids: Vec<TaskId> = newest_first(&tasks).iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_patch_constructors() {
    let patch = TaskPatch::scalars("Trip", date(2025, 1, 1), date(2025, 1, 5));
    assert_eq!(patch.title.as_deref(), Some("Trip"));
    assert_eq!(patch.start_date, Some(Some(date(2025, 1, 1))));
    assert!(patch.boards.is_none());

    let boards = TaskPatch::boards(vec![Board::new("a")]);
    assert!(boards.title.is_none());
    assert_eq!(boards.boards.map(|b| b.len()), Some(1));

    assert!(TaskPatch::default().is_empty());
}
