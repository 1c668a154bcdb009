//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can hand it to the terminal renderer
//! and the MCP server can return it as text content.

use std::fmt;

use super::datetime::{DateRange, LocalDateTime};
use crate::{
    editor::{EditorSnapshot, SaveState},
    models::{Board, Task, TaskSummary},
    notify::{Level, Notification},
};

const UNTITLED: &str = "(untitled)";

fn title_or_placeholder(title: &str) -> &str {
    if title.is_empty() {
        UNTITLED
    } else {
        title
    }
}

fn fmt_progress(f: &mut fmt::Formatter<'_>, (completed, total): (usize, usize)) -> fmt::Result {
    writeln!(f, "- Progress: {completed}/{total} Completed")
}

fn fmt_boards(f: &mut fmt::Formatter<'_>, boards: &[Board], empty: &str) -> fmt::Result {
    if boards.is_empty() {
        return writeln!(f, "\n{empty}");
    }

    writeln!(f, "\n## Boards")?;
    writeln!(f)?;
    for board in boards {
        write!(f, "{board}")?;
    }
    Ok(())
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, title_or_placeholder(&self.title))?;
        writeln!(f)?;

        writeln!(f, "- Dates: {}", DateRange(self.start_date, self.end_date))?;
        fmt_progress(f, self.progress())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        fmt_boards(f, &self.boards, "No boards in this task.")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.is_completed { "[x]" } else { "[ ]" };
        let title = if self.title.is_empty() {
            "(untitled board)"
        } else {
            self.title.as_str()
        };

        writeln!(f, "### {check} {title}")?;
        writeln!(f)?;
        writeln!(f, "- ID: `{}`", self.id)?;
        if self.start_date.is_some() || self.end_date.is_some() {
            writeln!(f, "- Dates: {}", DateRange(self.start_date, self.end_date))?;
        }
        writeln!(f)?;

        if self.has_content() {
            writeln!(f, "{}", self.content.trim_end())?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_boards > 0 {
            format!(" ({}/{})", self.completed_boards, self.total_boards)
        } else {
            String::new()
        };

        writeln!(
            f,
            "## {} (ID: {}){progress}",
            title_or_placeholder(&self.title),
            self.id
        )?;
        writeln!(f)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for EditorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.dirty { " *" } else { "" };
        writeln!(
            f,
            "# {}. {}{marker}",
            self.task_id,
            title_or_placeholder(&self.draft.title)
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "- Dates: {}",
            DateRange(self.draft.start_date, self.draft.end_date)
        )?;
        fmt_progress(f, self.progress())?;
        match self.save_state {
            SaveState::Idle if self.dirty => writeln!(f, "- State: unsaved changes")?,
            SaveState::Idle => writeln!(f, "- State: saved")?,
            SaveState::Saving => writeln!(f, "- State: saving")?,
            SaveState::SaveFailed => writeln!(f, "- State: last save failed")?,
        }

        fmt_boards(f, &self.draft.boards, "No boards yet.")
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.level {
            Level::Success => "✓",
            Level::Failure => "✗",
        };
        write!(f, "{icon} **{}**: {}", self.headline, self.description)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::editor::Draft;

    fn task() -> Task {
        Task {
            id: 4,
            title: "Launch".to_string(),
            start_date: Some(date(2025, 6, 1)),
            end_date: Some(date(2025, 6, 30)),
            boards: vec![
                Board {
                    title: "Copy".to_string(),
                    content: "Write the announcement".to_string(),
                    is_completed: true,
                    ..Board::new("b1")
                },
                Board::new("b2"),
            ],
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_task_display_shows_progress_and_boards() {
        let output = task().to_string();
        assert!(output.contains("# 4. Launch"));
        assert!(output.contains("1/2 Completed"));
        assert!(output.contains("### [x] Copy"));
        assert!(output.contains("### [ ] (untitled board)"));
        assert!(output.contains("Write the announcement"));
    }

    #[test]
    fn test_placeholder_task_is_untitled() {
        let mut task = task();
        task.title.clear();
        task.boards.clear();
        let output = task.to_string();
        assert!(output.contains("(untitled)"));
        assert!(output.contains("No boards in this task."));
    }

    #[test]
    fn test_summary_display() {
        let summary = TaskSummary::from(&task());
        let output = summary.to_string();
        assert!(output.contains("## Launch (ID: 4) (1/2)"));
    }

    #[test]
    fn test_snapshot_marks_unsaved_changes() {
        let snapshot = EditorSnapshot {
            task_id: 9,
            draft: Draft {
                title: "Draft".to_string(),
                ..Default::default()
            },
            dirty: true,
            save_state: SaveState::Idle,
            persisted: false,
            mounted: true,
        };
        let output = snapshot.to_string();
        assert!(output.contains("# 9. Draft *"));
        assert!(output.contains("unsaved changes"));
        assert!(output.contains("0/0 Completed"));
    }

    #[test]
    fn test_notification_display() {
        let toast = Notification::success("Task saved", "Your changes have been saved.");
        assert_eq!(
            toast.to_string(),
            "✓ **Task saved**: Your changes have been saved."
        );
    }
}
