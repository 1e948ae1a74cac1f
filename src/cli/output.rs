use serde::Serialize;

use crate::model::task::{Task, TaskFilter};
use crate::model::theme::{Appearance, ThemePreference};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position in the full list
    pub position: usize,
    pub id: String,
    pub content: String,
    pub checked: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: String,
    pub active_count: usize,
    pub total: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub preference: ThemePreference,
    pub appearance: Appearance,
}

/// `index` is 0-based; the JSON carries the 1-based position
pub fn task_to_json(task: &Task, index: usize) -> TaskJson {
    TaskJson {
        position: index + 1,
        id: task.id.clone(),
        content: task.content.clone(),
        checked: task.checked,
    }
}

pub fn task_list_to_json(tasks: &[Task], filter: TaskFilter) -> TaskListJson {
    TaskListJson {
        filter: filter.to_string(),
        active_count: tasks.iter().filter(|t| !t.checked).count(),
        total: tasks.len(),
        tasks: tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t))
            .map(|(i, t)| task_to_json(t, i))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Leading part of an id, enough to type back as a reference
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// One list line: position, checkbox, text, short id
pub fn format_task_line(task: &Task, index: usize) -> String {
    format!(
        "{:>3} [{}] {}  ({})",
        index + 1,
        if task.checked { "x" } else { " " },
        task.content,
        short_id(&task.id)
    )
}

/// The full list as text, filtered, with the items-left line at the end
pub fn format_task_list(tasks: &[Task], filter: TaskFilter) -> String {
    let mut lines: Vec<String> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.matches(t))
        .map(|(i, t)| format_task_line(t, i))
        .collect();
    if lines.is_empty() {
        lines.push(match filter {
            TaskFilter::All => "no tasks".to_string(),
            other => format!("no {} tasks", other),
        });
    }
    if !tasks.is_empty() {
        let active = tasks.iter().filter(|t| !t.checked).count();
        lines.push(String::new());
        lines.push(match active {
            1 => "1 item left".to_string(),
            n => format!("{} items left", n),
        });
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tasks() -> Vec<Task> {
        let mut done = Task::new("0123456789abcdef", "Buy milk");
        done.checked = true;
        vec![done, Task::new("fedcba98", "Walk dog")]
    }

    #[test]
    fn task_lines() {
        let tasks = tasks();
        assert_eq!(format_task_line(&tasks[0], 0), "  1 [x] Buy milk  (01234567)");
        assert_eq!(format_task_line(&tasks[1], 1), "  2 [ ] Walk dog  (fedcba98)");
    }

    #[test]
    fn filtered_list_keeps_true_positions() {
        let out = format_task_list(&tasks(), TaskFilter::Active);
        assert_eq!(out, "  2 [ ] Walk dog  (fedcba98)\n\n1 item left");
    }

    #[test]
    fn empty_views() {
        assert_eq!(format_task_list(&[], TaskFilter::All), "no tasks");
        let mut all_done = tasks();
        all_done.truncate(1);
        assert_eq!(
            format_task_list(&all_done, TaskFilter::Active),
            "no active tasks\n\n0 items left"
        );
    }

    #[test]
    fn json_list() {
        let json = task_list_to_json(&tasks(), TaskFilter::Completed);
        assert_eq!(json.active_count, 1);
        assert_eq!(json.total, 2);
        assert_eq!(json.tasks.len(), 1);
        assert_eq!(json.tasks[0].position, 1);
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["filter"], "completed");
        assert_eq!(value["tasks"][0]["checked"], true);
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("t1"), "t1");
        assert_eq!(short_id("0123456789"), "01234567");
    }
}
