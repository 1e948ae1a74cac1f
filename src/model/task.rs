use std::fmt;

use serde::{Deserialize, Serialize};

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned once at creation, never changed
    pub id: String,
    /// Task text, stored as typed
    pub content: String,
    /// Completion flag
    pub checked: bool,
}

impl Task {
    /// Create a new, unchecked task
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            content: content.into(),
            checked: false,
        }
    }
}

/// Which tasks the list shows. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Every filter, in the order the footer shows them
    pub const ALL: [TaskFilter; 3] = [TaskFilter::All, TaskFilter::Active, TaskFilter::Completed];

    /// Whether a task passes this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.checked,
            TaskFilter::Completed => task.checked,
        }
    }

    /// Next filter in footer order, wrapping around
    pub fn next(self) -> TaskFilter {
        match self {
            TaskFilter::All => TaskFilter::Active,
            TaskFilter::Active => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Active => "Active",
            TaskFilter::Completed => "Completed",
        }
    }

    pub fn parse_filter(s: &str) -> Option<TaskFilter> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(TaskFilter::All),
            "active" => Some(TaskFilter::Active),
            "completed" | "done" => Some(TaskFilter::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_ascii_lowercase())
    }
}
