use ratatui::layout::Rect;

use crate::model::task::TaskFilter;
use crate::model::theme::DarkStyles;
use crate::view::target::{Aggregate, ListItem, RenderTarget};

/// Retained terminal view state. The synchronizer writes into it; the
/// renderer reads from it every frame.
#[derive(Debug, Clone)]
pub struct Screen {
    pub items: Vec<ListItem>,
    pub aggregate: Aggregate,
    pub dark_styles: DarkStyles,
    pub drop_target: Option<usize>,
    pub collapsed: Option<usize>,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            items: Vec::new(),
            aggregate: Aggregate {
                active_count: 0,
                total: 0,
                filter: TaskFilter::All,
            },
            dark_styles: DarkStyles::FollowSystem,
            drop_target: None,
            collapsed: None,
        }
    }
}

impl RenderTarget for Screen {
    fn clear_items(&mut self) {
        self.items.clear();
    }

    fn push_item(&mut self, item: &ListItem) {
        self.items.push(item.clone());
    }

    fn set_aggregate(&mut self, aggregate: &Aggregate) {
        self.aggregate = *aggregate;
    }

    fn set_dark_styles(&mut self, styles: DarkStyles) {
        self.dark_styles = styles;
    }

    fn set_drop_target(&mut self, row: Option<usize>) {
        self.drop_target = row;
    }

    fn set_collapsed(&mut self, row: Option<usize>) {
        self.collapsed = row;
    }
}

/// What sits under a screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Checkbox(usize),
    Delete(usize),
    /// The text part of a row, where drags start
    Row(usize),
    /// Inside the list but below the last row
    ListBlank,
    Filter(TaskFilter),
    ClearCompleted,
    ThemeToggle,
    Input,
    Nothing,
}

/// Clickable regions recorded during the last draw
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub theme_toggle: Option<Rect>,
    pub input: Option<Rect>,
    /// Inner list area, one task per line
    pub list: Option<Rect>,
    pub list_scroll: usize,
    pub list_rows: usize,
    pub filters: Vec<(Rect, TaskFilter)>,
    pub clear_completed: Option<Rect>,
}

/// Width of the checkbox cell at the start of each row: " ( ) "
pub const CHECKBOX_WIDTH: u16 = 5;
/// Width of the delete cell at the end of each row: " ✕ "
pub const DELETE_WIDTH: u16 = 3;

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

impl HitAreas {
    /// Displayed row at screen line `y`, if it is inside the list
    pub fn row_at_y(&self, y: u16) -> Option<usize> {
        let list = self.list?;
        if y < list.y || y >= list.y + list.height {
            return None;
        }
        Some((y - list.y) as usize + self.list_scroll)
    }

    pub fn hit(&self, x: u16, y: u16) -> Hit {
        if let Some(rect) = self.theme_toggle
            && contains(rect, x, y)
        {
            return Hit::ThemeToggle;
        }
        if let Some(rect) = self.input
            && contains(rect, x, y)
        {
            return Hit::Input;
        }
        if let Some(list) = self.list
            && contains(list, x, y)
            && let Some(row) = self.row_at_y(y)
        {
            if row >= self.list_rows {
                return Hit::ListBlank;
            }
            let col = x - list.x;
            if col < CHECKBOX_WIDTH {
                return Hit::Checkbox(row);
            }
            if col >= list.width.saturating_sub(DELETE_WIDTH) {
                return Hit::Delete(row);
            }
            return Hit::Row(row);
        }
        for (rect, filter) in &self.filters {
            if contains(*rect, x, y) {
                return Hit::Filter(*filter);
            }
        }
        if let Some(rect) = self.clear_completed
            && contains(rect, x, y)
        {
            return Hit::ClearCompleted;
        }
        Hit::Nothing
    }
}
