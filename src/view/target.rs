use crate::model::task::{Task, TaskFilter};
use crate::model::theme::DarkStyles;

/// One displayed task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub task_id: String,
    pub content: String,
    pub checked: bool,
    /// Position in the displayed (possibly filtered) list
    pub row: usize,
}

impl ListItem {
    pub fn from_task(task: &Task, row: usize) -> Self {
        ListItem {
            task_id: task.id.clone(),
            content: task.content.clone(),
            checked: task.checked,
            row,
        }
    }
}

/// Summary shown around the list: counter, filter bar, empty state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub active_count: usize,
    pub total: usize,
    pub filter: TaskFilter,
}

impl Aggregate {
    /// An empty collection hides the footer, filters and reorder hint
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn items_left_label(&self) -> String {
        match self.active_count {
            1 => "1 item left".to_string(),
            n => format!("{} items left", n),
        }
    }
}

/// The presentation layer the view synchronizer draws into
pub trait RenderTarget {
    fn clear_items(&mut self);
    fn push_item(&mut self, item: &ListItem);
    fn set_aggregate(&mut self, aggregate: &Aggregate);
    fn set_dark_styles(&mut self, styles: DarkStyles);
    /// Highlight one row as the drop target, or none
    fn set_drop_target(&mut self, row: Option<usize>);
    /// Collapse the row being dragged, or restore it
    fn set_collapsed(&mut self, row: Option<usize>);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records everything the synchronizer sends
    #[derive(Debug, Default)]
    pub struct RecordingTarget {
        pub items: Vec<ListItem>,
        pub aggregate: Option<Aggregate>,
        pub dark_styles: Option<DarkStyles>,
        pub drop_target: Option<usize>,
        pub collapsed: Option<usize>,
        pub clears: usize,
        pub pushes: usize,
    }

    impl RecordingTarget {
        pub fn contents(&self) -> Vec<&str> {
            self.items.iter().map(|i| i.content.as_str()).collect()
        }
    }

    impl RenderTarget for RecordingTarget {
        fn clear_items(&mut self) {
            self.items.clear();
            self.clears += 1;
        }

        fn push_item(&mut self, item: &ListItem) {
            self.items.push(item.clone());
            self.pushes += 1;
        }

        fn set_aggregate(&mut self, aggregate: &Aggregate) {
            self.aggregate = Some(*aggregate);
        }

        fn set_dark_styles(&mut self, styles: DarkStyles) {
            self.dark_styles = Some(styles);
        }

        fn set_drop_target(&mut self, row: Option<usize>) {
            self.drop_target = row;
        }

        fn set_collapsed(&mut self, row: Option<usize>) {
            self.collapsed = row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_left_label_pluralizes() {
        let mut agg = Aggregate {
            active_count: 0,
            total: 2,
            filter: TaskFilter::All,
        };
        assert_eq!(agg.items_left_label(), "0 items left");
        agg.active_count = 1;
        assert_eq!(agg.items_left_label(), "1 item left");
        agg.active_count = 5;
        assert_eq!(agg.items_left_label(), "5 items left");
    }

    #[test]
    fn empty_when_no_tasks() {
        let agg = Aggregate {
            active_count: 0,
            total: 0,
            filter: TaskFilter::Completed,
        };
        assert!(agg.is_empty());
    }
}
