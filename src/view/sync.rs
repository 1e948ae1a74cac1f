use log::debug;

use crate::io::appearance::SystemAppearance;
use crate::io::ids::IdProvider;
use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::task::{Task, TaskFilter};
use crate::model::theme::ThemePreference;
use crate::ops::task_store::TaskStore;

use super::drag::DragState;
use super::target::{Aggregate, ListItem, RenderTarget};
use super::theme::ThemeController;

/// Projects task store state into a render target and remembers which
/// displayed row belongs to which task.
pub struct ViewSynchronizer<T> {
    pub(super) target: T,
    pub(super) filter: TaskFilter,
    pub(super) displayed: Vec<ListItem>,
    pub(super) drag: DragState,
}

impl<T: RenderTarget> ViewSynchronizer<T> {
    pub fn new(target: T) -> Self {
        ViewSynchronizer {
            target,
            filter: TaskFilter::All,
            displayed: Vec::new(),
            drag: DragState::Idle,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn displayed(&self) -> &[ListItem] {
        &self.displayed
    }

    /// Task id shown at a displayed row
    pub fn task_id_at(&self, row: usize) -> Option<&str> {
        self.displayed.get(row).map(|item| item.task_id.as_str())
    }

    /// Displayed row of a task, if it is visible
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.displayed.iter().position(|item| item.task_id == id)
    }

    /// Replace every displayed item with `tasks`, in order. Any drag in
    /// progress is abandoned.
    pub fn render_all<'a>(&mut self, tasks: impl IntoIterator<Item = &'a Task>) {
        self.drag = DragState::Idle;
        self.target.set_drop_target(None);
        self.target.set_collapsed(None);
        self.target.clear_items();
        self.displayed.clear();
        for task in tasks {
            self.push(task);
        }
    }

    fn push(&mut self, task: &Task) {
        let item = ListItem::from_task(task, self.displayed.len());
        self.target.push_item(&item);
        self.displayed.push(item);
    }

    /// Show only the tasks matching `filter`. Reads the store, never writes.
    pub fn apply_filter<S, I>(&mut self, store: &TaskStore<S, I>, filter: TaskFilter)
    where
        S: KeyValueStore,
        I: IdProvider,
    {
        self.filter = filter;
        self.render_all(store.filtered_view(filter));
        self.update_aggregate(store.tasks());
        debug!(
            "event=view_render module=view filter={} rows={}",
            filter,
            self.displayed.len()
        );
    }

    /// Full re-render with the current filter
    pub fn refresh<S, I>(&mut self, store: &TaskStore<S, I>)
    where
        S: KeyValueStore,
        I: IdProvider,
    {
        self.apply_filter(store, self.filter);
    }

    /// Incremental render of a newly appended task
    pub fn task_added(&mut self, task: &Task, tasks: &[Task]) {
        if self.filter.matches(task) {
            self.push(task);
        }
        self.update_aggregate(tasks);
    }

    /// Recompute the active counter and empty state
    pub fn update_aggregate(&mut self, tasks: &[Task]) {
        let aggregate = Aggregate {
            active_count: tasks.iter().filter(|t| !t.checked).count(),
            total: tasks.len(),
            filter: self.filter,
        };
        self.target.set_aggregate(&aggregate);
    }

    // -----------------------------------------------------------------------
    // Theme
    // -----------------------------------------------------------------------

    /// Hand the preference's display condition to the target
    pub fn apply_theme<S, A>(&mut self, theme: &ThemeController<S, A>)
    where
        S: KeyValueStore,
        A: SystemAppearance,
    {
        theme.apply_theme(&mut self.target);
    }

    /// Flip the theme and show the result
    pub fn cycle_theme<S, A>(
        &mut self,
        theme: &mut ThemeController<S, A>,
    ) -> Result<ThemePreference, StorageError>
    where
        S: KeyValueStore,
        A: SystemAppearance,
    {
        let result = theme.cycle_theme();
        theme.apply_theme(&mut self.target);
        result
    }
}
