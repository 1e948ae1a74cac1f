//! Drag-and-drop reordering over the displayed list.
//!
//! Source and target are held as task ids and only turned into positions
//! by the store at drop time, so a drag under the `active` or `completed`
//! filter moves the task to the target task's place in the full list.

use log::debug;

use crate::io::ids::IdProvider;
use crate::io::storage::KeyValueStore;
use crate::ops::task_store::{StoreError, TaskStore};

use super::sync::ViewSynchronizer;
use super::target::RenderTarget;

/// Where a drag interaction stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source_id: String,
        source_row: usize,
        /// The single active drop target, if any
        over: Option<String>,
    },
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The store moved the task and the list was re-rendered
    Moved,
    /// Released on the source row itself
    SameRow,
    /// Released where no task is displayed; treated as a cancel
    NoTarget,
    /// No drag was in progress
    NotDragging,
}

impl<T: RenderTarget> ViewSynchronizer<T> {
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Displayed row of the row being dragged
    pub fn drag_source_row(&self) -> Option<usize> {
        match &self.drag {
            DragState::Dragging { source_row, .. } => Some(*source_row),
            DragState::Idle => None,
        }
    }

    /// Displayed row currently marked as the drop target
    pub fn drop_target_row(&self) -> Option<usize> {
        match &self.drag {
            DragState::Dragging {
                over: Some(id), ..
            } => self.row_of(id),
            _ => None,
        }
    }

    /// Pick up the task at `row`. Returns false when no task is displayed
    /// there.
    pub fn drag_start(&mut self, row: usize) -> bool {
        let source_id = match self.task_id_at(row) {
            Some(id) => id.to_string(),
            None => return false,
        };
        if self.is_dragging() {
            self.drag_end();
        }
        debug!("event=drag_start module=view row={} id={}", row, source_id);
        self.drag = DragState::Dragging {
            source_id,
            source_row: row,
            over: None,
        };
        self.target.set_drop_target(None);
        self.target.set_collapsed(Some(row));
        true
    }

    /// The pointer moved over `row`; it becomes the only marked target.
    pub fn drag_enter(&mut self, row: usize) {
        let candidate = self.task_id_at(row).map(str::to_string);
        let DragState::Dragging {
            source_row, over, ..
        } = &mut self.drag
        else {
            return;
        };
        match candidate {
            Some(id) if row != *source_row => {
                *over = Some(id);
                self.target.set_drop_target(Some(row));
            }
            _ => {
                *over = None;
                self.target.set_drop_target(None);
            }
        }
    }

    /// The pointer left `row`. Clears the marker only if it is on that row.
    pub fn drag_leave(&mut self, row: usize) {
        let leaving = self.task_id_at(row).map(str::to_string);
        if let DragState::Dragging { over, .. } = &mut self.drag
            && over.is_some()
            && *over == leaving
        {
            *over = None;
            self.target.set_drop_target(None);
        }
    }

    /// Release over `row`: move the source task to the target task's
    /// position in the store, then re-render from the store.
    pub fn drop_on<S, I>(
        &mut self,
        store: &mut TaskStore<S, I>,
        row: usize,
    ) -> Result<DropOutcome, StoreError>
    where
        S: KeyValueStore,
        I: IdProvider,
    {
        let source_id = match std::mem::take(&mut self.drag) {
            DragState::Dragging { source_id, .. } => source_id,
            DragState::Idle => return Ok(DropOutcome::NotDragging),
        };
        self.target.set_drop_target(None);
        self.target.set_collapsed(None);

        let target_id = match self.task_id_at(row) {
            Some(id) => id.to_string(),
            None => return Ok(DropOutcome::NoTarget),
        };
        if target_id == source_id {
            return Ok(DropOutcome::SameRow);
        }

        debug!(
            "event=drop module=view source={} target={}",
            source_id, target_id
        );
        let result = store.move_task(&source_id, &target_id);
        self.refresh(store);
        result.map(|()| DropOutcome::Moved)
    }

    /// Release onto whatever is currently marked as the drop target
    pub fn drop_on_target<S, I>(
        &mut self,
        store: &mut TaskStore<S, I>,
    ) -> Result<DropOutcome, StoreError>
    where
        S: KeyValueStore,
        I: IdProvider,
    {
        match (self.drop_target_row(), self.drag_source_row()) {
            (Some(row), _) | (None, Some(row)) => self.drop_on(store, row),
            (None, None) => Ok(DropOutcome::NotDragging),
        }
    }

    /// The drag ended without a drop: restore the source row. Returns
    /// whether a drag was cancelled.
    pub fn drag_end(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.drag = DragState::Idle;
        self.target.set_drop_target(None);
        self.target.set_collapsed(None);
        true
    }
}
