use std::collections::HashSet;

use log::{debug, info, warn};

use crate::io::ids::IdProvider;
use crate::io::storage::{KeyValueStore, StorageError, TASKS_KEY};
use crate::model::task::{Task, TaskFilter};

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("index {index} out of range for {len} tasks")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("could not save tasks: {0}")]
    Storage(#[from] StorageError),
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Written on first run when nothing has been saved yet: (content, checked)
pub const SAMPLE_TASKS: &[(&str, bool)] = &[
    ("Complete online JavaScript course", true),
    ("Jog around the park 3x", false),
    ("10 minutes meditation", false),
    ("Read for 1 hour", false),
    ("Pick up groceries", false),
    ("Complete Todo App on Frontend Mentor", false),
];

/// Where the current collection came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadSource {
    /// `load` has not run
    #[default]
    NotLoaded,
    /// Parsed from storage
    Persisted,
    /// Nothing was stored; the list was seeded (or left empty)
    Seeded,
    /// Stored data could not be read or parsed. Unparsable data is
    /// overwritten by the seed; unreadable data is left where it is.
    Recovered { raw: String, error: String },
}

/// Owns the ordered task collection and writes it through to storage after
/// every mutation.
pub struct TaskStore<S, I> {
    storage: S,
    ids: I,
    tasks: Vec<Task>,
    seed_samples: bool,
    load_source: LoadSource,
}

impl<S: KeyValueStore, I: IdProvider> TaskStore<S, I> {
    pub fn new(storage: S, ids: I) -> Self {
        TaskStore {
            storage,
            ids,
            tasks: Vec::new(),
            seed_samples: true,
            load_source: LoadSource::NotLoaded,
        }
    }

    /// Whether `load` seeds sample tasks when nothing is stored
    pub fn with_seed_samples(mut self, seed: bool) -> Self {
        self.seed_samples = seed;
        self
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Read the persisted collection. Missing, unreadable or malformed data
    /// falls back to the sample seed; this never fails. The seed is written
    /// unless the stored value could not be read.
    pub fn load(&mut self) -> &[Task] {
        let raw = match self.storage.get(TASKS_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("event=tasks_load module=store status=error error={}", e);
                // The stored value still exists; never write the seed over it
                let raw = match &e {
                    StorageError::InvalidUtf8 { lossy, .. } => lossy.clone(),
                    _ => String::new(),
                };
                self.seed(false);
                self.load_source = LoadSource::Recovered {
                    raw,
                    error: e.to_string(),
                };
                return &self.tasks;
            }
        };

        let parsed = raw
            .as_deref()
            .map(|raw| serde_json::from_str::<Option<Vec<Task>>>(raw));

        match parsed {
            Some(Ok(Some(tasks))) => {
                let repaired = self.repair_duplicate_ids(tasks);
                self.load_source = LoadSource::Persisted;
                if repaired {
                    self.persist_quietly();
                }
                info!(
                    "event=tasks_load module=store status=ok source=persisted count={}",
                    self.tasks.len()
                );
            }
            Some(Err(e)) => {
                warn!(
                    "event=tasks_load module=store status=recovered error={}",
                    e
                );
                self.seed(true);
                self.load_source = LoadSource::Recovered {
                    raw: raw.unwrap_or_default(),
                    error: e.to_string(),
                };
            }
            Some(Ok(None)) | None => {
                self.seed(true);
                self.load_source = LoadSource::Seeded;
                info!(
                    "event=tasks_load module=store status=ok source=seed count={}",
                    self.tasks.len()
                );
            }
        }

        &self.tasks
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    fn seed(&mut self, persist: bool) {
        self.tasks = if self.seed_samples {
            SAMPLE_TASKS
                .iter()
                .map(|(content, checked)| Task {
                    id: self.ids.next_id(),
                    content: content.to_string(),
                    checked: *checked,
                })
                .collect()
        } else {
            Vec::new()
        };
        if persist && !self.tasks.is_empty() {
            self.persist_quietly();
        }
    }

    /// Give later duplicates of an id a fresh one. Returns whether anything
    /// changed.
    fn repair_duplicate_ids(&mut self, mut tasks: Vec<Task>) -> bool {
        let mut seen = HashSet::new();
        let mut repaired = false;
        for task in &mut tasks {
            if !seen.insert(task.id.clone()) {
                let fresh = self.ids.next_id();
                warn!(
                    "event=tasks_load module=store status=repaired duplicate_id={} new_id={}",
                    task.id, fresh
                );
                task.id = fresh.clone();
                seen.insert(fresh);
                repaired = true;
            }
        }
        self.tasks = tasks;
        repaired
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new unchecked task. Blank content is ignored (`Ok(None)`).
    pub fn add(&mut self, content: &str) -> Result<Option<Task>, StoreError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let task = Task::new(self.ids.next_id(), content);
        self.tasks.push(task.clone());
        debug!("event=task_add module=store id={}", task.id);
        self.persist()?;
        Ok(Some(task))
    }

    /// Flip `checked`. Returns the new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Result<Option<bool>, StoreError> {
        let task = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(t) => t,
            None => {
                debug!("event=task_toggle module=store status=not_found id={}", id);
                return Ok(None);
            }
        };
        task.checked = !task.checked;
        let checked = task.checked;
        self.persist()?;
        Ok(Some(checked))
    }

    /// Remove a task. Returns it, or `None` for an unknown id.
    pub fn remove(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let idx = match self.position(id) {
            Some(idx) => idx,
            None => {
                debug!("event=task_remove module=store status=not_found id={}", id);
                return Ok(None);
            }
        };
        let task = self.tasks.remove(idx);
        self.persist()?;
        Ok(Some(task))
    }

    /// Remove every checked task with a single write. Returns how many went.
    pub fn clear_completed(&mut self) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.checked);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Move the task at `from` to `to`, shifting the tasks in between.
    /// Both are positions in the full, unfiltered collection.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        let len = self.tasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        debug!("event=task_reorder module=store from={} to={}", from, to);
        self.persist()
    }

    /// Move `source_id` to the position currently held by `target_id`.
    pub fn move_task(&mut self, source_id: &str, target_id: &str) -> Result<(), StoreError> {
        let from = self
            .position(source_id)
            .ok_or_else(|| StoreError::NotFound(source_id.to_string()))?;
        let to = self
            .position(target_id)
            .ok_or_else(|| StoreError::NotFound(target_id.to_string()))?;
        self.reorder(from, to)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Position of a task in the full collection
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn count_active(&self) -> usize {
        self.tasks.iter().filter(|t| !t.checked).count()
    }

    /// Tasks matching `filter`, in collection order. Clone the iterator to
    /// walk it again.
    pub fn filtered_view(&self, filter: TaskFilter) -> FilteredView<'_> {
        FilteredView {
            inner: self.tasks.iter(),
            filter,
        }
    }

    /// The collection as it is written to storage
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.tasks)?)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = self.to_json()?;
        self.storage.set(TASKS_KEY, &json)?;
        debug!(
            "event=tasks_save module=store status=ok count={}",
            self.tasks.len()
        );
        Ok(())
    }

    fn persist_quietly(&mut self) {
        if let Err(e) = self.persist() {
            warn!("event=tasks_save module=store status=error error={}", e);
        }
    }
}

/// Lazy, read-only view over the tasks matching a filter
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    inner: std::slice::Iter<'a, Task>,
    filter: TaskFilter,
}

impl<'a> Iterator for FilteredView<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<&'a Task> {
        let filter = self.filter;
        self.inner.by_ref().find(|t| filter.matches(t))
    }
}
