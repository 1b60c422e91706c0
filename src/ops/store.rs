//! The authoritative in-memory model and its persistence lifecycle.
//!
//! A [`TaskStore`] is created with [`TaskStore::open`], which loads the
//! stored state (or seeds a fresh one). Every mutation that changes
//! something writes the whole state back through the storage backend
//! before returning. Mutations that find nothing to do return
//! `false`/`None` and do not write.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::io::persistence::{self, LoadOutcome};
use crate::io::storage::KeyValueStore;
use crate::model::app_data::AppData;
use crate::model::completion::CompletionMap;
use crate::model::config::DEFAULT_SEED_TITLE;
use crate::model::range::TimeRange;
use crate::model::task::Task;
use crate::ops::analytics::{self, Report};
use crate::ops::grid::{self, HistoryRow};
use crate::ops::task_ops;

pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    data: AppData,
    last_save_error: Option<String>,
    /// Set when stored data could not be read or backed up; writes are refused
    write_blocked: Option<String>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load from `storage`, seeding the default demo task when there is no
    /// usable prior data.
    pub fn open(storage: S) -> Self {
        TaskStore::open_with_seed(storage, Some(DEFAULT_SEED_TITLE))
    }

    /// Load from `storage`. When nothing usable is stored, start with a
    /// single task titled `seed` (or empty for `None`) and write it out.
    pub fn open_with_seed(mut storage: S, seed: Option<&str>) -> Self {
        let loaded = persistence::load(&mut storage);
        let fresh = !matches!(loaded, LoadOutcome::Loaded(_));
        let write_blocked = match &loaded {
            LoadOutcome::Unreadable(reason) => Some(format!(
                "stored data could not be read ({}); refusing to overwrite it",
                reason
            )),
            _ => None,
        };

        let data = match loaded {
            LoadOutcome::Loaded(mut data) => {
                let orphans = data.prune_orphans();
                if !orphans.is_empty() {
                    debug!(count = orphans.len(), ?orphans, "dropped completions of missing tasks");
                }
                data
            }
            LoadOutcome::Missing | LoadOutcome::Malformed(_) | LoadOutcome::Unreadable(_) => {
                seed.map(AppData::seeded).unwrap_or_default()
            }
        };

        let mut store = TaskStore {
            storage,
            data,
            last_save_error: None,
            write_blocked,
        };
        if fresh {
            store.persist();
        }
        store
    }

    /// Tear down the store, handing back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current state, read-only
    pub fn snapshot(&self) -> &AppData {
        &self.data
    }

    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    pub fn completions(&self) -> &CompletionMap {
        &self.data.completions
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.data.task(task_id)
    }

    pub fn is_completed(&self, task_id: &str, date_key: &str) -> bool {
        self.data.completions.is_completed(task_id, date_key)
    }

    /// Message of the most recent failed write, cleared by the next successful one
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Analytics over the current state
    pub fn analytics(&self, range: TimeRange, today: NaiveDate) -> Report {
        analytics::analyze(&self.data.tasks, &self.data.completions, range, today)
    }

    /// History table rows over the current state
    pub fn history(&self, today: NaiveDate) -> Vec<HistoryRow> {
        grid::history(&self.data, today)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a task. Returns its ID, or `None` for a blank title.
    pub fn add_task(&mut self, title: &str) -> Option<String> {
        let id = task_ops::add_task(&mut self.data, title)?;
        debug!(task = %id, "added task");
        self.persist();
        Some(id)
    }

    /// Delete a task and all its completions.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let changed = task_ops::delete_task(&mut self.data, task_id);
        self.commit(changed)
    }

    pub fn rename_task(&mut self, task_id: &str, new_title: &str) -> bool {
        let changed = task_ops::rename_task(&mut self.data, task_id, new_title);
        self.commit(changed)
    }

    /// Flip completion of a task on a day. Returns the new state, or `None`
    /// for an unknown task.
    pub fn toggle_completion(&mut self, task_id: &str, date_key: &str) -> Option<bool> {
        let done = task_ops::toggle_completion(&mut self.data, task_id, date_key)?;
        self.persist();
        Some(done)
    }

    /// Move `active_id` into the slot held by `over_id`.
    pub fn reorder_tasks(&mut self, active_id: &str, over_id: &str) -> bool {
        let changed = task_ops::reorder_tasks(&mut self.data, active_id, over_id);
        self.commit(changed)
    }

    /// Wipe all tasks and completions. Irreversible; callers confirm first.
    pub fn clear_data(&mut self) {
        task_ops::clear(&mut self.data);
        self.persist();
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    /// Write the full state. A failed write is logged and remembered; the
    /// in-memory state stays as it is.
    fn persist(&mut self) {
        if let Some(reason) = &self.write_blocked {
            warn!(reason = %reason, "not saving; changes are kept in memory");
            self.last_save_error = Some(reason.clone());
            return;
        }
        match persistence::save(&mut self.storage, &self.data) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(error = %e, "could not save data; changes are kept in memory");
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}
