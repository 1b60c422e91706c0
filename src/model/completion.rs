use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// strftime pattern of a date-key (`2024-01-10`)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar day as a date-key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a date-key. Returns `None` for anything that is not a valid `YYYY-MM-DD` day.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Per-task record of completed days: date-key → completed flag
pub type DayMap = IndexMap<String, bool>;

/// Completion records for all tasks, keyed by task ID.
///
/// A `false` entry means the same thing as a missing one. Toggling a day
/// twice leaves an explicit `false` behind; every reader goes through
/// [`CompletionMap::is_completed`] so the two stay indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMap(IndexMap<String, DayMap>);

impl CompletionMap {
    pub fn new() -> Self {
        CompletionMap::default()
    }

    /// Whether `task_id` was done on the day named by `key`
    pub fn is_completed(&self, task_id: &str, key: &str) -> bool {
        self.0
            .get(task_id)
            .and_then(|days| days.get(key))
            .copied()
            .unwrap_or(false)
    }

    /// Flip the flag for (`task_id`, `key`), creating entries as needed.
    /// Returns the new state.
    pub fn toggle(&mut self, task_id: &str, key: &str) -> bool {
        let days = self.0.entry(task_id.to_string()).or_default();
        let flag = days.entry(key.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Set the flag for (`task_id`, `key`) explicitly.
    pub fn set(&mut self, task_id: &str, key: &str, done: bool) {
        self.0
            .entry(task_id.to_string())
            .or_default()
            .insert(key.to_string(), done);
    }

    /// Drop every record of a task. Returns true if there were any.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        self.0.shift_remove(task_id).is_some()
    }

    /// Keep only the tasks for which `keep` returns true.
    /// Returns the IDs that were dropped, in their stored order.
    pub fn retain_tasks(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        self.0.retain(|id, _| {
            if keep(id) {
                true
            } else {
                dropped.push(id.clone());
                false
            }
        });
        dropped
    }

    /// Records of a single task, if it has any
    pub fn days(&self, task_id: &str) -> Option<&DayMap> {
        self.0.get(task_id)
    }

    /// Task IDs that have records, in stored order
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Earliest day marked completed for any task. Keys that do not parse
    /// as dates, and `false` entries, are ignored.
    pub fn earliest_completed(&self) -> Option<NaiveDate> {
        self.0
            .values()
            .flat_map(|days| days.iter())
            .filter(|(_, done)| **done)
            .filter_map(|(key, _)| parse_date_key(key))
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
