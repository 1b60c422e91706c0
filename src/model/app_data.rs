use serde::{Deserialize, Serialize};

use super::completion::CompletionMap;
use super::task::Task;

/// The whole persisted state: ordered tasks plus their completion records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    /// Tasks in display order
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completions: CompletionMap,
}

impl AppData {
    /// State with a single demo task, used when there is no prior data.
    pub fn seeded(title: &str) -> Self {
        AppData {
            tasks: vec![Task::new(title.to_string())],
            completions: CompletionMap::new(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Index of a task in display order
    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.position(task_id).is_some()
    }

    /// Remove completion records whose task no longer exists.
    /// Returns the orphaned task IDs.
    pub fn prune_orphans(&mut self) -> Vec<String> {
        let tasks = &self.tasks;
        self.completions.retain_tasks(|id| tasks.iter().any(|t| t.id == id))
    }

    /// True when every completion key names a task in `tasks`
    pub fn is_consistent(&self) -> bool {
        self.completions.task_ids().all(|id| self.contains(id))
    }
}
