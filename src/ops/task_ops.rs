use crate::model::app_data::AppData;
use crate::model::task::{Task, normalize_title};

/// Error type for resolving user-supplied task references
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("'{prefix}' matches {count} tasks; use more of the ID")]
    Ambiguous { prefix: String, count: usize },
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// Append a new task. Returns its ID, or `None` when the title is blank.
pub fn add_task(data: &mut AppData, title: &str) -> Option<String> {
    let title = normalize_title(title)?;
    let task = Task::new(title);
    let id = task.id.clone();
    data.tasks.push(task);
    Some(id)
}

/// Remove a task and every completion record it has.
/// Returns false if the task does not exist.
pub fn delete_task(data: &mut AppData, task_id: &str) -> bool {
    let Some(idx) = data.position(task_id) else {
        return false;
    };
    data.tasks.remove(idx);
    data.completions.remove_task(task_id);
    true
}

/// Change a task's title. Blank or unchanged titles and unknown IDs leave
/// the data untouched and return false.
pub fn rename_task(data: &mut AppData, task_id: &str, new_title: &str) -> bool {
    let Some(title) = normalize_title(new_title) else {
        return false;
    };
    match data.task_mut(task_id) {
        Some(task) if task.title != title => {
            task.title = title;
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

/// Flip the completion flag of a task on a day. Returns the new state, or
/// `None` (nothing recorded) when the task does not exist.
pub fn toggle_completion(data: &mut AppData, task_id: &str, date_key: &str) -> Option<bool> {
    if !data.contains(task_id) {
        return None;
    }
    Some(data.completions.toggle(task_id, date_key))
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Move `active_id` to the slot `over_id` occupies.
///
/// Both indices are looked up first; the moved task is then removed and
/// reinserted at `over_id`'s original index in the shortened list. Moving
/// down therefore lands the task just after `over_id`, moving up lands it
/// just before.
pub fn reorder_tasks(data: &mut AppData, active_id: &str, over_id: &str) -> bool {
    let (Some(old_index), Some(new_index)) = (data.position(active_id), data.position(over_id))
    else {
        return false;
    };
    if old_index == new_index {
        return false;
    }
    let task = data.tasks.remove(old_index);
    data.tasks.insert(new_index, task);
    true
}

/// Drop all tasks and completions.
pub fn clear(data: &mut AppData) {
    data.tasks.clear();
    data.completions.clear();
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a user-typed reference: a 1-based position, a full ID, or a
/// unique ID prefix.
pub fn resolve_task<'a>(data: &'a AppData, reference: &str) -> Result<&'a Task, TaskError> {
    let reference = reference.trim();

    if let Some(task) = data.task(reference) {
        return Ok(task);
    }

    if let Ok(pos) = reference.parse::<usize>()
        && pos >= 1
        && let Some(task) = data.tasks.get(pos - 1)
    {
        return Ok(task);
    }

    if reference.is_empty() {
        return Err(TaskError::NotFound(reference.to_string()));
    }
    let matches: Vec<&Task> = data
        .tasks
        .iter()
        .filter(|t| t.id.starts_with(reference))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task),
        [] => Err(TaskError::NotFound(reference.to_string())),
        many => Err(TaskError::Ambiguous {
            prefix: reference.to_string(),
            count: many.len(),
        }),
    }
}
