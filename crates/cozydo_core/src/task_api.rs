use crate::error::AppError;
use crate::model::task::{format_deadline, local_now, parse_deadline, timestamp_now};
use crate::model::{Store, Task, next_id};
use crate::rewards;
use crate::storage::json_store;
use std::path::Path;
use time::PrimitiveDateTime;

/// Result of marking a task complete. `gained` is 0 when the task was
/// already completed and nothing changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task: Task,
    pub gained: u64,
    pub points: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
    pub points: u64,
}

pub fn add_task(
    path: &Path,
    store: &mut Store,
    name: &str,
    deadline: &str,
    duration_hours: f64,
    priority: u8,
) -> Result<Task, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let parsed = parse_deadline(deadline)?;

    if !duration_hours.is_finite() || duration_hours <= 0.0 {
        return Err(AppError::validation("duration_hours must be a positive number"));
    }

    if !(1..=5).contains(&priority) {
        return Err(AppError::validation("priority must be between 1 and 5"));
    }

    let task = Task {
        id: next_id(&store.tasks),
        name: trimmed.to_string(),
        deadline: format_deadline(parsed)?,
        duration_hours,
        priority,
        created_at: timestamp_now()?,
        completed: false,
        completed_at: None,
        reminder_sent: false,
    };

    store.tasks.push(task.clone());
    json_store::save_store(path, store)?;

    Ok(task)
}

pub fn delete_task(path: &Path, store: &mut Store, id: u64) -> Result<Task, AppError> {
    let index = store
        .tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

    let removed = store.tasks.remove(index);
    json_store::save_store(path, store)?;

    Ok(removed)
}

pub fn mark_complete(path: &Path, store: &mut Store, id: u64) -> Result<Completion, AppError> {
    let task = store
        .tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

    if task.completed {
        return Ok(Completion {
            task: task.clone(),
            gained: 0,
            points: store.points,
        });
    }

    let completed_at = timestamp_now()?;
    // Date-only comparison; a deadline that no longer parses counts as late.
    let gained = rewards::reward_points(task.deadline_datetime().ok(), local_now());

    task.completed = true;
    task.completed_at = Some(completed_at);
    let completed = task.clone();

    store.points += gained;
    json_store::save_store(path, store)?;

    Ok(Completion {
        task: completed,
        gained,
        points: store.points,
    })
}

/// Pending tasks in suggested work order: earliest deadline first, then
/// priority, shorter duration, lower id. Tasks whose deadline does not
/// parse are left out.
pub fn suggest_edf(store: &Store) -> Vec<Task> {
    let mut pending: Vec<(PrimitiveDateTime, &Task)> = store
        .tasks
        .iter()
        .filter(|task| !task.completed)
        .filter_map(|task| task.deadline_datetime().ok().map(|deadline| (deadline, task)))
        .collect();

    pending.sort_by(|(left_deadline, left), (right_deadline, right)| {
        left_deadline
            .cmp(right_deadline)
            .then_with(|| left.priority.cmp(&right.priority))
            .then_with(|| left.duration_hours.total_cmp(&right.duration_hours))
            .then_with(|| left.id.cmp(&right.id))
    });

    pending.into_iter().map(|(_, task)| task.clone()).collect()
}

pub fn summary(store: &Store) -> Summary {
    let total = store.tasks.len();
    let done = store.tasks.iter().filter(|task| task.completed).count();

    Summary {
        total,
        done,
        pending: total - done,
        points: store.points,
    }
}
