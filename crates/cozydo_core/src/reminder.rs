use crate::error::AppError;
use crate::model::task::local_now;
use crate::model::{Store, Task};
use crate::notify::Notifier;
use crate::storage::json_store;
use std::path::Path;
use time::{Duration, PrimitiveDateTime};

pub const REMINDER_WINDOW_MINUTES: i64 = 10;
pub const REMINDER_INTERVAL_SECS: u64 = 60;

#[derive(Debug)]
pub struct ReminderOutcome {
    pub tasks: Vec<Task>,
    pub failures: Vec<NotificationFailure>,
}

#[derive(Debug)]
pub struct NotificationFailure {
    pub task_id: u64,
    pub error: AppError,
}

/// Pending tasks whose deadline falls inside `[now, now + window]`, each
/// flagged so later sweeps skip it. Only the in-memory store is touched;
/// persisting the flags is the caller's job. Unreadable deadlines are
/// skipped without flagging.
pub fn due_soon(store: &mut Store, now: PrimitiveDateTime, window_minutes: i64) -> Vec<Task> {
    let upcoming = now + Duration::minutes(window_minutes);
    let mut due = Vec::new();

    for task in &mut store.tasks {
        if task.completed || task.reminder_sent {
            continue;
        }

        let deadline = match task.deadline_datetime() {
            Ok(deadline) => deadline,
            Err(_) => continue,
        };

        if now <= deadline && deadline <= upcoming {
            task.reminder_sent = true;
            due.push(task.clone());
        }
    }

    due
}

/// One reminder sweep: collect due tasks, persist their flags, then hand
/// `(title, message)` pairs to the notifier. Flags reach disk before any
/// delivery attempt, so a reminder fires at most once per task.
pub fn check_reminders(
    path: &Path,
    store: &mut Store,
    window_minutes: i64,
    notifier: &dyn Notifier,
) -> Result<ReminderOutcome, AppError> {
    let due = due_soon(store, local_now(), window_minutes);
    if due.is_empty() {
        return Ok(ReminderOutcome {
            tasks: due,
            failures: Vec::new(),
        });
    }

    json_store::save_store(path, store)?;

    let mut failures = Vec::new();
    for task in &due {
        let message = format!("{} at {}", task.name, task.deadline);
        if let Err(error) = notifier.notify("Task reminder", &message) {
            failures.push(NotificationFailure {
                task_id: task.id,
                error,
            });
        }
    }

    Ok(ReminderOutcome {
        tasks: due,
        failures,
    })
}
