use serde::{Deserialize, Serialize};

use super::task::Task;

/// Whole persisted state: the task list plus the reward points total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub points: u64,
}

/// Next task id: one past the current maximum, starting at 1.
pub fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|task| task.id).max().map_or(1, |max| max + 1)
}
