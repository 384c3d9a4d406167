use time::PrimitiveDateTime;

pub const ON_TIME_POINTS: u64 = 10;
pub const LATE_POINTS: u64 = 5;

pub const MOTIVATIONS: [&str; 5] = [
    "Great job! Keep the momentum going!",
    "You're crushing it!",
    "Task completed! Time for a short break.",
    "Another one done! You got this!",
    "Awesome work! Keep smashing those goals!",
];

/// On time means the completion date is no later than the deadline date.
/// The time of day is ignored; an unreadable deadline counts as late.
pub fn reward_points(deadline: Option<PrimitiveDateTime>, completed_at: PrimitiveDateTime) -> u64 {
    match deadline {
        Some(deadline) if completed_at.date() <= deadline.date() => ON_TIME_POINTS,
        _ => LATE_POINTS,
    }
}

/// Rotates with the points total, so the line changes as points accrue.
pub fn motivation(points: u64) -> &'static str {
    MOTIVATIONS[(points % MOTIVATIONS.len() as u64) as usize]
}

pub fn reward_message(task_name: &str, gained: u64, points: u64) -> String {
    format!("Completed '{task_name}' (+{gained} points). Total points: {points}")
}
