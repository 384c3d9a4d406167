use clap::{Parser, Subcommand};

/// Deadline-aware personal task tracker.
#[derive(Parser, Debug)]
#[command(name = "cozydo", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: cozydo add "Write report" "2025-03-01 17:00" 2.0 2
    Add {
        name: String,
        /// Deadline as YYYY-MM-DD HH:MM, local time
        deadline: String,
        /// Estimated effort in hours
        duration_hours: f64,
        /// Urgency from 1 (highest) to 5
        priority: u8,
    },
    /// List all tasks in the order they were added
    ///
    /// Example: cozydo list
    List,
    /// Mark a task as completed and collect points
    ///
    /// Example: cozydo done 1
    Done {
        id: u64,
    },
    /// Delete a task
    ///
    /// Example: cozydo delete 1
    Delete {
        id: u64,
    },
    /// Show pending tasks in suggested order, earliest deadline first
    ///
    /// Example: cozydo edf
    Edf,
    /// Show task counts and the points total
    ///
    /// Example: cozydo summary
    Summary,
    /// Send reminders for tasks due soon
    ///
    /// Example: cozydo remind
    /// Example: cozydo remind --watch --interval 30
    Remind {
        /// Keep running and sweep on a fixed cadence
        #[arg(long)]
        watch: bool,
        /// Due-soon window in minutes
        #[arg(long, value_name = "MINUTES")]
        window: Option<i64>,
        /// Seconds between sweeps when watching
        #[arg(long, value_name = "SECONDS")]
        interval: Option<u64>,
    },
}
