use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    /// Naive local deadline, stored as `YYYY-MM-DD HH:MM`.
    pub deadline: String,
    pub duration_hours: f64,
    pub priority: u8,
    pub created_at: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub reminder_sent: bool,
}

impl Task {
    pub fn deadline_datetime(&self) -> Result<PrimitiveDateTime, AppError> {
        parse_deadline(&self.deadline)
    }
}

pub fn parse_deadline(value: &str) -> Result<PrimitiveDateTime, AppError> {
    PrimitiveDateTime::parse(
        value.trim(),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    )
    .map_err(|_| AppError::validation("deadline must be YYYY-MM-DD HH:MM"))
}

pub fn format_deadline(value: PrimitiveDateTime) -> Result<String, AppError> {
    value
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .map_err(|err| AppError::validation(err.to_string()))
}

/// Wall-clock now in the local timezone, UTC when the offset is indeterminate.
pub fn local_now() -> PrimitiveDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    PrimitiveDateTime::new(now.date(), now.time())
}

pub fn timestamp_now() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::io(err.to_string()))
}
