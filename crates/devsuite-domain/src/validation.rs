//! Date and field rules applied before records are written.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::code::SHORT_CODE_MAX_LEN;
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("short code cannot be more than 6 characters")]
    ShortCodeTooLong,
    #[error("deadline cannot be earlier than start date")]
    DeadlineBeforeStart,
    #[error("due date cannot be in the past")]
    DueDateInPast,
    #[error("expiry date cannot be earlier than start date")]
    ExpiryBeforeStart,
    #[error("expiry date cannot be in the past")]
    ExpiryInPast,
    #[error("end time cannot be earlier than start time")]
    EndBeforeStart,
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

pub fn validate_short_code(code: &str) -> Result<(), ValidationError> {
    if code.chars().count() > SHORT_CODE_MAX_LEN {
        return Err(ValidationError::ShortCodeTooLong);
    }
    Ok(())
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

pub fn require_positive(field: &'static str, amount: Money) -> Result<(), ValidationError> {
    if amount.cents() <= 0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}

pub fn validate_project_dates(
    start_date: Option<NaiveDate>,
    deadline: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start_date, deadline) {
        (Some(start), Some(deadline)) if deadline < start => {
            Err(ValidationError::DeadlineBeforeStart)
        }
        _ => Ok(()),
    }
}

pub fn validate_task_due_date(
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match due_date {
        Some(due) if due < today => Err(ValidationError::DueDateInPast),
        _ => Ok(()),
    }
}

pub fn validate_service_dates(
    start_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(expiry)) = (start_date, expiry_date) {
        if expiry < start {
            return Err(ValidationError::ExpiryBeforeStart);
        }
    }
    match expiry_date {
        Some(expiry) if expiry < today => Err(ValidationError::ExpiryInPast),
        _ => Ok(()),
    }
}

/// Duration of a time entry; `None` while the entry is still running.
pub fn time_entry_duration(
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
) -> Result<Option<TimeDelta>, ValidationError> {
    match end_time {
        Some(end) if end < start_time => Err(ValidationError::EndBeforeStart),
        Some(end) => Ok(Some(end - start_time)),
        None => Ok(None),
    }
}

/// Render a duration as `H:MM:SS`, dropping fractional seconds.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
