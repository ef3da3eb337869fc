//! Business-day calendar.
//!
//! "Today" and "tomorrow" depend on where the business operates, so the day
//! boundary is an explicit fixed UTC offset rather than the host's local zone.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("day boundary offset out of range: {0} minutes")]
pub struct InvalidOffset(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Build from minutes east of UTC (e.g. `345` for UTC+05:45).
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, InvalidOffset> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or(InvalidOffset(minutes))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `instant` on the business calendar.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// The business day after the one containing `instant`.
    pub fn tomorrow(&self, instant: DateTime<Utc>) -> NaiveDate {
        let today = self.local_date(instant);
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}
