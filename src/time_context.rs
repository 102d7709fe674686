use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use crate::models::DayKey;

/// Local calendar position of an instant
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub date: NaiveDate,
    pub hour: u32,
}

/// Converts an absolute instant into local date and hour using a fixed offset from UTC.
/// Daylight saving time is not considered, the offset is applied as-is.
///
/// # Arguments
///
/// * 'instant' - the absolute instant
/// * 'offset_seconds' - offset from UTC in seconds, any value is accepted
pub fn localize(instant: DateTime<Utc>, offset_seconds: i32) -> LocalTime {
    let local: NaiveDateTime = instant.naive_utc() + TimeDelta::seconds(offset_seconds as i64);

    LocalTime { date: local.date(), hour: local.hour() }
}

/// Returns the bucketing key for a local calendar date
///
/// # Arguments
///
/// * 'date' - local calendar date
pub fn day_key(date: NaiveDate) -> DayKey {
    DayKey::from_date(date)
}

/// "Today" and "tomorrow" as seen from one location at one instant
///
#[derive(Debug, Copy, Clone)]
pub struct TimeContext {
    offset_seconds: i32,
    today: NaiveDate,
    tomorrow: NaiveDate,
}

impl TimeContext {
    /// Creates a new TimeContext
    ///
    /// # Arguments
    ///
    /// * 'offset_seconds' - the location's fixed offset from UTC in seconds
    /// * 'now' - the current instant
    pub fn new(offset_seconds: i32, now: DateTime<Utc>) -> TimeContext {
        let today = localize(now, offset_seconds).date;
        let tomorrow = localize(now + TimeDelta::hours(24), offset_seconds).date;

        TimeContext { offset_seconds, today, tomorrow }
    }

    pub fn localize(&self, instant: DateTime<Utc>) -> LocalTime {
        localize(instant, self.offset_seconds)
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today
    }

    pub fn is_tomorrow(&self, date: NaiveDate) -> bool {
        date == self.tomorrow
    }
}
