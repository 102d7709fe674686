use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Condition codes at or above this value mean clear or cloudy sky without precipitation
pub const CLEAR_SKY_CODE: i32 = 800;

/// One timestamped weather observation
///
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub condition_code: i32,
    pub description: String,
}

impl RawSample {
    /// Returns true if the condition code indicates some form of precipitation or obstruction
    ///
    pub fn has_precipitation(&self) -> bool {
        self.condition_code < CLEAR_SKY_CODE
    }
}

/// A chronological sequence of samples for one location together with the location's
/// fixed offset from UTC
///
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub samples: Vec<RawSample>,
    pub utc_offset_seconds: i32,
}

/// Calendar day identity, counted as days since the common era.
/// Unlike the day-of-year ordinal it never collides across years.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(i32);

impl DayKey {
    /// Returns the key for a local calendar date
    ///
    /// # Arguments
    ///
    /// * 'date' - local calendar date
    pub fn from_date(date: NaiveDate) -> DayKey {
        DayKey(date.num_days_from_ce())
    }
}

/// Aggregated summary for one calendar day
///
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub day_key: DayKey,
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub has_precipitation: bool,
    pub initialized: bool,
}

impl DayRecord {
    /// Creates an empty record for the given date, nothing has been folded into it yet
    ///
    /// # Arguments
    ///
    /// * 'date' - local calendar date of the record
    pub fn new(date: NaiveDate) -> DayRecord {
        DayRecord {
            day_key: DayKey::from_date(date),
            date,
            min_temperature: f64::INFINITY,
            has_precipitation: false,
            initialized: false,
        }
    }

    /// Folds one sample into the record.
    /// The first sample sets the minimum temperature, subsequent samples can only lower it,
    /// and once precipitation has been seen it stays.
    ///
    /// # Arguments
    ///
    /// * 'sample' - sample belonging to this record's day
    pub fn fold(&mut self, sample: &RawSample) {
        if self.initialized {
            self.min_temperature = self.min_temperature.min(sample.temperature);
            self.has_precipitation |= sample.has_precipitation();
        } else {
            self.min_temperature = sample.temperature;
            self.has_precipitation = sample.has_precipitation();
            self.initialized = true;
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Favorable,
    Unfavorable,
    NoData,
}

/// Go/no-go outcome together with a human-readable explanation
///
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(temperature: f64, condition_code: i32) -> RawSample {
        RawSample {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap(),
            temperature,
            condition_code,
            description: "test".to_string(),
        }
    }

    #[test]
    fn day_key_distinct_across_year_boundary() {
        let dec30 = DayKey::from_date(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        let dec31 = DayKey::from_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let jan01 = DayKey::from_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let dec31_prev = DayKey::from_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert_ne!(dec30, dec31);
        assert_ne!(dec31, jan01);
        assert_ne!(dec30, jan01);
        assert_ne!(dec31, dec31_prev);
        assert!(dec30 < dec31 && dec31 < jan01);
    }

    #[test]
    fn day_key_leap_day_ordinal_does_not_collide() {
        // both are day 365 of their year
        let a = DayKey::from_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        let b = DayKey::from_date(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn fold_keeps_minimum_and_sticky_precipitation() {
        let mut record = DayRecord::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(!record.initialized);

        record.fold(&sample(12.0, 800));
        assert!(record.initialized);
        assert_eq!(record.min_temperature, 12.0);
        assert!(!record.has_precipitation);

        record.fold(&sample(8.0, 500));
        record.fold(&sample(15.0, 801));
        assert_eq!(record.min_temperature, 8.0);
        assert!(record.has_precipitation);
    }

    #[test]
    fn condition_code_threshold() {
        assert!(sample(10.0, 799).has_precipitation());
        assert!(!sample(10.0, 800).has_precipitation());
    }
}
