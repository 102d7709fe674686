use std::collections::HashMap;
use chrono::{DateTime, Utc};
use log::debug;
use crate::daylight_filter::is_admitted;
use crate::models::{DayKey, DayRecord, ForecastSeries};
use crate::time_context::{day_key, TimeContext};

/// Reduces a forecast series into one record per local calendar day.
///
/// Only samples admitted by the daylight filter are folded in. Records are returned in the
/// order their day was first seen in the series, which is not necessarily key order.
/// An empty result means that nothing in the series was usable, it is not an error.
///
/// # Arguments
///
/// * 'series' - the forecast series to aggregate
/// * 'now' - current instant, decides which local date is today
pub fn aggregate(series: &ForecastSeries, now: DateTime<Utc>) -> Vec<DayRecord> {
    let ctx = TimeContext::new(series.utc_offset_seconds, now);

    let mut index: HashMap<DayKey, usize> = HashMap::new();
    let mut days: Vec<DayRecord> = Vec::new();

    for sample in series.samples.iter() {
        let local = ctx.localize(sample.timestamp);
        if !is_admitted(&local, &ctx) {
            continue;
        }

        let i = match index.get(&day_key(local.date)) {
            Some(&i) => i,
            None => {
                let record = DayRecord::new(local.date);
                index.insert(record.day_key, days.len());
                days.push(record);
                days.len() - 1
            }
        };

        days[i].fold(sample);
    }

    debug!("aggregated {} samples into {} days", series.samples.len(), days.len());

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone};
    use proptest::prelude::*;
    use crate::models::RawSample;

    const OFFSET: i32 = 3 * 3600;

    /// "now" is 2025-06-01 09:00 local time (UTC+3)
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap()
    }

    fn local_sample(month: u32, day: u32, hour: u32, temperature: f64, condition_code: i32) -> RawSample {
        let timestamp = Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap() - TimeDelta::seconds(OFFSET as i64);
        RawSample { timestamp, temperature, condition_code, description: String::new() }
    }

    #[test]
    fn empty_series_gives_empty_aggregate() {
        let series = ForecastSeries { samples: vec![], utc_offset_seconds: OFFSET };
        assert!(aggregate(&series, now()).is_empty());
    }

    #[test]
    fn only_filtered_samples_gives_empty_aggregate() {
        let series = ForecastSeries {
            samples: vec![
                local_sample(6, 1, 12, 20.0, 800),
                local_sample(6, 2, 3, 10.0, 800),
                local_sample(6, 2, 23, 10.0, 800),
            ],
            utc_offset_seconds: OFFSET,
        };
        assert!(aggregate(&series, now()).is_empty());
    }

    #[test]
    fn tomorrow_excludes_early_and_late_hours() {
        let series = ForecastSeries {
            samples: vec![
                local_sample(6, 2, 6, 10.0, 500),
                local_sample(6, 2, 9, 8.0, 801),
                local_sample(6, 2, 15, 12.0, 800),
                local_sample(6, 2, 21, 6.0, 800),
                local_sample(6, 2, 23, 3.0, 800),
            ],
            utc_offset_seconds: OFFSET,
        };

        let days = aggregate(&series, now());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(days[0].min_temperature, 6.0);
        assert!(!days[0].has_precipitation);
        assert!(days[0].initialized);
    }

    #[test]
    fn today_samples_never_aggregated() {
        let series = ForecastSeries {
            samples: vec![
                local_sample(6, 1, 10, -20.0, 200),
                local_sample(6, 1, 18, -20.0, 200),
                local_sample(6, 2, 10, 15.0, 800),
            ],
            utc_offset_seconds: OFFSET,
        };

        let days = aggregate(&series, now());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temperature, 15.0);
        assert!(!days[0].has_precipitation);
    }

    #[test]
    fn order_is_first_seen_not_sorted() {
        let series = ForecastSeries {
            samples: vec![
                local_sample(6, 4, 10, 10.0, 800),
                local_sample(6, 2, 10, 11.0, 800),
                local_sample(6, 3, 10, 12.0, 800),
                local_sample(6, 2, 12, 9.0, 800),
            ],
            utc_offset_seconds: OFFSET,
        };

        let dates: Vec<u32> = aggregate(&series, now())
            .iter()
            .map(|d| d.date.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(dates, vec![4, 2, 3]);
    }

    #[test]
    fn chronological_input_spanning_days() {
        let series = ForecastSeries {
            samples: vec![
                local_sample(6, 2, 9, 10.0, 800),
                local_sample(6, 2, 21, 7.0, 800),
                local_sample(6, 3, 0, 5.0, 800),
                local_sample(6, 3, 12, 14.0, 501),
                local_sample(6, 4, 9, 4.0, 800),
                local_sample(6, 5, 15, 18.0, 803),
            ],
            utc_offset_seconds: OFFSET,
        };

        let days = aggregate(&series, now());
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].min_temperature, 7.0);
        assert_eq!(days[1].min_temperature, 14.0);
        assert!(days[1].has_precipitation);
        assert_eq!(days[2].min_temperature, 4.0);
        assert!(!days[3].has_precipitation);
    }

    #[test]
    fn year_boundary_days_stay_apart() {
        let now = Utc.with_ymd_and_hms(2024, 12, 29, 9, 0, 0).unwrap();
        let at = |y: i32, m: u32, d: u32, t: f64| RawSample {
            timestamp: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            temperature: t,
            condition_code: 800,
            description: String::new(),
        };
        let series = ForecastSeries {
            samples: vec![at(2024, 12, 30, 1.0), at(2024, 12, 31, 2.0), at(2025, 1, 1, 3.0)],
            utc_offset_seconds: 0,
        };

        let days = aggregate(&series, now);
        assert_eq!(days.len(), 3);
        assert_eq!(
            days.iter().map(|d| d.min_temperature).collect::<Vec<f64>>(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn same_ordinal_in_different_years_stays_apart() {
        // 2023-12-31 and 2024-12-30 are both day 365
        let now = Utc.with_ymd_and_hms(2023, 12, 1, 9, 0, 0).unwrap();
        let at = |y: i32, m: u32, d: u32, t: f64| RawSample {
            timestamp: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            temperature: t,
            condition_code: 800,
            description: String::new(),
        };
        let series = ForecastSeries {
            samples: vec![at(2023, 12, 31, 1.0), at(2024, 12, 30, 9.0)],
            utc_offset_seconds: 0,
        };

        assert_eq!(aggregate(&series, now).len(), 2);
    }

    fn arb_samples() -> impl Strategy<Value = Vec<(i64, f64, i32)>> {
        // (minutes after "now", temperature, condition code)
        prop::collection::vec((0i64..(6 * 24 * 60), -30.0f64..45.0, 200i32..805), 0..60)
    }

    proptest! {
        #[test]
        fn min_and_precipitation_match_admitted_samples(raw in arb_samples()) {
            let now = now();
            let mut raw = raw;
            raw.sort_by_key(|r| r.0);

            let samples: Vec<RawSample> = raw
                .iter()
                .map(|(m, t, c)| RawSample {
                    timestamp: now + TimeDelta::minutes(*m),
                    temperature: *t,
                    condition_code: *c,
                    description: String::new(),
                })
                .collect();
            let series = ForecastSeries { samples: samples.clone(), utc_offset_seconds: OFFSET };
            let ctx = TimeContext::new(OFFSET, now);

            let days = aggregate(&series, now);

            let mut expected_order: Vec<NaiveDate> = Vec::new();
            for s in samples.iter() {
                let local = ctx.localize(s.timestamp);
                if is_admitted(&local, &ctx) && !expected_order.contains(&local.date) {
                    expected_order.push(local.date);
                }
            }
            prop_assert_eq!(days.iter().map(|d| d.date).collect::<Vec<NaiveDate>>(), expected_order);

            for day in days.iter() {
                let admitted: Vec<&RawSample> = samples
                    .iter()
                    .filter(|s| {
                        let local = ctx.localize(s.timestamp);
                        local.date == day.date && is_admitted(&local, &ctx)
                    })
                    .collect();

                let min = admitted.iter().map(|s| s.temperature).fold(f64::INFINITY, f64::min);
                prop_assert!(day.initialized);
                prop_assert_eq!(day.min_temperature, min);
                prop_assert_eq!(day.has_precipitation, admitted.iter().any(|s| s.condition_code < 800));
            }
        }
    }
}
