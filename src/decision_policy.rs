use crate::models::{DayRecord, Outcome, RawSample, Verdict, CLEAR_SKY_CODE};

/// Lowest temperature (inclusive) considered comfortable for riding
pub const MIN_RIDE_TEMP: f64 = 5.0;

/// Highest temperature (inclusive) considered comfortable for riding, same-day only
pub const MAX_RIDE_TEMP: f64 = 32.0;

/// Decides on riding right now from a single current observation
///
/// # Arguments
///
/// * 'sample' - current weather observation
pub fn decide_now(sample: &RawSample) -> Verdict {
    let temp = sample.temperature;
    let is_good_temp = (MIN_RIDE_TEMP..=MAX_RIDE_TEMP).contains(&temp);
    let is_good_weather = sample.condition_code >= CLEAR_SKY_CODE;

    let mut reason = format!("Currently {:.1}°C and {}.", temp, sample.description);

    if is_good_temp && is_good_weather {
        return Verdict { outcome: Outcome::Favorable, reason };
    }

    if temp < MIN_RIDE_TEMP {
        reason.push_str(" Too cold.");
    } else if temp > MAX_RIDE_TEMP {
        reason.push_str(" Too hot.");
    }
    if !is_good_weather {
        reason.push_str(" Precipitation possible.");
    }

    Verdict { outcome: Outcome::Unfavorable, reason }
}

/// Decides on riding for an aggregated future day.
///
/// Only the minimum temperature is screened, there is no upper bound in this mode.
///
/// # Arguments
///
/// * 'record' - aggregated day record
pub fn decide_day(record: &DayRecord) -> Verdict {
    if !record.initialized {
        return Verdict { outcome: Outcome::NoData, reason: "No data for this day.".to_string() };
    }

    let is_good_temp = record.min_temperature >= MIN_RIDE_TEMP;
    let is_good_weather = !record.has_precipitation;

    let precipitation = if record.has_precipitation { "precipitation possible" } else { "no precipitation" };
    let reason = format!("(Min. {:.0}°C, {})", record.min_temperature, precipitation);

    let outcome = if is_good_temp && is_good_weather { Outcome::Favorable } else { Outcome::Unfavorable };

    Verdict { outcome, reason }
}
