use chrono::{DateTime, NaiveDate, Utc};
use crate::day_aggregator::aggregate;
use crate::decision_policy::{decide_day, decide_now};
use crate::models::{DayRecord, ForecastSeries, Outcome, RawSample, Verdict};
use crate::time_context::TimeContext;

/// Sent instead of a forecast when no day could be aggregated.
/// Callers compare against this to tell "nothing to show" from a fetch error.
pub const FORECAST_UNAVAILABLE: &str = "Forecast unavailable.";

const FORECAST_HEADER: &str = "Here is your 4-day forecast:\n";
const TOMORROW_LABEL: &str = "Today+1";

/// Renders the same-day verdict as a headline followed by the reason on its own line
///
/// # Arguments
///
/// * 'verdict' - verdict from the same-day decision
pub fn render_now(verdict: &Verdict) -> String {
    let headline = match verdict.outcome {
        Outcome::Favorable => "✅ **Today:** Looks like it!",
        Outcome::Unfavorable => "❌ **Today:** Better not.",
        Outcome::NoData => "⚪️ **Today:** No data",
    };

    format!("{}\n{}", headline, verdict.reason)
}

/// Renders one line per day in the given order, headed by a title line.
/// If there are no days at all the FORECAST_UNAVAILABLE sentinel is returned.
///
/// # Arguments
///
/// * 'days' - aggregated day records in display order
/// * 'ctx' - time context used to recognise tomorrow
pub fn render_forecast(days: &[DayRecord], ctx: &TimeContext) -> String {
    if days.is_empty() {
        return FORECAST_UNAVAILABLE.to_string();
    }

    let mut lines: Vec<String> = Vec::with_capacity(days.len() + 1);
    lines.push(FORECAST_HEADER.to_string());

    for day in days.iter() {
        let label = day_label(day.date, ctx);
        lines.push(render_day(&label, &decide_day(day)));
    }

    lines.join("\n")
}

/// Renders one day's line
///
/// # Arguments
///
/// * 'label' - day label, e.g. "Today+1" or "03.06"
/// * 'verdict' - verdict for the day
pub fn render_day(label: &str, verdict: &Verdict) -> String {
    match verdict.outcome {
        Outcome::Favorable => format!("✅ **{}:** Looks like it! {}", label, verdict.reason),
        Outcome::Unfavorable => format!("❌ **{}:** Better not. {}", label, verdict.reason),
        Outcome::NoData => format!("⚪️ **{}:** No data", label),
    }
}

fn day_label(date: NaiveDate, ctx: &TimeContext) -> String {
    if ctx.is_tomorrow(date) {
        TOMORROW_LABEL.to_string()
    } else {
        date.format("%d.%m").to_string()
    }
}

/// Decides on and renders current conditions
///
/// # Arguments
///
/// * 'sample' - current weather observation
pub fn summarize_current(sample: &RawSample) -> String {
    render_now(&decide_now(sample))
}

/// Aggregates, decides on and renders a multi-day forecast
///
/// # Arguments
///
/// * 'series' - the forecast series
/// * 'now' - current instant
pub fn summarize_forecast(series: &ForecastSeries, now: DateTime<Utc>) -> String {
    let ctx = TimeContext::new(series.utc_offset_seconds, now);
    let days = aggregate(series, now);

    render_forecast(&days, &ctx)
}
