use crate::time_context::{LocalTime, TimeContext};

/// First local hour considered relevant for riding
pub const FIRST_HOUR: u32 = 7;

/// Last local hour considered relevant for riding
pub const LAST_HOUR: u32 = 22;

/// Decides whether a sample takes part in the multi-day aggregation.
///
/// Samples for today are left out since today is handled from current conditions,
/// as are samples outside the inclusive hour range [FIRST_HOUR, LAST_HOUR].
///
/// # Arguments
///
/// * 'local' - localized date and hour of the sample
/// * 'ctx' - time context holding today's date
pub fn is_admitted(local: &LocalTime, ctx: &TimeContext) -> bool {
    if ctx.is_today(local.date) {
        return false;
    }

    (FIRST_HOUR..=LAST_HOUR).contains(&local.hour)
}
