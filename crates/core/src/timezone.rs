//! Resolving "today" in a user's timezone.
//!
//! Focus sessions, daily todos, and due-date checks are all bucketed by the
//! user's local calendar day, not by UTC.

use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::{Day, Timestamp};

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Parse an IANA timezone name (e.g. `Europe/Paris`).
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone '{name}'")))
}

/// The calendar day of `instant` in `tz`.
pub fn day_in(instant: Timestamp, tz: Tz) -> Day {
    instant.with_timezone(&tz).date_naive()
}

/// The calendar day of `instant` for a stored timezone name.
///
/// Rows are validated on write, so an unparseable value only appears if the
/// zone database dropped a name; those users fall back to UTC.
pub fn local_day(instant: Timestamp, timezone: &str) -> Day {
    match parse_timezone(timezone) {
        Ok(tz) => day_in(instant, tz),
        Err(_) => instant.date_naive(),
    }
}
