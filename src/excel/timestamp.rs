use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Time zone used to render modification times.
///
/// `Local` follows the executing machine's zone, matching what the user
/// sees in their file browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    #[default]
    Local,
    Utc,
}

/// Split an epoch-millisecond instant into `YYYY-MM-DD` and `HH:MM:SS`
pub fn format_timestamp(millis: i64, zone: ClockZone) -> (String, String) {
    match zone {
        ClockZone::Local => format_timestamp_in(millis, &Local),
        ClockZone::Utc => format_timestamp_in(millis, &Utc),
    }
}

/// Same as [`format_timestamp`] for an arbitrary zone.
///
/// Instants outside chrono's calendar range are clamped to its edges.
pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz) -> (String, String)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let instant = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(|| {
        // keep a day of headroom so any zone offset stays representable
        if millis < 0 {
            DateTime::<Utc>::MIN_UTC + Duration::days(1)
        } else {
            DateTime::<Utc>::MAX_UTC - Duration::days(1)
        }
    });

    let local = instant.with_timezone(tz);
    (
        local.format(DATE_FORMAT).to_string(),
        local.format(TIME_FORMAT).to_string(),
    )
}
