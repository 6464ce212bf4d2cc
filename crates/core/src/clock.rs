//! Local wall-clock helpers.
//!
//! Users and reminders carry a fixed UTC offset in minutes; no timezone
//! database is consulted.

use chrono::{Duration, FixedOffset, NaiveDateTime, NaiveTime, Timelike};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Smallest valid UTC offset (UTC-12:00).
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
/// Largest valid UTC offset (UTC+14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

pub fn validate_utc_offset(minutes: i32) -> Result<(), CoreError> {
    if (MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "UTC offset must be between {MIN_UTC_OFFSET_MINUTES} and {MAX_UTC_OFFSET_MINUTES} minutes"
        )))
    }
}

/// Convert a UTC instant to local wall-clock time for `offset_minutes`.
///
/// Out-of-range offsets are clamped to the valid range.
pub fn to_local(now: Timestamp, offset_minutes: i32) -> NaiveDateTime {
    let minutes = offset_minutes.clamp(MIN_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES);
    match FixedOffset::east_opt(minutes * 60) {
        Some(offset) => now.with_timezone(&offset).naive_local(),
        None => now.naive_utc() + Duration::minutes(i64::from(minutes)),
    }
}

/// Local hour of day (`0..=23`) for `offset_minutes`.
pub fn local_hour(now: Timestamp, offset_minutes: i32) -> u32 {
    to_local(now, offset_minutes).hour()
}

/// Parse an `HH:MM` time of day.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        CoreError::Validation(format!("Invalid time '{value}'. Expected HH:MM (24-hour)"))
    })
}

/// Serde adapter storing a [`NaiveTime`] as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn local_time_applies_offset() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let local = to_local(now, 120);
        assert_eq!(local.hour(), 1);
        assert_eq!(local.date().to_string(), "2024-05-02");
        assert_eq!(local_hour(now, -300), 18);
    }

    #[test]
    fn parse_hhmm_accepts_24_hour_times() {
        assert_eq!(parse_hhmm("07:05").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert_eq!(parse_hhmm("23:59").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("7pm").is_err());
    }

    #[test]
    fn offset_bounds() {
        assert!(validate_utc_offset(0).is_ok());
        assert!(validate_utc_offset(MAX_UTC_OFFSET_MINUTES).is_ok());
        assert!(validate_utc_offset(MAX_UTC_OFFSET_MINUTES + 1).is_err());
        assert!(validate_utc_offset(MIN_UTC_OFFSET_MINUTES - 1).is_err());
    }
}
