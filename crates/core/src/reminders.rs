//! Reminder due-time evaluation.
//!
//! The background scheduler polls on a fixed interval; [`due_on`] decides
//! whether a reminder should fire at a given instant. The returned local
//! date is the watermark the caller must persist so a reminder fires at
//! most once per local day.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::account::UserPreferences;
use crate::clock;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Default width of the window after `time_of_day` in which a reminder may fire.
pub const DEFAULT_CATCH_UP_MINUTES: i64 = 10;

/// Maximum reminder message length in characters.
pub const MAX_MESSAGE_LEN: usize = 280;

/// The schedule fields of a reminder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub time_of_day: NaiveTime,
    /// Weekdays (0 = Sunday .. 6 = Saturday). Empty means every day.
    pub days_of_week: Vec<i16>,
    pub utc_offset_minutes: i32,
    /// Local date the reminder last fired on.
    pub last_fired_on: Option<NaiveDate>,
}

/// Why a reminder did not fire; useful for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    WrongDay,
    OutsideWindow,
    AlreadyFired,
    QuietHours,
}

/// Decide whether the reminder is due at `now`.
///
/// Returns the local date to record as the new watermark when due.
pub fn due_on(
    schedule: &ReminderSchedule,
    prefs: &UserPreferences,
    now: Timestamp,
    catch_up: Duration,
) -> Result<NaiveDate, Skip> {
    let local = clock::to_local(now, schedule.utc_offset_minutes);
    let today = local.date();
    let weekday = today.weekday().num_days_from_sunday() as i16;

    if !schedule.days_of_week.is_empty() && !schedule.days_of_week.contains(&weekday) {
        return Err(Skip::WrongDay);
    }

    let fire_at = today.and_time(schedule.time_of_day);
    if local < fire_at || local >= fire_at + catch_up {
        return Err(Skip::OutsideWindow);
    }

    if schedule.last_fired_on.is_some_and(|last| last >= today) {
        return Err(Skip::AlreadyFired);
    }

    if !prefs.accepts_notifications_at(local.time()) {
        return Err(Skip::QuietHours);
    }

    Ok(today)
}

pub fn validate_days_of_week(days: &[i16]) -> Result<(), CoreError> {
    match days.iter().find(|d| !(0..=6).contains(*d)) {
        Some(bad) => Err(CoreError::Validation(format!(
            "Invalid weekday {bad}. Must be 0 (Sunday) through 6 (Saturday)"
        ))),
        None => Ok(()),
    }
}

pub fn validate_message(message: &str) -> Result<(), CoreError> {
    if message.trim().is_empty() {
        return Err(CoreError::Validation("Reminder message is required".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Reminder message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::account::QuietHours;

    fn schedule(h: u32, m: u32, days: &[i16]) -> ReminderSchedule {
        ReminderSchedule {
            time_of_day: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            days_of_week: days.to_vec(),
            utc_offset_minutes: 0,
            last_fired_on: None,
        }
    }

    fn window() -> Duration {
        Duration::minutes(DEFAULT_CATCH_UP_MINUTES)
    }

    // 2024-05-01 is a Wednesday (weekday 3).
    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    #[test]
    fn fires_inside_catch_up_window() {
        let prefs = UserPreferences::default();
        let due = due_on(&schedule(8, 0, &[]), &prefs, at(8, 3), window());
        assert_eq!(due, Ok(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    }

    #[test]
    fn does_not_fire_before_or_after_window() {
        let prefs = UserPreferences::default();
        let s = schedule(8, 0, &[]);
        assert_eq!(due_on(&s, &prefs, at(7, 59), window()), Err(Skip::OutsideWindow));
        assert_eq!(due_on(&s, &prefs, at(8, 10), window()), Err(Skip::OutsideWindow));
    }

    #[test]
    fn respects_days_of_week() {
        let prefs = UserPreferences::default();
        assert_eq!(
            due_on(&schedule(8, 0, &[1, 5]), &prefs, at(8, 1), window()),
            Err(Skip::WrongDay)
        );
        assert!(due_on(&schedule(8, 0, &[3]), &prefs, at(8, 1), window()).is_ok());
    }

    #[test]
    fn watermark_prevents_second_fire_same_day() {
        let prefs = UserPreferences::default();
        let mut s = schedule(8, 0, &[]);
        let today = due_on(&s, &prefs, at(8, 0), window()).unwrap();
        s.last_fired_on = Some(today);
        assert_eq!(due_on(&s, &prefs, at(8, 1), window()), Err(Skip::AlreadyFired));
    }

    #[test]
    fn quiet_hours_suppress_reminder() {
        let prefs = UserPreferences {
            quiet_hours: Some(QuietHours {
                start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            }),
            ..UserPreferences::default()
        };
        assert_eq!(
            due_on(&schedule(6, 30, &[]), &prefs, at(6, 31), window()),
            Err(Skip::QuietHours)
        );
    }

    #[test]
    fn offset_shifts_local_day_and_time() {
        let prefs = UserPreferences::default();
        let mut s = schedule(9, 0, &[4]);
        // 23:05 UTC on Wednesday is 09:05 Thursday at UTC+10.
        s.utc_offset_minutes = 600;
        let due = due_on(&s, &prefs, at(23, 5), window());
        assert_eq!(due, Ok(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()));
    }

    #[test]
    fn validation_helpers() {
        assert!(validate_days_of_week(&[0, 6]).is_ok());
        assert!(validate_days_of_week(&[7]).is_err());
        assert!(validate_message("Stretch!").is_ok());
        assert!(validate_message("  ").is_err());
    }
}
