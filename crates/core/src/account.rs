//! Account enums, user preferences and sign-up validation.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::CoreError;

/// Minimum display name length in characters.
pub const MIN_DISPLAY_NAME_LEN: usize = 2;
/// Maximum display name length in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 50;
/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

define_text_enum! {
    /// Subscription tier of an account.
    AccountTier ("account tier") {
        Free = "free",
        Premium = "premium",
    }
}

define_text_enum! {
    /// The part of the day a user prefers to check in.
    PreferredTime ("preferred time") {
        Morning = "morning",
        Afternoon = "afternoon",
        Evening = "evening",
        Anytime = "anytime",
    }
}

define_text_enum! {
    /// UI theme preference.
    Theme ("theme") {
        Light = "light",
        Dark = "dark",
        System = "system",
    }
}

/// A daily window during which no notifications are delivered.
///
/// `start > end` means the window wraps past midnight (e.g. 22:00-07:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    #[serde(with = "clock::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end: NaiveTime,
}

impl QuietHours {
    /// Whether `time` falls inside the window (start inclusive, end exclusive).
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            false
        } else if self.start < self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Typed shape of the `users.preferences` JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub preferred_time: PreferredTime,
    /// Free-text timezone label, compared case-insensitively for matching.
    pub timezone: Option<String>,
    pub utc_offset_minutes: i32,
    pub quiet_hours: Option<QuietHours>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications_enabled: true,
            preferred_time: PreferredTime::Anytime,
            timezone: None,
            utc_offset_minutes: 0,
            quiet_hours: None,
        }
    }
}

impl UserPreferences {
    pub fn validate(&self) -> Result<(), CoreError> {
        clock::validate_utc_offset(self.utc_offset_minutes)?;
        if let Some(tz) = &self.timezone {
            if tz.chars().count() > 64 {
                return Err(CoreError::Validation(
                    "Timezone label must be at most 64 characters".into(),
                ));
            }
        }
        Ok(())
    }

    /// Whether an in-app notification may be delivered at local `time`.
    pub fn accepts_notifications_at(&self, time: NaiveTime) -> bool {
        self.notifications_enabled && !self.quiet_hours.is_some_and(|q| q.contains(time))
    }
}

// ---------------------------------------------------------------------------
// Sign-up validation
// ---------------------------------------------------------------------------

/// Lower-case and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Please enter a valid email address".into(),
        ))
    }
}

pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if !(MIN_DISPLAY_NAME_LEN..=MAX_DISPLAY_NAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Display name must be between {MIN_DISPLAY_NAME_LEN} and {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Minimum length plus at least one letter and one digit.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(CoreError::Validation(
            "Password must contain at least one letter and one number".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("  jane@example.com ").is_ok());
        assert!(validate_email("jane@example").is_err());
        assert!(validate_email("jane example@x.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn display_name_bounds() {
        assert!(validate_display_name("Jo").is_ok());
        assert!(validate_display_name("J").is_err());
        assert!(validate_display_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
    }

    #[test]
    fn quiet_hours_same_day_window() {
        let q = QuietHours {
            start: t(13, 0),
            end: t(14, 0),
        };
        assert!(q.contains(t(13, 0)));
        assert!(q.contains(t(13, 59)));
        assert!(!q.contains(t(14, 0)));
    }

    #[test]
    fn quiet_hours_wrap_midnight() {
        let q = QuietHours {
            start: t(22, 0),
            end: t(7, 0),
        };
        assert!(q.contains(t(23, 30)));
        assert!(q.contains(t(2, 0)));
        assert!(!q.contains(t(7, 0)));
        assert!(!q.contains(t(12, 0)));
    }

    #[test]
    fn preferences_default_when_fields_missing() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"theme":"dark","quiet_hours":{"start":"22:00","end":"07:00"}}"#)
                .unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.preferred_time, PreferredTime::Anytime);
        assert!(!prefs.accepts_notifications_at(t(23, 0)));
        assert!(prefs.accepts_notifications_at(t(9, 0)));
    }

    #[test]
    fn disabled_notifications_are_never_accepted() {
        let prefs = UserPreferences {
            notifications_enabled: false,
            ..UserPreferences::default()
        };
        assert!(!prefs.accepts_notifications_at(t(12, 0)));
    }
}
