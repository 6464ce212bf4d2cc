//! Notification kinds, priorities and platform event names.

use crate::error::CoreError;

/// Maximum notification title length in characters.
pub const MAX_TITLE_LEN: usize = 120;

define_text_enum! {
    /// What a notification is about.
    NotificationKind ("notification kind") {
        Reminder = "reminder",
        Achievement = "achievement",
        Milestone = "milestone",
        Challenge = "challenge",
        Buddy = "buddy",
        System = "system",
    }
}

define_text_enum! {
    /// Display priority of a notification.
    Priority ("priority") {
        Low = "low",
        Normal = "normal",
        High = "high",
        Urgent = "urgent",
    }
}

// ---------------------------------------------------------------------------
// Event names published on the in-process bus
// ---------------------------------------------------------------------------

pub const EVENT_ACHIEVEMENT_UNLOCKED: &str = "achievement.unlocked";
pub const EVENT_HABIT_MILESTONE: &str = "habit.milestone";
pub const EVENT_REMINDER_DUE: &str = "reminder.due";
pub const EVENT_BUDDY_REQUESTED: &str = "buddy.requested";
pub const EVENT_BUDDY_ACCEPTED: &str = "buddy.accepted";
pub const EVENT_CHALLENGE_JOINED: &str = "challenge.joined";

/// Map a bus event name to the notification kind and priority it produces.
///
/// Returns `None` for events that never produce a notification.
pub fn classify_event(event_type: &str) -> Option<(NotificationKind, Priority)> {
    match event_type {
        EVENT_ACHIEVEMENT_UNLOCKED => Some((NotificationKind::Achievement, Priority::High)),
        EVENT_HABIT_MILESTONE => Some((NotificationKind::Milestone, Priority::High)),
        EVENT_REMINDER_DUE => Some((NotificationKind::Reminder, Priority::Normal)),
        EVENT_BUDDY_REQUESTED | EVENT_BUDDY_ACCEPTED => {
            Some((NotificationKind::Buddy, Priority::Normal))
        }
        EVENT_CHALLENGE_JOINED => Some((NotificationKind::Challenge, Priority::Low)),
        _ => None,
    }
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Notification title must be 1-{MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_events_are_classified() {
        assert_eq!(
            classify_event(EVENT_ACHIEVEMENT_UNLOCKED),
            Some((NotificationKind::Achievement, Priority::High))
        );
        assert_eq!(
            classify_event(EVENT_REMINDER_DUE),
            Some((NotificationKind::Reminder, Priority::Normal))
        );
        assert_eq!(classify_event("habit.created"), None);
    }

    #[test]
    fn title_validation() {
        assert!(validate_title("Time to stretch").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }
}
