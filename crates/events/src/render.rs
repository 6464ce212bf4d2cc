//! Notification content for domain events.
//!
//! [`render`] is pure; the API's notification router stores and pushes the
//! result. The `dedup_key` makes redelivery of the same event harmless.

use habitforge_core::notifications::{
    classify_event, NotificationKind, Priority, EVENT_ACHIEVEMENT_UNLOCKED,
    EVENT_BUDDY_ACCEPTED, EVENT_BUDDY_REQUESTED, EVENT_CHALLENGE_JOINED, EVENT_HABIT_MILESTONE,
    EVENT_REMINDER_DUE,
};
use serde_json::Value;

use crate::bus::DomainEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub kind: NotificationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub dedup_key: Option<String>,
}

fn text<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn number(payload: &Value, key: &str) -> i64 {
    payload.get(key).and_then(Value::as_i64).unwrap_or_default()
}

/// Render the notification for `event`, or `None` if the event type does
/// not produce one.
pub fn render(event: &DomainEvent) -> Option<RenderedNotification> {
    let (kind, priority) = classify_event(&event.event_type)?;
    let p = &event.payload;

    let (title, message, action_url, dedup_key) = match event.event_type.as_str() {
        EVENT_ACHIEVEMENT_UNLOCKED => (
            format!("Achievement unlocked: {}", text(p, "name")),
            format!(
                "{} {} (+{} points)",
                text(p, "icon"),
                text(p, "description"),
                number(p, "points")
            ),
            Some("/achievements".to_string()),
            Some(format!("achievement:{}", text(p, "achievement_id"))),
        ),
        EVENT_HABIT_MILESTONE => {
            let habit_id = number(p, "habit_id");
            let days = number(p, "days");
            (
                format!("{days}-day streak!"),
                format!("You've kept \"{}\" going for {days} days.", text(p, "title")),
                Some(format!("/habits/{habit_id}")),
                Some(format!("milestone:{habit_id}:{days}")),
            )
        }
        EVENT_REMINDER_DUE => (
            "Reminder".to_string(),
            text(p, "message").to_string(),
            p.get("habit_id")
                .and_then(Value::as_i64)
                .map(|id| format!("/habits/{id}")),
            Some(format!(
                "reminder:{}:{}",
                number(p, "reminder_id"),
                text(p, "date")
            )),
        ),
        EVENT_BUDDY_REQUESTED => (
            "New buddy request".to_string(),
            format!(
                "{} wants to be your accountability buddy (match score {}).",
                text(p, "display_name"),
                number(p, "score")
            ),
            Some("/buddies".to_string()),
            Some(format!("buddy-request:{}", number(p, "match_id"))),
        ),
        EVENT_BUDDY_ACCEPTED => (
            "Buddy request accepted".to_string(),
            format!("{} is now your accountability buddy.", text(p, "display_name")),
            Some("/buddies".to_string()),
            Some(format!("buddy-accepted:{}", number(p, "match_id"))),
        ),
        EVENT_CHALLENGE_JOINED => (
            "New challenge participant".to_string(),
            format!(
                "{} joined \"{}\".",
                text(p, "display_name"),
                text(p, "title")
            ),
            Some(format!("/challenges/{}", number(p, "challenge_id"))),
            None,
        ),
        _ => return None,
    };

    Some(RenderedNotification {
        kind,
        priority,
        title,
        message,
        action_url,
        dedup_key,
    })
}
