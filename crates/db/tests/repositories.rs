//! Repository integration tests against a migrated database.

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use habitforge_core::achievements;
use habitforge_core::habits::{Frequency, HabitCategory, HabitStatus, HabitType};
use habitforge_core::notifications::{NotificationKind, Priority};
use habitforge_core::rope::rope_for;
use habitforge_core::streaks::{new_milestones, record_completion};
use habitforge_core::tracking::FiveFactors;
use habitforge_db::models::challenge::{CreateChallenge, JoinOutcome};
use habitforge_db::models::habit::{CreateHabit, HabitProgress};
use habitforge_db::models::notification::CreateNotification;
use habitforge_db::models::reminder::NewReminder;
use habitforge_db::models::tracking::CreateTrackingEntry;
use habitforge_db::models::user::{CreateUser, User};
use habitforge_db::repositories::{
    AchievementRepo, ChallengeRepo, HabitRepo, NotificationRepo, ReminderRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn new_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: "Test User".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_habit(title: &str) -> CreateHabit {
    CreateHabit {
        title: title.to_string(),
        description: None,
        category: HabitCategory::Fitness,
        habit_type: HabitType::Build,
        frequency: Frequency::Daily,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "dup@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dup@example.com".to_string(),
            display_name: "Other".to_string(),
            password_hash: "x".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
async fn new_user_gets_default_preferences(pool: PgPool) {
    let user = new_user(&pool, "prefs@example.com").await;
    assert!(user.preferences.notifications_enabled);
    assert_eq!(user.points, 0);
    assert!(user.badges.is_empty());
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn unlocking_twice_awards_points_once(pool: PgPool) {
    let user = new_user(&pool, "ach@example.com").await;
    let week = achievements::find("streak_7").unwrap();
    let meta = serde_json::json!({ "max_streak": 7 });

    let first = AchievementRepo::unlock(&pool, user.id, week, &meta).await.unwrap();
    assert!(first.is_some());
    let second = AchievementRepo::unlock(&pool, user.id, week, &meta).await.unwrap();
    assert!(second.is_none());

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.points, week.points);
    assert_eq!(user.badges, vec![week.icon.to_string()]);
    assert_eq!(AchievementRepo::count_for_user(&pool, user.id).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Habits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn completion_updates_counters_and_guards_stale_writes(pool: PgPool) {
    let user = new_user(&pool, "habit@example.com").await;
    let habit = HabitRepo::create(&pool, user.id, &new_habit("Run")).await.unwrap();
    assert_eq!(habit.rope.0, rope_for(0, 0.0));

    let today = day(2024, 5, 1);
    let streak = record_completion(habit.streak_state(), today).unwrap();
    let progress = HabitProgress {
        streak,
        completion_rate: 1.0,
        rope: rope_for(streak.current_streak, 1.0),
        milestones: new_milestones(streak.current_streak, &habit.milestones.0, today),
    };
    let entry = CreateTrackingEntry {
        habit_id: habit.id,
        user_id: user.id,
        completed_on: today,
        factors: FiveFactors {
            location: Some("Park".into()),
            ..FiveFactors::default()
        },
        notes: None,
        duration_minutes: Some(30),
    };

    let (updated, tracked) = HabitRepo::record_completion(&pool, &habit, &progress, &entry)
        .await
        .unwrap()
        .expect("first completion is written");
    assert_eq!(updated.current_streak, 1);
    assert_eq!(updated.last_completed_on, Some(today));
    assert_eq!(tracked.location.as_deref(), Some("Park"));

    // `habit` still carries the pre-completion watermark.
    let stale = HabitRepo::record_completion(&pool, &habit, &progress, &entry)
        .await
        .unwrap();
    assert!(stale.is_none());

    let stats = HabitRepo::stats_for_user(&pool, user.id, today).await.unwrap();
    assert_eq!(stats.habit_count, 1);
    assert_eq!(stats.completed_today, 1);
    assert_eq!(stats.max_streak, 1);
    assert!((stats.today_completion_rate() - 1.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "./migrations")]
async fn archived_habits_are_hidden_by_default(pool: PgPool) {
    let user = new_user(&pool, "archive@example.com").await;
    let keep = HabitRepo::create(&pool, user.id, &new_habit("Read")).await.unwrap();
    let gone = HabitRepo::create(&pool, user.id, &new_habit("Smoke less")).await.unwrap();
    HabitRepo::set_status(&pool, gone.id, user.id, HabitStatus::Archived)
        .await
        .unwrap();

    let visible = HabitRepo::list_for_user(&pool, user.id, None, false).await.unwrap();
    assert_eq!(visible.iter().map(|h| h.id).collect::<Vec<_>>(), vec![keep.id]);

    let all = HabitRepo::list_for_user(&pool, user.id, None, true).await.unwrap();
    assert_eq!(all.len(), 2);

    let archived = HabitRepo::list_for_user(&pool, user.id, Some(HabitStatus::Archived), false)
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
}

// ---------------------------------------------------------------------------
// Notifications and reminders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn notification_dedup_key_is_unique_per_user(pool: PgPool) {
    let user = new_user(&pool, "notify@example.com").await;
    let input = CreateNotification {
        user_id: user.id,
        kind: NotificationKind::Reminder,
        priority: Priority::Normal,
        title: "Reminder".into(),
        message: "Stretch".into(),
        action_url: None,
        scheduled_for: None,
        dedup_key: Some("reminder:1:2024-05-01".into()),
    };

    assert!(NotificationRepo::create(&pool, &input).await.unwrap().is_some());
    assert!(NotificationRepo::create(&pool, &input).await.unwrap().is_none());
    assert_eq!(NotificationRepo::unread_count(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn reminder_watermark_advances_once_per_day(pool: PgPool) {
    let user = new_user(&pool, "remind@example.com").await;
    let reminder = ReminderRepo::create(
        &pool,
        &NewReminder {
            user_id: user.id,
            habit_id: None,
            time_of_day: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            days_of_week: &[],
            message: "Drink water",
            utc_offset_minutes: 0,
        },
    )
    .await
    .unwrap();

    let today = day(2024, 5, 1);
    assert!(ReminderRepo::try_advance_watermark(&pool, reminder.id, today).await.unwrap());
    assert!(!ReminderRepo::try_advance_watermark(&pool, reminder.id, today).await.unwrap());
    assert!(ReminderRepo::try_advance_watermark(&pool, reminder.id, day(2024, 5, 2))
        .await
        .unwrap());

    let enabled = ReminderRepo::list_enabled(&pool).await.unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].reminder.last_fired_on, Some(day(2024, 5, 2)));
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn challenge_join_respects_capacity(pool: PgPool) {
    let creator = new_user(&pool, "creator@example.com").await;
    let second = new_user(&pool, "second@example.com").await;
    let third = new_user(&pool, "third@example.com").await;

    let challenge = ChallengeRepo::create(
        &pool,
        &CreateChallenge {
            creator_id: creator.id,
            title: "Two-person plank".into(),
            description: None,
            category: "fitness".into(),
            duration_days: 7,
            start_date: day(2024, 5, 1),
            end_date: day(2024, 5, 7),
            difficulty: "easy".into(),
            status: "active".into(),
            max_participants: 2,
        },
    )
    .await
    .unwrap();
    assert_eq!(challenge.participant_count, 1);

    let today = day(2024, 5, 2);
    assert_eq!(
        ChallengeRepo::join(&pool, challenge.id, second.id, today).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(
        ChallengeRepo::join(&pool, challenge.id, second.id, today).await.unwrap(),
        JoinOutcome::AlreadyJoined
    );
    assert_eq!(
        ChallengeRepo::join(&pool, challenge.id, third.id, today).await.unwrap(),
        JoinOutcome::Full
    );
    assert_matches!(
        ChallengeRepo::join(&pool, challenge.id, third.id, day(2024, 6, 1)).await.unwrap(),
        JoinOutcome::NotJoinable(_)
    );
}
