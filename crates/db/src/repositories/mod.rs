//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod achievement_repo;
pub mod buddy_repo;
pub mod challenge_repo;
pub mod habit_repo;
pub mod notification_repo;
pub mod reminder_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod tracking_repo;
pub mod user_repo;

pub use achievement_repo::AchievementRepo;
pub use buddy_repo::BuddyRepo;
pub use challenge_repo::ChallengeRepo;
pub use habit_repo::HabitRepo;
pub use notification_repo::NotificationRepo;
pub use reminder_repo::ReminderRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use tracking_repo::TrackingRepo;
pub use user_repo::UserRepo;
