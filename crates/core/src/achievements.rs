//! Achievement catalog and unlock evaluation.
//!
//! The catalog is static and lives in code; only unlocks are persisted
//! (`user_achievements`). [`evaluate`] is pure: it returns the catalog
//! entries that newly qualify for a stats snapshot, skipping ids already
//! unlocked, so calling it twice with the same inputs after persisting the
//! first result yields nothing.

use std::collections::HashSet;

use serde::Serialize;

define_text_enum! {
    /// Achievement grouping shown in the UI.
    AchievementCategory ("achievement category") {
        Streak = "streak",
        Habits = "habits",
        Consistency = "consistency",
        Special = "special",
    }
}

define_text_enum! {
    /// Achievement rarity tier.
    Rarity ("rarity") {
        Common = "common",
        Uncommon = "uncommon",
        Rare = "rare",
        Epic = "epic",
        Legendary = "legendary",
    }
}

define_text_enum! {
    /// The statistic a criterion is evaluated against.
    CriterionKind ("criterion kind") {
        Streak = "streak",
        TotalHabits = "total_habits",
        CompletionRate = "completion_rate",
        SpecialEvent = "special_event",
    }
}

define_text_enum! {
    /// How the observed value is compared with the threshold.
    Comparison ("comparison") {
        GreaterOrEqual = "gte",
        Equal = "eq",
        LessThan = "lt",
    }
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::GreaterOrEqual => value >= threshold,
            Comparison::Equal => value == threshold,
            Comparison::LessThan => value < threshold,
        }
    }
}

/// Unlock criterion of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub threshold: f64,
    pub comparison: Comparison,
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub rarity: Rarity,
    pub points: i64,
    pub criterion: Criterion,
}

/// The stats an unlock check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserStatsSnapshot {
    /// Longest current streak across the user's active habits.
    pub max_streak: i32,
    /// Number of non-archived habits.
    pub habit_count: i64,
    /// Fraction of active habits completed today, in `[0, 1]`.
    pub today_completion_rate: f64,
    /// Local hour of day at the time of the check, `0..=23`.
    pub hour_of_day: u32,
}

const fn criterion(kind: CriterionKind, threshold: f64, comparison: Comparison) -> Criterion {
    Criterion {
        kind,
        threshold,
        comparison,
    }
}

/// The full achievement catalog.
pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: "first_habit",
        name: "First Step",
        description: "Create your first habit",
        icon: "🌱",
        category: AchievementCategory::Habits,
        rarity: Rarity::Common,
        points: 10,
        criterion: criterion(CriterionKind::TotalHabits, 1.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "habit_collector",
        name: "Habit Collector",
        description: "Track five habits at once",
        icon: "📚",
        category: AchievementCategory::Habits,
        rarity: Rarity::Uncommon,
        points: 25,
        criterion: criterion(CriterionKind::TotalHabits, 5.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "habit_architect",
        name: "Habit Architect",
        description: "Track ten habits at once",
        icon: "🏗️",
        category: AchievementCategory::Habits,
        rarity: Rarity::Rare,
        points: 50,
        criterion: criterion(CriterionKind::TotalHabits, 10.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "streak_3",
        name: "Getting Started",
        description: "Reach a 3-day streak",
        icon: "🔥",
        category: AchievementCategory::Streak,
        rarity: Rarity::Common,
        points: 15,
        criterion: criterion(CriterionKind::Streak, 3.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "streak_7",
        name: "Week Warrior",
        description: "Reach a 7-day streak",
        icon: "⚔️",
        category: AchievementCategory::Streak,
        rarity: Rarity::Uncommon,
        points: 50,
        criterion: criterion(CriterionKind::Streak, 7.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "streak_30",
        name: "Monthly Master",
        description: "Reach a 30-day streak",
        icon: "🏆",
        category: AchievementCategory::Streak,
        rarity: Rarity::Rare,
        points: 150,
        criterion: criterion(CriterionKind::Streak, 30.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "streak_100",
        name: "Centurion",
        description: "Reach a 100-day streak",
        icon: "💯",
        category: AchievementCategory::Streak,
        rarity: Rarity::Epic,
        points: 500,
        criterion: criterion(CriterionKind::Streak, 100.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "streak_365",
        name: "Year of Iron",
        description: "Reach a 365-day streak",
        icon: "👑",
        category: AchievementCategory::Streak,
        rarity: Rarity::Legendary,
        points: 2000,
        criterion: criterion(CriterionKind::Streak, 365.0, Comparison::GreaterOrEqual),
    },
    Achievement {
        id: "perfect_day",
        name: "Perfect Day",
        description: "Complete every active habit in a single day",
        icon: "⭐",
        category: AchievementCategory::Consistency,
        rarity: Rarity::Uncommon,
        points: 30,
        criterion: criterion(CriterionKind::CompletionRate, 1.0, Comparison::Equal),
    },
    Achievement {
        id: "early_bird",
        name: "Early Bird",
        description: "Check in before 6 AM",
        icon: "🐦",
        category: AchievementCategory::Special,
        rarity: Rarity::Rare,
        points: 40,
        criterion: criterion(CriterionKind::SpecialEvent, 6.0, Comparison::LessThan),
    },
    Achievement {
        id: "night_owl",
        name: "Night Owl",
        description: "Check in at or after 10 PM",
        icon: "🦉",
        category: AchievementCategory::Special,
        rarity: Rarity::Rare,
        points: 40,
        criterion: criterion(CriterionKind::SpecialEvent, 22.0, Comparison::GreaterOrEqual),
    },
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Whether a single criterion is met by the snapshot.
pub fn criterion_met(criterion: &Criterion, stats: &UserStatsSnapshot) -> bool {
    let value = match criterion.kind {
        CriterionKind::Streak => f64::from(stats.max_streak),
        CriterionKind::TotalHabits => stats.habit_count as f64,
        CriterionKind::CompletionRate => stats.today_completion_rate,
        CriterionKind::SpecialEvent => f64::from(stats.hour_of_day),
    };
    criterion.comparison.holds(value, criterion.threshold)
}

/// Catalog entries that qualify for `stats` and are not in `unlocked`.
pub fn evaluate<'a, I>(stats: &UserStatsSnapshot, unlocked: I) -> Vec<&'static Achievement>
where
    I: IntoIterator<Item = &'a str>,
{
    let unlocked: HashSet<&str> = unlocked.into_iter().collect();
    CATALOG
        .iter()
        .filter(|a| !unlocked.contains(a.id))
        .filter(|a| criterion_met(&a.criterion, stats))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn stats(max_streak: i32, habit_count: i64, rate: f64, hour: u32) -> UserStatsSnapshot {
        UserStatsSnapshot {
            max_streak,
            habit_count,
            today_completion_rate: rate,
            hour_of_day: hour,
        }
    }

    fn ids(list: &[&'static Achievement]) -> Vec<&'static str> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn catalog_ids_are_unique() {
        let unique: HashSet<&str> = CATALOG.iter().map(|a| a.id).collect();
        assert_eq!(unique.len(), CATALOG.len());
    }

    #[test]
    fn streak_of_six_does_not_unlock_week_warrior() {
        let unlocked = evaluate(&stats(6, 0, 0.0, 12), NONE);
        assert!(!ids(&unlocked).contains(&"streak_7"));
        assert!(ids(&unlocked).contains(&"streak_3"));
    }

    #[test]
    fn streak_of_seven_unlocks_week_warrior() {
        let unlocked = evaluate(&stats(7, 0, 0.0, 12), NONE);
        assert!(ids(&unlocked).contains(&"streak_7"));
        assert!(!ids(&unlocked).contains(&"streak_30"));
    }

    #[test]
    fn already_unlocked_entries_are_skipped() {
        let snapshot = stats(7, 1, 0.0, 12);
        let first = evaluate(&snapshot, NONE);
        assert!(!first.is_empty());

        let second = evaluate(&snapshot, ids(&first));
        assert!(second.is_empty(), "second check must not re-award");
    }

    #[test]
    fn habit_count_thresholds() {
        assert!(ids(&evaluate(&stats(0, 1, 0.0, 12), NONE)).contains(&"first_habit"));
        assert!(!ids(&evaluate(&stats(0, 4, 0.0, 12), NONE)).contains(&"habit_collector"));
        assert!(ids(&evaluate(&stats(0, 5, 0.0, 12), NONE)).contains(&"habit_collector"));
    }

    #[test]
    fn perfect_day_requires_full_completion() {
        assert!(!ids(&evaluate(&stats(0, 0, 0.99, 12), NONE)).contains(&"perfect_day"));
        assert!(ids(&evaluate(&stats(0, 0, 1.0, 12), NONE)).contains(&"perfect_day"));
    }

    #[test]
    fn special_events_follow_hour_of_day() {
        let early = ids(&evaluate(&stats(0, 0, 0.0, 5), NONE));
        assert!(early.contains(&"early_bird"));
        assert!(!early.contains(&"night_owl"));

        assert!(!ids(&evaluate(&stats(0, 0, 0.0, 6), NONE)).contains(&"early_bird"));
        assert!(ids(&evaluate(&stats(0, 0, 0.0, 22), NONE)).contains(&"night_owl"));
        assert!(!ids(&evaluate(&stats(0, 0, 0.0, 21), NONE)).contains(&"night_owl"));
    }

    #[test]
    fn find_returns_catalog_entry() {
        let entry = find("streak_7").expect("streak_7 is in the catalog");
        assert_eq!(entry.points, 50);
        assert!(find("does_not_exist").is_none());
    }
}
