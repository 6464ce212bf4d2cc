//! User level derived from cumulative points.
//!
//! Levels are linear: every level spans [`POINTS_PER_LEVEL`] points. Level
//! `n` is reached at `100 * (n - 1)` points and ends at `100 * n`, the value
//! reported as `next_level_points`. Growing bands (100, 200, 300, ...) were
//! considered and rejected; they cannot produce `250 -> {3, 50, 300}`, which
//! clients rely on.

use serde::Serialize;

pub const POINTS_PER_LEVEL: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserLevel {
    pub level: i64,
    /// Points earned inside the current level.
    pub current_level_points: i64,
    /// Cumulative points at which the next level starts.
    pub next_level_points: i64,
}

impl UserLevel {
    /// Fraction of the current level completed, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        self.current_level_points as f64 / POINTS_PER_LEVEL as f64
    }
}

/// Compute the level for a point total. Negative totals count as zero.
pub fn calculate_user_level(points: i64) -> UserLevel {
    let points = points.max(0);
    let level = points / POINTS_PER_LEVEL + 1;
    UserLevel {
        level,
        current_level_points: points % POINTS_PER_LEVEL,
        next_level_points: level.saturating_mul(POINTS_PER_LEVEL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(level: i64, current: i64, next: i64) -> UserLevel {
        UserLevel {
            level,
            current_level_points: current,
            next_level_points: next,
        }
    }

    #[test]
    fn two_hundred_fifty_points_is_level_three() {
        assert_eq!(calculate_user_level(250), level(3, 50, 300));
    }

    #[test]
    fn zero_points_is_level_one() {
        assert_eq!(calculate_user_level(0), level(1, 0, 100));
    }

    #[test]
    fn just_below_and_at_boundary() {
        assert_eq!(calculate_user_level(99), level(1, 99, 100));
        assert_eq!(calculate_user_level(100), level(2, 0, 200));
    }

    #[test]
    fn large_totals() {
        assert_eq!(calculate_user_level(100_000), level(1001, 0, 100_100));
    }

    #[test]
    fn maximum_points_do_not_overflow() {
        let top = calculate_user_level(i64::MAX);
        assert_eq!(top.level, i64::MAX / POINTS_PER_LEVEL + 1);
        assert_eq!(top.current_level_points, i64::MAX % POINTS_PER_LEVEL);
        assert_eq!(top.next_level_points, i64::MAX);
    }

    #[test]
    fn negative_points_clamp_to_zero() {
        assert_eq!(calculate_user_level(-40), calculate_user_level(0));
    }

    #[test]
    fn progress_fraction() {
        assert_eq!(calculate_user_level(250).progress(), 0.5);
    }
}
