//! Accountability-buddy match scoring.
//!
//! A candidate's score is the weighted overlap of habit categories,
//! preferred check-in time, timezone and the candidate's accountability
//! score, capped at [`MAX_SCORE`].

use std::collections::HashSet;

use serde::Serialize;

use crate::account::PreferredTime;
use crate::habits::HabitCategory;
use crate::types::DbId;

pub const MAX_SCORE: i32 = 100;
/// Points per habit category both users track.
pub const CATEGORY_WEIGHT: i32 = 20;
pub const PREFERRED_TIME_WEIGHT: i32 = 30;
pub const TIMEZONE_WEIGHT: i32 = 25;
/// Weight applied to the candidate's accountability score (0-100).
pub const ACCOUNTABILITY_WEIGHT: i32 = 25;
/// Maximum number of candidates considered per match request.
pub const CANDIDATE_LIMIT: i64 = 10;

/// The attributes a match is scored on.
#[derive(Debug, Clone)]
pub struct MatchProfile {
    pub user_id: DbId,
    pub categories: Vec<HabitCategory>,
    pub preferred_time: PreferredTime,
    pub timezone: Option<String>,
    pub accountability_score: i32,
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub user_id: DbId,
    pub score: i32,
    pub shared_categories: Vec<HabitCategory>,
}

/// Score `candidate` for `seeker`. Always within `0..=MAX_SCORE`.
pub fn match_score(seeker: &MatchProfile, candidate: &MatchProfile) -> i32 {
    let shared = shared_categories(seeker, candidate).len() as i32;

    let time_match = seeker.preferred_time == candidate.preferred_time;
    let tz_match = match (&seeker.timezone, &candidate.timezone) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };
    let accountability = candidate.accountability_score.clamp(0, 100);

    let score = CATEGORY_WEIGHT * shared
        + if time_match { PREFERRED_TIME_WEIGHT } else { 0 }
        + if tz_match { TIMEZONE_WEIGHT } else { 0 }
        + ACCOUNTABILITY_WEIGHT * accountability / 100;

    score.clamp(0, MAX_SCORE)
}

fn shared_categories(seeker: &MatchProfile, candidate: &MatchProfile) -> Vec<HabitCategory> {
    let theirs: HashSet<HabitCategory> = candidate.categories.iter().copied().collect();
    let mut seen = HashSet::new();
    seeker
        .categories
        .iter()
        .copied()
        .filter(|c| theirs.contains(c) && seen.insert(*c))
        .collect()
}

/// Score every candidate (skipping the seeker) and sort by descending score.
///
/// Ties keep the input order.
pub fn rank_candidates(seeker: &MatchProfile, candidates: &[MatchProfile]) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter(|c| c.user_id != seeker.user_id)
        .map(|c| ScoredCandidate {
            user_id: c.user_id,
            score: match_score(seeker, c),
            shared_categories: shared_categories(seeker, c),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        user_id: DbId,
        categories: &[HabitCategory],
        time: PreferredTime,
        tz: Option<&str>,
        accountability: i32,
    ) -> MatchProfile {
        MatchProfile {
            user_id,
            categories: categories.to_vec(),
            preferred_time: time,
            timezone: tz.map(str::to_string),
            accountability_score: accountability,
        }
    }

    #[test]
    fn weighted_components_add_up() {
        let seeker = profile(
            1,
            &[HabitCategory::Fitness, HabitCategory::Learning],
            PreferredTime::Morning,
            Some("Europe/Berlin"),
            50,
        );
        let candidate = profile(
            2,
            &[HabitCategory::Fitness],
            PreferredTime::Morning,
            Some("europe/berlin"),
            40,
        );
        // 20 * 1 + 30 + 25 + 25 * 40 / 100
        assert_eq!(match_score(&seeker, &candidate), 85);
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let all = HabitCategory::ALL;
        let seeker = profile(1, all, PreferredTime::Evening, Some("UTC"), 100);
        let candidate = profile(2, all, PreferredTime::Evening, Some("UTC"), 100);
        assert_eq!(match_score(&seeker, &candidate), MAX_SCORE);
    }

    #[test]
    fn out_of_range_accountability_stays_in_bounds() {
        let seeker = profile(1, &[], PreferredTime::Anytime, None, 0);
        let low = profile(2, &[], PreferredTime::Morning, None, -500);
        let high = profile(3, &[], PreferredTime::Morning, None, 10_000);
        assert_eq!(match_score(&seeker, &low), 0);
        assert_eq!(match_score(&seeker, &high), ACCOUNTABILITY_WEIGHT);
    }

    #[test]
    fn score_bounds_hold_across_inputs() {
        let times = [
            PreferredTime::Morning,
            PreferredTime::Afternoon,
            PreferredTime::Evening,
            PreferredTime::Anytime,
        ];
        let seeker = profile(1, HabitCategory::ALL, PreferredTime::Morning, Some("UTC"), 0);
        for (i, time) in times.iter().enumerate() {
            for accountability in [-10, 0, 33, 100, 250] {
                let cats = &HabitCategory::ALL[..i * 2];
                let candidate = profile(2, cats, *time, Some("UTC"), accountability);
                let score = match_score(&seeker, &candidate);
                assert!((0..=MAX_SCORE).contains(&score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn duplicate_categories_count_once() {
        let seeker = profile(
            1,
            &[HabitCategory::Health, HabitCategory::Health],
            PreferredTime::Anytime,
            None,
            0,
        );
        let candidate = profile(2, &[HabitCategory::Health], PreferredTime::Morning, None, 0);
        assert_eq!(match_score(&seeker, &candidate), CATEGORY_WEIGHT);
    }

    #[test]
    fn ranking_sorts_descending_and_skips_self() {
        let seeker = profile(1, &[HabitCategory::Health], PreferredTime::Morning, None, 0);
        let candidates = vec![
            profile(1, &[HabitCategory::Health], PreferredTime::Morning, None, 100),
            profile(2, &[], PreferredTime::Evening, None, 10),
            profile(3, &[HabitCategory::Health], PreferredTime::Morning, None, 80),
        ];
        let ranked = rank_candidates(&seeker, &candidates);
        let ids: Vec<DbId> = ranked.iter().map(|c| c.user_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(ranked[0].shared_categories, vec![HabitCategory::Health]);
    }
}
