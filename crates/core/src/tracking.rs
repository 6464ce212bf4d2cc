//! Tracking-entry "five factors" and trigger analysis.
//!
//! Each completion may record the context it happened in: location,
//! emotional state, people present, time of day and the preceding action.
//! [`analyze`] counts how often each value occurs so users can spot their
//! triggers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a single factor value.
pub const MAX_FACTOR_LEN: usize = 100;
/// Maximum length of free-form notes.
pub const MAX_NOTES_LEN: usize = 2000;
/// Longest duration accepted for a single entry (one day).
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

/// The context recorded with a completion. All factors are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiveFactors {
    pub location: Option<String>,
    pub emotional_state: Option<String>,
    pub people_present: Option<String>,
    pub time_of_day: Option<String>,
    pub preceding_action: Option<String>,
}

impl FiveFactors {
    fn named(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("location", self.location.as_deref()),
            ("emotional_state", self.emotional_state.as_deref()),
            ("people_present", self.people_present.as_deref()),
            ("time_of_day", self.time_of_day.as_deref()),
            ("preceding_action", self.preceding_action.as_deref()),
        ]
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in self.named() {
            if value.is_some_and(|v| v.chars().count() > MAX_FACTOR_LEN) {
                return Err(CoreError::Validation(format!(
                    "{name} must be at most {MAX_FACTOR_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

pub fn validate_entry(
    factors: &FiveFactors,
    notes: Option<&str>,
    duration_minutes: Option<i32>,
) -> Result<(), CoreError> {
    factors.validate()?;
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(CoreError::Validation(format!(
            "Notes must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    if let Some(minutes) = duration_minutes {
        if !(0..=MAX_DURATION_MINUTES).contains(&minutes) {
            return Err(CoreError::Validation(format!(
                "duration_minutes must be between 0 and {MAX_DURATION_MINUTES}"
            )));
        }
    }
    Ok(())
}

/// How often one value of a factor occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Value frequencies for one factor, most common first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorBreakdown {
    pub factor: &'static str,
    pub values: Vec<ValueCount>,
}

/// Count factor values across entries.
///
/// Values are compared case-insensitively after trimming; the first
/// spelling seen is reported. Ties are ordered alphabetically.
pub fn analyze<'a, I>(entries: I) -> Vec<FactorBreakdown>
where
    I: IntoIterator<Item = &'a FiveFactors>,
{
    let mut counts: Vec<HashMap<String, (String, usize)>> = vec![HashMap::new(); 5];

    for entry in entries {
        for (slot, (_, value)) in counts.iter_mut().zip(entry.named()) {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            slot.entry(value.to_lowercase())
                .or_insert_with(|| (value.to_string(), 0))
                .1 += 1;
        }
    }

    let names = FiveFactors::default().named().map(|(name, _)| name);
    names
        .into_iter()
        .zip(counts)
        .map(|(factor, slot)| {
            let mut values: Vec<ValueCount> = slot
                .into_values()
                .map(|(value, count)| ValueCount { value, count })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            FactorBreakdown { factor, values }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(location: &str, emotion: Option<&str>) -> FiveFactors {
        FiveFactors {
            location: Some(location.to_string()),
            emotional_state: emotion.map(str::to_string),
            ..FiveFactors::default()
        }
    }

    #[test]
    fn analysis_counts_and_orders_values() {
        let entries = vec![
            entry("Home", Some("calm")),
            entry("home ", Some("stressed")),
            entry("Office", Some("calm")),
            entry("HOME", None),
        ];
        let breakdown = analyze(&entries);
        assert_eq!(breakdown.len(), 5);

        let location = &breakdown[0];
        assert_eq!(location.factor, "location");
        assert_eq!(
            location.values,
            vec![
                ValueCount { value: "Home".into(), count: 3 },
                ValueCount { value: "Office".into(), count: 1 },
            ]
        );

        let emotion = &breakdown[1];
        assert_eq!(emotion.values[0], ValueCount { value: "calm".into(), count: 2 });
        assert!(breakdown[2].values.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_breakdowns() {
        let breakdown = analyze(&Vec::<FiveFactors>::new());
        assert!(breakdown.iter().all(|b| b.values.is_empty()));
    }

    #[test]
    fn entry_validation() {
        let ok = entry("Gym", Some("energized"));
        assert!(validate_entry(&ok, Some("felt great"), Some(45)).is_ok());

        let long = entry(&"x".repeat(MAX_FACTOR_LEN + 1), None);
        assert!(validate_entry(&long, None, None).is_err());
        assert!(validate_entry(&ok, None, Some(-1)).is_err());
    }
}
