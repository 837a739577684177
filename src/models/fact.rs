//! Fact identifiers, their declared kinds, and validated fact values.

use serde::{Deserialize, Serialize};

use super::enums::FieldId;

/// Declared type and bounds of a collectable fact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Integer with an inclusive range.
    Int { min: i64, max: i64 },
    /// Float with an inclusive range.
    Float { min: f64, max: f64 },
    /// Closed vocabulary, normalized through a synonym table.
    Choice,
    /// Yes/no.
    Flag,
    /// Free text, accepted verbatim after trimming.
    Text,
}

/// A validated value as written into the profile or check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Flag(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for FactValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(true) => f.write_str("yes"),
            Self::Flag(false) => f.write_str("no"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl FieldId {
    pub fn all() -> &'static [FieldId] {
        &[
            Self::Age,
            Self::Sex,
            Self::HeightCm,
            Self::WeightKg,
            Self::Origin,
            Self::Religion,
            Self::DietaryPreference,
            Self::SleepHours,
            Self::WaterGlasses,
            Self::MoodScore,
            Self::EnergyScore,
            Self::StressScore,
            Self::ExerciseMinutes,
            Self::ExerciseType,
            Self::SocialHours,
            Self::AlcoholUnits,
            Self::SmokingToday,
        ]
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Int { min: 10, max: 120 },
            Self::HeightCm => FieldKind::Float { min: 100.0, max: 250.0 },
            Self::WeightKg => FieldKind::Float { min: 30.0, max: 300.0 },
            Self::SleepHours => FieldKind::Float { min: 1.0, max: 12.0 },
            Self::SocialHours => FieldKind::Float { min: 0.0, max: 24.0 },
            Self::WaterGlasses => FieldKind::Int { min: 0, max: 20 },
            Self::MoodScore | Self::EnergyScore => FieldKind::Int { min: 1, max: 5 },
            Self::StressScore => FieldKind::Int { min: 1, max: 10 },
            Self::ExerciseMinutes => FieldKind::Int { min: 0, max: 300 },
            Self::AlcoholUnits => FieldKind::Int { min: 0, max: 20 },
            Self::Sex | Self::ExerciseType | Self::DietaryPreference => FieldKind::Choice,
            Self::SmokingToday => FieldKind::Flag,
            Self::Origin | Self::Religion => FieldKind::Text,
        }
    }

    /// Long-lived profile fact (as opposed to a day-level check-in fact).
    pub fn is_profile(&self) -> bool {
        matches!(
            self,
            Self::Age
                | Self::Sex
                | Self::HeightCm
                | Self::WeightKg
                | Self::Origin
                | Self::Religion
                | Self::DietaryPreference
        )
    }

    /// How the fact is described to the extraction service when asking for it.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::Age => "age in years (10-120)",
            Self::Sex => "biological sex (male/female)",
            Self::HeightCm => "height in cm (100-250)",
            Self::WeightKg => "weight in kg (30-300)",
            Self::Origin => "country or region of origin",
            Self::Religion => "religious dietary context (e.g. Hindu, Muslim, Jain, Jewish, none)",
            Self::DietaryPreference => "dietary preference (vegetarian/vegan/pescatarian/omnivore)",
            Self::SleepHours => "hours slept last night (1-12)",
            Self::WaterGlasses => "glasses of water today (0-20)",
            Self::MoodScore => "mood right now (1=low, 5=great)",
            Self::EnergyScore => "energy level (1=exhausted, 5=energized)",
            Self::StressScore => "stress level (1=calm, 10=overwhelmed)",
            Self::ExerciseMinutes => "minutes of movement today (0-300)",
            Self::ExerciseType => "type of exercise (cardio/strength/both/none)",
            Self::SocialHours => "hours of meaningful social time today (0-24)",
            Self::AlcoholUnits => "alcohol units today (0-20, 1 unit = one drink)",
            Self::SmokingToday => "smoked today (yes/no)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_field_once() {
        let all = FieldId::all();
        assert_eq!(all.len(), 17);
        let mut sorted = all.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 17);
    }

    #[test]
    fn numeric_ranges_match_documented_bounds() {
        assert_eq!(FieldId::StressScore.kind(), FieldKind::Int { min: 1, max: 10 });
        assert_eq!(FieldId::MoodScore.kind(), FieldKind::Int { min: 1, max: 5 });
        assert_eq!(FieldId::SleepHours.kind(), FieldKind::Float { min: 1.0, max: 12.0 });
        assert_eq!(FieldId::ExerciseMinutes.kind(), FieldKind::Int { min: 0, max: 300 });
        assert_eq!(FieldId::HeightCm.kind(), FieldKind::Float { min: 100.0, max: 250.0 });
    }

    #[test]
    fn profile_fields_are_flagged() {
        assert!(FieldId::Age.is_profile());
        assert!(FieldId::DietaryPreference.is_profile());
        assert!(!FieldId::SleepHours.is_profile());
        assert!(!FieldId::SmokingToday.is_profile());
    }

    #[test]
    fn fact_value_display() {
        assert_eq!(FactValue::Flag(true).to_string(), "yes");
        assert_eq!(FactValue::Float(5.5).to_string(), "5.5");
        assert_eq!(FactValue::Int(8).to_string(), "8");
    }
}
