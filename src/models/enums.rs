use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(IssueType {
    MentalFatigue => "mental_fatigue",
    Emotional => "emotional",
    PhysicalFatigue => "physical_fatigue",
    SleepIssues => "sleep_issues",
    GeneralWellness => "general_wellness",
    BuildPlan => "build_plan",
});

str_enum!(JourneyMode {
    QuickCheck => "quick_check",
    DeepDive => "deep_dive",
    BuildPlan => "build_plan",
});

str_enum!(InterviewPhase {
    Classifying => "classifying",
    Collecting => "collecting",
    Complete => "complete",
});

str_enum!(TurnStatus {
    Continue => "CONTINUE",
    Complete => "COMPLETE",
});

str_enum!(MessageRole {
    User => "user",
    Agent => "agent",
});

str_enum!(BiologicalSex {
    Male => "male",
    Female => "female",
});

str_enum!(ExerciseType {
    Cardio => "cardio",
    Strength => "strength",
    Both => "both",
    None => "none",
});

str_enum!(DietaryPreference {
    Vegetarian => "vegetarian",
    Vegan => "vegan",
    Pescatarian => "pescatarian",
    Omnivore => "omnivore",
});

str_enum!(FieldId {
    Age => "age",
    Sex => "sex",
    HeightCm => "height_cm",
    WeightKg => "weight_kg",
    Origin => "origin",
    Religion => "religion",
    DietaryPreference => "dietary_preference",
    SleepHours => "sleep_hours",
    WaterGlasses => "water_glasses",
    MoodScore => "mood_score",
    EnergyScore => "energy_score",
    StressScore => "stress_score",
    ExerciseMinutes => "exercise_minutes",
    ExerciseType => "exercise_type",
    SocialHours => "social_hours",
    AlcoholUnits => "alcohol_units",
    SmokingToday => "smoking_today",
});

impl Default for DietaryPreference {
    fn default() -> Self {
        Self::Omnivore
    }
}

impl Default for InterviewPhase {
    fn default() -> Self {
        Self::Classifying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn issue_type_round_trips_through_str() {
        for issue in [
            IssueType::MentalFatigue,
            IssueType::Emotional,
            IssueType::PhysicalFatigue,
            IssueType::SleepIssues,
            IssueType::GeneralWellness,
            IssueType::BuildPlan,
        ] {
            assert_eq!(IssueType::from_str(issue.as_str()).unwrap(), issue);
        }
    }

    #[test]
    fn unknown_value_reports_enum_name() {
        let err = JourneyMode::from_str("marathon").unwrap_err();
        match err {
            DatabaseError::InvalidEnum { field, value } => {
                assert_eq!(field, "JourneyMode");
                assert_eq!(value, "marathon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&TurnStatus::Complete).unwrap();
        assert_eq!(json, "\"COMPLETE\"");
        let parsed: ExerciseType = serde_json::from_str("\"strength\"").unwrap();
        assert_eq!(parsed, ExerciseType::Strength);
    }

    #[test]
    fn dietary_preference_defaults_to_omnivore() {
        assert_eq!(DietaryPreference::default(), DietaryPreference::Omnivore);
    }
}
