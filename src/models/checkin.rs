use serde::{Deserialize, Serialize};

use super::enums::ExerciseType;

/// Day-level facts collected during one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyCheckIn {
    pub sleep_hours: Option<f64>,
    pub water_glasses: Option<i64>,
    pub exercise_minutes: Option<i64>,
    pub exercise_type: Option<ExerciseType>,
    pub mood_score: Option<i64>,
    pub stress_score: Option<i64>,
    pub energy_score: Option<i64>,
    pub social_hours: Option<f64>,
    pub alcohol_units: Option<i64>,
    pub smoking_today: Option<bool>,
    #[serde(default)]
    pub symptoms: Vec<String>,
}
