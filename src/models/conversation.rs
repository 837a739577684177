use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checkin::DailyCheckIn;
use super::enums::{
    BiologicalSex, DietaryPreference, ExerciseType, FieldId, InterviewPhase, IssueType,
    JourneyMode, MessageRole,
};
use super::fact::FactValue;
use super::profile::UserProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything one intake conversation owns.
///
/// Classification lives here rather than on the orchestrator, so a single
/// orchestrator can drive any number of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub turns: Vec<Turn>,
    pub profile: UserProfile,
    pub checkin: DailyCheckIn,
    pub issue_type: Option<IssueType>,
    pub journey_mode: Option<JourneyMode>,
    #[serde(default)]
    pub phase: InterviewPhase,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::with_profile(UserProfile::default())
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            turns: Vec::new(),
            profile,
            checkin: DailyCheckIn::default(),
            issue_type: None,
            journey_mode: None,
            phase: InterviewPhase::Classifying,
        }
    }

    pub fn add_user_turn(&mut self, text: &str) {
        self.push_turn(MessageRole::User, text);
    }

    pub fn add_agent_turn(&mut self, text: &str) {
        self.push_turn(MessageRole::Agent, text);
    }

    fn push_turn(&mut self, role: MessageRole, text: &str) {
        self.turns.push(Turn {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn user_turn_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == MessageRole::User).count()
    }

    /// All user-authored text, space-joined in order.
    pub fn user_text(&self) -> String {
        self.turns
            .iter()
            .filter(|t| t.role == MessageRole::User)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == MessageRole::User)
            .map(|t| t.text.as_str())
    }

    /// The last `n` turns of either role.
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Sticky assignment: returns false (and changes nothing) when an issue
    /// type is already set.
    pub fn assign_issue_type(&mut self, issue: IssueType) -> bool {
        if self.issue_type.is_some() {
            return false;
        }
        self.issue_type = Some(issue);
        true
    }

    /// Start over: history, check-in and classification are cleared, the
    /// long-lived profile is kept.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.checkin = DailyCheckIn::default();
        self.issue_type = None;
        self.journey_mode = None;
        self.phase = InterviewPhase::Classifying;
    }

    // ── Fact store ──────────────────────────────────────────

    /// Current value of a fact, if it holds one.
    pub fn fact(&self, field: FieldId) -> Option<FactValue> {
        let p = &self.profile;
        let c = &self.checkin;
        match field {
            FieldId::Age => p.age.map(FactValue::Int),
            FieldId::Sex => p.sex.map(|s| FactValue::Text(s.as_str().to_string())),
            FieldId::HeightCm => p.height_cm.map(FactValue::Float),
            FieldId::WeightKg => p.weight_kg.map(FactValue::Float),
            FieldId::Origin => p.origin.clone().map(FactValue::Text),
            FieldId::Religion => p.religion.clone().map(FactValue::Text),
            FieldId::DietaryPreference => {
                Some(FactValue::Text(p.dietary_preference.as_str().to_string()))
            }
            FieldId::SleepHours => c.sleep_hours.map(FactValue::Float),
            FieldId::WaterGlasses => c.water_glasses.map(FactValue::Int),
            FieldId::MoodScore => c.mood_score.map(FactValue::Int),
            FieldId::EnergyScore => c.energy_score.map(FactValue::Int),
            FieldId::StressScore => c.stress_score.map(FactValue::Int),
            FieldId::ExerciseMinutes => c.exercise_minutes.map(FactValue::Int),
            FieldId::ExerciseType => c
                .exercise_type
                .map(|e| FactValue::Text(e.as_str().to_string())),
            FieldId::SocialHours => c.social_hours.map(FactValue::Float),
            FieldId::AlcoholUnits => c.alcohol_units.map(FactValue::Int),
            FieldId::SmokingToday => c.smoking_today.map(FactValue::Flag),
        }
    }

    /// Whether a fact counts as collected. Dietary preference is collected
    /// only once it differs from its omnivore default.
    pub fn is_collected(&self, field: FieldId) -> bool {
        match field {
            FieldId::DietaryPreference => {
                self.profile.dietary_preference != DietaryPreference::Omnivore
            }
            other => self.fact(other).is_some(),
        }
    }

    /// Write an already-validated value. Returns false when the value's shape
    /// does not fit the field.
    pub fn set_fact(&mut self, field: FieldId, value: FactValue) -> bool {
        let p = &mut self.profile;
        let c = &mut self.checkin;
        match (field, value) {
            (FieldId::Age, FactValue::Int(v)) => p.age = Some(v),
            (FieldId::Sex, FactValue::Text(v)) => match BiologicalSex::from_str(&v) {
                Ok(sex) => p.sex = Some(sex),
                Err(_) => return false,
            },
            (FieldId::HeightCm, FactValue::Float(v)) => p.height_cm = Some(v),
            (FieldId::WeightKg, FactValue::Float(v)) => p.weight_kg = Some(v),
            (FieldId::Origin, FactValue::Text(v)) => p.origin = Some(v),
            (FieldId::Religion, FactValue::Text(v)) => p.religion = Some(v),
            (FieldId::DietaryPreference, FactValue::Text(v)) => {
                match DietaryPreference::from_str(&v) {
                    Ok(pref) => p.dietary_preference = pref,
                    Err(_) => return false,
                }
            }
            (FieldId::SleepHours, FactValue::Float(v)) => c.sleep_hours = Some(v),
            (FieldId::WaterGlasses, FactValue::Int(v)) => c.water_glasses = Some(v),
            (FieldId::MoodScore, FactValue::Int(v)) => c.mood_score = Some(v),
            (FieldId::EnergyScore, FactValue::Int(v)) => c.energy_score = Some(v),
            (FieldId::StressScore, FactValue::Int(v)) => c.stress_score = Some(v),
            (FieldId::ExerciseMinutes, FactValue::Int(v)) => c.exercise_minutes = Some(v),
            (FieldId::ExerciseType, FactValue::Text(v)) => match ExerciseType::from_str(&v) {
                Ok(kind) => c.exercise_type = Some(kind),
                Err(_) => return false,
            },
            (FieldId::SocialHours, FactValue::Float(v)) => c.social_hours = Some(v),
            (FieldId::AlcoholUnits, FactValue::Int(v)) => c.alcohol_units = Some(v),
            (FieldId::SmokingToday, FactValue::Flag(v)) => c.smoking_today = Some(v),
            _ => return false,
        }
        true
    }
}
