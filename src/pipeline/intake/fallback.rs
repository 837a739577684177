//! FallbackResponder: keeps the conversation going when the extraction
//! service is missing or failing. It only asks; it never parses answers.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ConversationState, FieldId};

use super::completion::{missing, MANDATORY_FIELDS};
use super::traits::QuestionPicker;
use super::types::TurnResult;

const OPENING_QUESTIONS: &[&str] = &[
    "I hear you. To help you best, how many hours of sleep did you get last night?",
    "That sounds tough. Let's check your basics. How is your energy level right now (1-5)?",
    "Got it. Quick check: How much water have you had today?",
];

/// User turns answered with an opening question before canned field
/// questions take over.
const OPENING_TURNS: usize = 2;

fn field_question(field: FieldId) -> &'static str {
    match field {
        FieldId::SleepHours => "How'd you sleep last night?",
        FieldId::WaterGlasses => "Have you been drinking enough water today?",
        FieldId::MoodScore => "How are you feeling overall?",
        FieldId::EnergyScore => "Energy levels holding up?",
        FieldId::StressScore => "Stress been manageable lately?",
        FieldId::ExerciseMinutes => "Get any movement in today?",
        _ => "How are things going?",
    }
}

/// Random choice from an `StdRng`, seedable for reproducible sessions.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl QuestionPicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(_) => 0,
        }
    }
}

/// Always the same slot, clamped to the list.
pub struct FixedPicker(pub usize);

impl QuestionPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

pub struct FallbackResponder {
    picker: Box<dyn QuestionPicker>,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(Box::new(SeededPicker::from_entropy()))
    }
}

impl FallbackResponder {
    pub fn new(picker: Box<dyn QuestionPicker>) -> Self {
        Self { picker }
    }

    /// Picker choice clamped into `items`, which must be non-empty.
    fn pick<T: Copy>(&self, items: &[T]) -> T {
        let idx = self.picker.pick(items.len());
        items[idx.min(items.len() - 1)]
    }

    /// Degraded turn under the normal contract. Never touches `state`.
    pub fn respond(&self, state: &ConversationState) -> TurnResult {
        if state.user_turn_count() <= OPENING_TURNS {
            let question = self.pick(OPENING_QUESTIONS);
            return TurnResult::ask(question.to_string(), state.issue_type);
        }

        let missing = missing(state, MANDATORY_FIELDS);
        if missing.is_empty() {
            return TurnResult::complete(state.issue_type);
        }

        let field = self.pick(&missing);
        tracing::debug!(field = %field, "Fallback asking for mandatory fact");
        TurnResult::ask(field_question(field).to_string(), state.issue_type)
    }
}
