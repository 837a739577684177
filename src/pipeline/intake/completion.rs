//! CompletionPolicy: when has enough been collected to stop asking.

use crate::models::{ConversationState, FieldId};

/// Minimal day-level set used before a priority list is active and by the
/// fallback responder.
pub const MANDATORY_FIELDS: &[FieldId] = &[
    FieldId::SleepHours,
    FieldId::WaterGlasses,
    FieldId::MoodScore,
    FieldId::EnergyScore,
    FieldId::StressScore,
    FieldId::ExerciseMinutes,
];

const MIN_THRESHOLD: usize = 8;

/// `max(8, ceil(0.75 * len))`.
pub fn threshold(list: &[FieldId]) -> usize {
    MIN_THRESHOLD.max((list.len() * 3).div_ceil(4))
}

pub fn collected(state: &ConversationState, list: &[FieldId]) -> usize {
    list.iter().filter(|f| state.is_collected(**f)).count()
}

/// Uncollected entries of `list`, in list order.
pub fn missing(state: &ConversationState, list: &[FieldId]) -> Vec<FieldId> {
    list.iter().copied().filter(|f| !state.is_collected(*f)).collect()
}

/// Verdict against an active priority list.
pub fn is_complete(state: &ConversationState, list: &[FieldId], service_done: bool) -> bool {
    service_done || collected(state, list) >= threshold(list)
}

/// Verdict before classification: every mandatory fact must be present.
pub fn mandatory_complete(state: &ConversationState, service_done: bool) -> bool {
    service_done || missing(state, MANDATORY_FIELDS).is_empty()
}
