//! UpdateApplier: validate raw extracted values and merge the survivors.
//!
//! Nothing here fails. A value that does not parse, falls outside its range
//! or is not in the vocabulary is logged and left out of the merge.

use std::str::FromStr;

use serde_json::Value;

use crate::models::{ConversationState, FactValue, FieldId, FieldKind};

use super::numeric::{parse_float, parse_int, value_text};
use super::types::{ApplyReport, RejectReason, Rejection};

const SEX_SYNONYMS: &[(&str, &str)] = &[
    ("male", "male"),
    ("m", "male"),
    ("man", "male"),
    ("female", "female"),
    ("f", "female"),
    ("woman", "female"),
];

const EXERCISE_SYNONYMS: &[(&str, &str)] = &[
    ("cardio", "cardio"),
    ("aerobic", "cardio"),
    ("running", "cardio"),
    ("walking", "cardio"),
    ("cycling", "cardio"),
    ("swimming", "cardio"),
    ("strength", "strength"),
    ("weights", "strength"),
    ("weightlifting", "strength"),
    ("resistance", "strength"),
    ("both", "both"),
    ("mixed", "both"),
    ("none", "none"),
    ("no", "none"),
    ("nothing", "none"),
    ("rest", "none"),
];

const DIET_SYNONYMS: &[(&str, &str)] = &[
    ("vegetarian", "vegetarian"),
    ("veggie", "vegetarian"),
    ("veg", "vegetarian"),
    ("vegan", "vegan"),
    ("plant-based", "vegan"),
    ("plant based", "vegan"),
    ("pescatarian", "pescatarian"),
    ("pescetarian", "pescatarian"),
    ("omnivore", "omnivore"),
    ("non-veg", "omnivore"),
    ("non-vegetarian", "omnivore"),
    ("everything", "omnivore"),
];

/// Validate every entry of `extracted` and write the ones that pass.
pub fn apply_updates(
    state: &mut ConversationState,
    extracted: &serde_json::Map<String, Value>,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (key, raw) in extracted {
        if raw.is_null() {
            continue;
        }

        let field = match FieldId::from_str(key) {
            Ok(field) => field,
            Err(_) => {
                tracing::debug!(key = %key, "Ignoring unknown extracted field");
                report.rejected.push(reject(key, raw, RejectReason::UnknownField));
                continue;
            }
        };

        match validate(field, raw) {
            Ok(value) => {
                if state.set_fact(field, value.clone()) {
                    tracing::debug!(field = %field, value = %value, "Collected fact");
                    report.applied.insert(field, value);
                } else {
                    report.rejected.push(reject(key, raw, RejectReason::Unrecognized));
                }
            }
            Err(reason) => {
                match reason {
                    RejectReason::OutOfRange => {
                        tracing::warn!(field = %field, raw = %raw, "Out of range value rejected");
                    }
                    _ => {
                        tracing::debug!(field = %field, raw = %raw, reason = ?reason, "Value rejected");
                    }
                }
                report.rejected.push(reject(key, raw, reason));
            }
        }
    }

    report
}

/// Turn one raw value into a typed fact for `field`.
pub fn validate(field: FieldId, raw: &Value) -> Result<FactValue, RejectReason> {
    match field.kind() {
        FieldKind::Int { min, max } => {
            let v = value_text(raw)
                .and_then(|t| parse_int(&t))
                .ok_or(RejectReason::Unparseable)?;
            if (min..=max).contains(&v) {
                Ok(FactValue::Int(v))
            } else {
                Err(RejectReason::OutOfRange)
            }
        }
        FieldKind::Float { min, max } => {
            let v = value_text(raw)
                .and_then(|t| parse_float(&t))
                .ok_or(RejectReason::Unparseable)?;
            if (min..=max).contains(&v) {
                Ok(FactValue::Float(v))
            } else {
                Err(RejectReason::OutOfRange)
            }
        }
        FieldKind::Choice => {
            let table = match field {
                FieldId::Sex => SEX_SYNONYMS,
                FieldId::ExerciseType => EXERCISE_SYNONYMS,
                _ => DIET_SYNONYMS,
            };
            let token = value_text(raw).ok_or(RejectReason::Unrecognized)?;
            let token = token.trim().to_lowercase();
            table
                .iter()
                .find(|(synonym, _)| *synonym == token)
                .map(|(_, canonical)| FactValue::Text(canonical.to_string()))
                .ok_or(RejectReason::Unrecognized)
        }
        FieldKind::Flag => match raw {
            Value::Bool(b) => Ok(FactValue::Flag(*b)),
            _ => {
                let token = value_text(raw).ok_or(RejectReason::Unrecognized)?;
                match token.trim().to_lowercase().as_str() {
                    "yes" | "true" | "1" => Ok(FactValue::Flag(true)),
                    "no" | "false" | "0" => Ok(FactValue::Flag(false)),
                    _ => Err(RejectReason::Unrecognized),
                }
            }
        },
        FieldKind::Text => {
            let text = value_text(raw).ok_or(RejectReason::Unrecognized)?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(RejectReason::Empty)
            } else {
                Ok(FactValue::Text(trimmed.to_string()))
            }
        }
    }
}

fn reject(key: &str, raw: &Value, reason: RejectReason) -> Rejection {
    Rejection {
        key: key.to_string(),
        raw: raw.clone(),
        reason,
    }
}
