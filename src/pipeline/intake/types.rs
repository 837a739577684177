//! Records exchanged between the intake stages.
//!
//! Request → Service → ExtractionResult → UpdateApplier → TurnResult.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FactValue, FieldId, IssueType, JourneyMode, Turn, TurnStatus};

// ═══════════════════════════════════════════
// Outbound request
// ═══════════════════════════════════════════

/// Everything the narrative extraction service is told about a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// Conversation tail, oldest first.
    pub recent_turns: Vec<Turn>,
    /// Facts already held, in declaration order.
    pub known_facts: Vec<(FieldId, FactValue)>,
    /// Facts still needed, highest priority first.
    pub missing: Vec<FieldId>,
    /// `None` while the session is not yet classified.
    pub issue_type: Option<IssueType>,
    pub journey_mode: Option<JourneyMode>,
    pub user_name: String,
    /// Number of user turns so far, including the current one.
    pub turn_count: usize,
}

// ═══════════════════════════════════════════
// Service response
// ═══════════════════════════════════════════

/// Leniently parsed service reply. Values in `extracted` are raw and still
/// need validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub issue_type: Option<IssueType>,
    pub extracted: serde_json::Map<String, serde_json::Value>,
    pub status: TurnStatus,
    pub reply: String,
}

impl ExtractionResult {
    pub fn new(reply: &str) -> Self {
        Self {
            issue_type: None,
            extracted: serde_json::Map::new(),
            status: TurnStatus::Continue,
            reply: reply.to_string(),
        }
    }
}

// ═══════════════════════════════════════════
// Turn outcome
// ═══════════════════════════════════════════

/// What `run_turn` hands back to the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub status: TurnStatus,
    pub reply: Option<String>,
    /// Values written this turn, after validation.
    pub extracted_updates: BTreeMap<FieldId, FactValue>,
    pub issue_type: Option<IssueType>,
}

impl TurnResult {
    pub fn complete(issue_type: Option<IssueType>) -> Self {
        Self {
            status: TurnStatus::Complete,
            reply: None,
            extracted_updates: BTreeMap::new(),
            issue_type,
        }
    }

    pub fn ask(reply: String, issue_type: Option<IssueType>) -> Self {
        Self {
            status: TurnStatus::Continue,
            reply: Some(reply),
            extracted_updates: BTreeMap::new(),
            issue_type,
        }
    }

    pub fn with_updates(mut self, updates: BTreeMap<FieldId, FactValue>) -> Self {
        self.extracted_updates = updates;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.status == TurnStatus::Complete
    }
}

// ═══════════════════════════════════════════
// Update application report
// ═══════════════════════════════════════════

/// Why a single extracted entry was not written.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    UnknownField,
    Unparseable,
    OutOfRange,
    Unrecognized,
    Empty,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownField => "unknown_field",
            Self::Unparseable => "unparseable",
            Self::OutOfRange => "out_of_range",
            Self::Unrecognized => "unrecognized",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub key: String,
    pub raw: serde_json::Value,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: BTreeMap<FieldId, FactValue>,
    pub rejected: Vec<Rejection>,
}

impl ApplyReport {
    /// One-line `key (reason)` list for the per-turn log.
    pub fn rejected_summary(&self) -> String {
        self.rejected
            .iter()
            .map(|r| format!("{} ({})", r.key, r.reason.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
