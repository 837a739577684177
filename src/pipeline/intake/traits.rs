//! Trait seams of the intake pipeline.
//!
//! - NarrativeExtractionService: turns a conversation tail into raw facts + a reply
//! - SessionStore: persistence of whole `ConversationState` records
//! - QuestionPicker: choice function behind the fallback's canned questions

use crate::models::ConversationState;

use super::error::IntakeError;
use super::types::{ExtractionRequest, ExtractionResult};

/// External extractor consulted once per collecting turn.
///
/// Implementations may fail or return garbage; the orchestrator treats any
/// `Err` as "use the fallback" and never retries.
pub trait NarrativeExtractionService: Send + Sync {
    fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult, IntakeError>;
}

/// Holds session records between turns. The engine reads and writes through
/// it but owns no retention policy.
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when no session exists under `id`.
    fn load(&self, id: &str) -> Result<Option<ConversationState>, IntakeError>;

    /// Insert or overwrite.
    fn save(&self, id: &str, state: &ConversationState) -> Result<(), IntakeError>;

    /// Returns whether a session was removed.
    fn delete(&self, id: &str) -> Result<bool, IntakeError>;

    fn list_ids(&self) -> Result<Vec<String>, IntakeError>;
}

/// Picks an index in `0..len`. Callers never pass `len == 0`.
pub trait QuestionPicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}
