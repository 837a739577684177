//! Error types for the intake pipeline.
//!
//! None of these ever reach the caller of `run_turn`; the orchestrator turns
//! every service failure into a fallback turn. Stores and the registry do
//! surface them.

use thiserror::Error;

use crate::db::DatabaseError;
use crate::pipeline::llm::LlmError;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("Extraction service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session lock poisoned: {0}")]
    LockPoisoned(String),
}
