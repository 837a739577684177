//! Conversational intake engine.
//!
//! Turns a free-flowing conversation into a typed set of wellness facts,
//! asking only for what matters to the user's concern and stopping once
//! enough has been gathered.
//!
//! ## Flow per user turn
//! ```text
//! journey mode → classify → priority list → pre-check
//!   → extraction service → apply updates → post-check → TurnResult
//!                 └─ failure → fallback responder
//! ```
//!
//! Three traits mark the seams: `NarrativeExtractionService`,
//! `SessionStore` and `QuestionPicker`.

pub mod apply;
pub mod classify;
pub mod completion;
pub mod error;
pub mod fallback;
pub mod numeric;
pub mod orchestrator;
pub mod parser;
pub mod priority;
pub mod prompt;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

pub use apply::apply_updates;
pub use classify::{classify_issue, select_journey_mode};
pub use completion::{collected, is_complete, missing, threshold, MANDATORY_FIELDS};
pub use error::IntakeError;
pub use fallback::{FallbackResponder, FixedPicker, SeededPicker};
pub use numeric::{parse_float, parse_int};
pub use orchestrator::{active_list, DialogueOrchestrator};
pub use parser::parse_extraction_response;
pub use priority::{priority_list, PRIORITY_TABLE_VERSION};
pub use service::OllamaExtractionService;
pub use store::{InMemorySessionStore, SqliteSessionStore};
pub use traits::*;
pub use types::*;
