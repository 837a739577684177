use crate::config::IntakeConfig;
use crate::models::{ConversationState, FieldId, InterviewPhase, IssueType, JourneyMode, TurnStatus};

use super::apply::apply_updates;
use super::classify::{classify_issue, select_journey_mode};
use super::completion::{is_complete, mandatory_complete, missing, MANDATORY_FIELDS};
use super::error::IntakeError;
use super::fallback::FallbackResponder;
use super::priority::priority_list;
use super::service::OllamaExtractionService;
use super::traits::NarrativeExtractionService;
use super::types::{ExtractionRequest, ExtractionResult, TurnResult};

/// User turns needed before keyword classification runs.
const CLASSIFY_AFTER_TURNS: usize = 2;

/// Drives one intake turn at a time:
/// journey → classify → pre-check → extract → apply → post-check.
///
/// Holds no per-session state; everything lives on `ConversationState`, so a
/// single orchestrator can serve any number of sessions.
pub struct DialogueOrchestrator {
    service: Option<Box<dyn NarrativeExtractionService>>,
    fallback: FallbackResponder,
    recent_turns: usize,
}

impl DialogueOrchestrator {
    pub fn new(service: Box<dyn NarrativeExtractionService>) -> Self {
        Self {
            service: Some(service),
            fallback: FallbackResponder::default(),
            recent_turns: IntakeConfig::default().recent_turns,
        }
    }

    /// Fallback-only orchestrator, for hosts without a local model.
    pub fn without_service() -> Self {
        Self {
            service: None,
            fallback: FallbackResponder::default(),
            recent_turns: IntakeConfig::default().recent_turns,
        }
    }

    /// Orchestrator backed by the Ollama instance in `config`.
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(Box::new(OllamaExtractionService::from_config(config)))
            .with_recent_turns(config.recent_turns)
    }

    pub fn with_fallback(mut self, fallback: FallbackResponder) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_recent_turns(mut self, n: usize) -> Self {
        self.recent_turns = n;
        self
    }

    /// Process one user message. Always returns a well-formed result; service
    /// failures degrade to the fallback responder.
    pub fn run_turn(&self, state: &mut ConversationState, user_text: &str) -> TurnResult {
        state.add_user_turn(user_text);

        if state.phase == InterviewPhase::Complete {
            return TurnResult::complete(state.issue_type);
        }

        if state.phase == InterviewPhase::Classifying {
            if state.journey_mode.is_none() {
                if let Some(mode) = select_journey_mode(user_text) {
                    tracing::info!(journey_mode = %mode, "Journey mode selected");
                    state.journey_mode = Some(mode);
                }
            }
            if state.user_turn_count() >= CLASSIFY_AFTER_TURNS {
                self.classify(state);
            }
        }

        if let Some(list) = active_list(state) {
            if is_complete(state, list, false) {
                tracing::info!("Enough facts already collected, completing");
                return finish(state);
            }
        }

        let request = self.build_request(state);
        let outcome = match &self.service {
            Some(service) => service.extract(&request),
            None => Err(IntakeError::ServiceUnavailable(
                "no extraction service configured".to_string(),
            )),
        };

        let result = match outcome {
            Ok(extraction) => self.apply_extraction(state, extraction),
            Err(e) => {
                tracing::warn!(error = %e, "Extraction failed, using fallback");
                let result = self.fallback.respond(state);
                if result.is_complete() {
                    state.phase = InterviewPhase::Complete;
                }
                result
            }
        };

        if let Some(reply) = &result.reply {
            state.add_agent_turn(reply);
        }
        result
    }

    fn classify(&self, state: &mut ConversationState) {
        let issue = if state.journey_mode == Some(JourneyMode::BuildPlan) {
            IssueType::BuildPlan
        } else {
            classify_issue(&state.user_text())
        };
        state.assign_issue_type(issue);
        state.phase = InterviewPhase::Collecting;
        tracing::debug!(
            issue_type = ?state.issue_type,
            list_len = ?active_list(state).map(<[FieldId]>::len),
            "Priority list active"
        );
    }

    fn build_request(&self, state: &ConversationState) -> ExtractionRequest {
        let known_facts = FieldId::all()
            .iter()
            .filter(|f| state.is_collected(**f))
            .filter_map(|f| state.fact(*f).map(|v| (*f, v)))
            .collect();

        let still_needed = match active_list(state) {
            Some(list) => missing(state, list),
            None => missing(state, MANDATORY_FIELDS),
        };

        ExtractionRequest {
            recent_turns: state.recent_turns(self.recent_turns).to_vec(),
            known_facts,
            missing: still_needed,
            issue_type: state.issue_type,
            journey_mode: state.journey_mode,
            user_name: state.profile.name.clone(),
            turn_count: state.user_turn_count(),
        }
    }

    fn apply_extraction(
        &self,
        state: &mut ConversationState,
        extraction: ExtractionResult,
    ) -> TurnResult {
        if state.phase == InterviewPhase::Classifying
            && state.journey_mode != Some(JourneyMode::BuildPlan)
        {
            if let Some(issue) = extraction.issue_type.filter(|i| *i != IssueType::BuildPlan) {
                if state.assign_issue_type(issue) {
                    tracing::info!(issue_type = %issue, "Adopted service classification");
                    state.phase = InterviewPhase::Collecting;
                }
            }
        }

        let report = apply_updates(state, &extraction.extracted);
        if !report.rejected.is_empty() {
            tracing::info!(
                applied = report.applied.len(),
                rejected = report.rejected.len(),
                fields = %report.rejected_summary(),
                "Extraction values rejected this turn"
            );
        }
        let service_done = extraction.status == TurnStatus::Complete;

        let done = match active_list(state) {
            Some(list) => is_complete(state, list, service_done),
            None => mandatory_complete(state, service_done),
        };

        if done {
            finish(state).with_updates(report.applied)
        } else {
            TurnResult::ask(extraction.reply, state.issue_type).with_updates(report.applied)
        }
    }
}

/// Priority list selected by the session's (sticky) issue type.
pub fn active_list(state: &ConversationState) -> Option<&'static [FieldId]> {
    state.issue_type.map(priority_list)
}

fn finish(state: &mut ConversationState) -> TurnResult {
    state.phase = InterviewPhase::Complete;
    tracing::info!(issue_type = ?state.issue_type, "Intake complete");
    TurnResult::complete(state.issue_type)
}
