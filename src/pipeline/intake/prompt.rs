use crate::models::{FieldId, JourneyMode, MessageRole};

use super::priority::issue_focus;
use super::types::ExtractionRequest;

pub const INTAKE_SYSTEM_PROMPT: &str = r#"
You are a warm, focused wellness companion running a short check-in. You ask
ONLY about what is relevant to the user's concern, one question at a time.

RULES:
1. Never re-ask a fact listed under KNOWN FACTS. Ask a follow-up instead.
2. Extract ONLY values the user actually stated. Do not guess.
3. Copy numbers as the user gave them ("5-6", "8 out of 10"); they are parsed later.
4. Stay within sleep, hydration, movement, mood, stress, energy, social time,
   alcohol and smoking. For medical concerns, suggest seeing a professional.
5. Output a single JSON object and nothing else.
"#;

/// Build the per-turn extraction prompt.
pub fn render_prompt(request: &ExtractionRequest) -> String {
    let issue = match request.issue_type {
        Some(issue) => format!("ISSUE: {}", issue_focus(issue)),
        None => "ISSUE: not yet classified. Classify it from the conversation.".to_string(),
    };

    format!(
        r#"USER: {name} (turn {turn})
{style}
{issue}

KNOWN FACTS:
{known}

STILL NEEDED (highest priority first):
{missing}

CONVERSATION:
{history}

Respond with this JSON structure:
{{
  "issue_type": "mental_fatigue | emotional | physical_fatigue | sleep_issues | general_wellness | null",
  "extracted": {{"<field name from STILL NEEDED>": "<value as the user said it>"}},
  "status": "CONTINUE | COMPLETE",
  "reply": "your next short message to the user"
}}"#,
        name = request.user_name,
        turn = request.turn_count,
        style = journey_style(request.journey_mode),
        known = render_known(request),
        missing = render_missing(&request.missing),
        history = render_history(request),
    )
}

fn journey_style(mode: Option<JourneyMode>) -> &'static str {
    match mode {
        Some(JourneyMode::QuickCheck) => "MODE: quick check. Be brief, no explanations.",
        Some(JourneyMode::DeepDive) => {
            "MODE: deep dive. Explain in one clause why each question matters."
        }
        Some(JourneyMode::BuildPlan) => {
            "MODE: build plan. Be thorough; every answer feeds a personal plan."
        }
        None => "MODE: not chosen. Keep it conversational.",
    }
}

fn render_known(request: &ExtractionRequest) -> String {
    if request.known_facts.is_empty() {
        return "- nothing yet".to_string();
    }
    request
        .known_facts
        .iter()
        .map(|(field, value)| format!("- {field}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_missing(missing: &[FieldId]) -> String {
    if missing.is_empty() {
        return "- nothing, wrap up".to_string();
    }
    missing
        .iter()
        .map(|field| format!("- {field}: {}", field.prompt_hint()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_history(request: &ExtractionRequest) -> String {
    request
        .recent_turns
        .iter()
        .map(|turn| {
            let who = match turn.role {
                MessageRole::User => "user",
                MessageRole::Agent => "assistant",
            };
            format!("{who}: {}", turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
