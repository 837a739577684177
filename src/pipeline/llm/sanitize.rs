//! Post-generation cleanup of raw model output.
//!
//! Gemma-family models can leak thinking blocks and `<unusedN>` tokenizer
//! artifacts into the response, which break JSON extraction downstream.

use std::sync::LazyLock;

use regex::Regex;

static UNUSED_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<unused\d+>").expect("valid regex"));

/// Strip model-specific artifacts from raw LLM output.
///
/// 1. A leading `<unusedN>thought\n` block is removed up to and including
///    the marker line.
/// 2. Any remaining `<unusedN>` tokens are dropped.
/// 3. Surrounding whitespace is trimmed.
pub fn sanitize_llm_output(raw: &str) -> String {
    let mut text = raw;

    if let Some(idx) = text.find("<unused") {
        if let Some(thought_offset) = text[idx..].find("thought\n") {
            text = &text[idx + thought_offset + "thought\n".len()..];
        }
    }

    UNUSED_TOKEN_RE.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_thinking_prefix() {
        let raw = "<unused94>thought\n{\"status\": \"CONTINUE\"}";
        assert_eq!(sanitize_llm_output(raw), "{\"status\": \"CONTINUE\"}");
    }

    #[test]
    fn strips_stray_tokens() {
        let raw = "{\"reply\": \"ok\"}<unused3> ";
        assert_eq!(sanitize_llm_output(raw), "{\"reply\": \"ok\"}");
    }

    #[test]
    fn clean_json_unchanged() {
        let raw = r#"{"extracted": {}, "reply": "How did you sleep?"}"#;
        assert_eq!(sanitize_llm_output(raw), raw);
    }

    #[test]
    fn whitespace_only_returns_empty() {
        assert_eq!(sanitize_llm_output("  \n "), "");
    }
}
