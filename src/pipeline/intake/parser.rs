//! Lenient parsing of the extraction service's structured reply.
//!
//! Only a reply that holds no JSON object at all is an error. Missing or
//! mistyped members fall back to safe defaults.

use std::str::FromStr;

use serde_json::Value;

use crate::models::{IssueType, TurnStatus};

use super::error::IntakeError;
use super::types::ExtractionResult;

pub const DEFAULT_REPLY: &str = "Tell me more.";

/// Locate the JSON payload in a model response: a ```json fence, a plain
/// fence holding an object/array, or the outermost `{...}` span.
pub fn extract_json_block(response: &str) -> Result<&str, IntakeError> {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Ok(after_fence[..end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            let block = after_fence[..end].trim();
            if block.starts_with('{') || block.starts_with('[') {
                return Ok(block);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return Ok(&trimmed[start..=end]);
        }
    }

    Err(IntakeError::JsonParsing(
        "No JSON block found in LLM response".to_string(),
    ))
}

/// Parse a raw service response into an `ExtractionResult`.
pub fn parse_extraction_response(response: &str) -> Result<ExtractionResult, IntakeError> {
    let block = extract_json_block(response)?;
    let value: Value =
        serde_json::from_str(block).map_err(|e| IntakeError::JsonParsing(e.to_string()))?;

    let Value::Object(mut record) = value else {
        return Err(IntakeError::MalformedResponse(
            "top-level value is not an object".to_string(),
        ));
    };

    let issue_type = record
        .get("issue_type")
        .and_then(Value::as_str)
        .and_then(|s| IssueType::from_str(s.trim()).ok());

    let extracted = match record.remove("extracted") {
        Some(Value::Object(map)) => map,
        Some(other) => {
            tracing::debug!(found = %other, "Ignoring non-object 'extracted'");
            serde_json::Map::new()
        }
        None => serde_json::Map::new(),
    };

    let status = record
        .get("status")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_uppercase())
        .and_then(|s| TurnStatus::from_str(&s).ok())
        .unwrap_or(TurnStatus::Continue);

    let reply = record
        .get("reply")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REPLY)
        .to_string();

    Ok(ExtractionResult {
        issue_type,
        extracted,
        status,
        reply,
    })
}
