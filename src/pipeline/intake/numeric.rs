//! NumericExtractor: tolerant parsing of human-entered numbers.
//!
//! Grammar, in precedence order:
//! 1. `"a out of b"` keeps `a`
//! 2. `"a or b"` returns the mean of the first number of each part
//! 3. `"a/b"` keeps `a`
//! 4. `"a-b"` (or `"a to b"`) returns the mean of the sides that are bare numbers
//! 5. otherwise the first `\d+\.?\d*` run anywhere in the text
//!
//! No digits anywhere means "unparseable" (`None`), never zero.

use std::sync::LazyLock;

use regex::Regex;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));

/// Parse into an integer. The float intermediate is rounded half away from
/// zero, so `"4 or 5"` gives 5 and `"2.5"` gives 3.
pub fn parse_int(text: &str) -> Option<i64> {
    parse_float(text).map(|v| v.round() as i64)
}

/// Parse into a float, unrounded.
pub fn parse_float(text: &str) -> Option<f64> {
    let lowered = text.trim().to_lowercase();
    let mut s = lowered.as_str();

    if let Some((left, _)) = s.split_once(" out of ") {
        s = left.trim();
    }

    if s.contains(" or ") {
        let nums: Vec<f64> = s.split(" or ").filter_map(first_number).collect();
        if let Some(mean) = mean(&nums) {
            return Some(mean);
        }
    }

    if let Some((left, _)) = s.split_once('/') {
        s = left.trim();
    }

    let ranged = s.replace(" to ", "-");
    if ranged.contains('-') && !ranged.starts_with('-') {
        let nums: Vec<f64> = ranged.split('-').filter_map(bare_number).collect();
        if let Some(mean) = mean(&nums) {
            return Some(mean);
        }
    }

    first_number(s)
}

/// Render a raw JSON value as a token for the numeric grammar. Booleans,
/// null and containers are not numeric.
pub fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().trim_end_matches('.').parse().ok())
}

/// A side of a range counts only if it is digits with optional dots.
fn bare_number(side: &str) -> Option<f64> {
    let side = side.trim();
    if side.is_empty() || !side.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    side.parse().ok()
}

fn mean(nums: &[f64]) -> Option<f64> {
    if nums.is_empty() {
        return None;
    }
    Some(nums.iter().sum::<f64>() / nums.len() as f64)
}
