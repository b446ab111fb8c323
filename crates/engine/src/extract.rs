//! Path-expression extraction over fetched JSON bodies.
//!
//! Evaluation always produces a sequence of matches, even when the
//! expression resolves to a single value; projection then collapses the
//! sequence to either itself (multi-value mode) or its first element. The
//! always-a-sequence invariant lives here, on the evaluator seam, so call
//! sites never branch on expression shape.

use enrich_types::ExtractionError;
use serde_json::Value;
use serde_json_path::JsonPath;

/// Longest body prefix echoed back in invalid-JSON errors.
const BODY_PREVIEW_LIMIT: usize = 200;

/// Evaluate `expression` against `body` and return all matches in order.
///
/// The body must parse as JSON ([`ExtractionError::InvalidJson`]).
/// Expressions that do not start with `$` are treated as rooted at the
/// document top, so `country_name` behaves like `$.country_name`. An
/// expression the evaluator cannot parse matches nothing and surfaces as
/// [`ExtractionError::NoMatch`].
pub fn extract_matches(body: &str, expression: &str) -> Result<Vec<Value>, ExtractionError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|error| ExtractionError::invalid_json(error.to_string(), body_preview(body)))?;

    let rooted = normalize_expression(expression);
    let path = JsonPath::parse(&rooted)
        .map_err(|error| ExtractionError::no_match(expression, error.to_string()))?;

    Ok(path.query(&document).all().into_iter().cloned().collect())
}

/// Project a match sequence per the configured value mode.
///
/// Multi-value mode returns the full ordered sequence; single-value mode
/// returns the first element and fails with
/// [`ExtractionError::EmptyResult`] when there is none. An empty result is
/// a visible failure, never a silent null.
pub fn project(matches: Vec<Value>, multi_value: bool, expression: &str) -> Result<Value, ExtractionError> {
    if multi_value {
        return Ok(Value::Array(matches));
    }
    matches
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::empty_result(expression))
}

/// Root bare expressions at `$`.
fn normalize_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.starts_with('$') {
        trimmed.to_string()
    } else if trimmed.starts_with('.') || trimmed.starts_with('[') {
        format!("${trimmed}")
    } else {
        format!("$.{trimmed}")
    }
}

fn body_preview(body: &str) -> String {
    if body.trim().is_empty() {
        return "<empty>".to_string();
    }
    let mut preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
    if preview.len() < body.len() {
        preview.push_str("...");
    }
    preview
}
