//! Error types for step execution.

use thiserror::Error;

/// Top-level failure of one step execution.
///
/// Every failure is local to the record being processed and propagates to
/// the caller unchanged; the engine never retries and never partially
/// mutates the record on any of these paths.
#[derive(Debug, Error)]
pub enum StepError {
    /// The configured source field was absent or null and `ignore_missing`
    /// was false.
    #[error("field [{field}] is missing or null, cannot derive request URL from path [{field}]")]
    FieldMissing { field: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl StepError {
    /// Create a missing-field error for the given source field path.
    pub fn field_missing(field: impl Into<String>) -> Self {
        Self::FieldMissing { field: field.into() }
    }
}

/// Failure to retrieve a response body from the remote endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a status outside `[200, 300)`. Consumers
    /// match on the numeric code in the message, so it must stay present.
    #[error("Unexpected response status: {status}")]
    UnexpectedStatus { status: u16 },

    /// Transport-level failure: connection refused, timeout, DNS, TLS.
    #[error("Network error: {message}")]
    Network { message: String },
}

impl FetchError {
    /// Create an unexpected-status error from a raw status code.
    pub fn unexpected_status(status: u16) -> Self {
        Self::UnexpectedStatus { status }
    }

    /// Create a network error from any displayable transport failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }
}

/// Failure to extract a value from a fetched response body.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The response body was not valid JSON.
    #[error("failed to parse response body as JSON: {message}. body preview: {body_preview}")]
    InvalidJson { message: String, body_preview: String },

    /// The path expression could not be evaluated against the structure.
    #[error("path expression '{expression}' did not match: {message}")]
    NoMatch { expression: String, message: String },

    /// Single-value projection of an empty match sequence.
    #[error("path expression '{expression}' produced no values")]
    EmptyResult { expression: String },
}

impl ExtractionError {
    /// Create an invalid-JSON error, capturing a short body preview.
    pub fn invalid_json(message: impl Into<String>, body_preview: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
            body_preview: body_preview.into(),
        }
    }

    /// Create a no-match error for an expression.
    pub fn no_match(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NoMatch {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create an empty-result error for an expression.
    pub fn empty_result(expression: impl Into<String>) -> Self {
        Self::EmptyResult {
            expression: expression.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_message_carries_numeric_code() {
        let err = FetchError::unexpected_status(404);
        assert_eq!(err.to_string(), "Unexpected response status: 404");
    }

    #[test]
    fn field_missing_message_names_the_field() {
        let err = StepError::field_missing("geo.ip");
        let message = err.to_string();
        assert!(message.contains("[geo.ip]"), "message was: {message}");
    }

    #[test]
    fn fetch_error_converts_into_step_error() {
        let err: StepError = FetchError::network("connection refused").into();
        assert!(matches!(err, StepError::Fetch(FetchError::Network { .. })));
    }

    #[test]
    fn extraction_error_converts_into_step_error() {
        let err: StepError = ExtractionError::empty_result("$.name").into();
        assert!(matches!(
            err,
            StepError::Extraction(ExtractionError::EmptyResult { .. })
        ));
        assert!(err.to_string().contains("$.name"));
    }
}
