//! Step configuration model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for one enrich step instance.
///
/// A step is configured once, when the host pipeline is assembled, and the
/// resulting value is never mutated afterwards. Cloning is cheap enough for
/// hosts that hand the same configuration to several workers; the struct is
/// safe to share across threads.
///
/// Recognized options and their defaults:
///
/// | option | default | effect |
/// |---|---|---|
/// | `field` | required | source field to read |
/// | `url_prefix` | required | URL template containing one `{}` placeholder |
/// | `target_field` | `"out"` | field to write the result into |
/// | `extra_header` | `""` | one `"Name: Value"` header to attach to the fetch |
/// | `ignore_missing` | `false` | missing/null source field becomes a silent no-op |
/// | `json_path` | `"$..*"` | path expression for extraction |
/// | `multi_value` | `false` | write the full match sequence instead of the first match |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Source field to read from the record. Dotted paths address nested
    /// fields (`geo.ip`).
    pub field: String,

    /// URL template. The first `{}` occurrence is replaced with the
    /// percent-encoded field value.
    pub url_prefix: String,

    /// Field the extracted value is written into. May equal `field`, in
    /// which case the source value is overwritten.
    #[serde(default = "default_target_field")]
    pub target_field: String,

    /// Optional `"Name: Value"` header attached to every fetch. Strings
    /// without a `:` separator attach nothing.
    #[serde(default)]
    pub extra_header: String,

    /// When true, a missing or null source field ends the step as a
    /// successful no-op instead of an error.
    #[serde(default)]
    pub ignore_missing: bool,

    /// Path expression evaluated against the fetched JSON body.
    #[serde(default = "default_json_path")]
    pub json_path: String,

    /// When true, the full ordered match sequence is written; otherwise
    /// only its first element.
    #[serde(default)]
    pub multi_value: bool,
}

fn default_target_field() -> String {
    "out".to_string()
}

fn default_json_path() -> String {
    "$..*".to_string()
}

impl StepConfig {
    /// Deserialize a configuration from a JSON mapping.
    ///
    /// Fails when a required option (`field`, `url_prefix`) is absent or an
    /// option has the wrong type. Unknown keys are ignored so hosts can
    /// carry their own metadata alongside the recognized options.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// Returns true when the URL template carries a `{}` placeholder.
    ///
    /// A template without one is still usable (the template is fetched
    /// verbatim) but is almost always a configuration mistake, so callers
    /// surface it at construction time.
    pub fn has_placeholder(&self) -> bool {
        self.url_prefix.contains("{}")
    }
}
