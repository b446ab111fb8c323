//! Step execution.
//!
//! One step run is Read → Resolve-URL → Fetch-or-Cache → Extract → Write
//! against a single record. The record is mutated only on the final write;
//! every failure path leaves it untouched.

use std::sync::Arc;

use enrich_types::{StepConfig, StepError};
use serde_json::Value;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::extract::{extract_matches, project};
use crate::fetch::Fetcher;
use crate::record::Record;
use crate::url::build_url;

/// A configured step, applied to one record at a time.
///
/// Implementations must tolerate concurrent `execute` calls on distinct
/// records from many threads; the host provides no external locking.
pub trait Step: Send + Sync {
    /// Transform `record` in place.
    fn execute(&self, record: &mut Record) -> Result<(), StepError>;
}

/// The fetch-cache-extract enrichment step.
///
/// Reads the configured source field, derives a URL, retrieves the JSON
/// body through the shared [`ResponseCache`], extracts values with the
/// configured path expression, and writes the projected result into the
/// target field.
pub struct JsonApiStep {
    config: StepConfig,
    cache: ResponseCache,
    fetcher: Arc<dyn Fetcher>,
}

impl JsonApiStep {
    /// Assemble a step from its configuration and collaborators.
    pub fn new(config: StepConfig, cache: ResponseCache, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, cache, fetcher }
    }

    /// The configuration this step was built from.
    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    fn resolve_body(&self, url: &str) -> Result<String, StepError> {
        if let Some(body) = self.cache.get(url) {
            debug!(%url, "cache hit");
            return Ok(body);
        }
        debug!(%url, "cache miss, fetching");
        let body = self.fetcher.fetch(url)?;
        self.cache.put(url, &body);
        Ok(body)
    }
}

impl Step for JsonApiStep {
    fn execute(&self, record: &mut Record) -> Result<(), StepError> {
        let field_value = match record.get_path(&self.config.field) {
            Some(value) if !value.is_null() => field_value_as_string(value),
            _ if self.config.ignore_missing => return Ok(()),
            _ => return Err(StepError::field_missing(&self.config.field)),
        };

        let url = build_url(&self.config.url_prefix, &field_value);
        debug!(field = %self.config.field, %url, "resolved request url");

        let body = self.resolve_body(&url)?;
        let matches = extract_matches(&body, &self.config.json_path)?;
        let value = project(matches, self.config.multi_value, &self.config.json_path)?;

        record.set_path(&self.config.target_field, value);
        Ok(())
    }
}

/// Render a field value for URL substitution.
///
/// Strings are used as-is; other values fall back to their JSON text, which
/// keeps numeric identifiers usable without quoting noise.
fn field_value_as_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
