//! # Enrich Engine
//!
//! A single document-transformation step for ingest pipelines: read a field
//! from a record, derive a URL from a template, fetch JSON from that URL
//! through a bounded shared cache, extract value(s) with a path expression,
//! and write the result into a target field of the record.
//!
//! ## Architecture
//!
//! - **`record`**: field-addressable document wrapper with dotted-path
//!   read/write
//! - **`url`**: percent-encoding URL template substitution
//! - **`cache`**: bounded, thread-safe response cache keyed by URL
//! - **`fetch`**: the [`Fetcher`] seam and its HTTP implementation
//! - **`extract`**: path-expression evaluation and value projection
//! - **`step`**: the [`Step`] trait and the executor tying it all together
//! - **`registry`**: named step factories sharing one response cache
//!
//! ## Usage
//!
//! ```no_run
//! use enrich_engine::{Record, Step, StepRegistry};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = StepRegistry::with_defaults();
//! let step = registry.build("json_api", &json!({
//!     "field": "ip",
//!     "url_prefix": "http://ip-api.test/json/{}",
//!     "target_field": "country",
//!     "json_path": "country_name",
//! }))?;
//!
//! let mut record = Record::from_value(&json!({ "ip": "216.102.95.101" }))?;
//! step.execute(&mut record)?;
//! # Ok(())
//! # }
//! ```
//!
//! Steps are safe to share: the host may call [`Step::execute`] from many
//! threads against the same step and the same shared cache without any
//! external locking.

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod record;
pub mod registry;
mod runtime;
pub mod step;
pub mod url;

pub use cache::ResponseCache;
pub use extract::{extract_matches, project};
pub use fetch::{Fetcher, HttpFetcher};
pub use record::Record;
pub use registry::{StepRegistry, cache_size_from_env, CACHE_SIZE_ENV_VAR, DEFAULT_CACHE_SIZE};
pub use step::{JsonApiStep, Step};
pub use url::build_url;

pub use enrich_types::{ExtractionError, FetchError, StepConfig, StepError};
