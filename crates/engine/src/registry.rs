//! Step factories and the shared cache they hand out.
//!
//! The host constructs one [`StepRegistry`] at startup; the registry reads
//! the process-wide cache-size setting once, builds the single shared
//! [`ResponseCache`], and registers the named step constructors. Every step
//! built afterwards receives a handle to that same cache.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use enrich_types::StepConfig;
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::ResponseCache;
use crate::fetch::HttpFetcher;
use crate::step::{JsonApiStep, Step};

/// Environment variable controlling the shared cache's maximum entry count.
pub const CACHE_SIZE_ENV_VAR: &str = "ENRICH_CACHE_SIZE";

/// Cache capacity used when the setting is absent or unparseable.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Read the configured cache capacity from the environment.
///
/// Absent or unparseable values fall back to [`DEFAULT_CACHE_SIZE`]; zero is
/// a valid setting meaning "cache disabled".
pub fn cache_size_from_env() -> usize {
    let Ok(raw) = env::var(CACHE_SIZE_ENV_VAR) else {
        return DEFAULT_CACHE_SIZE;
    };
    match raw.trim().parse::<usize>() {
        Ok(size) => size,
        Err(_) => {
            warn!(value = %raw, default = DEFAULT_CACHE_SIZE, "invalid {CACHE_SIZE_ENV_VAR}, using default");
            DEFAULT_CACHE_SIZE
        }
    }
}

type StepFactory = Box<dyn Fn(&Value) -> Result<Box<dyn Step>> + Send + Sync>;

/// Named step constructors sharing one response cache.
pub struct StepRegistry {
    cache: ResponseCache,
    factories: HashMap<String, StepFactory>,
}

impl StepRegistry {
    /// Build a registry with the environment-configured cache size and the
    /// default `"json_api"` step registered.
    pub fn with_defaults() -> Self {
        Self::with_cache(ResponseCache::new(cache_size_from_env()))
    }

    /// Build a registry around an existing cache handle.
    pub fn with_cache(cache: ResponseCache) -> Self {
        info!(capacity = cache.capacity(), "created shared response cache");
        let mut registry = Self {
            cache: cache.clone(),
            factories: HashMap::new(),
        };

        registry.register("json_api", move |options| {
            let config = parse_step_config(options)?;
            let fetcher = Arc::new(HttpFetcher::new(&config.extra_header));
            Ok(Box::new(JsonApiStep::new(config, cache.clone(), fetcher)) as Box<dyn Step>)
        });
        registry
    }

    /// Register a named step constructor, replacing any previous one.
    pub fn register<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Step>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    /// The cache handed to every step this registry builds.
    pub fn shared_cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Construct a step of the given kind from a configuration mapping.
    pub fn build(&self, kind: &str, options: &Value) -> Result<Box<dyn Step>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| anyhow!("unknown step kind '{kind}'"))?;
        factory(options).with_context(|| format!("could not build '{kind}' step"))
    }
}

/// Deserialize and sanity-check a step configuration.
fn parse_step_config(options: &Value) -> Result<StepConfig> {
    let config = StepConfig::from_value(options).context("invalid step configuration")?;
    if !config.has_placeholder() {
        warn!(url_prefix = %config.url_prefix, "url_prefix has no {{}} placeholder; the template will be fetched verbatim");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{CACHE_SIZE_ENV_VAR, DEFAULT_CACHE_SIZE, StepRegistry, cache_size_from_env};
    use crate::cache::ResponseCache;
    use serde_json::json;

    #[test]
    fn builds_the_default_json_api_step() {
        let registry = StepRegistry::with_cache(ResponseCache::new(4));
        let step = registry.build(
            "json_api",
            &json!({
                "field": "ip",
                "url_prefix": "http://example.test/json/{}",
            }),
        );
        assert!(step.is_ok());
    }

    #[test]
    fn rejects_unknown_step_kinds() {
        let registry = StepRegistry::with_cache(ResponseCache::new(4));
        let err = registry.build("no_such_step", &json!({})).err().unwrap();
        assert!(err.to_string().contains("no_such_step"));
    }

    #[test]
    fn rejects_incomplete_configuration() {
        let registry = StepRegistry::with_cache(ResponseCache::new(4));
        let result = registry.build("json_api", &json!({ "field": "ip" }));
        assert!(result.is_err(), "url_prefix is required");
    }

    #[test]
    fn custom_factories_can_be_registered() {
        use crate::record::Record;
        use crate::step::Step;

        struct NoopStep;
        impl Step for NoopStep {
            fn execute(&self, _record: &mut Record) -> Result<(), enrich_types::StepError> {
                Ok(())
            }
        }

        let mut registry = StepRegistry::with_cache(ResponseCache::new(4));
        registry.register("noop", |_| Ok(Box::new(NoopStep)));

        let step = registry.build("noop", &json!({})).expect("custom factory should build");
        let mut record = Record::new();
        step.execute(&mut record).unwrap();
    }

    #[test]
    fn cache_size_setting_is_read_from_the_environment() {
        temp_env::with_var(CACHE_SIZE_ENV_VAR, Some("7"), || {
            assert_eq!(cache_size_from_env(), 7);
        });
        temp_env::with_var(CACHE_SIZE_ENV_VAR, Some("0"), || {
            assert_eq!(cache_size_from_env(), 0);
        });
        temp_env::with_var(CACHE_SIZE_ENV_VAR, Some("not-a-number"), || {
            assert_eq!(cache_size_from_env(), DEFAULT_CACHE_SIZE);
        });
        temp_env::with_var(CACHE_SIZE_ENV_VAR, None::<&str>, || {
            assert_eq!(cache_size_from_env(), DEFAULT_CACHE_SIZE);
        });
    }
}
