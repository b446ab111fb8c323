//! Shared types for the enrich step.
//!
//! This crate holds the pieces both the engine and its hosts need to agree
//! on: the step configuration surface ([`StepConfig`]) and the error
//! taxonomy ([`StepError`], [`FetchError`], [`ExtractionError`]). It
//! performs no I/O of its own.

mod config;
mod errors;

pub use config::StepConfig;
pub use errors::{ExtractionError, FetchError, StepError};
