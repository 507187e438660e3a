//! # tributary-observability
//!
//! Structured tracing for the pipeline: subscriber setup (plain or JSON),
//! span definitions, and one event helper per fail-open path so every
//! degradation is logged with the same fields.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_tracing, init_tracing_json, init_tracing_with_filter};
