//! Telemetry for the survey engine.
//!
//! Structured logging setup, in-process counters and latency histograms,
//! and a health registry for the two data sinks.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
