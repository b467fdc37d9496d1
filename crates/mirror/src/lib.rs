//! Spreadsheet mirror for the survey engine.
//!
//! The mirror is an external HTTP endpoint that accepts each raw submission
//! and can list everything it has received, in its own column shape.

pub mod client;
pub mod config;
pub mod mirror;

pub use client::*;
pub use config::*;
pub use mirror::*;
