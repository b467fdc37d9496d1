//! Core types, record reconciliation, and analytics for the survey engine.

pub mod analytics;
pub mod error;
pub mod limits;
pub mod record;
pub mod submission;

pub use analytics::*;
pub use error::{Error, Result};
pub use record::*;
pub use submission::*;
