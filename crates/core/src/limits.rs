//! Size limits and fixed analytics parameters for the survey engine.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so the field limits below are duplicated on `SurveySubmission`. Keep both
//! in sync when modifying.

// === Request Limits ===

/// Maximum submission body size in bytes (64KB).
///
/// A fully filled survey is well under 4KB.
pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

/// Maximum length of a short free-text field (name, brand, prices, ...).
pub const MAX_SHORT_TEXT_CHARS: u64 = 256;

/// Maximum length of the comments field.
pub const MAX_COMMENTS_CHARS: u64 = 4096;

/// Maximum entries in a set-valued field.
pub const MAX_SET_ENTRIES: u64 = 32;

// === Analytics Parameters ===

/// Number of raw records returned alongside the summary.
pub const RAW_SAMPLE_LIMIT: usize = 50;

/// Number of pain points kept in the ranking.
pub const TOP_PAIN_POINTS: usize = 5;

/// Brand label used when a record names no brand.
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Respondent types always present in the distribution, in output order.
pub const SEEDED_RESPONDENT_TYPES: [&str; 3] = ["Household", "Shop / Retailer", "Other"];
