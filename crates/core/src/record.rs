//! Reconciliation of raw response records into one canonical shape.
//!
//! Records reach the analytics engine from two sources with different
//! column names. The local store uses the submission column names
//! (`area`, `type`, `problems` as JSON array text, `monthly_20l`), while the
//! spreadsheet mirror uses its own headers (`locality`, `respondent_type`,
//! `pain_points` as comma-joined text, `monthly_spend`). A collection may
//! mix both shapes.
//!
//! For every logical field the candidate names are tried in order and the
//! first present value wins. A value is present when it is not null and,
//! for strings, not empty.

use serde_json::{Map, Value};

use crate::limits::UNKNOWN_BRAND;
use crate::submission::scalar_text;

/// Candidate column names per logical field, in precedence order.
pub mod fields {
    pub const BRAND: [&str; 2] = ["current_brand", "current_brand_"];
    pub const LOCALITY: [&str; 2] = ["locality", "area"];
    pub const SPEND: [&str; 2] = ["monthly_spend", "monthly_20l"];
    pub const RESPONDENT_TYPE: [&str; 2] = ["respondent_type", "type"];
    pub const NAME: [&str; 2] = ["name", "respondent_name"];
    pub const MOBILE: [&str; 1] = ["mobile"];

    /// Comma-joined pain point list (mirror shape).
    pub const PAIN_POINTS_JOINED: &str = "pain_points";
    /// JSON-encoded pain point list (store shape).
    pub const PAIN_POINTS_ENCODED: &str = "problems";

    /// Separator used by the mirror when joining pain points.
    pub const PAIN_POINT_SEPARATOR: &str = ", ";
}

/// One response record with every logical field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub brand: String,
    pub pain_points: Vec<String>,
    /// `None` excludes the record from locality aggregation.
    pub locality: Option<String>,
    pub spend: f64,
    pub respondent_type: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
}

impl CanonicalRecord {
    /// Resolve a raw record of either shape.
    ///
    /// Non-object values resolve to an all-default record so they still
    /// count towards totals.
    pub fn from_raw(raw: &Value) -> Self {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);

        Self {
            brand: first_text(obj, &fields::BRAND).unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
            pain_points: resolve_pain_points(obj),
            locality: first_text(obj, &fields::LOCALITY),
            spend: first_present(obj, &fields::SPEND).map(parse_spend).unwrap_or(0.0),
            respondent_type: first_text(obj, &fields::RESPONDENT_TYPE),
            name: first_text(obj, &fields::NAME),
            mobile: first_text(obj, &fields::MOBILE),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn first_present<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| is_present(value))
}

fn first_text(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    first_present(obj, names).map(scalar_text)
}

fn resolve_pain_points(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get(fields::PAIN_POINTS_JOINED) {
        Some(Value::String(joined)) => {
            return joined
                .split(fields::PAIN_POINT_SEPARATOR)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect();
        }
        Some(Value::Array(items)) => return text_items(items),
        _ => {}
    }

    match obj.get(fields::PAIN_POINTS_ENCODED) {
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => text_items(&items),
            _ => {
                tracing::debug!(value = %encoded, "Undecodable problems field, treating as empty");
                Vec::new()
            }
        },
        Some(Value::Array(items)) => text_items(items),
        _ => Vec::new(),
    }
}

fn text_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter(|item| is_present(item))
        .map(scalar_text)
        .collect()
}

/// Parse a spend figure. Strings use their longest leading numeric prefix
/// ("450 per month" is 450). Anything unparseable or non-finite is 0.
pub fn parse_spend(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut i = end;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                if seen_digit {
                    end = i + 1;
                }
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                // Only accept the exponent if digits follow it.
                let mut j = i + 1;
                if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                    j += 1;
                }
                if !matches!(bytes.get(j), Some(b'0'..=b'9')) {
                    break;
                }
                seen_exp = true;
                i = j;
                continue;
            }
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return None;
    }
    text[..end].parse::<f64>().ok()
}
