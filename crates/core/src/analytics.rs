//! Aggregate analytics over a collection of raw response records.
//!
//! `aggregate` is a pure function of its input: every record is first
//! resolved into a [`CanonicalRecord`], then counted. Group orders follow
//! first appearance in the input so repeated calls over the same input
//! produce identical output.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::limits::{RAW_SAMPLE_LIMIT, SEEDED_RESPONDENT_TYPES, TOP_PAIN_POINTS};
use crate::record::CanonicalRecord;

/// Analytics summary returned by the read endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total: usize,
    pub market_share: Vec<BrandShare>,
    pub top_pain_points: Vec<PainPointCount>,
    pub locality_analysis: Vec<LocalitySpend>,
    pub distribution: TypeDistribution,
    pub raw: Vec<Value>,
}

/// Share of responses naming a brand. `percentage` is rendered to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandShare {
    pub name: String,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPointCount {
    pub name: String,
    pub count: u64,
}

/// Average spend per locality. `avg_spend` is rendered to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalitySpend {
    pub area: String,
    pub avg_spend: String,
}

/// Respondent type counts, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDistribution(Vec<(String, u64)>);

impl TypeDistribution {
    /// Distribution with the canonical types seeded at zero.
    pub fn seeded() -> Self {
        Self(
            SEEDED_RESPONDENT_TYPES
                .iter()
                .map(|label| (label.to_string(), 0))
                .collect(),
        )
    }

    pub fn increment(&mut self, label: &str) {
        match self.0.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, count)) => *count += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Counts keyed by label, remembering first-appearance order.
#[derive(Default)]
struct OrderedTally<T> {
    order: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Default> OrderedTally<T> {
    fn entry(&mut self, key: &str) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.order.push((key.to_string(), T::default()));
                self.index.insert(key.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        &mut self.order[idx].1
    }

    fn into_entries(self) -> Vec<(String, T)> {
        self.order
    }
}

#[derive(Default)]
struct SpendAccumulator {
    total: f64,
    count: u64,
}

/// Compute the analytics summary for a record collection.
pub fn aggregate(records: &[Value]) -> AnalyticsSummary {
    let total = records.len();

    let mut brands: OrderedTally<u64> = OrderedTally::default();
    let mut pain_points: OrderedTally<u64> = OrderedTally::default();
    let mut localities: OrderedTally<SpendAccumulator> = OrderedTally::default();
    let mut distribution = TypeDistribution::seeded();

    for record in records.iter().map(CanonicalRecord::from_raw) {
        *brands.entry(&record.brand) += 1;

        for label in &record.pain_points {
            *pain_points.entry(label) += 1;
        }

        if let Some(area) = &record.locality {
            let acc = localities.entry(area);
            acc.total += record.spend;
            acc.count += 1;
        }

        if let Some(kind) = &record.respondent_type {
            distribution.increment(kind);
        }
    }

    AnalyticsSummary {
        total,
        market_share: market_share(brands.into_entries(), total),
        top_pain_points: top_pain_points(pain_points.into_entries()),
        locality_analysis: locality_analysis(localities.into_entries()),
        distribution,
        raw: records.iter().take(RAW_SAMPLE_LIMIT).cloned().collect(),
    }
}

fn market_share(counts: Vec<(String, u64)>, total: usize) -> Vec<BrandShare> {
    if total == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(name, count)| {
            let pct = round_half_up(count as f64 / total as f64 * 100.0, 1);
            (name, pct)
        })
        .collect();

    // sort_by is stable: equal percentages keep first-appearance order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .map(|(name, pct)| BrandShare {
            name,
            percentage: format!("{:.1}", pct),
        })
        .collect()
}

fn top_pain_points(counts: Vec<(String, u64)>) -> Vec<PainPointCount> {
    let mut ranked = counts;
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_PAIN_POINTS);

    ranked
        .into_iter()
        .map(|(name, count)| PainPointCount { name, count })
        .collect()
}

fn locality_analysis(groups: Vec<(String, SpendAccumulator)>) -> Vec<LocalitySpend> {
    groups
        .into_iter()
        .map(|(area, acc)| {
            let avg = acc.total / acc.count as f64;
            LocalitySpend {
                area,
                // Formatting rounds from the exact binary value
                avg_spend: format!("{:.2}", avg),
            }
        })
        .collect()
}

/// Round to `digits` decimals with halves rounded away from zero.
fn round_half_up(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
