//! Survey submissions as posted by the wizard, and their store row form.
//!
//! This module handles:
//! - Lenient parsing of the camelCase submission object
//! - Field length validation
//! - Normalization into the snake_case row written to the record store

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::{Error, Result, ValidationErrorCode};

/// Respondent categories offered by the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondentType {
    Household,
    ShopRetailer,
    HotelRestaurant,
    Office,
    ConstructionSite,
    Other,
}

impl RespondentType {
    pub const ALL: [RespondentType; 6] = [
        Self::Household,
        Self::ShopRetailer,
        Self::HotelRestaurant,
        Self::Office,
        Self::ConstructionSite,
        Self::Other,
    ];

    /// Returns the label used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Household => "Household",
            Self::ShopRetailer => "Shop / Retailer",
            Self::HotelRestaurant => "Hotel / Restaurant",
            Self::Office => "Office",
            Self::ConstructionSite => "Construction Site",
            Self::Other => "Other",
        }
    }

    /// Parses a wire label. Unknown labels return `None`.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label.trim())
    }

    /// Whether the retailer details step applies to this type.
    pub fn is_retailer(&self) -> bool {
        matches!(self, Self::ShopRetailer)
    }
}

impl Default for RespondentType {
    fn default() -> Self {
        Self::Household
    }
}

/// One survey submission as received from the client (camelCase).
///
/// Every field is optional on the wire. Scalars accept strings, numbers, or
/// booleans; set fields accept an array or a single string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub mobile: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub area: String,

    /// Respondent type label; empty means "Household".
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub respondent_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub other_type: String,

    #[serde(default, deserialize_with = "lenient_set")]
    #[validate(length(max = 32))]
    pub water_types: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub other_water_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub current_brand: String,

    #[serde(rename = "price20l", default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub price_20l: String,

    #[serde(rename = "price1l", default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub price_1l: String,

    #[serde(rename = "price500ml", default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub price_500ml: String,

    #[serde(rename = "monthly20l", default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub monthly_20l: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub daily_bottles: String,

    #[serde(default, deserialize_with = "lenient_set")]
    #[validate(length(max = 32))]
    pub problems: Vec<String>,

    #[serde(default, deserialize_with = "lenient_set")]
    #[validate(length(max = 32))]
    pub switching_reasons: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub cheaper_switch: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub retailer_fastest_size: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub retailer_margin: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub retailer_credit: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 256))]
    pub retailer_try_hero_agro_foods: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 4096))]
    pub comments: String,
}

impl SurveySubmission {
    /// Parse a submission from an already-decoded JSON body.
    ///
    /// The body must be an object; anything else is an invalid format.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::validation_code(
                ValidationErrorCode::InvalidFormat,
                "submission must be a JSON object",
            ));
        }

        serde_json::from_value(value.clone()).map_err(|e| {
            Error::validation_code(
                ValidationErrorCode::InvalidFormat,
                format!("invalid submission: {}", e),
            )
        })
    }

    /// Check field length constraints.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|errors| {
            let mut details: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter()
                        .map(move |e| format!("{}: {}", field, e.code))
                })
                .collect();
            details.sort();
            Error::field_constraints(details)
        })
    }

    /// Resolved respondent type label ("Household" when omitted).
    pub fn respondent_label(&self) -> &str {
        let label = self.respondent_type.trim();
        if label.is_empty() {
            RespondentType::default().as_str()
        } else {
            label
        }
    }

    /// Whether this submission went through the retailer details step.
    pub fn is_retailer(&self) -> bool {
        RespondentType::parse(self.respondent_label()).is_some_and(|t| t.is_retailer())
    }

    /// Normalize into the row written to the record store.
    ///
    /// Retailer-only fields are blanked unless the respondent is a retailer.
    pub fn to_row(&self) -> ResponseRow {
        let retailer = self.is_retailer();
        let retailer_field = |value: &String| {
            if retailer {
                value.clone()
            } else {
                String::new()
            }
        };

        ResponseRow {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            area: self.area.clone(),
            respondent_type: self.respondent_label().to_string(),
            other_type: self.other_type.clone(),
            water_types: encode_set(&self.water_types),
            other_water_type: self.other_water_type.clone(),
            current_brand: self.current_brand.clone(),
            price_20l: self.price_20l.clone(),
            price_1l: self.price_1l.clone(),
            price_500ml: self.price_500ml.clone(),
            monthly_20l: self.monthly_20l.clone(),
            daily_bottles: self.daily_bottles.clone(),
            problems: encode_set(&self.problems),
            switching_reasons: encode_set(&self.switching_reasons),
            cheaper_switch: self.cheaper_switch.clone(),
            retailer_fastest_size: retailer_field(&self.retailer_fastest_size),
            retailer_margin: retailer_field(&self.retailer_margin),
            retailer_credit: retailer_field(&self.retailer_credit),
            retailer_try_hero_agro_foods: retailer_field(&self.retailer_try_hero_agro_foods),
            comments: self.comments.clone(),
        }
    }
}

/// Record store row (snake_case). Set fields hold JSON array text.
///
/// `id` and `created_at` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub name: String,
    pub mobile: String,
    pub area: String,
    #[serde(rename = "type")]
    pub respondent_type: String,
    pub other_type: String,
    pub water_types: String,
    pub other_water_type: String,
    pub current_brand: String,
    pub price_20l: String,
    pub price_1l: String,
    pub price_500ml: String,
    pub monthly_20l: String,
    pub daily_bottles: String,
    pub problems: String,
    pub switching_reasons: String,
    pub cheaper_switch: String,
    pub retailer_fastest_size: String,
    pub retailer_margin: String,
    pub retailer_credit: String,
    pub retailer_try_hero_agro_foods: String,
    pub comments: String,
}

fn encode_set(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Render a scalar JSON value as text. `null` becomes the empty string.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(scalar_text).unwrap_or_default())
}

fn lenient_set<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(scalar_text)
            .collect(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(other) => vec![scalar_text(&other)],
    })
}
