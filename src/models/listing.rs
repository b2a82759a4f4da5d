//! Rental listing record as returned by the search backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Evaluation;

/// A listing: the open set of fields the search and detail lookups return,
/// plus the evaluation this pipeline attaches to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    /// Model response exactly as received, before parsing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_evaluation: Option<String>,
}

impl From<Map<String, Value>> for Listing {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            evaluation: None,
            raw_evaluation: None,
        }
    }
}

impl Listing {
    /// Raw field lookup, treating `null` as absent
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// External listing id; numeric ids are rendered as strings
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.field("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.field("name").map(display_value)
    }

    #[must_use]
    pub fn price(&self) -> Option<String> {
        self.field("price").map(display_value)
    }

    /// `location.address`, falling back to a top-level `public_address`
    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.field("location")
            .and_then(|location| location.get("address"))
            .filter(|v| !v.is_null())
            .or_else(|| self.field("public_address"))
            .map(display_value)
    }

    #[must_use]
    pub fn bedrooms(&self) -> Option<String> {
        self.field("bedrooms").map(display_value)
    }

    #[must_use]
    pub fn bathrooms(&self) -> Option<String> {
        self.field("bathrooms").map(display_value)
    }

    /// Amenity names; detail records list them either as plain strings or as
    /// objects carrying a `name` or `title`.
    #[must_use]
    pub fn amenities(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.field("amenities") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("name")
                    .or_else(|| obj.get("title"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Overlay detail fields onto this listing; details win on conflict
    pub fn merge_details(&mut self, details: Map<String, Value>) {
        self.fields.extend(details);
    }

    /// Relevance score of the attached evaluation, 0 when not yet evaluated
    #[must_use]
    pub fn relevance_score(&self) -> u8 {
        self.evaluation.as_ref().map_or(0, |e| e.relevance_score)
    }
}

/// Render a JSON value for humans: strings unquoted, arrays comma-joined
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
