//! Relevance judgment attached to a listing

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Result, StayScoutError};

/// Cons entry used by the sentinel evaluation
pub const FAILED_TO_EVALUATE: &str = "Failed to evaluate";

/// Highest relevance score a listing can receive
pub const MAX_SCORE: u8 = 100;

/// Structured judgment of how well a listing fits the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(deserialize_with = "deserialize_score")]
    pub relevance_score: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

impl Evaluation {
    /// Sentinel evaluation for a listing that could not be judged
    #[must_use]
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            relevance_score: 0,
            summary: format!("Error evaluating listing: {reason}"),
            pros: Vec::new(),
            cons: vec![FAILED_TO_EVALUATE.to_string()],
        }
    }

    /// Whether this is a sentinel produced by [`Evaluation::failed`]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.relevance_score == 0 && self.cons.iter().any(|c| c == FAILED_TO_EVALUATE)
    }

    /// Parse a model response into an evaluation.
    ///
    /// Models like to wrap JSON in markdown fences or a sentence of prose, so
    /// only the outermost `{ ... }` span is decoded.
    pub fn parse(raw: &str) -> Result<Self> {
        let start = raw.find('{');
        let end = raw.rfind('}');
        let body = match (start, end) {
            (Some(start), Some(end)) if start < end => &raw[start..=end],
            _ => {
                return Err(StayScoutError::evaluation(
                    "model response does not contain a JSON object",
                ));
            }
        };

        serde_json::from_str(body).map_err(|e| {
            StayScoutError::evaluation(format!("could not decode model response: {e}"))
        })
    }
}

/// Accepts integers, floats and numeric strings, clamped to `0..=100`
fn deserialize_score<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|score| score.is_finite())
    .ok_or_else(|| {
        <D::Error as serde::de::Error>::custom(format!("invalid relevance_score: {value}"))
    })?;

    Ok(score.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}
