//! Structured outcome of a pipeline run

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Message reported when a run completes
pub const SUCCESS_MESSAGE: &str = "Search completed successfully";

/// Message reported when the search came back empty
pub const NO_LISTINGS_MESSAGE: &str = "No listings found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// What a run hands back to its caller. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub status: RunStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_listings: Option<usize>,
}

impl PipelineResult {
    #[must_use]
    pub fn success(output_file: PathBuf, total_listings: usize) -> Self {
        Self {
            status: RunStatus::Success,
            message: SUCCESS_MESSAGE.to_string(),
            output_file: Some(output_file),
            total_listings: Some(total_listings),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            message: message.into(),
            output_file: None,
            total_listings: None,
        }
    }

    /// Pretty JSON for printing on stdout
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                "{{\"status\": \"error\", \"message\": \"failed to render outcome: {e}\"}}"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json_shape() {
        let result = PipelineResult::success(PathBuf::from("data/airbnb_results_x.csv"), 2);
        let value: serde_json::Value = serde_json::from_str(&result.to_pretty_json()).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], SUCCESS_MESSAGE);
        assert_eq!(value["output_file"], "data/airbnb_results_x.csv");
        assert_eq!(value["total_listings"], 2);
    }

    #[test]
    fn test_error_json_omits_optional_fields() {
        let result = PipelineResult::error(NO_LISTINGS_MESSAGE);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "No listings found");
        assert!(value.get("output_file").is_none());
        assert!(value.get("total_listings").is_none());
        assert_eq!(result.status, RunStatus::Error);
    }
}
