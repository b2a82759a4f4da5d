//! Destination model for a candidate trip location

use serde::{Deserialize, Serialize};

/// A city to search, optionally narrowed by state and country
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    /// City name
    pub city: String,
    /// State, province or region
    #[serde(default)]
    pub state: Option<String>,
    /// Country name or code
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    /// Create a new location with only a city
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: None,
            country: None,
        }
    }

    /// Set the state
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Free-text query for the search backend, e.g. "Austin, TX, USA"
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut parts = vec![self.city.as_str()];
        parts.extend(self.state.as_deref());
        parts.extend(self.country.as_deref());
        parts.join(", ")
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.query_string())
    }
}
