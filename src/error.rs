//! Error types and handling for the `StayScout` pipeline

use thiserror::Error;

/// Main error type for the `StayScout` application
#[derive(Error, Debug)]
pub enum StayScoutError {
    /// Trip preferences violate a constraint
    #[error("Invalid input: {message}")]
    Validation { field: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Preferences document could not be read or decoded
    #[error("Invalid preferences file: {message}")]
    Input { message: String },

    /// Listing search or detail lookup failed
    #[error("Search error: {message}")]
    Search { message: String },

    /// Text generation failed or returned something unusable
    #[error("Evaluation error: {message}")]
    Evaluation { message: String },

    /// Results could not be written
    #[error("Export error: {message}")]
    Export { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// CSV serialization errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl StayScoutError {
    /// Create a new validation error for `field`
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a new search error
    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Create a new evaluation error
    pub fn evaluation<S: Into<String>>(message: S) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Name of the offending field for validation errors
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            StayScoutError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
