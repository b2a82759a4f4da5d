//! Data models for the StayScout pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: a candidate destination
//! - Preferences: the validated trip request
//! - Listing: an open listing record from the search backend
//! - Evaluation: the relevance judgment attached to a listing
//! - Outcome: the structured result of a run

pub mod evaluation;
pub mod listing;
pub mod location;
pub mod outcome;
pub mod preferences;

// Re-export all public types for convenient access
pub use evaluation::Evaluation;
pub use listing::Listing;
pub use location::Location;
pub use outcome::{PipelineResult, RunStatus};
pub use preferences::{TripPreferences, TripPreferencesInput};
