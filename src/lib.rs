//! `StayScout` - short-term rental search and ranking
//!
//! This library searches rental listings for each candidate destination of a
//! trip, has a language model judge every listing against the traveller's
//! preferences, and exports the ranked results as CSV.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod llm;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod search;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::StayScoutError;
pub use evaluator::ListingEvaluator;
pub use export::ResultsExporter;
pub use llm::{OpenAiClient, TextGenerator};
pub use models::{Evaluation, Listing, Location, PipelineResult, RunStatus, TripPreferences};
pub use pipeline::{Pipeline, load_preferences};
pub use search::{ListingSearchAdapter, ListingSource, OpenBnbClient};

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, StayScoutError>;

