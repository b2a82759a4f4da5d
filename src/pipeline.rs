//! Pipeline orchestration
//!
//! load preferences → search → evaluate → export, with every failure turned
//! into a structured [`PipelineResult`].

use std::path::Path;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::evaluator::ListingEvaluator;
use crate::export::ResultsExporter;
use crate::llm::{OpenAiClient, TextGenerator};
use crate::models::outcome::NO_LISTINGS_MESSAGE;
use crate::models::{PipelineResult, TripPreferences, TripPreferencesInput};
use crate::search::{ListingSearchAdapter, ListingSource, OpenBnbClient};
use crate::{Result, StayScoutError};

/// Read and validate a preferences document
pub fn load_preferences(path: &Path) -> Result<TripPreferences> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StayScoutError::input(format!("Failed to read {}: {e}", path.display()))
    })?;
    let input: TripPreferencesInput = serde_json::from_str(&content)
        .map_err(|e| StayScoutError::input(format!("Failed to parse {}: {e}", path.display())))?;
    TripPreferences::try_from(input)
}

/// One search-evaluate-export run
pub struct Pipeline<S, G> {
    search: ListingSearchAdapter<S>,
    evaluator: ListingEvaluator<G>,
    exporter: ResultsExporter,
}

impl<S: ListingSource, G: TextGenerator> Pipeline<S, G> {
    pub fn new(
        search: ListingSearchAdapter<S>,
        evaluator: ListingEvaluator<G>,
        exporter: ResultsExporter,
    ) -> Self {
        Self {
            search,
            evaluator,
            exporter,
        }
    }

    /// Run for the preferences file at `path`. Never fails; errors are
    /// reported through the returned result.
    pub async fn run(&self, path: &Path) -> PipelineResult {
        info!("Loading preferences...");
        match load_preferences(path) {
            Ok(preferences) => self.run_for(&preferences).await,
            Err(e) => failure(&e),
        }
    }

    /// Run for already validated preferences
    pub async fn run_for(&self, preferences: &TripPreferences) -> PipelineResult {
        self.execute(preferences).await.unwrap_or_else(|e| failure(&e))
    }

    async fn execute(&self, preferences: &TripPreferences) -> Result<PipelineResult> {
        info!("Searching for listings...");
        let listings = self.search.search(preferences).await;
        info!("Found {} listings", listings.len());

        if listings.is_empty() {
            warn!("No listings found matching the criteria");
            return Ok(PipelineResult::error(NO_LISTINGS_MESSAGE));
        }

        info!("Evaluating listings...");
        let evaluated = self.evaluator.evaluate(listings, preferences).await;

        info!("Exporting results to CSV...");
        let output_file = self.exporter.export(&evaluated)?;
        info!("Results exported to: {}", output_file.display());

        Ok(PipelineResult::success(output_file, evaluated.len()))
    }
}

fn failure(e: &StayScoutError) -> PipelineResult {
    error!("Error in main process: {}", e);
    PipelineResult::error(e.to_string())
}

/// Load preferences, build the production clients from `config` and run.
/// Invalid preferences are reported before any client is constructed, so a
/// bad input file never surfaces as a missing API key.
pub async fn run(config: &AppConfig, path: &Path) -> PipelineResult {
    info!("Loading preferences...");
    let preferences = match load_preferences(path) {
        Ok(preferences) => preferences,
        Err(e) => return failure(&e),
    };
    match build(config) {
        Ok(pipeline) => pipeline.run_for(&preferences).await,
        Err(e) => failure(&e),
    }
}

fn build(config: &AppConfig) -> Result<Pipeline<OpenBnbClient, OpenAiClient>> {
    let source = OpenBnbClient::new(&config.search)?;
    let generator = OpenAiClient::from_config(&config.llm)?;
    info!(model = generator.model(), "Using language model");

    Ok(Pipeline::new(
        ListingSearchAdapter::new(source, config.search.allow_restricted_access),
        ListingEvaluator::new(generator),
        ResultsExporter::new(&config.export),
    ))
}
