//! Listing evaluation
//!
//! Every listing is judged by the language model against the trip
//! preferences and the listings are ranked by the resulting score.

use tracing::{debug, info, warn};

use crate::llm::TextGenerator;
use crate::models::{Evaluation, Listing, TripPreferences};

/// System instruction sent with every evaluation
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that evaluates Airbnb listings based on user preferences.";

const NOT_AVAILABLE: &str = "N/A";
const NO_PREFERENCE: &str = "No specific preferences";

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn money(value: Option<String>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v}"))
}

/// Natural-language evaluation request for one listing
#[must_use]
pub fn build_prompt(listing: &Listing, preferences: &TripPreferences) -> String {
    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut requirements = String::new();
    if let Some(bedrooms) = preferences.min_bedrooms() {
        requirements.push_str(&format!("Minimum bedrooms: {bedrooms}\n"));
    }
    if let Some(bathrooms) = preferences.min_bathrooms() {
        requirements.push_str(&format!("Minimum bathrooms: {bathrooms}\n"));
    }

    format!(
        "Evaluate this Airbnb listing against the following preferences:

Group Size: {group} people
Budget per night: ${budget}
Dates: {check_in} to {check_out}
{requirements}Desired Amenities: {amenities}
Preferred Vibes: {vibes}
Walkability Important: {walkability}

Listing Details:
- Title: {title}
- Price per night: {price}
- Location: {address}
- Number of bedrooms: {bedrooms}
- Number of bathrooms: {bathrooms}
- Amenities: {listing_amenities}

Provide a concise evaluation focusing on:
1. How well it matches the group's needs
2. Value for money
3. Location and accessibility
4. Special features or concerns

Format the response as a JSON object with exactly these fields:
- relevance_score (integer 0-100)
- summary (2-3 sentences)
- pros (list of strings)
- cons (list of strings)",
        group = preferences.group_size(),
        budget = preferences.max_budget_per_night(),
        check_in = preferences.check_in_date(),
        check_out = preferences.check_out_date(),
        amenities = join_or(preferences.desired_amenities(), NO_PREFERENCE),
        vibes = join_or(preferences.preferred_vibes(), NO_PREFERENCE),
        walkability = if preferences.walkability_important() { "Yes" } else { "No" },
        title = or_na(listing.name()),
        price = money(listing.price()),
        address = or_na(listing.address()),
        bedrooms = or_na(listing.bedrooms()),
        bathrooms = or_na(listing.bathrooms()),
        listing_amenities = join_or(&listing.amenities(), NOT_AVAILABLE),
    )
}

/// Scores listings with a [`TextGenerator`]
pub struct ListingEvaluator<G> {
    generator: G,
}

impl<G: TextGenerator> ListingEvaluator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Attach an evaluation to `listing`. Failures never escape: the listing
    /// gets the sentinel evaluation instead.
    pub async fn evaluate_listing(&self, listing: &mut Listing, preferences: &TripPreferences) {
        let id = listing.id().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let prompt = build_prompt(listing, preferences);

        let evaluation = match self.generator.generate(SYSTEM_PROMPT, &prompt).await {
            Ok(raw) => {
                let parsed = Evaluation::parse(&raw);
                listing.raw_evaluation = Some(raw);
                match parsed {
                    Ok(evaluation) => evaluation,
                    Err(e) => {
                        warn!("Unusable evaluation for listing {}: {}", id, e);
                        Evaluation::failed(e)
                    }
                }
            }
            Err(e) => {
                warn!("Error evaluating listing {}: {}", id, e);
                Evaluation::failed(e)
            }
        };

        debug!("Listing {} scored {}", id, evaluation.relevance_score);
        listing.evaluation = Some(evaluation);
    }

    /// Evaluate every listing in order, then rank by descending score.
    /// Equal scores keep their input order.
    pub async fn evaluate(
        &self,
        mut listings: Vec<Listing>,
        preferences: &TripPreferences,
    ) -> Vec<Listing> {
        for listing in &mut listings {
            self.evaluate_listing(listing, preferences).await;
        }

        // sort_by is stable
        listings.sort_by(|a, b| b.relevance_score().cmp(&a.relevance_score()));

        let failed = listings
            .iter()
            .filter(|l| l.evaluation.as_ref().is_some_and(Evaluation::is_failure))
            .count();
        info!("Evaluated {} listings ({} failed)", listings.len(), failed);

        listings
    }
}
