//! Listing search
//!
//! [`ListingSource`] is the seam to the external listing-search service;
//! [`ListingSearchAdapter`] drives it across every location of a trip and
//! enriches the results with per-listing details.

pub mod openbnb;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

pub use openbnb::OpenBnbClient;

use crate::Result;
use crate::models::{Listing, Location, TripPreferences};

/// Parameters of one location search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub location: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub adults: u32,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub min_bedrooms: Option<u32>,
    pub allow_restricted_access: bool,
}

impl SearchQuery {
    /// Query for `location`. The price floor is always zero; anything below
    /// budget is left for the evaluator to judge.
    #[must_use]
    pub fn for_location(
        location: &Location,
        preferences: &TripPreferences,
        allow_restricted_access: bool,
    ) -> Self {
        Self {
            location: location.query_string(),
            checkin: preferences.check_in_date(),
            checkout: preferences.check_out_date(),
            adults: preferences.group_size(),
            min_price: Decimal::ZERO,
            max_price: preferences.max_budget_per_night(),
            min_bedrooms: preferences.min_bedrooms(),
            allow_restricted_access,
        }
    }
}

/// Parameters of one listing detail lookup
#[derive(Debug, Clone, PartialEq)]
pub struct DetailQuery {
    pub id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub adults: u32,
    pub allow_restricted_access: bool,
}

/// External listing-search capability
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Listings matching `query`, in backend order
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>>;

    /// Detail record for one listing, `None` when the backend has none
    async fn get_details(&self, query: &DetailQuery) -> Result<Option<Map<String, Value>>>;
}

/// Best-effort search across all locations of a trip
pub struct ListingSearchAdapter<S> {
    source: S,
    allow_restricted_access: bool,
}

impl<S: ListingSource> ListingSearchAdapter<S> {
    pub fn new(source: S, allow_restricted_access: bool) -> Self {
        Self {
            source,
            allow_restricted_access,
        }
    }

    /// Search every location in order and enrich each hit with its details.
    ///
    /// Never fails: a location whose search errors contributes nothing, and
    /// a listing whose detail lookup errors keeps its search fields only.
    pub async fn search(&self, preferences: &TripPreferences) -> Vec<Listing> {
        let mut all_listings = Vec::new();

        for location in preferences.locations() {
            let mut listings = self.search_location(location, preferences).await;

            for listing in &mut listings {
                self.enrich(listing, preferences).await;
            }

            all_listings.extend(listings);
        }

        info!("Search returned {} listings in total", all_listings.len());
        all_listings
    }

    async fn search_location(
        &self,
        location: &Location,
        preferences: &TripPreferences,
    ) -> Vec<Listing> {
        let query = SearchQuery::for_location(location, preferences, self.allow_restricted_access);
        debug!("Searching listings: {:?}", query);

        match self.source.search(&query).await {
            Ok(listings) => {
                info!("Found {} listings for {}", listings.len(), location);
                listings
            }
            Err(e) => {
                error!("Error searching listings for location {}: {}", location, e);
                Vec::new()
            }
        }
    }

    async fn enrich(&self, listing: &mut Listing, preferences: &TripPreferences) {
        let Some(id) = listing.id() else {
            warn!("Listing without an id, skipping detail lookup");
            return;
        };

        let query = DetailQuery {
            id,
            checkin: preferences.check_in_date(),
            checkout: preferences.check_out_date(),
            adults: preferences.group_size(),
            allow_restricted_access: self.allow_restricted_access,
        };

        match self.source.get_details(&query).await {
            Ok(Some(details)) => listing.merge_details(details),
            Ok(None) => debug!("No details for listing {}", query.id),
            Err(e) => error!("Error getting details for listing {}: {}", query.id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StayScoutError;
    use crate::models::TripPreferencesInput;
    use serde_json::json;
    use std::sync::Mutex;

    fn listing(value: Value) -> Listing {
        match value {
            Value::Object(map) => Listing::from(map),
            _ => panic!("listing fixture must be an object"),
        }
    }

    /// Fake backend keyed by location query string
    #[derive(Default)]
    struct FakeSource {
        results: Vec<(String, Result<Vec<Listing>>)>,
        failing_details: Vec<String>,
        searches: Mutex<Vec<SearchQuery>>,
    }

    #[async_trait]
    impl ListingSource for FakeSource {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>> {
            self.searches.lock().unwrap().push(query.clone());
            match self.results.iter().find(|(loc, _)| *loc == query.location) {
                Some((_, Ok(listings))) => Ok(listings.clone()),
                Some((_, Err(e))) => Err(StayScoutError::search(e.to_string())),
                None => Ok(Vec::new()),
            }
        }

        async fn get_details(&self, query: &DetailQuery) -> Result<Option<Map<String, Value>>> {
            if self.failing_details.contains(&query.id) {
                return Err(StayScoutError::search("detail page blocked"));
            }
            let mut details = Map::new();
            details.insert("detailed".into(), json!(true));
            details.insert("price".into(), json!(format!("{}-detail", query.id)));
            Ok(Some(details))
        }
    }

    fn preferences(cities: &[&str]) -> TripPreferences {
        TripPreferences::try_from(TripPreferencesInput {
            group_size: 3,
            locations: cities.iter().map(|c| Location::new(*c)).collect(),
            check_in_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            max_budget_per_night: Decimal::new(250, 0),
            min_bedrooms: Some(2),
            ..Default::default()
        })
        .unwrap()
    }

    fn ids(listings: &[Listing]) -> Vec<String> {
        listings.iter().filter_map(Listing::id).collect()
    }

    #[test]
    fn test_search_query_for_location() {
        let prefs = preferences(&["Austin"]);
        let location = Location::new("Austin").with_state("TX");
        let query = SearchQuery::for_location(&location, &prefs, true);

        assert_eq!(query.location, "Austin, TX");
        assert_eq!(query.adults, 3);
        assert_eq!(query.min_price, Decimal::ZERO);
        assert_eq!(query.max_price, Decimal::new(250, 0));
        assert_eq!(query.min_bedrooms, Some(2));
        assert!(query.allow_restricted_access);
    }

    #[tokio::test]
    async fn test_failing_location_is_skipped_in_order() {
        let source = FakeSource {
            results: vec![
                (
                    "Austin".into(),
                    Ok(vec![
                        listing(json!({"id": "a1"})),
                        listing(json!({"id": "a2"})),
                    ]),
                ),
                ("Boston".into(), Err(StayScoutError::search("backend down"))),
                ("Chicago".into(), Ok(vec![listing(json!({"id": "c1"}))])),
            ],
            ..Default::default()
        };
        let adapter = ListingSearchAdapter::new(source, true);

        let listings = adapter
            .search(&preferences(&["Austin", "Boston", "Chicago"]))
            .await;

        assert_eq!(ids(&listings), vec!["a1", "a2", "c1"]);
        let searched: Vec<String> = adapter
            .source
            .searches
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.location.clone())
            .collect();
        assert_eq!(searched, vec!["Austin", "Boston", "Chicago"]);
    }

    #[tokio::test]
    async fn test_details_are_merged_over_search_fields() {
        let source = FakeSource {
            results: vec![(
                "Austin".into(),
                Ok(vec![listing(json!({"id": "a1", "price": 100, "name": "Loft"}))]),
            )],
            ..Default::default()
        };
        let adapter = ListingSearchAdapter::new(source, true);

        let listings = adapter.search(&preferences(&["Austin"])).await;

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price(), Some("a1-detail".into()));
        assert_eq!(listings[0].name(), Some("Loft".into()));
        assert_eq!(listings[0].field("detailed"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_failed_detail_lookup_keeps_listing() {
        let source = FakeSource {
            results: vec![(
                "Austin".into(),
                Ok(vec![
                    listing(json!({"id": "a1", "price": 100})),
                    listing(json!({"id": "a2", "price": 90})),
                ]),
            )],
            failing_details: vec!["a1".into()],
            ..Default::default()
        };
        let adapter = ListingSearchAdapter::new(source, true);

        let listings = adapter.search(&preferences(&["Austin"])).await;

        assert_eq!(ids(&listings), vec!["a1", "a2"]);
        assert_eq!(listings[0].price(), Some("100".into()));
        assert!(listings[0].field("detailed").is_none());
        assert_eq!(listings[1].price(), Some("a2-detail".into()));
    }

    #[tokio::test]
    async fn test_listing_without_id_is_kept_unenriched() {
        let source = FakeSource {
            results: vec![("Austin".into(), Ok(vec![listing(json!({"name": "Mystery"}))]))],
            ..Default::default()
        };
        let adapter = ListingSearchAdapter::new(source, true);

        let listings = adapter.search(&preferences(&["Austin"])).await;

        assert_eq!(listings.len(), 1);
        assert!(listings[0].field("detailed").is_none());
    }

    #[tokio::test]
    async fn test_all_locations_failing_yields_empty() {
        let source = FakeSource {
            results: vec![("Austin".into(), Err(StayScoutError::search("nope")))],
            ..Default::default()
        };
        let adapter = ListingSearchAdapter::new(source, true);

        assert!(adapter.search(&preferences(&["Austin"])).await.is_empty());
    }
}
