use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{DetailQuery, ListingSource, SearchQuery};
use crate::config::SearchConfig;
use crate::models::Listing;
use crate::{Result, StayScoutError};

/// HTTP client for an OpenBnB-style listing search service
pub struct OpenBnbClient {
    client: Client,
    base_url: String,
}

/// Search response from the listing service
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default, alias = "searchResults")]
    pub listings: Vec<Map<String, Value>>,
}

impl OpenBnbClient {
    /// Create a new client
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("StayScout/", env!("CARGO_PKG_VERSION")));
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| StayScoutError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/search?location={}&checkin={}&checkout={}&adults={}&minPrice={}&maxPrice={}",
            self.base_url,
            urlencoding::encode(&query.location),
            query.checkin.format("%Y-%m-%d"),
            query.checkout.format("%Y-%m-%d"),
            query.adults,
            query.min_price,
            query.max_price,
        );
        if let Some(bedrooms) = query.min_bedrooms {
            url.push_str(&format!("&minBedrooms={bedrooms}"));
        }
        url.push_str(&format!("&ignoreRobotsText={}", query.allow_restricted_access));
        url
    }

    fn details_url(&self, query: &DetailQuery) -> String {
        format!(
            "{}/listings/{}?checkin={}&checkout={}&adults={}&ignoreRobotsText={}",
            self.base_url,
            urlencoding::encode(&query.id),
            query.checkin.format("%Y-%m-%d"),
            query.checkout.format("%Y-%m-%d"),
            query.adults,
            query.allow_restricted_access,
        )
    }
}

/// Map a non-success status to a search error
fn status_error(status: StatusCode, body: &str) -> StayScoutError {
    match status.as_u16() {
        401 | 403 => StayScoutError::search(format!(
            "Listing service rejected the request ({status})"
        )),
        429 => StayScoutError::search("Listing service rate limit exceeded"),
        _ => StayScoutError::search(format!("Listing service error {status}: {body}")),
    }
}

#[async_trait]
impl ListingSource for OpenBnbClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>> {
        info!("Searching listings in {}", query.location);
        let start = Instant::now();

        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| StayScoutError::search(format!("Search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            StayScoutError::search(format!("Failed to parse search response: {e}"))
        })?;

        debug!(
            location = %query.location,
            duration_ms = start.elapsed().as_millis(),
            "Listing search"
        );

        Ok(search_response
            .listings
            .into_iter()
            .map(Listing::from)
            .collect())
    }

    async fn get_details(&self, query: &DetailQuery) -> Result<Option<Map<String, Value>>> {
        let start = Instant::now();

        let response = self
            .client
            .get(self.details_url(query))
            .send()
            .await
            .map_err(|e| StayScoutError::search(format!("Detail request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let details: Value = response.json().await.map_err(|e| {
            StayScoutError::search(format!("Failed to parse listing details: {e}"))
        })?;

        debug!(
            id = %query.id,
            duration_ms = start.elapsed().as_millis(),
            "Listing details"
        );

        match details {
            Value::Object(map) => Ok(Some(map)),
            Value::Null => Ok(None),
            other => Err(StayScoutError::search(format!(
                "Unexpected listing details payload: {other}"
            ))),
        }
    }
}
