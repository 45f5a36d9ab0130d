//! Nominatim (OpenStreetMap) client.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::{GeocodeLookup, GeocodePlace, Result};
use crate::models::config::GeocodingConfig;

/// Blocking Nominatim search client.
///
/// Every lookup sleeps for the configured delay first; the public instance
/// caps clients at one request per second. No caching and no retry.
pub struct NominatimClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    delay: Duration,
}

impl NominatimClient {
    /// Build a client from the geocoding configuration.
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            delay: Duration::from_millis(config.delay_ms),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    class: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    display_name: String,
}

impl GeocodeLookup for NominatimClient {
    fn lookup(&self, name: &str) -> Result<Option<GeocodePlace>> {
        std::thread::sleep(self.delay);

        let results: Vec<SearchResult> = self
            .client
            .get(&self.endpoint)
            .query(&[("q", name), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        let place = results.into_iter().next().map(|r| GeocodePlace {
            class: r.class,
            kind: r.kind,
            display_name: r.display_name,
        });
        debug!(candidate = name, matched = place.is_some(), "geocoding lookup");
        Ok(place)
    }
}
