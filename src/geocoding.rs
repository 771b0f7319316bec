//! Forward geocoding through OpenStreetMap Nominatim
//!
//! Nominatim answers a free-text search with an ordered array of candidates.
//! An empty array is a valid answer meaning "no match".

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;

/// One geocoding candidate, coordinates still string-encoded as the provider sends them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(rename = "lat")]
    pub latitude: String,
    #[serde(rename = "lon")]
    pub longitude: String,
    pub display_name: String,
}

/// Free-text geocoding collaborator
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Search for `query`, returning at most `limit` candidates in provider order
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeCandidate>>;
}

/// Nominatim search client
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .with_context(|| "Failed to create geocoding HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/search?format=json&q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self), fields(query = query))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeCandidate>> {
        let start_time = Instant::now();
        let url = self.search_url(query, limit);
        debug!("Nominatim request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{query}' failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Nominatim returned HTTP {}", status);
            bail!(
                "Geocoding request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
        }

        let mut candidates: Vec<GeocodeCandidate> = response
            .json()
            .await
            .with_context(|| "Failed to parse Nominatim search response")?;
        candidates.truncate(limit);

        info!(
            "Found {} geocoding candidates for '{}' in {:.3}s",
            candidates.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        let config = GeocodingConfig {
            base_url: server.uri(),
            user_agent: "climascope-test".to_string(),
            timeout_seconds: 5,
        };
        NominatimGeocoder::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_query_and_parses_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("format", "json"))
            .and(query_param("q", "São Paulo"))
            .and(query_param("limit", "1"))
            .and(header("user-agent", "climascope-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "place_id": 1,
                    "lat": "-23.5506507",
                    "lon": "-46.6333824",
                    "display_name": "São Paulo, Região Imediata de São Paulo, Brasil",
                    "importance": 0.9
                }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let candidates = geocoder(&mock_server).search("São Paulo", 1).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, "-23.5506507");
        assert_eq!(candidates[0].longitude, "-46.6333824");
        assert!(candidates[0].display_name.starts_with("São Paulo,"));
    }

    #[tokio::test]
    async fn test_search_empty_array_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let candidates = geocoder(&mock_server).search("Nowhere", 1).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = geocoder(&mock_server).search("Mumbai", 1).await;
        assert!(result.unwrap_err().to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&mock_server)
            .await;

        let result = geocoder(&mock_server).search("Mumbai", 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_truncates_to_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "1.0", "lon": "2.0", "display_name": "First"},
                {"lat": "3.0", "lon": "4.0", "display_name": "Second"}
            ])))
            .mount(&mock_server)
            .await;

        let candidates = geocoder(&mock_server).search("Somewhere", 1).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "First");
    }
}
