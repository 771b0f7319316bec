//! NASA POWER daily point client
//!
//! POWER answers a daily point request with one date-keyed series per
//! requested parameter under `properties.parameter`.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;

/// Mean air temperature at 2 m
pub const TEMPERATURE: &str = "T2M";
/// Precipitation, bias corrected
pub const PRECIPITATION: &str = "PRECTOTCORR";
/// Relative humidity at 2 m
pub const HUMIDITY: &str = "RH2M";

/// Value POWER reports when it has no data for a day
pub const FILL_VALUE: f64 = -999.0;

/// Date-keyed values of one parameter; `None` where the provider sent null
pub type DailySeries = BTreeMap<String, Option<f64>>;

/// One single-day request for the three observed parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPointRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// YYYYMMDD
    pub date: String,
}

/// Series returned for a daily point request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyParameters {
    #[serde(rename = "T2M", default)]
    pub temperature: DailySeries,
    #[serde(rename = "PRECTOTCORR", default)]
    pub precipitation: DailySeries,
    #[serde(rename = "RH2M", default)]
    pub humidity: DailySeries,
}

impl DailyParameters {
    /// Values for `date`, with fill values and nulls mapped to `None`
    #[must_use]
    pub fn values_on(&self, date: &str) -> (Option<f64>, Option<f64>, Option<f64>) {
        let pick = |series: &DailySeries| {
            series
                .get(date)
                .copied()
                .flatten()
                .filter(|value| *value != FILL_VALUE)
        };
        (
            pick(&self.temperature),
            pick(&self.precipitation),
            pick(&self.humidity),
        )
    }
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: DailyParameters,
}

/// Weather data collaborator
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn daily_point(&self, request: &DailyPointRequest) -> Result<DailyParameters>;
}

/// HTTP client for the POWER daily point endpoint
#[derive(Debug, Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
    community: String,
}

impl PowerClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(format!("climascope/{}", crate::VERSION))
            .build()
            .with_context(|| "Failed to create weather HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            community: config.community.clone(),
        })
    }

    fn daily_point_url(&self, request: &DailyPointRequest) -> String {
        format!(
            "{}/temporal/daily/point?parameters={},{},{}&community={}&longitude={}&latitude={}&start={}&end={}&format=JSON",
            self.base_url,
            TEMPERATURE,
            PRECIPITATION,
            HUMIDITY,
            urlencoding::encode(&self.community),
            request.longitude,
            request.latitude,
            request.date,
            request.date
        )
    }
}

#[async_trait]
impl WeatherSource for PowerClient {
    #[instrument(
        skip(self),
        fields(lat = request.latitude, lon = request.longitude, date = %request.date)
    )]
    async fn daily_point(&self, request: &DailyPointRequest) -> Result<DailyParameters> {
        let start_time = Instant::now();
        let url = self.daily_point_url(request);
        debug!("POWER request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "POWER request failed")?;

        let status = response.status();
        if !status.is_success() {
            warn!("POWER returned HTTP {}", status);
            bail!("NASA API request failed with status: {}", status);
        }

        let body: PowerResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse POWER daily point response")?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved POWER daily point in {:.3}s",
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!("Slow POWER response: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(body.properties.parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PowerClient {
        let config = WeatherConfig {
            base_url: server.uri(),
            community: "RE".to_string(),
            timeout_seconds: 5,
            lag_days: 2,
        };
        PowerClient::new(&config).unwrap()
    }

    fn request() -> DailyPointRequest {
        DailyPointRequest {
            latitude: 19.076,
            longitude: 72.8777,
            date: "20261016".to_string(),
        }
    }

    #[tokio::test]
    async fn test_daily_point_request_shape_and_parsing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/temporal/daily/point"))
            .and(query_param("parameters", "T2M,PRECTOTCORR,RH2M"))
            .and(query_param("community", "RE"))
            .and(query_param("latitude", "19.076"))
            .and(query_param("longitude", "72.8777"))
            .and(query_param("start", "20261016"))
            .and(query_param("end", "20261016"))
            .and(query_param("format", "JSON"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [72.8777, 19.076, 9.0]},
                "properties": {
                    "parameter": {
                        "T2M": {"20261016": 29.4},
                        "PRECTOTCORR": {"20261016": 0.0},
                        "RH2M": {"20261016": null}
                    }
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let parameters = client(&mock_server).daily_point(&request()).await.unwrap();

        assert_eq!(
            parameters.values_on("20261016"),
            (Some(29.4), Some(0.0), None)
        );
    }

    #[tokio::test]
    async fn test_daily_point_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).daily_point(&request()).await;
        assert!(result.unwrap_err().to_string().contains("422"));
    }

    #[tokio::test]
    async fn test_daily_point_missing_properties_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": ["temporarily unavailable"]
            })))
            .mount(&mock_server)
            .await;

        assert!(client(&mock_server).daily_point(&request()).await.is_err());
    }

    #[test]
    fn test_values_on_filters_fill_value_and_missing_dates() {
        let parameters = DailyParameters {
            temperature: BTreeMap::from([("20261016".to_string(), Some(FILL_VALUE))]),
            precipitation: BTreeMap::from([("20261015".to_string(), Some(3.0))]),
            humidity: BTreeMap::from([("20261016".to_string(), Some(71.2))]),
        };
        assert_eq!(parameters.values_on("20261016"), (None, None, Some(71.2)));
    }
}
