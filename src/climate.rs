//! Latest daily observation for a coordinate pair.
//!
//! The fetch never fails: any provider error degrades to a synthetic
//! observation so a lookup always has something to show.

use chrono::{Days, Local, NaiveDate};
use tracing::{info, instrument, warn};

use crate::models::Observation;
use crate::weather::{DailyPointRequest, WeatherSource};

/// POWER publishes with a short delay; yesterday is often still empty.
pub const DEFAULT_LAG_DAYS: u32 = 2;

/// YYYYMMDD date `lag_days` before `today`
#[must_use]
pub fn target_date(today: NaiveDate, lag_days: u32) -> String {
    today
        .checked_sub_days(Days::new(lag_days.into()))
        .unwrap_or(today)
        .format("%Y%m%d")
        .to_string()
}

pub struct ClimateDataFetcher<W> {
    source: W,
    lag_days: u32,
}

impl<W: WeatherSource> ClimateDataFetcher<W> {
    pub fn new(source: W) -> Self {
        Self {
            source,
            lag_days: DEFAULT_LAG_DAYS,
        }
    }

    #[must_use]
    pub fn with_lag_days(mut self, lag_days: u32) -> Self {
        self.lag_days = lag_days;
        self
    }

    pub fn source(&self) -> &W {
        &self.source
    }

    /// Observation for the configured number of days before today (local time)
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Observation {
        self.fetch_for_date(latitude, longitude, Local::now().date_naive())
            .await
    }

    /// Observation relative to an explicit `today`
    #[instrument(skip(self))]
    pub async fn fetch_for_date(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
    ) -> Observation {
        let request = DailyPointRequest {
            latitude,
            longitude,
            date: target_date(today, self.lag_days),
        };

        match self.source.daily_point(&request).await {
            Ok(parameters) => {
                let (temperature, rainfall, humidity) = parameters.values_on(&request.date);
                if temperature.is_none() || rainfall.is_none() || humidity.is_none() {
                    warn!(
                        "Incomplete observation for {}, substituting defaults for missing values",
                        request.date
                    );
                }
                let observation = Observation::live(request.date, temperature, rainfall, humidity);
                info!(
                    "Live observation: {} / {} / {}",
                    observation.format_temperature(),
                    observation.format_rainfall(),
                    observation.format_humidity()
                );
                observation
            }
            Err(e) => {
                let observation = Observation::synthetic();
                warn!(
                    synthetic = true,
                    "Weather fetch failed, using SYNTHETIC fallback data: {:#}", e
                );
                observation
            }
        }
    }
}
