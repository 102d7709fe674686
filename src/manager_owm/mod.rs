pub mod errors;
mod models;

use std::time::Duration;
use log::debug;
use reqwest::Client;
use crate::manager_owm::errors::OWMError;
use crate::manager_owm::models::{FullCurrent, FullForecast};
use crate::models::{ForecastSeries, RawSample};

/// Struct for fetching current weather and forecasts from OpenWeatherMap
pub struct OWM {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl OWM {
    /// Returns an OWM struct ready for fetching weather data
    ///
    /// # Arguments
    ///
    /// * 'base_url' - service root, e.g. https://api.openweathermap.org
    /// * 'api_key' - OpenWeatherMap api key
    /// * 'language' - language code for condition descriptions
    pub fn new(base_url: &str, api_key: &str, language: &str) -> Result<OWM, OWMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        })
    }

    /// Retrieves current weather conditions for a location
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'long' - longitude of the location
    pub async fn fetch_current(&self, lat: f64, long: f64) -> Result<RawSample, OWMError> {
        let json = self.get_document("weather", lat, long).await?;
        let current: FullCurrent = serde_json::from_str(&json)?;

        current.into_sample()
    }

    /// Retrieves the multi-day forecast (3-hour steps) for a location together with the
    /// location's offset from UTC
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'long' - longitude of the location
    pub async fn fetch_series(&self, lat: f64, long: f64) -> Result<ForecastSeries, OWMError> {
        let json = self.get_document("forecast", lat, long).await?;
        let forecast: FullForecast = serde_json::from_str(&json)?;

        forecast.into_series()
    }

    async fn get_document(&self, endpoint: &str, lat: f64, long: f64) -> Result<String, OWMError> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);
        debug!("fetching {} for lat {:0.4} long {:0.4}", url, lat, long);

        let req = self.client
            .get(url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", long.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", self.language.clone()),
            ])
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(OWMError::Transport(format!("Error while fetching {} from OpenWeatherMap: {}", endpoint, status)));
        }

        Ok(req.text().await?)
    }
}
