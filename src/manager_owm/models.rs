use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_with::{serde_as, TimestampSeconds};
use crate::manager_owm::errors::OWMError;
use crate::models::{ForecastSeries, RawSample};

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub id: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainValues {
    pub temp: f64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct FullCurrent {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
    pub main: MainValues,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct FullForecastItem {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
    pub main: MainValues,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct City {
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct FullForecast {
    #[serde(default)]
    pub list: Vec<FullForecastItem>,
    pub city: City,
}

impl FullCurrent {
    /// Converts the document into a sample, the first weather condition is the primary one
    ///
    pub fn into_sample(self) -> Result<RawSample, OWMError> {
        let condition = self.weather
            .into_iter()
            .next()
            .ok_or_else(|| OWMError::NoData("no weather conditions in current weather".to_string()))?;

        Ok(RawSample {
            timestamp: self.dt,
            temperature: self.main.temp,
            condition_code: condition.id,
            description: condition.description,
        })
    }
}

impl FullForecast {
    /// Converts the document into a forecast series.
    /// Items lacking a weather condition are skipped.
    ///
    pub fn into_series(self) -> Result<ForecastSeries, OWMError> {
        if self.list.is_empty() {
            return Err(OWMError::NoData("empty forecast list".to_string()));
        }

        let samples = self.list
            .into_iter()
            .filter_map(|item| match item.weather.into_iter().next() {
                Some(condition) => Some(RawSample {
                    timestamp: item.dt,
                    temperature: item.main.temp,
                    condition_code: condition.id,
                    description: condition.description,
                }),
                None => {
                    warn!("skipping forecast item at {} without weather condition", item.dt);
                    None
                }
            })
            .collect::<Vec<RawSample>>();

        Ok(ForecastSeries { samples, utc_offset_seconds: self.city.timezone })
    }
}
