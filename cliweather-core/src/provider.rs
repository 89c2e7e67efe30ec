use crate::{Config, ForecastError, WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod weatherapi;

/// Parameters of one forecast lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// City name or any query the API accepts (coordinates, postcode, ...).
    pub location: String,
    pub language: String,
    /// Forwarded as-is; the API tier decides how many days come back.
    pub days: u32,
    pub air_quality: bool,
    pub alerts: bool,
    pub timeout: Duration,
}

impl ForecastRequest {
    /// A request for `location` using the configured language, days and deadline.
    pub fn from_config(location: impl Into<String>, config: &Config) -> Self {
        Self {
            location: location.into(),
            language: config.language.clone(),
            days: config.days,
            air_quality: false,
            alerts: false,
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, request: &ForecastRequest) -> Result<WeatherSnapshot, ForecastError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>, ForecastError> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(WeatherApiProvider::new(api_key.to_owned())))
}
