use async_trait::async_trait;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{
    error::ForecastError,
    model::{Astro, Current, ForecastDay, HourSample, Location, WeatherSnapshot},
    provider::{ForecastProvider, ForecastRequest},
    transport::{HttpRequest, HttpTransport, ReqwestTransport},
};

pub const FORECAST_URL: &str = "https://api.weatherapi.com/v1/forecast.json";
pub const USER_AGENT: &str = concat!("cliweather/", env!("CARGO_PKG_VERSION"));

/// Client for the WeatherAPI.com forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider<T = ReqwestTransport> {
    api_key: String,
    transport: T,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_transport(api_key, ReqwestTransport)
    }
}

impl<T: HttpTransport> WeatherApiProvider<T> {
    pub fn with_transport(api_key: String, transport: T) -> Self {
        Self { api_key, transport }
    }

    /// One GET against the forecast endpoint, decoded into a snapshot.
    ///
    /// Nothing is retried. An empty key fails before any request is sent.
    pub async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<WeatherSnapshot, ForecastError> {
        let http_request = self.build_request(request)?;

        tracing::debug!(
            location = %request.location,
            lang = %request.language,
            days = request.days,
            "requesting forecast"
        );

        let res = self.transport.get(&http_request).await?;

        if res.status >= 300 {
            tracing::debug!(
                status = res.status,
                body = %truncate_body(&res.body),
                "forecast API rejected request"
            );
            return Err(ForecastError::Api { status: res.status });
        }

        let snapshot = decode(&res.body)?;
        tracing::debug!(days = snapshot.forecast_days.len(), "forecast decoded");
        Ok(snapshot)
    }

    fn build_request(&self, request: &ForecastRequest) -> Result<HttpRequest, ForecastError> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(ForecastError::configuration("WeatherAPI key is empty"));
        }

        let query = [
            ("key", api_key.to_string()),
            ("q", request.location.clone()),
            ("lang", request.language.clone()),
            ("days", request.days.to_string()),
            ("aqi", yes_no(request.air_quality).to_string()),
            ("alerts", yes_no(request.alerts).to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Ok(HttpRequest {
            url: FORECAST_URL.to_string(),
            query,
            user_agent: USER_AGENT.to_string(),
            timeout: request.timeout,
        })
    }
}

#[async_trait]
impl<T: HttpTransport> ForecastProvider for WeatherApiProvider<T> {
    async fn forecast(&self, request: &ForecastRequest) -> Result<WeatherSnapshot, ForecastError> {
        self.fetch_forecast(request).await
    }
}

/// Decode a forecast.json body. Unknown fields are ignored and missing ones
/// take their zero value.
pub fn decode(body: &str) -> Result<WeatherSnapshot, ForecastError> {
    let parsed: WaForecastResponse = serde_json::from_str(body)?;
    Ok(parsed.into())
}

/// Write a snapshot back out in the forecast.json shape, so `decode` reads
/// it back unchanged.
pub fn encode_pretty<W: Write>(writer: W, snapshot: &WeatherSnapshot) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &WaForecastResponse::from(snapshot))
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaCurrent {
    last_updated_epoch: i64,
    temp_c: f64,
    condition: WaCondition,
    wind_kph: f64,
    humidity: i64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    daily_chance_of_rain: i64,
    daily_will_it_rain: i64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaAstro {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaHour {
    time_epoch: i64,
    temp_c: f64,
    condition: WaCondition,
    chance_of_rain: f64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaForecastDay {
    day: WaDay,
    astro: WaAstro,
    hour: Vec<WaHour>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl From<WaForecastResponse> for WeatherSnapshot {
    fn from(wa: WaForecastResponse) -> Self {
        Self {
            location: Location { name: wa.location.name, country: wa.location.country },
            current: Current {
                observed_at_epoch: wa.current.last_updated_epoch,
                temperature_c: wa.current.temp_c,
                condition: wa.current.condition.text,
                wind_kph: wa.current.wind_kph,
                humidity_pct: wa.current.humidity,
            },
            forecast_days: wa.forecast.forecastday.into_iter().map(ForecastDay::from).collect(),
        }
    }
}

impl From<WaForecastDay> for ForecastDay {
    fn from(wa: WaForecastDay) -> Self {
        Self {
            max_temp_c: wa.day.maxtemp_c,
            min_temp_c: wa.day.mintemp_c,
            daily_chance_of_rain_pct: wa.day.daily_chance_of_rain,
            daily_will_rain: wa.day.daily_will_it_rain,
            astro: Astro { sunrise: wa.astro.sunrise, sunset: wa.astro.sunset },
            hours: wa
                .hour
                .into_iter()
                .map(|h| HourSample {
                    epoch: h.time_epoch,
                    temperature_c: h.temp_c,
                    condition: h.condition.text,
                    chance_of_rain_pct: h.chance_of_rain,
                })
                .collect(),
        }
    }
}

impl From<&WeatherSnapshot> for WaForecastResponse {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        let current = &snapshot.current;
        Self {
            location: WaLocation {
                name: snapshot.location.name.clone(),
                country: snapshot.location.country.clone(),
            },
            current: WaCurrent {
                last_updated_epoch: current.observed_at_epoch,
                temp_c: current.temperature_c,
                condition: WaCondition { text: current.condition.clone() },
                wind_kph: current.wind_kph,
                humidity: current.humidity_pct,
            },
            forecast: WaForecast {
                forecastday: snapshot.forecast_days.iter().map(WaForecastDay::from).collect(),
            },
        }
    }
}

impl From<&ForecastDay> for WaForecastDay {
    fn from(day: &ForecastDay) -> Self {
        Self {
            day: WaDay {
                maxtemp_c: day.max_temp_c,
                mintemp_c: day.min_temp_c,
                daily_chance_of_rain: day.daily_chance_of_rain_pct,
                daily_will_it_rain: day.daily_will_rain,
            },
            astro: WaAstro { sunrise: day.astro.sunrise.clone(), sunset: day.astro.sunset.clone() },
            hour: day
                .hours
                .iter()
                .map(|h| WaHour {
                    time_epoch: h.epoch,
                    temp_c: h.temperature_c,
                    condition: WaCondition { text: h.condition.clone() },
                    chance_of_rain: h.chance_of_rain_pct,
                })
                .collect(),
        }
    }
}
