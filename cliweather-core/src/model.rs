use crate::error::DayIndexError;

/// One decoded forecast response. Built once per lookup, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: Current,
    /// Chronological, in the order the API returned them.
    pub forecast_days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Current {
    pub observed_at_epoch: i64,
    pub temperature_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub humidity_pct: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastDay {
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub daily_chance_of_rain_pct: i64,
    pub daily_will_rain: i64,
    pub astro: Astro,
    /// Usually 24 entries, but may be shorter or empty.
    pub hours: Vec<HourSample>,
}

/// Sunrise and sunset as the API formats them, e.g. `"08:00 AM"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourSample {
    pub epoch: i64,
    pub temperature_c: f64,
    pub condition: String,
    pub chance_of_rain_pct: f64,
}

impl WeatherSnapshot {
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.location.name, self.location.country)
    }

    pub fn day(&self, index: usize) -> Result<&ForecastDay, DayIndexError> {
        self.forecast_days
            .get(index)
            .ok_or_else(|| DayIndexError::new(index, self.forecast_days.len()))
    }
}

impl ForecastDay {
    /// Mean of the hourly temperatures, or `fallback` when there are no hours.
    pub fn average_temp_c(&self, fallback: f64) -> f64 {
        if self.hours.is_empty() {
            return fallback;
        }
        let sum: f64 = self.hours.iter().map(|h| h.temperature_c).sum();
        sum / self.hours.len() as f64
    }

    /// Condition of the middle hour sample, or `fallback` when there are no hours.
    pub fn representative_condition<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.hours
            .get(self.hours.len() / 2)
            .map(|h| h.condition.as_str())
            .unwrap_or(fallback)
    }

    pub fn first_hour_epoch(&self) -> Option<i64> {
        self.hours.first().map(|h| h.epoch)
    }
}
