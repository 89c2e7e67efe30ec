use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::error::ForecastError;

pub const DEFAULT_LANGUAGE: &str = "es";
pub const DEFAULT_DAYS: u32 = 1;
pub const MIN_DAYS: u32 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CITY: &str = "Vigo";

/// Resolved settings for one invocation.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// language = "en"
/// days = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub language: String,
    pub days: u32,
    pub timeout_secs: u64,
    pub city: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
            days: DEFAULT_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            city: DEFAULT_CITY.to_string(),
        }
    }
}

impl Config {
    /// Config file, then an optional `.env`, then the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(%err, ".env file not loaded");
        }

        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        ensure!(cfg.days >= MIN_DAYS, "days must be at least {MIN_DAYS}, got {}", cfg.days);
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cliweather", "cliweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay `WEATHER_*` variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("WEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(lang) = get("WEATHER_LANG") {
            self.language = lang;
        }
        if let Some(city) = get("WEATHER_CITY") {
            self.city = city;
        }
        if let Some(days) = get("WEATHER_DAYS") {
            let parsed: u32 = days
                .trim()
                .parse()
                .with_context(|| format!("WEATHER_DAYS is not a positive integer: {days:?}"))?;
            ensure!(parsed >= MIN_DAYS, "WEATHER_DAYS is not a positive integer: {days:?}");
            self.days = parsed;
        }
        if let Some(secs) = get("WEATHER_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().with_context(|| {
                format!("WEATHER_TIMEOUT_SECS is not a number of seconds: {secs:?}")
            })?;
        }

        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, ForecastError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ForecastError::configuration(
                    "missing WEATHER_API_KEY (export WEATHER_API_KEY=<key>, pass --apikey, \
                     or run `cliweather configure`)",
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_tool_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.language, "es");
        assert_eq!(cfg.days, 1);
        assert_eq!(cfg.city, "Vigo");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config { language: "fr".into(), ..Config::default() };
        cfg.apply_env(env(&[
            ("WEATHER_API_KEY", "KEY"),
            ("WEATHER_LANG", "en"),
            ("WEATHER_DAYS", "3"),
            ("WEATHER_TIMEOUT_SECS", "5"),
        ]))
        .expect("valid env");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.days, 3);
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };
        cfg.apply_env(env(&[("WEATHER_API_KEY", ""), ("WEATHER_LANG", "  ")]))
            .expect("valid env");

        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));
        assert_eq!(cfg.language, "es");
    }

    #[test]
    fn bad_day_count_names_variable() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("WEATHER_DAYS", "tres")])).unwrap_err();
        assert!(err.to_string().contains("WEATHER_DAYS"));
    }

    #[test]
    fn zero_days_from_env_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("WEATHER_DAYS", "0")])).unwrap_err();

        assert!(err.to_string().contains("WEATHER_DAYS"));
        assert_eq!(cfg.days, DEFAULT_DAYS);
    }

    #[test]
    fn zero_days_in_config_file_is_rejected() {
        let err = Config::from_toml("days = 0").unwrap_err();
        assert!(err.to_string().contains("at least 1"));
        assert_eq!(Config::from_toml("days = 2").expect("valid").days, 2);
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let cfg = Config { api_key: Some("   ".into()), ..Config::default() };
        let err = cfg.require_api_key().unwrap_err();
        assert!(matches!(err, ForecastError::Configuration(_)));
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            language: "en".into(),
            days: 2,
            timeout_secs: 4,
            city: "Madrid".into(),
        };
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = Config::from_toml("language = \"en\"").expect("parse");
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.days, DEFAULT_DAYS);
        assert_eq!(cfg.city, DEFAULT_CITY);
    }
}
