//! Core library for the `cliweather` CLI.
//!
//! This crate defines:
//! - Configuration loading (config file, `.env`, environment)
//! - The WeatherAPI.com forecast client and its HTTP transport seam
//! - The decoded forecast snapshot model
//! - The terminal renderer (ANSI colors, emoji)
//!
//! Data flows one way: config -> provider -> snapshot -> renderer.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod transport;

pub use config::Config;
pub use error::{DayIndexError, ForecastError};
pub use model::{Astro, Current, ForecastDay, HourSample, Location, WeatherSnapshot};
pub use provider::{ForecastProvider, ForecastRequest, provider_from_config};
pub use render::{DisplayOptions, Renderer};
