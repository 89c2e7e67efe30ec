use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a single forecast lookup.
///
/// None of these are retried inside the client; the caller decides how to
/// report them and which exit status to use.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Missing or unusable configuration, detected before any request is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// DNS, connect, timeout or body read failure.
    #[error("request to the forecast API failed: {0}")]
    Transport(#[source] BoxError),

    /// The API answered with a status >= 300.
    #[error("weatherapi: http {status}")]
    Api { status: u16 },

    /// The response body was not valid forecast JSON.
    #[error("failed to parse forecast JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ForecastError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport(source.into())
    }
}

/// A day index outside the forecast range. Reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DayIndexError {
    #[error("Invalid day index {index} (available: 0..{last})")]
    OutOfRange { index: usize, last: usize },

    #[error("Invalid day index {index} (no forecast days available)")]
    NoDays { index: usize },
}

impl DayIndexError {
    pub fn new(index: usize, available: usize) -> Self {
        match available.checked_sub(1) {
            Some(last) => Self::OutOfRange { index, last },
            None => Self::NoDays { index },
        }
    }
}
