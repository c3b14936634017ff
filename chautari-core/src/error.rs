use std::time::Duration;

/// Failures of a single weather lookup.
///
/// Cloneable so that one in-flight request can hand the same outcome to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid coordinates: ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Weather request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Weather endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Weather data unavailable: {0}")]
    Unavailable(String),
}

impl WeatherError {
    /// Whether a later attempt (the next refresh tick) may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            Self::InvalidCoordinates { .. } | Self::Parse(_) | Self::Unavailable(_) => false,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Invalid values in a [`crate::WeatherConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must not exceed {max} ms (got {value})")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },
    #[error("base_url must not be empty")]
    EmptyBaseUrl,
}
