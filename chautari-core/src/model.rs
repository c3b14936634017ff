use serde::{Deserialize, Serialize};

/// Body of `GET /api/weather/{lat}/{lon}`.
///
/// The schema belongs to the server-side proxy; only presence is checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeatherPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    /// Error marker, either `true` or a message string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(default)]
    pub icon: String,
    pub temp_max: f64,
    pub temp_min: f64,
}

impl WeatherPayload {
    /// The error marker as text, if the payload carries one.
    ///
    /// `false` and `null` markers are not errors.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Bool(false) | serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.error_message().is_none() && self.current.is_some()
    }

    /// Sample data served when no upstream weather key is configured.
    pub fn demo() -> Self {
        let day = |date: &str, temp_max: f64, temp_min: f64, icon: &str| ForecastDay {
            date: date.to_string(),
            icon: icon.to_string(),
            temp_max,
            temp_min,
        };

        Self {
            current: Some(CurrentConditions {
                temp: 22.0,
                description: "Clear sky".to_string(),
                icon: "01d".to_string(),
                humidity: Some(65.0),
                wind_speed: Some(3.5),
            }),
            forecast: vec![
                day("Today", 25.0, 18.0, "01d"),
                day("Tomorrow", 23.0, 16.0, "02d"),
                day("Day 3", 24.0, 17.0, "03d"),
            ],
            error: None,
        }
    }
}
