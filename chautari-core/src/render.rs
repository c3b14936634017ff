//! Pure payload -> display model mapping.

use serde::Serialize;

use crate::WeatherPayload;

pub const UNAVAILABLE_TEXT: &str = "Weather data unavailable";

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayModel {
    Weather {
        temperature: String,
        description: String,
        icon_url: Option<String>,
        humidity: Option<String>,
        wind: Option<String>,
        forecast: Vec<ForecastCell>,
    },
    Unavailable {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCell {
    pub date: String,
    pub icon_url: Option<String>,
    pub range: String,
}

impl DisplayModel {
    pub fn unavailable() -> Self {
        Self::Unavailable {
            message: UNAVAILABLE_TEXT.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Never fails: anything without usable current conditions renders the fallback.
pub fn render(payload: Option<&WeatherPayload>) -> DisplayModel {
    let Some(payload) = payload.filter(|p| p.error_message().is_none()) else {
        return DisplayModel::unavailable();
    };
    let Some(current) = payload.current.as_ref() else {
        return DisplayModel::unavailable();
    };

    DisplayModel::Weather {
        temperature: format!("{}°C", degrees(current.temp)),
        description: current.description.clone(),
        icon_url: icon_url(&current.icon),
        humidity: current
            .humidity
            .filter(|h| h.is_finite())
            .map(|h| format!("Humidity: {}%", h.round())),
        wind: current
            .wind_speed
            .filter(|w| w.is_finite())
            .map(|w| format!("Wind: {w} m/s")),
        forecast: payload
            .forecast
            .iter()
            .map(|day| ForecastCell {
                date: day.date.clone(),
                icon_url: icon_url(&day.icon),
                range: format!("{}° / {}°", degrees(day.temp_max), degrees(day.temp_min)),
            })
            .collect(),
    }
}

fn degrees(value: f64) -> String {
    if value.is_finite() {
        // avoid "-0"
        format!("{}", value.round() + 0.0)
    } else {
        "--".to_string()
    }
}

fn icon_url(icon: &str) -> Option<String> {
    let icon = icon.trim();
    if icon.is_empty() {
        None
    } else {
        Some(format!("{ICON_BASE_URL}/{icon}@2x.png"))
    }
}
