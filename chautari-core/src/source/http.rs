use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::WeatherSource;
use crate::{WeatherConfig, WeatherError, WeatherPayload, cache::CacheKey};

const USER_AGENT: &str = concat!("chautari/", env!("CARGO_PKG_VERSION"));

/// Fetches `GET {base_url}/api/weather/{lat}/{lon}` from the site's weather proxy.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn url_for(&self, key: CacheKey) -> String {
        format!(
            "{}/api/weather/{:.4}/{:.4}",
            self.base_url,
            key.latitude(),
            key.longitude()
        )
    }

    fn classify(&self, err: reqwest::Error) -> WeatherError {
        if err.is_timeout() {
            WeatherError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl WeatherSource for HttpSource {
    async fn fetch(&self, key: CacheKey) -> Result<WeatherPayload, WeatherError> {
        let url = self.url_for(key);
        tracing::debug!(%url, "Fetching weather");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: WeatherPayload =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        if let Some(message) = payload.error_message() {
            return Err(WeatherError::Unavailable(message));
        }

        if payload.current.is_none() {
            return Err(WeatherError::Unavailable(
                "response has no current conditions".to_string(),
            ));
        }

        Ok(payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
