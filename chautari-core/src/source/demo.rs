use async_trait::async_trait;

use super::WeatherSource;
use crate::{WeatherError, WeatherPayload, cache::CacheKey};

/// Offline source returning the fixed sample payload for every coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

#[async_trait]
impl WeatherSource for DemoSource {
    async fn fetch(&self, key: CacheKey) -> Result<WeatherPayload, WeatherError> {
        tracing::debug!(%key, "Serving demo weather");
        Ok(WeatherPayload::demo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_demo_payload_for_any_key() {
        let key = CacheKey::new(-33.8688, 151.2093).expect("finite");
        let payload = DemoSource.fetch(key).await.expect("demo never fails");
        assert_eq!(payload, WeatherPayload::demo());
    }
}
