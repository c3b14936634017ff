use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherError, WeatherPayload, cache::CacheKey};

pub mod demo;
pub mod http;

pub use demo::DemoSource;
pub use http::HttpSource;

/// Where cache misses go.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, key: CacheKey) -> Result<WeatherPayload, WeatherError>;
}
