//! Time-bounded weather cache keyed by coordinate.
//!
//! Entries are never evicted; staleness is checked when read. Concurrent
//! misses on the same key share one in-flight request.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use crate::{
    WeatherConfig, WeatherError, WeatherPayload,
    clock::{Clock, SystemClock},
    source::WeatherSource,
};

const KEY_SCALE: f64 = 10_000.0;

/// Coordinate pair rounded to 4 decimal places.
///
/// Stored as fixed-point so equal inputs always hash the same. Only
/// geographic coordinates (|lat| <= 90, |lon| <= 180) are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
}

impl CacheKey {
    pub fn new(lat: f64, lon: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }

        Ok(Self {
            lat_e4: (lat * KEY_SCALE).round() as i64,
            lon_e4: (lon * KEY_SCALE).round() as i64,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.lat_e4 as f64 / KEY_SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon_e4 as f64 / KEY_SCALE
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude(), self.longitude())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Arc<WeatherPayload>,
    fetched_at_millis: i64,
}

type FetchResult = Result<Arc<WeatherPayload>, WeatherError>;
type InFlight = Shared<BoxFuture<'static, FetchResult>>;

pub struct WeatherCache {
    source: Arc<dyn WeatherSource>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
    timeout: Duration,
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
    pending: Arc<Mutex<HashMap<CacheKey, InFlight>>>,
}

impl fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherCache")
            .field("source", &self.source)
            .field("ttl_millis", &self.ttl_millis)
            .field("timeout", &self.timeout)
            .field("entries", &self.entries.lock().len())
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

impl WeatherCache {
    pub fn new(source: Arc<dyn WeatherSource>, config: &WeatherConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            ttl_millis: i64::try_from(config.ttl_millis()).unwrap_or(i64::MAX),
            timeout: config.request_timeout(),
            entries: Arc::new(Mutex::new(HashMap::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Replace the time source used for freshness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Weather for a coordinate, from cache when fresh, otherwise from the source.
    pub async fn get(&self, lat: f64, lon: f64) -> FetchResult {
        let key = CacheKey::new(lat, lon)?;

        if let Some(payload) = self.fresh(key) {
            tracing::trace!(%key, "Weather cache hit");
            return Ok(payload);
        }

        let in_flight = {
            let mut pending = self.pending.lock();
            if let Some(in_flight) = pending.get(&key).cloned() {
                in_flight
            } else {
                // A fetch may have stored the entry and left the map since the check above.
                if let Some(payload) = self.fresh(key) {
                    return Ok(payload);
                }

                tracing::debug!(%key, "Weather cache miss, fetching");
                let in_flight = self.start_fetch(key);
                pending.insert(key, in_flight.clone());
                in_flight
            }
        };

        in_flight.await
    }

    /// Fresh cached payload for a coordinate, without fetching.
    pub fn peek(&self, lat: f64, lon: f64) -> Option<Arc<WeatherPayload>> {
        CacheKey::new(lat, lon).ok().and_then(|key| self.fresh(key))
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn fresh(&self, key: CacheKey) -> Option<Arc<WeatherPayload>> {
        let now = self.clock.now_millis();
        let entries = self.entries.lock();
        entries
            .get(&key)
            .filter(|entry| now.saturating_sub(entry.fetched_at_millis) < self.ttl_millis)
            .map(|entry| Arc::clone(&entry.payload))
    }

    fn start_fetch(&self, key: CacheKey) -> InFlight {
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);
        let entries = Arc::clone(&self.entries);
        let pending = Arc::clone(&self.pending);
        let timeout = self.timeout;

        async move {
            let result = match tokio::time::timeout(timeout, source.fetch(key)).await {
                Ok(Ok(payload)) => {
                    let payload = Arc::new(payload);
                    entries.lock().insert(
                        key,
                        CacheEntry {
                            payload: Arc::clone(&payload),
                            fetched_at_millis: clock.now_millis(),
                        },
                    );
                    Ok(payload)
                }
                Ok(Err(err)) => {
                    tracing::warn!(%key, error = %err, "Weather fetch failed");
                    Err(err)
                }
                Err(_) => {
                    tracing::warn!(%key, ?timeout, "Weather fetch timed out");
                    Err(WeatherError::Timeout(timeout))
                }
            };

            pending.lock().remove(&key);
            result
        }
        .boxed()
        .shared()
    }
}
