//! Refresh loop timing, driven by tokio's paused clock.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chautari_core::{
    CacheKey, ManualClock, MemorySurface, WeatherCache, WeatherConfig, WeatherDashboard,
    WeatherError, WeatherPayload, WeatherSource, Widget,
};
use tokio::sync::watch;

const INTERVAL: Duration = Duration::from_millis(300_000);

#[derive(Debug, Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherSource for CountingSource {
    async fn fetch(&self, _key: CacheKey) -> Result<WeatherPayload, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(WeatherPayload::demo())
    }
}

fn dashboard(
    source: Arc<CountingSource>,
    clock: Arc<ManualClock>,
    surface: Arc<MemorySurface>,
) -> Arc<WeatherDashboard> {
    let cache = WeatherCache::new(source, &WeatherConfig::default()).with_clock(clock);
    Arc::new(WeatherDashboard::new(
        Arc::new(cache),
        vec![Widget::new("kathmandu", 27.7172, 85.3240)],
        surface,
    ))
}

#[tokio::test(start_paused = true)]
async fn test_refreshes_once_per_tick() {
    let source = Arc::new(CountingSource::default());
    let clock = Arc::new(ManualClock::new(0));
    let surface = Arc::new(MemorySurface::new());
    let dashboard = dashboard(source.clone(), clock.clone(), surface.clone());

    let (tx, rx) = watch::channel(false);
    let handle = dashboard.spawn_refresh_loop(INTERVAL, rx);

    // Startup refresh happens immediately.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(surface.applied(), 1);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    // Half an interval: nothing new.
    tokio::time::sleep(INTERVAL / 2).await;
    assert_eq!(surface.applied(), 1);

    for expected in 2..=4 {
        clock.advance(INTERVAL.as_millis() as i64);
        tokio::time::sleep(INTERVAL).await;
        assert_eq!(surface.applied(), expected);
        assert_eq!(source.calls.load(Ordering::SeqCst), expected);
    }

    tx.send(true).unwrap();
    let refreshes = handle.await.unwrap();
    assert_eq!(refreshes, 4);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_within_ttl_are_served_from_cache() {
    let source = Arc::new(CountingSource::default());
    let clock = Arc::new(ManualClock::new(0));
    let surface = Arc::new(MemorySurface::new());
    let dashboard = dashboard(source.clone(), clock.clone(), surface.clone());

    let (tx, rx) = watch::channel(false);
    let handle = dashboard.spawn_refresh_loop(Duration::from_secs(60), rx);

    tokio::time::sleep(Duration::from_millis(1)).await;
    for _ in 0..3 {
        clock.advance(60_000);
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    // Four renders, but the wall clock never passed the 5 minute TTL.
    assert_eq!(surface.applied(), 4);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    drop(tx);
    assert_eq!(handle.await.unwrap(), 4);
}
