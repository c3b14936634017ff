//! Application context tying the cache to the widgets on a page.

use futures::future::join_all;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{
    DisplayModel, WeatherCache, Widget,
    notify::{Notifier, Severity, TracingNotifier},
    render,
    surface::Surface,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct WeatherDashboard {
    cache: Arc<WeatherCache>,
    widgets: Vec<Widget>,
    surface: Arc<dyn Surface>,
    notifier: Arc<dyn Notifier>,
}

impl WeatherDashboard {
    pub fn new(cache: Arc<WeatherCache>, widgets: Vec<Widget>, surface: Arc<dyn Surface>) -> Self {
        Self {
            cache,
            widgets,
            surface,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Fetch, render and apply one widget. Errors stop here and become the fallback render.
    pub async fn refresh_widget(&self, widget: &Widget) -> bool {
        match self.cache.get(widget.latitude, widget.longitude).await {
            Ok(payload) => {
                let model = render(Some(&payload));
                let ok = !model.is_unavailable();
                if !ok {
                    tracing::warn!(id = %widget.id, "Weather payload is not renderable");
                    self.notify_failure(widget);
                }
                self.surface.apply(widget, &model);
                ok
            }
            Err(err) => {
                tracing::warn!(
                    id = %widget.id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Weather refresh failed"
                );
                self.notify_failure(widget);
                self.surface.apply(widget, &DisplayModel::unavailable());
                false
            }
        }
    }

    fn notify_failure(&self, widget: &Widget) {
        self.notifier.notify(
            &format!("Could not load weather for {}", widget.id),
            Severity::Warning,
        );
    }

    /// Refresh every widget concurrently.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let results = join_all(self.widgets.iter().map(|w| self.refresh_widget(w))).await;

        let succeeded = results.iter().filter(|ok| **ok).count();
        let summary = RefreshSummary {
            succeeded,
            failed: results.len() - succeeded,
        };

        tracing::info!(
            widgets = results.len(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Weather widgets refreshed"
        );
        summary
    }

    /// Run `refresh_all` now and then once per `period` until `shutdown` flips to
    /// `true` or its sender is dropped. The handle yields the number of refreshes run.
    pub fn spawn_refresh_loop(
        self: Arc<Self>,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<u64> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut refreshes = 0u64;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.refresh_all().await;
                        refreshes += 1;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!(refreshes, "Weather refresh loop stopped");
            refreshes
        })
    }
}
