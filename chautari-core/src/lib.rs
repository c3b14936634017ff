//! Core library for the Batoko Chautari weather widgets.
//!
//! This crate defines:
//! - A coordinate-keyed TTL cache in front of the site's weather endpoint
//! - Weather sources (HTTP and an offline demo)
//! - Rendering of payloads into display models, and the widget scan
//! - An application context that refreshes every widget on an interval
//!
//! It is used by `chautari-cli`, but presentation is behind the [`Surface`] and
//! [`Notifier`] traits so other front ends can reuse it.

pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod notify;
pub mod render;
pub mod source;
pub mod surface;
pub mod widget;

pub use cache::{CacheKey, WeatherCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigFile, WeatherConfig};
pub use dashboard::{RefreshSummary, WeatherDashboard};
pub use error::{ConfigError, WeatherError};
pub use model::{CurrentConditions, ForecastDay, WeatherPayload};
pub use notify::{Notifier, Severity, TracingNotifier};
pub use render::{DisplayModel, ForecastCell, UNAVAILABLE_TEXT, render};
pub use source::{DemoSource, HttpSource, WeatherSource};
pub use surface::{MemorySurface, Surface};
pub use widget::{Element, Widget, scan_widgets};
