use anyhow::{Context, bail};
use chautari_core::{
    ConfigFile, DemoSource, Element, HttpSource, Surface, WeatherCache, WeatherConfig,
    WeatherDashboard, WeatherSource, Widget, render, scan_widgets,
};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Text};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::watch;

use crate::output::TerminalSurface;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "chautari", version, about = "Batoko Chautari weather widgets")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Per-run overrides of the saved configuration.
#[derive(Debug, Args, Default)]
pub struct Overrides {
    /// Base URL of the site serving /api/weather.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Cache time-to-live in milliseconds.
    #[arg(long, global = true)]
    pub ttl_ms: Option<u64>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Refresh interval in milliseconds.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set and save the weather settings.
    Configure,

    /// Show weather for one coordinate.
    Show {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Use built-in sample data instead of the network.
        #[arg(long)]
        demo: bool,
    },

    /// Render every weather widget on a page and keep them fresh.
    Watch {
        /// TOML page description with `[[element]]` entries.
        page: PathBuf,

        /// Use built-in sample data instead of the network.
        #[arg(long)]
        demo: bool,

        /// Refresh once and exit.
        #[arg(long)]
        once: bool,
    },
}

#[derive(Debug, Deserialize)]
struct PageFile {
    #[serde(default)]
    element: Vec<Element>,
}

impl Overrides {
    fn apply(&self, file: &mut ConfigFile) {
        if let Some(url) = &self.base_url {
            file.base_url = Some(url.clone());
        }
        if let Some(ttl) = self.ttl_ms {
            file.ttl_millis = Some(ttl);
        }
        if let Some(timeout) = self.timeout_ms {
            file.request_timeout_millis = Some(timeout);
        }
        if let Some(interval) = self.interval_ms {
            file.refresh_interval_millis = Some(interval);
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(&self.overrides),
            Command::Show { lat, lon, demo } => {
                let config = resolve_config(&self.overrides)?;
                let cache = build_cache(&config, demo)?;
                let widget = Widget::new(format!("{lat},{lon}"), lat, lon);

                let payload = match cache.get(lat, lon).await {
                    Ok(payload) => Some(payload),
                    Err(err) => {
                        tracing::warn!(error = %err, "Weather lookup failed");
                        None
                    }
                };
                TerminalSurface.apply(&widget, &render(payload.as_deref()));
                Ok(())
            }
            Command::Watch { page, demo, once } => {
                let config = resolve_config(&self.overrides)?;
                watch_page(&config, &page, demo, once).await
            }
        }
    }
}

fn resolve_config(overrides: &Overrides) -> anyhow::Result<WeatherConfig> {
    let mut file = ConfigFile::load()?;
    overrides.apply(&mut file);
    file.to_weather_config().context("Invalid weather configuration")
}

fn build_cache(config: &WeatherConfig, demo: bool) -> anyhow::Result<WeatherCache> {
    let source: Arc<dyn WeatherSource> = if demo {
        Arc::new(DemoSource)
    } else {
        Arc::new(HttpSource::from_config(config).context("Failed to build HTTP client")?)
    };
    Ok(WeatherCache::new(source, config))
}

fn load_page(path: &Path) -> anyhow::Result<Vec<Widget>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file: {}", path.display()))?;
    let page: PageFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse page file: {}", path.display()))?;

    Ok(scan_widgets(&page.element))
}

async fn watch_page(
    config: &WeatherConfig,
    page: &Path,
    demo: bool,
    once: bool,
) -> anyhow::Result<()> {
    let widgets = load_page(page)?;
    if widgets.is_empty() {
        bail!("No weather widgets found in {}", page.display());
    }
    tracing::info!(widgets = widgets.len(), "Found weather widgets");

    let cache = Arc::new(build_cache(config, demo)?);
    let dashboard = Arc::new(WeatherDashboard::new(
        cache,
        widgets,
        Arc::new(TerminalSurface),
    ));

    if once {
        let summary = dashboard.refresh_all().await;
        println!(
            "Refreshed {} widget(s): {} ok, {} unavailable",
            summary.succeeded + summary.failed,
            summary.succeeded,
            summary.failed
        );
        return Ok(());
    }

    let (tx, rx) = watch::channel(false);
    let handle = Arc::clone(&dashboard).spawn_refresh_loop(config.refresh_interval(), rx);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    let _ = tx.send(true);

    let refreshes = handle.await.context("Refresh loop task failed")?;
    println!("Stopped after {refreshes} refresh(es)");
    Ok(())
}

fn configure(overrides: &Overrides) -> anyhow::Result<()> {
    let mut file = ConfigFile::load()?;
    overrides.apply(&mut file);
    let current = file.to_weather_config().unwrap_or_default();

    let base_url = Text::new("Site base URL:")
        .with_default(current.base_url())
        .with_help_message("Weather is fetched from <base URL>/api/weather/<lat>/<lon>")
        .prompt()?;

    let ttl_millis = CustomType::<u64>::new("Cache TTL (ms):")
        .with_default(current.ttl_millis())
        .with_error_message("Please type a whole number of milliseconds")
        .prompt()?;

    let request_timeout_millis = CustomType::<u64>::new("Request timeout (ms):")
        .with_default(current.request_timeout().as_millis() as u64)
        .with_error_message("Please type a whole number of milliseconds")
        .prompt()?;

    let refresh_interval_millis = CustomType::<u64>::new("Refresh interval (ms):")
        .with_default(current.refresh_interval().as_millis() as u64)
        .with_error_message("Please type a whole number of milliseconds")
        .prompt()?;

    let file = ConfigFile {
        base_url: Some(base_url),
        ttl_millis: Some(ttl_millis),
        request_timeout_millis: Some(request_timeout_millis),
        refresh_interval_millis: Some(refresh_interval_millis),
    };
    file.save()?;

    println!(
        "Saved configuration to {}",
        ConfigFile::config_file_path()?.display()
    );
    Ok(())
}
