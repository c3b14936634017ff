use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LAT_ATTR: &str = "data-lat";
pub const LON_ATTR: &str = "data-lon";

/// A page element as scanned from the page description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A weather display bound to a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Widget {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }

    /// `None` for elements that aren't weather widgets.
    pub fn from_element(element: &Element) -> Option<Result<Self, String>> {
        let lat = element.attr(LAT_ATTR);
        let lon = element.attr(LON_ATTR);
        if lat.is_none() && lon.is_none() {
            return None;
        }

        Some(
            parse_coord(LAT_ATTR, lat)
                .and_then(|lat| Ok((lat, parse_coord(LON_ATTR, lon)?)))
                .map(|(lat, lon)| Self::new(element.id.clone(), lat, lon)),
        )
    }
}

fn parse_coord(name: &str, raw: Option<&str>) -> Result<f64, String> {
    let raw = raw.ok_or_else(|| format!("missing {name}"))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name}={raw:?} is not a number"))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{name}={raw:?} is not finite"))
    }
}

/// Collect the weather widgets on a page.
///
/// Elements with bad coordinates are skipped with a warning.
pub fn scan_widgets<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Vec<Widget> {
    elements
        .into_iter()
        .filter_map(|element| match Widget::from_element(element)? {
            Ok(widget) => Some(widget),
            Err(reason) => {
                tracing::warn!(id = %element.id, %reason, "Skipping weather widget with invalid coordinates");
                None
            }
        })
        .collect()
}
