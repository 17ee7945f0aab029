//! Configuration for plot sessions

use crate::geo::{Bounds, DEFAULT_PRECISION};
use crate::writer::DEFAULT_INDENT;

/// Default HTML page title
pub const DEFAULT_TITLE: &str = "Google Maps - gmap-plotter";

/// Options for the base map itself
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapOptions {
    /// Base map type (`roadmap`, `satellite`, `hybrid`, `terrain`)
    pub map_type: Option<String>,

    /// Styling rules passed through to the map as JSON
    pub map_styles: Option<serde_json::Value>,

    /// Tilt angle in degrees
    pub tilt: Option<u32>,

    /// Whether to show the scale control
    pub scale_control: bool,

    /// Rectangle the map zooms to fit after loading
    pub fit_bounds: Option<Bounds>,

    /// Decimal digits for the map center; `None` uses the default
    pub precision: Option<usize>,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map_type(mut self, map_type: impl Into<String>) -> Self {
        self.map_type = Some(map_type.into());
        self
    }

    pub fn with_map_styles(mut self, styles: serde_json::Value) -> Self {
        self.map_styles = Some(styles);
        self
    }

    pub fn with_tilt(mut self, tilt: u32) -> Self {
        self.tilt = Some(tilt);
        self
    }

    pub fn with_scale_control(mut self, scale_control: bool) -> Self {
        self.scale_control = scale_control;
        self
    }

    pub fn with_fit_bounds(mut self, bounds: Bounds) -> Self {
        self.fit_bounds = Some(bounds);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Precision used for the map center
    pub fn center_precision(&self) -> usize {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }
}

/// Configuration for a [`Plotter`](crate::Plotter)
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    /// HTML page title
    pub title: String,

    /// Maps API key appended to the script URL
    pub api_key: Option<String>,

    /// Base map options
    pub map: MapOptions,

    /// Indent unit of the emitted document
    pub indent: String,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            api_key: None,
            map: MapOptions::default(),
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

impl PlotterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base map options
    pub fn with_map(mut self, map: MapOptions) -> Self {
        self.map = map;
        self
    }

    /// Set the indent unit
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotterConfig::default();
        assert_eq!(config.title, "Google Maps - gmap-plotter");
        assert_eq!(config.api_key, None);
        assert_eq!(config.indent, "    ");
        assert_eq!(config.map, MapOptions::default());
        assert_eq!(config.map.center_precision(), 6);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PlotterConfig::new()
            .with_title("Trip")
            .with_api_key("KEY")
            .with_indent("\t")
            .with_map(
                MapOptions::new()
                    .with_map_type("SATELLITE")
                    .with_tilt(45)
                    .with_scale_control(true)
                    .with_precision(3),
            );

        assert_eq!(config.title, "Trip");
        assert_eq!(config.api_key.as_deref(), Some("KEY"));
        assert_eq!(config.indent, "\t");
        assert_eq!(config.map.map_type.as_deref(), Some("SATELLITE"));
        assert_eq!(config.map.tilt, Some(45));
        assert!(config.map.scale_control);
        assert_eq!(config.map.center_precision(), 3);
    }
}
