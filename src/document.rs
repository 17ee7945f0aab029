//! TOML plot documents
//!
//! A document describes a whole plot: the base map, an ordered list of draw
//! entries and optional marker dropping.
//!
//! ```toml
//! [map]
//! lat = 37.766956
//! lng = -122.448481
//! zoom = 14
//! title = "Golden Gate Park"
//!
//! [[draw]]
//! kind = "scatter"
//! lats = [37.769901, 37.768645]
//! lngs = [-122.498331, -122.475328]
//! color = ["red", "orange"]
//! s = 60
//!
//! [[draw]]
//! kind = "directions"
//! origin = [37.799, -122.451]
//! destination = [37.769, -122.463]
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{MapOptions, PlotterConfig};
use crate::error::PlotError;
use crate::geo::{Bounds, LatLng};
use crate::plotter::Plotter;
use crate::settings::{Kwargs, Value};

/// Errors that can occur when loading or applying plot documents
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read plot document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse plot document TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{entry}: {source}")]
    Plot {
        entry: String,
        #[source]
        source: PlotError,
    },
    #[error("{entry}: missing or invalid `{field}`")]
    MissingField { entry: String, field: String },
    #[error("{entry}: unknown kind `{kind}`")]
    UnknownKind { entry: String, kind: String },
    #[error("`{key}` holds a value that can't be used as a keyword")]
    UnsupportedValue { key: String },
}

#[derive(Deserialize)]
struct TomlDocument {
    map: TomlMap,
    #[serde(default)]
    draw: Vec<toml::Table>,
    marker_dropping: Option<toml::Table>,
}

#[derive(Deserialize)]
struct TomlMap {
    lat: f64,
    lng: f64,
    zoom: u32,
    title: Option<String>,
    api_key: Option<String>,
    map_type: Option<String>,
    tilt: Option<u32>,
    scale_control: Option<bool>,
    fit_bounds: Option<Bounds>,
    map_styles: Option<toml::Value>,
    precision: Option<usize>,
}

/// One plotting call read from a document
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Marker { lat: f64, lng: f64, kwargs: Kwargs },
    Scatter { lats: Vec<f64>, lngs: Vec<f64>, kwargs: Kwargs },
    Circle { lat: f64, lng: f64, radius: f64, kwargs: Kwargs },
    Plot { lats: Vec<f64>, lngs: Vec<f64>, kwargs: Kwargs },
    Polygon { lats: Vec<f64>, lngs: Vec<f64>, kwargs: Kwargs },
    Heatmap { lats: Vec<f64>, lngs: Vec<f64>, kwargs: Kwargs },
    Grid { bounds: Bounds, lat_increment: f64, lng_increment: f64 },
    GroundOverlay { url: String, bounds: Bounds, kwargs: Kwargs },
    Text { lat: f64, lng: f64, text: String, kwargs: Kwargs },
    Directions { origin: LatLng, destination: LatLng, kwargs: Kwargs },
}

impl DrawCommand {
    pub fn apply(self, plotter: &mut Plotter) -> Result<(), PlotError> {
        match self {
            DrawCommand::Marker { lat, lng, kwargs } => plotter.marker(lat, lng, &kwargs),
            DrawCommand::Scatter { lats, lngs, kwargs } => plotter.scatter(&lats, &lngs, &kwargs),
            DrawCommand::Circle {
                lat,
                lng,
                radius,
                kwargs,
            } => plotter.circle(lat, lng, radius, &kwargs),
            DrawCommand::Plot { lats, lngs, kwargs } => plotter.plot(&lats, &lngs, &kwargs),
            DrawCommand::Polygon { lats, lngs, kwargs } => plotter.polygon(&lats, &lngs, &kwargs),
            DrawCommand::Heatmap { lats, lngs, kwargs } => plotter.heatmap(&lats, &lngs, &kwargs),
            DrawCommand::Grid {
                bounds,
                lat_increment,
                lng_increment,
            } => plotter.grid(bounds, lat_increment, lng_increment),
            DrawCommand::GroundOverlay { url, bounds, kwargs } => plotter.ground_overlay(&url, bounds, &kwargs),
            DrawCommand::Text { lat, lng, text, kwargs } => plotter.text(lat, lng, &text, &kwargs),
            DrawCommand::Directions {
                origin,
                destination,
                kwargs,
            } => plotter.directions(origin, destination, &kwargs),
        }
    }
}

/// Marker dropping settings read from a document
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDropping {
    pub color: String,
    pub kwargs: Kwargs,
}

/// A parsed plot document
#[derive(Debug, Clone, PartialEq)]
pub struct PlotDocument {
    pub center: LatLng,
    pub zoom: u32,
    pub config: PlotterConfig,
    pub draws: Vec<DrawCommand>,
    pub marker_dropping: Option<MarkerDropping>,
}

/// Removes positional fields from a draw entry; what remains are keywords.
struct Entry {
    name: String,
    table: toml::Table,
}

impl Entry {
    fn missing(&self, field: &str) -> DocumentError {
        DocumentError::MissingField {
            entry: self.name.clone(),
            field: field.to_string(),
        }
    }

    fn take<T: serde::de::DeserializeOwned>(&mut self, field: &str) -> Result<T, DocumentError> {
        self.table
            .remove(field)
            .and_then(|value| value.try_into().ok())
            .ok_or_else(|| self.missing(field))
    }

    fn take_point(&mut self, field: &str) -> Result<LatLng, DocumentError> {
        let [lat, lng]: [f64; 2] = self.take(field)?;
        Ok(LatLng::new(lat, lng))
    }

    fn into_kwargs(self) -> Result<Kwargs, DocumentError> {
        self.table
            .into_iter()
            .map(|(key, value)| {
                let value = keyword_value(&key, value)?;
                Ok((key, value))
            })
            .collect()
    }
}

/// Convert a TOML value into a keyword value.
fn keyword_value(key: &str, value: toml::Value) -> Result<Value, DocumentError> {
    match value {
        toml::Value::String(s) => Ok(Value::Str(s)),
        toml::Value::Integer(i) => Ok(Value::Int(i)),
        toml::Value::Float(f) => Ok(Value::Float(f)),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| keyword_value(key, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        toml::Value::Datetime(_) | toml::Value::Table(_) => Err(DocumentError::UnsupportedValue { key: key.to_string() }),
    }
}

fn parse_draw(index: usize, mut table: toml::Table) -> Result<DrawCommand, DocumentError> {
    let kind = match table.remove("kind") {
        Some(toml::Value::String(kind)) => kind,
        _ => {
            return Err(DocumentError::MissingField {
                entry: format!("draw[{index}]"),
                field: "kind".to_string(),
            })
        }
    };
    let mut entry = Entry {
        name: format!("draw[{index}] ({kind})"),
        table,
    };

    let command = match kind.as_str() {
        "marker" => {
            let (lat, lng) = (entry.take("lat")?, entry.take("lng")?);
            DrawCommand::Marker {
                lat,
                lng,
                kwargs: entry.into_kwargs()?,
            }
        }
        "scatter" => {
            let (lats, lngs) = (entry.take("lats")?, entry.take("lngs")?);
            DrawCommand::Scatter {
                lats,
                lngs,
                kwargs: entry.into_kwargs()?,
            }
        }
        "circle" => {
            let (lat, lng, radius) = (entry.take("lat")?, entry.take("lng")?, entry.take("radius")?);
            DrawCommand::Circle {
                lat,
                lng,
                radius,
                kwargs: entry.into_kwargs()?,
            }
        }
        "plot" => {
            let (lats, lngs) = (entry.take("lats")?, entry.take("lngs")?);
            DrawCommand::Plot {
                lats,
                lngs,
                kwargs: entry.into_kwargs()?,
            }
        }
        "polygon" => {
            let (lats, lngs) = (entry.take("lats")?, entry.take("lngs")?);
            DrawCommand::Polygon {
                lats,
                lngs,
                kwargs: entry.into_kwargs()?,
            }
        }
        "heatmap" => {
            let (lats, lngs) = (entry.take("lats")?, entry.take("lngs")?);
            DrawCommand::Heatmap {
                lats,
                lngs,
                kwargs: entry.into_kwargs()?,
            }
        }
        "grid" => DrawCommand::Grid {
            bounds: entry.take("bounds")?,
            lat_increment: entry.take("lat_increment")?,
            lng_increment: entry.take("lng_increment")?,
        },
        "ground_overlay" => {
            let (url, bounds) = (entry.take("url")?, entry.take("bounds")?);
            DrawCommand::GroundOverlay {
                url,
                bounds,
                kwargs: entry.into_kwargs()?,
            }
        }
        "text" => {
            let (lat, lng, text) = (entry.take("lat")?, entry.take("lng")?, entry.take("text")?);
            DrawCommand::Text {
                lat,
                lng,
                text,
                kwargs: entry.into_kwargs()?,
            }
        }
        "directions" => {
            let (origin, destination) = (entry.take_point("origin")?, entry.take_point("destination")?);
            DrawCommand::Directions {
                origin,
                destination,
                kwargs: entry.into_kwargs()?,
            }
        }
        _ => {
            return Err(DocumentError::UnknownKind {
                entry: format!("draw[{index}]"),
                kind: kind.clone(),
            })
        }
    };
    Ok(command)
}

fn parse_marker_dropping(table: toml::Table) -> Result<MarkerDropping, DocumentError> {
    let mut entry = Entry {
        name: "marker_dropping".to_string(),
        table,
    };
    let color = entry.take("color")?;
    Ok(MarkerDropping {
        color,
        kwargs: entry.into_kwargs()?,
    })
}

impl PlotDocument {
    /// Load a plot document from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Build a plotter with every draw entry applied in document order.
    pub fn into_plotter(self) -> Result<Plotter, DocumentError> {
        let mut plotter = Plotter::with_config(self.center.lat, self.center.lng, self.zoom, self.config);
        for (index, command) in self.draws.into_iter().enumerate() {
            command.apply(&mut plotter).map_err(|source| DocumentError::Plot {
                entry: format!("draw[{index}]"),
                source,
            })?;
        }
        if let Some(dropping) = self.marker_dropping {
            plotter
                .enable_marker_dropping(&dropping.color, &dropping.kwargs)
                .map_err(|source| DocumentError::Plot {
                    entry: "marker_dropping".to_string(),
                    source,
                })?;
        }
        Ok(plotter)
    }
}

impl FromStr for PlotDocument {
    type Err = DocumentError;

    fn from_str(content: &str) -> Result<Self, DocumentError> {
        let parsed: TomlDocument = toml::from_str(content)?;
        let map = parsed.map;

        let mut options = MapOptions::new().with_scale_control(map.scale_control.unwrap_or(false));
        options.map_type = map.map_type;
        options.tilt = map.tilt;
        options.fit_bounds = map.fit_bounds;
        options.precision = map.precision;
        options.map_styles = map
            .map_styles
            .map(serde_json::to_value)
            .transpose()
            .map_err(|_| DocumentError::UnsupportedValue {
                key: "map_styles".to_string(),
            })?;

        let mut config = PlotterConfig::new().with_map(options);
        if let Some(title) = map.title {
            config = config.with_title(title);
        }
        config.api_key = map.api_key;

        let draws = parsed
            .draw
            .into_iter()
            .enumerate()
            .map(|(index, table)| parse_draw(index, table))
            .collect::<Result<Vec<_>, _>>()?;
        let marker_dropping = parsed.marker_dropping.map(parse_marker_dropping).transpose()?;
        debug!(draws = draws.len(), "parsed plot document");

        Ok(PlotDocument {
            center: LatLng::new(map.lat, map.lng),
            zoom: map.zoom,
            config,
            draws,
            marker_dropping,
        })
    }
}
