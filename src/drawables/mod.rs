//! Drawable entities
//!
//! Each entity resolves its settings eagerly on construction and writes
//! itself through a [`Writer`]. Entities never mutate each other; the only
//! shared state is the [`Context`] of the current emission pass.

pub mod grid;
pub mod ground_overlay;
pub mod heatmap;
pub mod map;
pub mod marker;
pub mod marker_dropper;
pub mod marker_icon;
pub mod polygon;
pub mod polyline;
pub mod route;
pub mod symbol;
pub mod text;

pub use grid::Grid;
pub use ground_overlay::GroundOverlay;
pub use heatmap::Heatmap;
pub use map::BaseMap;
pub use marker::{InfoWindow, Marker};
pub use marker_dropper::MarkerDropper;
pub use marker_icon::MarkerIcon;
pub use polygon::Polygon;
pub use polyline::{Polyline, Stroke};
pub use route::Route;
pub use symbol::{Symbol, SymbolShape};
pub use text::Text;

use crate::context::Context;
use crate::writer::{LineSink, Writer};

/// One visual primitive accumulated by the plotter
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Marker(Marker),
    Polyline(Polyline),
    Polygon(Polygon),
    Symbol(Symbol),
    Heatmap(Heatmap),
    Grid(Grid),
    GroundOverlay(GroundOverlay),
    Text(Text),
    Route(Route),
}

impl Drawable {
    /// Write this drawable.
    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>, ctx: &mut Context) {
        match self {
            Drawable::Marker(d) => d.emit(w, ctx),
            Drawable::Polyline(d) => d.emit(w),
            Drawable::Polygon(d) => d.emit(w),
            Drawable::Symbol(d) => d.emit(w),
            Drawable::Heatmap(d) => d.emit(w),
            Drawable::Grid(d) => d.emit(w),
            Drawable::GroundOverlay(d) => d.emit(w),
            Drawable::Text(d) => d.emit(w),
            Drawable::Route(d) => d.emit(w),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Drawable::Marker(_) => "marker",
            Drawable::Polyline(_) => "polyline",
            Drawable::Polygon(_) => "polygon",
            Drawable::Symbol(_) => "symbol",
            Drawable::Heatmap(_) => "heatmap",
            Drawable::Grid(_) => "grid",
            Drawable::GroundOverlay(_) => "ground_overlay",
            Drawable::Text(_) => "text",
            Drawable::Route(_) => "route",
        }
    }
}

macro_rules! impl_from_drawable {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Drawable {
                fn from(d: $variant) -> Self {
                    Drawable::$variant(d)
                }
            }
        )*
    };
}

impl_from_drawable!(Marker, Polyline, Polygon, Symbol, Heatmap, Grid, GroundOverlay, Text, Route);

/// Escape text for a double-quoted script string
pub(crate) fn escape_double_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape text for a single-quoted script string
pub(crate) fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Format an opacity with fixed precision
pub(crate) fn fmt_opacity(alpha: f64) -> String {
    format!("{alpha:.6}")
}
