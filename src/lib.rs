//! gmap-plotter - Plot data on interactive Google Maps
//!
//! This library accumulates markers, lines, shapes, heatmaps and other
//! drawables on a [`Plotter`] and emits them as a self-contained HTML page
//! that renders them with the Maps JavaScript API.
//!
//! # Example
//!
//! ```rust
//! use gmap_plotter::{Kwargs, Plotter};
//!
//! let mut plotter = Plotter::new(37.766956, -122.438481, 13);
//! plotter
//!     .marker(37.770776, -122.461689, &Kwargs::new().with("color", "cornflowerblue"))
//!     .unwrap();
//! plotter
//!     .plot(&[37.77, 37.78], &[-122.46, -122.45], &Kwargs::new().with("ew", 3))
//!     .unwrap();
//!
//! let html = plotter.get();
//! assert!(html.contains("var marker_icon_6495ED"));
//! ```

pub mod color;
pub mod config;
pub mod context;
pub mod document;
pub mod drawables;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod plotter;
pub mod settings;
pub mod writer;

pub use color::Color;
pub use config::{MapOptions, PlotterConfig};
pub use document::{DocumentError, PlotDocument};
pub use drawables::Drawable;
pub use error::{PlotError, Result};
pub use geo::{Bounds, LatLng};
pub use geocode::geocode;
pub use plotter::Plotter;
pub use settings::{Kwargs, Value};
pub use writer::{LineSink, Writer};
