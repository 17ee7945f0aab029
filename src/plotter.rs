//! The plotting session
//!
//! A [`Plotter`] accumulates drawables in call order and emits them, wrapped
//! in an HTML page, on every [`Plotter::get`] or [`Plotter::draw`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::PlotterConfig;
use crate::context::Context;
use crate::drawables::{
    BaseMap, Drawable, Grid, GroundOverlay, Heatmap, Marker, MarkerDropper, Polygon, Polyline, Route, Symbol,
    SymbolShape, Text,
};
use crate::error::{check_lengths, PlotError, Result};
use crate::geo::{zip_points, Bounds, LatLng};
use crate::geocode::geocode;
use crate::settings::{
    resolve_broadcast_with, ColorPolicy, Fallback, FieldSpec, Kwargs, Settings, StyleSettings, EDGE_WIDTH,
    PRECISION,
};
use crate::writer::{IoSink, LineSink, Writer};

const SCATTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("color", &["color", "c", "edge_color", "ec"], Fallback::Str("#000000")),
    FieldSpec::new("size", &["size", "s"], Fallback::Float(40.0)),
    FieldSpec::new("marker", &["marker"], Fallback::Bool(true)),
    FieldSpec::new("symbol", &["symbol"], Fallback::Str("o")),
    FieldSpec::new("title", &["title"], Fallback::Absent),
    FieldSpec::new("label", &["label"], Fallback::Absent),
    PRECISION,
    FieldSpec::new("face_alpha", &["face_alpha", "fa", "alpha"], Fallback::Float(0.3)),
    FieldSpec::new("edge_alpha", &["edge_alpha", "ea", "alpha"], Fallback::Float(1.0)),
    EDGE_WIDTH,
];

/// Marker points take marker colors, which degrade to black; symbol colors
/// must resolve.
fn scatter_color_policy(point: &Settings) -> ColorPolicy {
    match point.get::<bool>("marker") {
        Ok(false) => ColorPolicy::Strict,
        _ => ColorPolicy::Lenient,
    }
}

/// Builds one scatter point from its broadcast settings.
fn scatter_point(position: LatLng, settings: &Settings) -> Result<Drawable> {
    let color = settings.get("color")?;
    if settings.get("marker")? {
        let marker = Marker::at(position, color)
            .with_title(settings.get("title")?)
            .with_label(settings.get("label")?)
            .with_precision(settings.precision()?);
        return Ok(marker.into());
    }

    let shape: SymbolShape = settings
        .get::<Option<String>>("symbol")?
        .as_deref()
        .unwrap_or("o")
        .parse()?;
    let style = StyleSettings {
        edge_color: color,
        edge_alpha: settings.get("edge_alpha")?,
        edge_width: settings.get("edge_width")?,
        face_color: color,
        face_alpha: settings.get("face_alpha")?,
        precision: settings.precision()?,
    };
    style.validate()?;
    Ok(Symbol::with_style(shape, position, settings.get("size")?, style)?.into())
}

/// Accumulates drawables and renders them as an HTML map page
#[derive(Debug, Clone)]
pub struct Plotter {
    map: BaseMap,
    config: PlotterConfig,
    drawables: Vec<Drawable>,
    marker_dropper: Option<MarkerDropper>,
}

impl Plotter {
    /// A map centered on (`lat`, `lng`) at `zoom`, with the default
    /// configuration
    pub fn new(lat: f64, lng: f64, zoom: u32) -> Self {
        Self::with_config(lat, lng, zoom, PlotterConfig::default())
    }

    pub fn with_config(lat: f64, lng: f64, zoom: u32, config: PlotterConfig) -> Self {
        Self {
            map: BaseMap::new(LatLng::new(lat, lng), zoom, config.map.clone()),
            config,
            drawables: Vec::new(),
            marker_dropper: None,
        }
    }

    /// A map centered on a geocoded location, such as `"Stanley Park"`.
    pub fn from_geocode(location: &str, zoom: u32, config: PlotterConfig) -> Result<Self> {
        let center = geocode(location, config.api_key.as_deref())?;
        Ok(Self::with_config(center.lat, center.lng, zoom, config))
    }

    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    pub fn base_map(&self) -> &BaseMap {
        &self.map
    }

    /// Drawables in insertion order
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    fn push(&mut self, drawable: impl Into<Drawable>) {
        let drawable = drawable.into();
        debug!(kind = drawable.kind(), index = self.drawables.len(), "added drawable");
        self.drawables.push(drawable);
    }

    /// Plot a marker.
    ///
    /// Keywords: `color`/`c`, `title`, `label`, `info_window`, `draggable`,
    /// `precision`.
    pub fn marker(&mut self, lat: f64, lng: f64, kwargs: &Kwargs) -> Result<()> {
        let marker = Marker::new(LatLng::new(lat, lng), kwargs)?;
        self.push(marker);
        Ok(())
    }

    /// Plot a collection of points as markers or symbols.
    ///
    /// Every keyword accepts either one value for all points or a list with
    /// one value per point. Nothing is plotted if any point is invalid.
    pub fn scatter(&mut self, lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<()> {
        check_lengths(lats, lngs)?;
        let settings = resolve_broadcast_with(kwargs, SCATTER_FIELDS, lats.len(), scatter_color_policy)?;
        let points = zip_points(lats, lngs)
            .into_iter()
            .zip(&settings)
            .map(|(position, settings)| scatter_point(position, settings))
            .collect::<Result<Vec<_>>>()?;
        points.into_iter().for_each(|point| self.push(point));
        Ok(())
    }

    /// Plot a circle of `radius` metres.
    pub fn circle(&mut self, lat: f64, lng: f64, radius: f64, kwargs: &Kwargs) -> Result<()> {
        let circle = Symbol::new(SymbolShape::Circle, LatLng::new(lat, lng), radius, kwargs)?;
        self.push(circle);
        Ok(())
    }

    /// Plot a polyline.
    pub fn plot(&mut self, lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<()> {
        let polyline = Polyline::new(lats, lngs, kwargs)?;
        self.push(polyline);
        Ok(())
    }

    pub fn polygon(&mut self, lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<()> {
        let polygon = Polygon::new(lats, lngs, kwargs)?;
        self.push(polygon);
        Ok(())
    }

    pub fn heatmap(&mut self, lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<()> {
        let heatmap = Heatmap::new(lats, lngs, kwargs)?;
        self.push(heatmap);
        Ok(())
    }

    pub fn grid(&mut self, bounds: Bounds, lat_increment: f64, lng_increment: f64) -> Result<()> {
        let grid = Grid::new(bounds, lat_increment, lng_increment)?;
        self.push(grid);
        Ok(())
    }

    /// Overlay the image at `url` on `bounds`.
    pub fn ground_overlay(&mut self, url: &str, bounds: Bounds, kwargs: &Kwargs) -> Result<()> {
        let overlay = GroundOverlay::new(url, bounds, kwargs)?;
        self.push(overlay);
        Ok(())
    }

    pub fn text(&mut self, lat: f64, lng: f64, text: &str, kwargs: &Kwargs) -> Result<()> {
        let text = Text::new(LatLng::new(lat, lng), text, kwargs)?;
        self.push(text);
        Ok(())
    }

    /// Plot the route between two points, computed when the page loads.
    pub fn directions(&mut self, origin: LatLng, destination: LatLng, kwargs: &Kwargs) -> Result<()> {
        let route = Route::new(origin, destination, kwargs)?;
        self.push(route);
        Ok(())
    }

    /// Let the viewer drop markers of `color` by clicking the map.
    ///
    /// Calling this again replaces the previous settings.
    pub fn enable_marker_dropping(&mut self, color: &str, kwargs: &Kwargs) -> Result<()> {
        self.marker_dropper = Some(MarkerDropper::new(color, kwargs)?);
        Ok(())
    }

    /// Render the HTML page as a string.
    pub fn get(&self) -> String {
        let mut w = Writer::in_memory().with_indent(self.config.indent.as_str());
        self.write_html(&mut w);
        // Writing to a `String` cannot fail.
        w.finish().unwrap_or_default()
    }

    /// Render the HTML page to a file, replacing its contents.
    ///
    /// If writing fails part way, the file is left empty.
    pub fn draw(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_or_truncate(&file, BufWriter::new(&file))?;
        file.sync_all()?;
        debug!(path = %path.display(), "map drawn");
        Ok(())
    }

    /// Write the page through `out`, emptying `file` if any write fails.
    fn write_or_truncate<W: Write>(&self, file: &File, out: W) -> Result<()> {
        let written = self.write_to(out);
        if let Err(err) = &written {
            debug!(error = %err, "truncating partially drawn map");
            if let Err(truncate) = file.set_len(0) {
                warn!(error = %truncate, "couldn't truncate partially drawn map");
            }
        }
        written
    }

    fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut w = Writer::new(IoSink::new(out)).with_indent(self.config.indent.as_str());
        self.write_html(&mut w);
        w.finish().and_then(IoSink::into_inner).map_err(PlotError::from)?;
        Ok(())
    }

    /// Write the full page through `w` using a fresh emission context.
    pub fn write_html<S: LineSink>(&self, w: &mut Writer<S>) {
        let mut ctx = Context::new();
        debug!(drawables = self.drawables.len(), "emitting map");

        let key = self
            .config
            .api_key
            .as_deref()
            .map(|key| format!("&key={key}"))
            .unwrap_or_default();
        w.write(&format!(
            r#"
            <html>
            <head>
            <meta name="viewport" content="initial-scale=1.0, user-scalable=no" />
            <meta http-equiv="content-type" content="text/html; charset=UTF-8" />
            <title>{}</title>
            <script type="text/javascript" src="https://maps.googleapis.com/maps/api/js?libraries=visualization{}"></script>
            <script type="text/javascript">
            "#,
            escape_html(&self.config.title),
            key
        ));
        w.indent();
        w.write("function initialize() {");
        w.indent();
        self.map.emit(w);
        for drawable in &self.drawables {
            drawable.emit(w, &mut ctx);
        }
        if let Some(dropper) = &self.marker_dropper {
            dropper.emit(w, &mut ctx);
        }
        w.dedent();
        w.write("}");
        w.dedent();
        w.write(
            r#"
            </script>
            </head>
            <body style="margin:0px; padding:0px;" onload="initialize()">
                <div id="map_canvas" style="width: 100%; height: 100%;" />
            </body>
            </html>
            "#,
        );
    }
}

/// Escape special HTML characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
