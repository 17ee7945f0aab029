use crate::drawables::polyline::{Polyline, Stroke};
use crate::error::{PlotError, Result};
use crate::geo::{Bounds, LatLng, DEFAULT_PRECISION};
use crate::writer::{LineSink, Writer};

/// A rectangular grid: the bounding box plus interior dividers
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    bounding_box: Polyline,
    lat_lines: Vec<Polyline>,
    lng_lines: Vec<Polyline>,
}

/// Number of divisions needed to cover `start..end` in steps of `increment`
fn division_count(start: f64, end: f64, increment: f64) -> usize {
    let count = ((end - start) / increment).ceil();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

impl Grid {
    /// Build a grid over `bounds` with dividers every `lat_increment` degrees
    /// of latitude and `lng_increment` degrees of longitude.
    pub fn new(bounds: Bounds, lat_increment: f64, lng_increment: f64) -> Result<Self> {
        for (name, increment) in [("lat_increment", lat_increment), ("lng_increment", lng_increment)] {
            if increment.is_nan() || increment <= 0.0 {
                return Err(PlotError::invalid_argument(name, "a positive number"));
            }
        }

        let stroke = Stroke::default();
        let line = |a: LatLng, b: LatLng| Polyline::from_path(vec![a, b], stroke, DEFAULT_PRECISION);
        let Bounds {
            north,
            south,
            east,
            west,
        } = bounds;

        let bounding_box = Polyline::from_path(
            vec![
                LatLng::new(south, west),
                LatLng::new(north, west),
                LatLng::new(north, east),
                LatLng::new(south, east),
                LatLng::new(south, west),
            ],
            stroke,
            DEFAULT_PRECISION,
        );

        let lat_lines = (1..division_count(south, north, lat_increment))
            .map(|i| {
                let lat = south + i as f64 * lat_increment;
                line(LatLng::new(lat, west), LatLng::new(lat, east))
            })
            .collect();

        let lng_lines = (1..division_count(west, east, lng_increment))
            .map(|i| {
                let lng = west + i as f64 * lng_increment;
                line(LatLng::new(south, lng), LatLng::new(north, lng))
            })
            .collect();

        Ok(Self {
            bounding_box,
            lat_lines,
            lng_lines,
        })
    }

    /// Every line of the grid, bounding box first
    pub fn lines(&self) -> impl Iterator<Item = &Polyline> {
        std::iter::once(&self.bounding_box)
            .chain(&self.lat_lines)
            .chain(&self.lng_lines)
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        self.lines().for_each(|line| line.emit(w));
    }
}
