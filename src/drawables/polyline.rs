use crate::color::Color;
use crate::drawables::fmt_opacity;
use crate::error::{check_lengths, Result};
use crate::geo::{zip_points, LatLng};
use crate::settings::{self, check_alpha, check_non_negative, FieldSpec, Kwargs, EDGE_ALPHA, EDGE_COLOR, EDGE_WIDTH, PRECISION};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[EDGE_COLOR, EDGE_ALPHA, EDGE_WIDTH, PRECISION];

/// Line styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub alpha: f64,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, alpha: f64, width: f64) -> Self {
        Self {
            color,
            alpha,
            width,
        }
    }

    pub(crate) fn write_fields<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write(&format!("strokeColor: \"{}\",", self.color));
        w.write(&format!("strokeOpacity: {},", fmt_opacity(self.alpha)));
        w.write(&format!("strokeWeight: {},", self.width));
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0, 1.0)
    }
}

/// A geodesic path through a sequence of points
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    path: Vec<LatLng>,
    stroke: Stroke,
    precision: usize,
}

impl Polyline {
    /// Build a polyline from parallel coordinate lists and keyword settings.
    ///
    /// Accepted keywords: `edge_color` (`ec`, `color`, `c`), `edge_alpha`
    /// (`ea`, `alpha`), `edge_width` (`ew`) and `precision`.
    pub fn new(lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<Self> {
        check_lengths(lats, lngs)?;
        let settings = settings::resolve(kwargs, FIELDS)?;
        let stroke = Stroke::new(
            settings.get("edge_color")?,
            settings.get("edge_alpha")?,
            settings.get("edge_width")?,
        );
        check_alpha("edge_alpha", stroke.alpha)?;
        check_non_negative("edge_width", stroke.width)?;
        Ok(Self::from_path(zip_points(lats, lngs), stroke, settings.precision()?))
    }

    pub fn from_path(path: Vec<LatLng>, stroke: Stroke, precision: usize) -> Self {
        Self {
            path,
            stroke,
            precision,
        }
    }

    pub fn path(&self) -> &[LatLng] {
        &self.path
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write("new google.maps.Polyline({");
        w.indent();
        w.write("clickable: false,");
        w.write("geodesic: true,");
        self.stroke.write_fields(w);
        w.write("map: map,");
        w.write("path: [");
        w.indent();
        for point in &self.path {
            w.write(&format!("{},", point.to_js(self.precision)));
        }
        w.dedent();
        w.write("]");
        w.dedent();
        w.write("});");
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use pretty_assertions::assert_eq;

    fn render(polyline: &Polyline) -> String {
        let mut w = Writer::in_memory();
        polyline.emit(&mut w);
        w.finish().unwrap()
    }

    #[test]
    fn test_emit_polyline() {
        let kwargs = Kwargs::new().with("color", "cornflowerblue").with("ew", 10);
        let polyline = Polyline::new(&[37.7, 37.8], &[-122.4, -122.5], &kwargs).unwrap();
        assert_eq!(
            render(&polyline),
            "new google.maps.Polyline({
    clickable: false,
    geodesic: true,
    strokeColor: \"#6495ED\",
    strokeOpacity: 1.000000,
    strokeWeight: 10,
    map: map,
    path: [
        new google.maps.LatLng(37.700000, -122.400000),
        new google.maps.LatLng(37.800000, -122.500000),
    ]
});

"
        );
    }

    #[test]
    fn test_empty_path_still_emits() {
        let polyline = Polyline::new(&[], &[], &Kwargs::new()).unwrap();
        let out = render(&polyline);
        assert!(out.contains("    path: [\n    ]\n"));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Polyline::new(&[1.0, 2.0], &[1.0], &Kwargs::new()).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { .. }));
    }

    #[test]
    fn test_precision_applies_to_path() {
        let kwargs = Kwargs::new().with("precision", 2);
        let polyline = Polyline::new(&[1.23456], &[2.34567], &kwargs).unwrap();
        assert!(render(&polyline).contains("new google.maps.LatLng(1.23, 2.35),"));
    }
}
