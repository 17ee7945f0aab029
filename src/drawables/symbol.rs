use std::str::FromStr;

use crate::drawables::fmt_opacity;
use crate::drawables::polyline::{Polyline, Stroke};
use crate::error::{PlotError, Result};
use crate::geo::LatLng;
use crate::settings::{
    self, check_non_negative, Fallback, FieldSpec, Kwargs, StyleSettings, EDGE_ALPHA, EDGE_COLOR, EDGE_WIDTH,
    FACE_COLOR, PRECISION,
};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    EDGE_COLOR,
    EDGE_ALPHA,
    EDGE_WIDTH,
    FACE_COLOR,
    FieldSpec::new("face_alpha", &["face_alpha", "fa", "alpha"], Fallback::Float(0.5)),
    PRECISION,
];

/// Shape drawn for a point symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolShape {
    /// `o`
    Circle,
    /// `+`
    Plus,
    /// `x`
    X,
}

impl FromStr for SymbolShape {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "o" => Ok(SymbolShape::Circle),
            "+" => Ok(SymbolShape::Plus),
            "x" => Ok(SymbolShape::X),
            other => Err(PlotError::InvalidSymbolKind(other.to_string())),
        }
    }
}

/// A circle, plus or cross of a given size in metres around a point
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    shape: SymbolShape,
    center: LatLng,
    size: f64,
    style: StyleSettings,
}

impl Symbol {
    /// Build a symbol from keyword settings.
    ///
    /// Circles default to a face opacity of 0.5.
    pub fn new(shape: SymbolShape, center: LatLng, size: f64, kwargs: &Kwargs) -> Result<Self> {
        let style = StyleSettings::from_settings(&settings::resolve(kwargs, FIELDS)?)?;
        Self::with_style(shape, center, size, style)
    }

    pub fn with_style(shape: SymbolShape, center: LatLng, size: f64, style: StyleSettings) -> Result<Self> {
        check_non_negative("size", size)?;
        Ok(Self {
            shape,
            center,
            size,
            style,
        })
    }

    pub fn shape(&self) -> SymbolShape {
        self.shape
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn style(&self) -> &StyleSettings {
        &self.style
    }

    /// The two strokes drawn for a plus or cross; `None` for circles.
    pub fn strokes(&self) -> Option<[Polyline; 2]> {
        let c = self.center;
        let (dlat, dlng) = c.degree_offset(self.size);
        let (first, second) = match self.shape {
            SymbolShape::Circle => return None,
            SymbolShape::Plus => (
                [LatLng::new(c.lat - dlat, c.lng), LatLng::new(c.lat + dlat, c.lng)],
                [LatLng::new(c.lat, c.lng - dlng), LatLng::new(c.lat, c.lng + dlng)],
            ),
            SymbolShape::X => {
                let (dlat, dlng) = (dlat / std::f64::consts::SQRT_2, dlng / std::f64::consts::SQRT_2);
                (
                    [LatLng::new(c.lat - dlat, c.lng - dlng), LatLng::new(c.lat + dlat, c.lng + dlng)],
                    [LatLng::new(c.lat + dlat, c.lng - dlng), LatLng::new(c.lat - dlat, c.lng + dlng)],
                )
            }
        };
        let stroke = Stroke::new(self.style.edge_color, self.style.edge_alpha, self.style.edge_width);
        Some([
            Polyline::from_path(first.to_vec(), stroke, self.style.precision),
            Polyline::from_path(second.to_vec(), stroke, self.style.precision),
        ])
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        match self.strokes() {
            Some(strokes) => strokes.iter().for_each(|line| line.emit(w)),
            None => self.emit_circle(w),
        }
    }

    fn emit_circle<S: LineSink>(&self, w: &mut Writer<S>) {
        let style = &self.style;
        w.write("new google.maps.Circle({");
        w.indent();
        w.write("clickable: false,");
        w.write("geodesic: true,");
        Stroke::new(style.edge_color, style.edge_alpha, style.edge_width).write_fields(w);
        w.write(&format!("fillColor: \"{}\",", style.face_color));
        w.write(&format!("fillOpacity: {},", fmt_opacity(style.face_alpha)));
        w.write(&format!("center: {},", self.center.to_js(style.precision)));
        w.write(&format!("radius: {},", self.size));
        w.write("map: map");
        w.dedent();
        w.write("});");
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(symbol: &Symbol) -> String {
        let mut w = Writer::in_memory();
        symbol.emit(&mut w);
        w.finish().unwrap()
    }

    #[test]
    fn test_shape_from_str() {
        assert_eq!("o".parse::<SymbolShape>().unwrap(), SymbolShape::Circle);
        assert_eq!("+".parse::<SymbolShape>().unwrap(), SymbolShape::Plus);
        assert_eq!("x".parse::<SymbolShape>().unwrap(), SymbolShape::X);
        assert!(matches!(
            "*".parse::<SymbolShape>(),
            Err(PlotError::InvalidSymbolKind(s)) if s == "*"
        ));
    }

    #[test]
    fn test_emit_circle() {
        let kwargs = Kwargs::new().with("face_color", "red").with("ew", 2);
        let symbol = Symbol::new(SymbolShape::Circle, LatLng::new(37.7, -122.4), 200.0, &kwargs).unwrap();
        assert_eq!(
            render(&symbol),
            "new google.maps.Circle({
    clickable: false,
    geodesic: true,
    strokeColor: \"#000000\",
    strokeOpacity: 1.000000,
    strokeWeight: 2,
    fillColor: \"#FF0000\",
    fillOpacity: 0.500000,
    center: new google.maps.LatLng(37.700000, -122.400000),
    radius: 200,
    map: map
});

"
        );
    }

    #[test]
    fn test_plus_arms_are_axis_aligned() {
        let symbol = Symbol::new(SymbolShape::Plus, LatLng::new(0.0, 10.0), 1000.0, &Kwargs::new()).unwrap();
        let [vertical, horizontal] = symbol.strokes().unwrap();
        let (dlat, dlng) = LatLng::new(0.0, 10.0).degree_offset(1000.0);
        assert_eq!(vertical.path(), &[LatLng::new(-dlat, 10.0), LatLng::new(dlat, 10.0)]);
        assert_eq!(horizontal.path(), &[LatLng::new(0.0, 10.0 - dlng), LatLng::new(0.0, 10.0 + dlng)]);
    }

    #[test]
    fn test_x_emits_two_polylines() {
        let symbol = Symbol::new(SymbolShape::X, LatLng::new(45.0, 0.0), 100.0, &Kwargs::new()).unwrap();
        let out = render(&symbol);
        assert_eq!(out.matches("new google.maps.Polyline({").count(), 2);
        assert!(!out.contains("Circle"));
    }

    #[test]
    fn test_negative_size_rejected() {
        let err = Symbol::new(SymbolShape::Circle, LatLng::new(0.0, 0.0), -1.0, &Kwargs::new()).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument { .. }));
    }
}
