use crate::drawables::fmt_opacity;
use crate::drawables::polyline::Stroke;
use crate::error::{check_lengths, Result};
use crate::geo::{zip_points, LatLng};
use crate::settings::{
    self, Fallback, FieldSpec, Kwargs, StyleSettings, EDGE_ALPHA, EDGE_COLOR, EDGE_WIDTH, FACE_COLOR, PRECISION,
};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    EDGE_COLOR,
    EDGE_ALPHA,
    EDGE_WIDTH,
    FACE_COLOR,
    FieldSpec::new("face_alpha", &["face_alpha", "fa", "alpha"], Fallback::Float(0.3)),
    PRECISION,
];

/// A filled, closed shape
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    path: Vec<LatLng>,
    style: StyleSettings,
}

impl Polygon {
    pub fn new(lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<Self> {
        check_lengths(lats, lngs)?;
        let style = StyleSettings::from_settings(&settings::resolve(kwargs, FIELDS)?)?;
        Ok(Self {
            path: zip_points(lats, lngs),
            style,
        })
    }

    pub fn style(&self) -> &StyleSettings {
        &self.style
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        let style = &self.style;
        w.write("new google.maps.Polygon({");
        w.indent();
        w.write("clickable: false,");
        w.write("geodesic: true,");
        Stroke::new(style.edge_color, style.edge_alpha, style.edge_width).write_fields(w);
        w.write(&format!("fillColor: \"{}\",", style.face_color));
        w.write(&format!("fillOpacity: {},", fmt_opacity(style.face_alpha)));
        w.write("map: map,");
        w.write("paths: [");
        w.indent();
        for point in &self.path {
            w.write(&format!("{},", point.to_js(style.precision)));
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
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_polygon() {
        let kwargs = Kwargs::new().with("face_color", "orange").with("edge_color", "k");
        let polygon = Polygon::new(&[0.0, 1.0, 1.0], &[0.0, 0.0, 1.0], &kwargs).unwrap();
        let mut w = Writer::in_memory();
        polygon.emit(&mut w);
        assert_eq!(
            w.finish().unwrap(),
            "new google.maps.Polygon({
    clickable: false,
    geodesic: true,
    strokeColor: \"#000000\",
    strokeOpacity: 1.000000,
    strokeWeight: 1,
    fillColor: \"#FFA500\",
    fillOpacity: 0.300000,
    map: map,
    paths: [
        new google.maps.LatLng(0.000000, 0.000000),
        new google.maps.LatLng(1.000000, 0.000000),
        new google.maps.LatLng(1.000000, 1.000000),
    ]
});

"
        );
    }

    #[test]
    fn test_alpha_feeds_both_opacities() {
        let kwargs = Kwargs::new().with("alpha", 0.5).with("c", "b");
        let polygon = Polygon::new(&[0.0], &[0.0], &kwargs).unwrap();
        assert_eq!(polygon.style().edge_alpha, 0.5);
        assert_eq!(polygon.style().face_alpha, 0.5);
        assert_eq!(polygon.style().face_color, Color::rgb(0, 0, 255));
    }
}
