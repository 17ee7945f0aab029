use crate::drawables::fmt_opacity;
use crate::error::{check_lengths, PlotError, Result};
use crate::geo::{zip_points, LatLng};
use crate::settings::{self, check_alpha, check_non_negative, Fallback, FieldSpec, Kwargs, Value, PRECISION};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("radius", &["radius"], Fallback::Float(10.0)),
    FieldSpec::new("gradient", &["gradient"], Fallback::Absent),
    FieldSpec::new("opacity", &["opacity"], Fallback::Float(0.6)),
    FieldSpec::new("max_intensity", &["max_intensity"], Fallback::Float(1.0)),
    FieldSpec::new("dissipating", &["dissipating"], Fallback::Bool(true)),
    FieldSpec::new("weights", &["weights"], Fallback::Absent),
    PRECISION,
];

/// One RGBA stop of a heatmap gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl GradientStop {
    fn from_value(value: &Value) -> Result<Self> {
        let invalid = || PlotError::invalid_argument("gradient", "a list of (r, g, b, a) stops");
        let items = value.as_list().ok_or_else(invalid)?;
        let [r, g, b, a] = items else {
            return Err(invalid());
        };
        let channel = |v: &Value| {
            v.as_f64()
                .filter(|c| (0.0..=255.0).contains(c))
                .map(|c| c as u8)
                .ok_or_else(invalid)
        };
        let stop = Self {
            r: channel(r)?,
            g: channel(g)?,
            b: channel(b)?,
            a: a.as_f64().ok_or_else(invalid)?,
        };
        check_alpha("gradient", stop.a)?;
        Ok(stop)
    }
}

/// A density layer over weighted points
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    points: Vec<LatLng>,
    weights: Option<Vec<f64>>,
    radius: f64,
    gradient: Option<Vec<GradientStop>>,
    opacity: f64,
    max_intensity: f64,
    dissipating: bool,
    precision: usize,
}

impl Heatmap {
    /// Build a heatmap layer.
    ///
    /// `weights`, when given, must hold one number per point; points of weight
    /// 1 are written as bare locations.
    pub fn new(lats: &[f64], lngs: &[f64], kwargs: &Kwargs) -> Result<Self> {
        check_lengths(lats, lngs)?;
        let settings = settings::resolve(kwargs, FIELDS)?;

        let weights = settings
            .get::<Option<Vec<Value>>>("weights")?
            .map(|items| {
                if items.len() != lats.len() {
                    return Err(PlotError::length_mismatch("weights", lats.len(), items.len()));
                }
                items
                    .iter()
                    .map(|v| v.as_f64().ok_or_else(|| PlotError::invalid_argument("weights", "a list of numbers")))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let gradient = settings
            .get::<Option<Vec<Value>>>("gradient")?
            .map(|stops| stops.iter().map(GradientStop::from_value).collect::<Result<Vec<_>>>())
            .transpose()?;

        let heatmap = Self {
            points: zip_points(lats, lngs),
            weights,
            radius: settings.get("radius")?,
            gradient,
            opacity: settings.get("opacity")?,
            max_intensity: settings.get("max_intensity")?,
            dissipating: settings.get("dissipating")?,
            precision: settings.precision()?,
        };
        check_non_negative("radius", heatmap.radius)?;
        check_non_negative("max_intensity", heatmap.max_intensity)?;
        check_alpha("opacity", heatmap.opacity)?;
        Ok(heatmap)
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write("new google.maps.visualization.HeatmapLayer({");
        w.indent();
        w.write(&format!("radius: {},", self.radius));
        w.write(&format!("maxIntensity: {},", self.max_intensity));
        w.write(&format!("opacity: {},", fmt_opacity(self.opacity)));
        if !self.dissipating {
            w.write("dissipating: false,");
        }
        if let Some(gradient) = &self.gradient {
            w.write("gradient: [");
            w.indent();
            for stop in gradient {
                w.write(&format!(
                    "\"rgba({}, {}, {}, {})\",",
                    stop.r,
                    stop.g,
                    stop.b,
                    fmt_opacity(stop.a)
                ));
            }
            w.dedent();
            w.write("],");
        }
        w.write("map: map,");
        w.write("data: [");
        w.indent();
        for (i, point) in self.points.iter().enumerate() {
            let location = point.to_js(self.precision);
            match self.weights.as_ref().map(|weights| weights[i]) {
                Some(weight) if weight != 1.0 => {
                    w.write(&format!("{{location: {location}, weight: {weight:.6}}},"));
                }
                _ => {
                    w.write(&format!("{location},"));
                }
            }
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
    use pretty_assertions::assert_eq;

    fn render(heatmap: &Heatmap) -> String {
        let mut w = Writer::in_memory();
        heatmap.emit(&mut w);
        w.finish().unwrap()
    }

    #[test]
    fn test_emit_heatmap_defaults() {
        let heatmap = Heatmap::new(&[1.0, 2.0], &[3.0, 4.0], &Kwargs::new()).unwrap();
        assert_eq!(
            render(&heatmap),
            "new google.maps.visualization.HeatmapLayer({
    radius: 10,
    maxIntensity: 1,
    opacity: 0.600000,
    map: map,
    data: [
        new google.maps.LatLng(1.000000, 3.000000),
        new google.maps.LatLng(2.000000, 4.000000),
    ]
});

"
        );
    }

    #[test]
    fn test_emit_heatmap_with_gradient_and_weights() {
        let kwargs = Kwargs::new()
            .with("radius", 40)
            .with("dissipating", false)
            .with("gradient", vec![(0u8, 0u8, 255u8, 0.0), (255, 0, 0, 1.0)])
            .with("weights", vec![1.0, 5.0]);
        let heatmap = Heatmap::new(&[1.0, 2.0], &[3.0, 4.0], &kwargs).unwrap();
        let out = render(&heatmap);
        assert!(out.contains("    radius: 40,\n"));
        assert!(out.contains("    dissipating: false,\n"));
        assert!(out.contains("    gradient: [\n        \"rgba(0, 0, 255, 0.000000)\",\n        \"rgba(255, 0, 0, 1.000000)\",\n    ],\n"));
        assert!(out.contains("        new google.maps.LatLng(1.000000, 3.000000),\n"));
        assert!(out.contains("        {location: new google.maps.LatLng(2.000000, 4.000000), weight: 5.000000},\n"));
    }

    #[test]
    fn test_weights_length_mismatch() {
        let kwargs = Kwargs::new().with("weights", vec![1.0]);
        let err = Heatmap::new(&[1.0, 2.0], &[3.0, 4.0], &kwargs).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { ref name, .. } if name == "weights"));
    }

    #[test]
    fn test_bad_gradient_stop() {
        let kwargs = Kwargs::new().with("gradient", vec![(1.0, 2.0)]);
        let err = Heatmap::new(&[1.0], &[3.0], &kwargs).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument { .. }));
    }
}
