use crate::drawables::{escape_double_quoted, fmt_opacity};
use crate::error::Result;
use crate::geo::Bounds;
use crate::settings::{self, check_alpha, Fallback, FieldSpec, Kwargs};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[FieldSpec::new("opacity", &["opacity"], Fallback::Absent)];

/// An image stretched over a bounding rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlay {
    url: String,
    bounds: Bounds,
    opacity: Option<f64>,
}

impl GroundOverlay {
    pub fn new(url: impl Into<String>, bounds: Bounds, kwargs: &Kwargs) -> Result<Self> {
        let settings = settings::resolve(kwargs, FIELDS)?;
        let opacity: Option<f64> = settings.get("opacity")?;
        if let Some(opacity) = opacity {
            check_alpha("opacity", opacity)?;
        }
        Ok(Self {
            url: url.into(),
            bounds,
            opacity,
        })
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write("new google.maps.GroundOverlay(");
        w.indent();
        w.write(&format!("\"{}\",", escape_double_quoted(&self.url)));
        w.write(&format!("{},", self.bounds.to_js()));
        w.write("{");
        w.indent();
        if let Some(opacity) = self.opacity {
            w.write(&format!("opacity: {},", fmt_opacity(opacity)));
        }
        w.write("map: map,");
        w.write("clickable: false");
        w.dedent();
        w.write("}");
        w.dedent();
        w.write(");");
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(overlay: &GroundOverlay) -> String {
        let mut w = Writer::in_memory();
        overlay.emit(&mut w);
        w.finish().unwrap()
    }

    #[test]
    fn test_emit_ground_overlay() {
        let overlay = GroundOverlay::new(
            "http://example.com/overlay.png",
            Bounds::new(37.77, 37.76, -122.41, -122.42),
            &Kwargs::new().with("opacity", 0.5),
        )
        .unwrap();
        assert_eq!(
            render(&overlay),
            r#"new google.maps.GroundOverlay(
    "http://example.com/overlay.png",
    {"north":37.77,"south":37.76,"east":-122.41,"west":-122.42},
    {
        opacity: 0.500000,
        map: map,
        clickable: false
    }
);

"#
        );
    }

    #[test]
    fn test_opacity_omitted_by_default() {
        let overlay = GroundOverlay::new("a.png", Bounds::new(1.0, 0.0, 1.0, 0.0), &Kwargs::new()).unwrap();
        assert!(!render(&overlay).contains("opacity"));
    }
}
