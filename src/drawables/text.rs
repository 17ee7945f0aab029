use crate::color::Color;
use crate::drawables::escape_double_quoted;
use crate::drawables::marker_icon::transparent_icon_uri;
use crate::error::Result;
use crate::geo::LatLng;
use crate::settings::{self, check_non_negative, Fallback, FieldSpec, Kwargs, PRECISION};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("color", &["color", "c"], Fallback::Absent),
    FieldSpec::new("font_size", &["font_size"], Fallback::Float(20.0)),
    PRECISION,
];

/// A bold text label pinned to a point
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    position: LatLng,
    text: String,
    color: Option<Color>,
    font_size: f64,
    precision: usize,
}

impl Text {
    pub fn new(position: LatLng, text: impl Into<String>, kwargs: &Kwargs) -> Result<Self> {
        let settings = settings::resolve(kwargs, FIELDS)?;
        let font_size: f64 = settings.get("font_size")?;
        check_non_negative("font_size", font_size)?;
        Ok(Self {
            position,
            text: text.into(),
            color: settings.get("color")?,
            font_size,
            precision: settings.precision()?,
        })
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write("new google.maps.Marker({");
        w.indent();
        w.write("label: {");
        w.indent();
        w.write(&format!("text: \"{}\",", escape_double_quoted(&self.text)));
        if let Some(color) = self.color {
            w.write(&format!("color: \"{color}\","));
        }
        w.write("fontWeight: \"bold\",");
        w.write(&format!("fontSize: \"{}px\"", self.font_size));
        w.dedent();
        w.write("},");
        w.write(&format!("icon: \"{}\",", transparent_icon_uri()));
        w.write(&format!("position: {},", self.position.to_js(self.precision)));
        w.write("map: map");
        w.dedent();
        w.write("});");
        w.blank();
    }
}
