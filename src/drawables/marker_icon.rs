use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::color::Color;
use crate::context::Context;
use crate::writer::{LineSink, Writer};

/// Pin outline; the fill color is substituted per icon.
const PIN_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="34" viewBox="0 0 20 34">"#,
    r#"<path d="M10 33 C10 33 1 19 1 10 A9 9 0 1 1 19 10 C19 19 10 33 10 33 Z" "#,
    r##"fill="{fill}" stroke="#000000" stroke-width="1"/>"##,
    r##"<circle cx="10" cy="10" r="3" fill="#000000" fill-opacity="0.35"/>"##,
    "</svg>",
);

const TRANSPARENT_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"/>"#;

fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// URI of a zero-size transparent icon, used to show a bare label
pub(crate) fn transparent_icon_uri() -> String {
    svg_data_uri(TRANSPARENT_SVG)
}

/// A pin icon in one color.
///
/// Written once per color per emission pass and referenced by name from
/// every marker that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    color: Color,
}

impl MarkerIcon {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Script variable holding the icon, e.g. `marker_icon_FF0000`
    pub fn name(&self) -> String {
        format!("marker_icon_{}", self.color.hex_digits())
    }

    pub fn url(&self) -> String {
        svg_data_uri(&PIN_SVG.replace("{fill}", &self.color.to_string()))
    }

    /// Write the icon definition unless this pass already holds it.
    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>, ctx: &mut Context) {
        if !ctx.claim_icon(self.color) {
            return;
        }
        w.write(&format!("var {} = {{", self.name()));
        w.indent();
        w.write(&format!("url: \"{}\",", self.url()));
        w.write("labelOrigin: new google.maps.Point(10, 11)");
        w.dedent();
        w.write("};");
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_name() {
        assert_eq!(MarkerIcon::new(Color::rgb(0x12, 0xab, 0xef)).name(), "marker_icon_12ABEF");
    }

    #[test]
    fn test_url_embeds_color() {
        let url = MarkerIcon::new(Color::RED).url();
        let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(svg.contains(r##"fill="#FF0000""##));
    }

    #[test]
    fn test_emitted_once_per_pass() {
        let icon = MarkerIcon::new(Color::RED);
        let mut ctx = Context::new();
        let mut w = Writer::in_memory();
        icon.emit(&mut w, &mut ctx);
        icon.emit(&mut w, &mut ctx);
        let out = w.finish().unwrap();
        assert_eq!(out.matches("var marker_icon_FF0000 = {").count(), 1);
        assert!(out.contains("    labelOrigin: new google.maps.Point(10, 11)\n};\n\n"));
    }
}
