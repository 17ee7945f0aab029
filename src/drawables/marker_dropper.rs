use crate::color;
use crate::context::Context;
use crate::drawables::marker::Marker;
use crate::drawables::marker_icon::MarkerIcon;
use crate::error::Result;
use crate::geo::LatLng;
use crate::settings::{self, Fallback, FieldSpec, Kwargs};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", &["title"], Fallback::Absent),
    FieldSpec::new("label", &["label"], Fallback::Absent),
    FieldSpec::new("draggable", &["draggable"], Fallback::Bool(false)),
];

/// Lets the viewer drop a marker by clicking the map and remove it by
/// clicking the marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDropper {
    /// Template for dropped markers; the position comes from the click.
    marker: Marker,
}

impl MarkerDropper {
    /// An unknown `color` falls back to a black icon with a warning.
    pub fn new(color: &str, kwargs: &Kwargs) -> Result<Self> {
        let settings = settings::resolve(kwargs, FIELDS)?;
        let marker = Marker::at(LatLng::new(0.0, 0.0), color::resolve_or_black(color))
            .with_title(settings.get("title")?)
            .with_label(settings.get("label")?)
            .with_draggable(settings.get("draggable")?);
        Ok(Self { marker })
    }

    pub fn icon(&self) -> &MarkerIcon {
        self.marker.icon()
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>, ctx: &mut Context) {
        self.icon().emit(w, ctx);
        w.write("map.addListener(\"click\", function(event) {");
        w.indent();
        self.marker.emit_marker(w, Some("dropped_marker"), "event.latLng");
        w.write(
            "
            dropped_marker.addListener('click', function() {
                dropped_marker.setMap(null);
            });
            ",
        );
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
    fn test_emit_marker_dropper() {
        let kwargs = Kwargs::new().with("title", "Dropped").with("draggable", true);
        let dropper = MarkerDropper::new("k", &kwargs).unwrap();
        let mut w = Writer::in_memory();
        dropper.emit(&mut w, &mut Context::new());
        let out = w.finish().unwrap();
        let body = out.split_once("};\n\n").unwrap().1;
        assert_eq!(
            body,
            "map.addListener(\"click\", function(event) {
    var dropped_marker = new google.maps.Marker({
        position: event.latLng,
        icon: marker_icon_000000,
        title: \"Dropped\",
        draggable: true,
        map: map
    });

    dropped_marker.addListener('click', function() {
        dropped_marker.setMap(null);
    });
});

"
        );
    }

    #[test]
    fn test_reuses_icon_from_markers() {
        let dropper = MarkerDropper::new("red", &Kwargs::new()).unwrap();
        let mut ctx = Context::new();
        ctx.claim_icon(Color::RED);
        let mut w = Writer::in_memory();
        dropper.emit(&mut w, &mut ctx);
        assert!(!w.finish().unwrap().contains("var marker_icon_FF0000"));
    }

    #[test]
    fn test_dropped_marker_matches_marker_fields() {
        let dropper = MarkerDropper::new("red", &Kwargs::new().with("label", "Q\"")).unwrap();
        let mut w = Writer::in_memory();
        dropper.emit(&mut w, &mut Context::new());
        let out = w.finish().unwrap();
        assert!(out.contains(
            "    var dropped_marker = new google.maps.Marker({\n        position: event.latLng,\n        icon: marker_icon_FF0000,\n        label: \"Q\\\"\",\n        map: map\n    });\n"
        ));
    }

    #[test]
    fn test_bad_color_is_black() {
        let dropper = MarkerDropper::new("#12", &Kwargs::new()).unwrap();
        assert_eq!(dropper.icon().color(), Color::BLACK);
    }
}
