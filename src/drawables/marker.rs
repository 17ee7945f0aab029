use crate::color::Color;
use crate::context::Context;
use crate::drawables::marker_icon::MarkerIcon;
use crate::drawables::{escape_double_quoted, escape_single_quoted};
use crate::geo::{LatLng, DEFAULT_PRECISION};
use crate::error::Result;
use crate::settings::{self, ColorPolicy, Fallback, FieldSpec, Kwargs, PRECISION};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("color", &["color", "c"], Fallback::Str("#FF0000")),
    FieldSpec::new("title", &["title"], Fallback::Absent),
    FieldSpec::new("label", &["label"], Fallback::Absent),
    FieldSpec::new("info_window", &["info_window"], Fallback::Absent),
    FieldSpec::new("draggable", &["draggable"], Fallback::Bool(false)),
    PRECISION,
];

/// Popup content opened by clicking a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoWindow {
    content: String,
}

impl InfoWindow {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the window as `info_window_{index}` and bind it to `marker`.
    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>, index: usize, marker: &str) {
        let window = format!("info_window_{index}");
        w.write(&format!("var {window} = new google.maps.InfoWindow({{"));
        w.indent();
        w.write(&format!("content: '{}'", escape_single_quoted(&self.content)));
        w.dedent();
        w.write("});");
        w.blank();
        w.write(&format!("{marker}.addListener('click', function() {{"));
        w.indent();
        w.write(&format!("{window}.open(map, {marker});"));
        w.dedent();
        w.write("});");
        w.blank();
    }
}

/// A pin at a point, optionally titled, labelled or opening an info window
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: LatLng,
    icon: MarkerIcon,
    title: Option<String>,
    label: Option<String>,
    info_window: Option<InfoWindow>,
    draggable: bool,
    precision: usize,
}

impl Marker {
    /// Build a marker from keyword settings.
    ///
    /// An unknown `color` falls back to a black icon with a warning instead of
    /// failing.
    pub fn new(position: LatLng, kwargs: &Kwargs) -> Result<Self> {
        let settings = settings::resolve_with(kwargs, FIELDS, ColorPolicy::Lenient)?;
        Ok(Self::at(position, settings.get("color")?)
            .with_title(settings.get::<Option<String>>("title")?)
            .with_label(settings.get::<Option<String>>("label")?)
            .with_info_window(settings.get::<Option<String>>("info_window")?.map(InfoWindow::new))
            .with_draggable(settings.get("draggable")?)
            .with_precision(settings.precision()?))
    }

    /// A plain marker with a `color` icon
    pub fn at(position: LatLng, color: Color) -> Self {
        Self {
            position,
            icon: MarkerIcon::new(color),
            title: None,
            label: None,
            info_window: None,
            draggable: false,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_info_window(mut self, info_window: Option<InfoWindow>) -> Self {
        self.info_window = info_window;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn icon(&self) -> &MarkerIcon {
        &self.icon
    }

    pub fn info_window(&self) -> Option<&InfoWindow> {
        self.info_window.as_ref()
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>, ctx: &mut Context) {
        self.icon.emit(w, ctx);
        let position = self.position.to_js(self.precision);
        match &self.info_window {
            Some(window) => {
                let index = ctx.next_info_index();
                let name = format!("info_marker_{index}");
                self.emit_marker(w, Some(&name), &position);
                window.emit(w, index, &name);
            }
            None => self.emit_marker(w, None, &position),
        }
    }

    /// Write the marker constructor at the script expression `position`,
    /// optionally bound to `var`. The icon must already be written.
    pub(crate) fn emit_marker<S: LineSink>(&self, w: &mut Writer<S>, var: Option<&str>, position: &str) {
        match var {
            Some(name) => w.write(&format!("var {name} = new google.maps.Marker({{")),
            None => w.write("new google.maps.Marker({"),
        };
        w.indent();
        w.write(&format!("position: {position},"));
        w.write(&format!("icon: {},", self.icon.name()));
        if let Some(title) = &self.title {
            w.write(&format!("title: \"{}\",", escape_double_quoted(title)));
        }
        if let Some(label) = &self.label {
            w.write(&format!("label: \"{}\",", escape_double_quoted(label)));
        }
        if self.draggable {
            w.write("draggable: true,");
        }
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

    fn render(markers: &[Marker]) -> String {
        let mut ctx = Context::new();
        let mut w = Writer::in_memory();
        for marker in markers {
            marker.emit(&mut w, &mut ctx);
        }
        w.finish().unwrap()
    }

    #[test]
    fn test_default_color_is_red() {
        let marker = Marker::new(LatLng::new(1.0, 2.0), &Kwargs::new()).unwrap();
        assert_eq!(marker.icon().color(), Color::RED);
    }

    #[test]
    fn test_unknown_color_degrades_to_black() {
        let kwargs = Kwargs::new().with("color", "not-a-color");
        let marker = Marker::new(LatLng::new(1.0, 2.0), &kwargs).unwrap();
        assert_eq!(marker.icon().color(), Color::BLACK);
    }

    #[test]
    fn test_emit_plain_marker() {
        let kwargs = Kwargs::new()
            .with("c", "cornflowerblue")
            .with("title", "Say \"hi\"")
            .with("label", "A")
            .with("draggable", true);
        let marker = Marker::new(LatLng::new(37.770776, -122.461689), &kwargs).unwrap();
        let out = render(&[marker]);
        let body = out.split_once("};\n\n").unwrap().1;
        assert_eq!(
            body,
            "new google.maps.Marker({
    position: new google.maps.LatLng(37.770776, -122.461689),
    icon: marker_icon_6495ED,
    title: \"Say \\\"hi\\\"\",
    label: \"A\",
    draggable: true,
    map: map
});

"
        );
    }

    #[test]
    fn test_info_window_markers_are_numbered() {
        let kwargs = Kwargs::new().with("info_window", "It's here");
        let a = Marker::new(LatLng::new(1.0, 2.0), &kwargs).unwrap();
        let b = Marker::new(LatLng::new(3.0, 4.0), &kwargs).unwrap();
        let out = render(&[a, b]);

        assert_eq!(out.matches("var marker_icon_FF0000 = {").count(), 1);
        assert!(out.contains("var info_marker_0 = new google.maps.Marker({"));
        assert!(out.contains("var info_marker_1 = new google.maps.Marker({"));
        assert!(out.contains("var info_window_1 = new google.maps.InfoWindow({\n    content: 'It\\'s here'\n});"));
        assert!(out.contains(
            "info_marker_0.addListener('click', function() {\n    info_window_0.open(map, info_marker_0);\n});"
        ));
    }
}
