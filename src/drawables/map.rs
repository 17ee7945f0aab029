use crate::config::MapOptions;
use crate::geo::LatLng;
use crate::writer::{LineSink, Writer};

/// The base map every other drawable is attached to
#[derive(Debug, Clone, PartialEq)]
pub struct BaseMap {
    center: LatLng,
    zoom: u32,
    options: MapOptions,
}

impl BaseMap {
    pub fn new(center: LatLng, zoom: u32, options: MapOptions) -> Self {
        Self {
            center,
            zoom,
            options,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        let options = &self.options;
        w.write("var map = new google.maps.Map(document.getElementById(\"map_canvas\"), {");
        w.indent();
        if let Some(styles) = &options.map_styles {
            // A `Value` always serializes.
            let styles = serde_json::to_string_pretty(styles).unwrap_or_default();
            w.write(&format!("styles: {styles},"));
        }
        if let Some(map_type) = &options.map_type {
            w.write(&format!("mapTypeId: \"{}\",", map_type.to_lowercase()));
        }
        if let Some(tilt) = options.tilt {
            w.write(&format!("tilt: {tilt},"));
        }
        if options.scale_control {
            w.write("scaleControl: true,");
        }
        w.write(&format!("zoom: {},", self.zoom));
        w.write(&format!("center: {}", self.center.to_js(options.center_precision())));
        w.dedent();
        w.write("});");
        w.blank();

        if let Some(bounds) = &options.fit_bounds {
            w.write(&format!("map.fitBounds({});", bounds.to_js()));
            w.blank();
        }
    }
}
