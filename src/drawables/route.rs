use crate::error::{PlotError, Result};
use crate::geo::LatLng;
use crate::settings::{self, Fallback, FieldSpec, Kwargs, Value, PRECISION};
use crate::writer::{LineSink, Writer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("travel_mode", &["travel_mode"], Fallback::Str("DRIVING")),
    FieldSpec::new("waypoints", &["waypoints"], Fallback::Absent),
    PRECISION,
];

/// A route computed and drawn by the directions service at view time
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    origin: LatLng,
    destination: LatLng,
    travel_mode: String,
    waypoints: Vec<LatLng>,
    precision: usize,
}

fn waypoint(value: &Value) -> Result<LatLng> {
    match value.as_list() {
        Some([lat, lng]) => match (lat.as_f64(), lng.as_f64()) {
            (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
            _ => Err(PlotError::invalid_argument("waypoints", "a list of (lat, lng) pairs")),
        },
        _ => Err(PlotError::invalid_argument("waypoints", "a list of (lat, lng) pairs")),
    }
}

impl Route {
    /// Build a route.
    ///
    /// `travel_mode` is uppercased and passed to the directions service as
    /// is, so `"walking"` becomes `WALKING`.
    pub fn new(origin: LatLng, destination: LatLng, kwargs: &Kwargs) -> Result<Self> {
        let settings = settings::resolve(kwargs, FIELDS)?;
        let travel_mode = settings.get::<String>("travel_mode")?.trim().to_uppercase();
        if travel_mode.is_empty() {
            return Err(PlotError::invalid_argument("travel_mode", "a non-empty travel mode"));
        }
        let waypoints = settings
            .get::<Option<Vec<Value>>>("waypoints")?
            .unwrap_or_default()
            .iter()
            .map(waypoint)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            origin,
            destination,
            travel_mode,
            waypoints,
            precision: settings.precision()?,
        })
    }

    pub fn travel_mode(&self) -> &str {
        &self.travel_mode
    }

    pub fn emit<S: LineSink>(&self, w: &mut Writer<S>) {
        w.write("new google.maps.DirectionsService().route({");
        w.indent();
        w.write(&format!("travelMode: \"{}\",", self.travel_mode));
        w.write(&format!("origin: {},", self.origin.to_js(self.precision)));
        if self.waypoints.is_empty() {
            w.write(&format!("destination: {}", self.destination.to_js(self.precision)));
        } else {
            w.write(&format!("destination: {},", self.destination.to_js(self.precision)));
            w.write("waypoints: [");
            w.indent();
            for point in &self.waypoints {
                w.write(&format!(
                    "{{location: {}, stopover: false}},",
                    point.to_js(self.precision)
                ));
            }
            w.dedent();
            w.write("]");
        }
        w.dedent();
        w.write("}, function(response, status) {");
        w.indent();
        w.write("if (status == google.maps.DirectionsStatus.OK) {");
        w.indent();
        w.write("new google.maps.DirectionsRenderer({map: map}).setDirections(response);");
        w.dedent();
        w.write("}");
        w.dedent();
        w.write("});");
        w.blank();
    }
}
