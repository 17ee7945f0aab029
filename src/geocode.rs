//! Location lookup through the Geocoding web service

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::geo::LatLng;

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

fn client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("gmap-plotter/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| PlotError::Geocoding(err.to_string()))
}

/// Look up the coordinates of a free-form location such as `"San Francisco"`.
pub fn geocode(location: &str, api_key: Option<&str>) -> Result<LatLng> {
    let mut query = vec![("address", location)];
    if let Some(key) = api_key {
        query.push(("key", key));
    }

    debug!(location, "geocoding");
    let body = client()?
        .get(GEOCODE_ENDPOINT)
        .query(&query)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|err| PlotError::Geocoding(err.to_string()))?;

    parse_response(&body)
}

/// Extract the first result's location from a Geocoding JSON response.
pub fn parse_response(body: &str) -> Result<LatLng> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|err| PlotError::Geocoding(format!("malformed response: {err}")))?;

    if let Some(message) = response.error_message.filter(|m| !m.is_empty()) {
        return Err(PlotError::Geocoding(message));
    }

    response
        .results
        .into_iter()
        .next()
        .map(|result| result.geometry.location)
        .ok_or_else(|| {
            let status = response.status.as_deref().unwrap_or("no status");
            PlotError::Geocoding(format!("no results ({status})"))
        })
}
