//! SSC web services REST client.
//!
//! Fetches the observatory catalog and satellite location data from the
//! Satellite Situation Center. Runs over blocking HTTP; callers spawn
//! these on a background thread and receive results over a channel.

use crate::catalog::ObservatoryRecord;
use crate::plot::TrajectorySeries;
use crate::request::PlotRequest;
use crate::time::{format_request_time, parse_service_time};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SSC_URL: &str = "https://sscweb.gsfc.nasa.gov/WS/sscr/2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sample-rate divisor passed through to the service, matching the
/// resolution the original page requested.
const RESOLUTION_FACTOR: u32 = 2;

/// Service endpoint, overridable through the SSC_URL environment
/// variable.
pub fn service_url() -> String {
    std::env::var("SSC_URL").unwrap_or_else(|_| DEFAULT_SSC_URL.to_string())
}

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .build()
}

#[derive(Deserialize)]
struct ObservatoryResponse {
    #[serde(rename = "Observatory", default)]
    observatory: Vec<ObservatoryDescription>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObservatoryDescription {
    id: String,
    name: String,
    start_time: String,
    end_time: String,
}

/// GET {base}/observatories
pub fn fetch_observatories(base: &str) -> Result<Vec<ObservatoryRecord>, String> {
    let url = format!("{}/observatories", base);
    log::debug!("fetching observatories from {}", url);

    let response = agent()
        .get(&url)
        .set("Accept", "application/json")
        .call()
        .map_err(|e| format!("HTTP error: {}", e))?;
    let body = response
        .into_string()
        .map_err(|e| format!("Read error: {}", e))?;

    decode_observatories(&body)
}

fn decode_observatories(body: &str) -> Result<Vec<ObservatoryRecord>, String> {
    let response: ObservatoryResponse =
        serde_json::from_str(body).map_err(|e| format!("Bad observatory response: {}", e))?;

    let mut records = Vec::with_capacity(response.observatory.len());
    for obs in response.observatory {
        let start_time = parse_service_time(&obs.start_time)
            .ok_or_else(|| format!("Bad start time for {}: {}", obs.id, obs.start_time))?;
        let end_time = parse_service_time(&obs.end_time)
            .ok_or_else(|| format!("Bad end time for {}: {}", obs.id, obs.end_time))?;
        records.push(ObservatoryRecord {
            id: obs.id,
            name: obs.name,
            start_time,
            end_time,
        });
    }
    if records.is_empty() {
        return Err("No observatories returned".to_string());
    }
    Ok(records)
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DataRequest {
    time_interval: TimeInterval,
    satellites: Vec<SatelliteSpecification>,
    output_options: OutputOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TimeInterval {
    start: String,
    end: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SatelliteSpecification {
    id: String,
    resolution_factor: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutputOptions {
    all_location_filters: bool,
    coordinate_options: Vec<CoordinateOption>,
    min_max_points: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CoordinateOption {
    coordinate_system: String,
    component: String,
}

fn location_request_body(request: &PlotRequest) -> Result<String, String> {
    let body = DataRequest {
        time_interval: TimeInterval {
            start: format_request_time(request.start),
            end: format_request_time(request.stop),
        },
        satellites: request
            .satellite_ids
            .iter()
            .map(|id| SatelliteSpecification {
                id: id.clone(),
                resolution_factor: RESOLUTION_FACTOR,
            })
            .collect(),
        output_options: OutputOptions {
            all_location_filters: true,
            coordinate_options: ["X", "Y", "Z"]
                .iter()
                .map(|component| CoordinateOption {
                    coordinate_system: "Gse".to_string(),
                    component: component.to_string(),
                })
                .collect(),
            min_max_points: 2,
        },
    };
    serde_json::to_string(&body).map_err(|e| format!("Bad request body: {}", e))
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocationResult {
    #[serde(default)]
    status_code: Option<String>,
    #[serde(default)]
    data: Vec<SatelliteData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SatelliteData {
    id: String,
    #[serde(default)]
    coordinates: Vec<CoordinateData>,
    #[serde(default)]
    time: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CoordinateData {
    coordinate_system: String,
    #[serde(default)]
    x: Vec<f64>,
    #[serde(default)]
    y: Vec<f64>,
    #[serde(default)]
    z: Vec<f64>,
}

/// POST {base}/locations covering all satellites in the request.
pub fn fetch_locations(base: &str, request: &PlotRequest) -> Result<Vec<TrajectorySeries>, String> {
    let url = format!("{}/locations", base);
    log::debug!(
        "fetching locations from {} for {:?}",
        url,
        request.satellite_ids
    );

    let body = location_request_body(request)?;
    let response = agent()
        .post(&url)
        .set("Content-Type", "application/json")
        .set("Accept", "application/json")
        .send_string(&body)
        .map_err(|e| format!("HTTP error: {}", e))?;
    let reply = response
        .into_string()
        .map_err(|e| format!("Read error: {}", e))?;

    decode_locations(&reply)
}

fn decode_locations(body: &str) -> Result<Vec<TrajectorySeries>, String> {
    let result: LocationResult =
        serde_json::from_str(body).map_err(|e| format!("Bad location response: {}", e))?;

    if let Some(status) = &result.status_code {
        if status != "Success" {
            return Err(format!("Request for information from SSC failed: {}", status));
        }
    }

    let mut series = Vec::with_capacity(result.data.len());
    for data in result.data {
        let coords = data
            .coordinates
            .first()
            .ok_or_else(|| format!("No coordinates for {}", data.id))?;
        if coords.x.len() != coords.y.len() || coords.x.len() != coords.z.len() {
            return Err(format!(
                "Mismatched coordinate lengths for {}: {}/{}/{}",
                data.id,
                coords.x.len(),
                coords.y.len(),
                coords.z.len()
            ));
        }

        let points = coords
            .x
            .iter()
            .zip(&coords.y)
            .zip(&coords.z)
            .map(|((&x, &y), &z)| [x, y, z])
            .collect();

        series.push(TrajectorySeries {
            satellite_id: data.id,
            name: String::new(),
            coordinate_system: coords.coordinate_system.clone(),
            times: data.time,
            points,
        });
    }
    if series.is_empty() {
        return Err("No trajectory data returned".to_string());
    }
    Ok(series)
}
