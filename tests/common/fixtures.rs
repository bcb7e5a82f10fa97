use minewatch::config::ApiSettings;
use serde_json::{Map, Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

/// Fast polling settings pointed at `base_url`.
pub fn test_settings(base_url: &str, max_poll_attempts: u32) -> ApiSettings {
    ApiSettings {
        base_url: base_url.to_string(),
        poll_interval_ms: 5,
        max_poll_attempts,
        request_timeout_secs: 5,
    }
}

pub fn legal_geojson() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "lease"},
            "geometry": {"type": "Polygon", "coordinates": [
                [[85.10, 23.60], [85.14, 23.60], [85.14, 23.64], [85.10, 23.64], [85.10, 23.60]]
            ]}
        }]
    })
}

pub fn nogo_geojson() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "river buffer"},
            "geometry": {"type": "Polygon", "coordinates": [
                [[85.14, 23.60], [85.16, 23.60], [85.16, 23.62], [85.14, 23.62], [85.14, 23.60]]
            ]}
        }]
    })
}

/// Writes a GeoJSON document to a temp file. The file is removed when dropped.
pub fn write_geojson(document: &Value) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".geojson")
        .tempfile()
        .expect("Failed to create temp geojson file");
    file.write_all(document.to_string().as_bytes())
        .expect("Failed to write geojson");
    file
}

pub fn timeseries(points: &[(&str, f64)]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|(date, area)| json!({"date": date, "area_km2": area}))
            .collect(),
    )
}

/// A `/results` document with three periods, images for the first two and
/// one no-go zone per entry in `zones`, in that order.
pub fn results_document(zones: &[(&str, &[(&str, f64)])]) -> Value {
    let mut no_go_zones = Map::new();
    for (name, points) in zones {
        no_go_zones.insert(
            name.to_string(),
            json!({
                "timeseries": timeseries(points),
                "predicted_next_area": 0.0031,
            }),
        );
    }

    json!({
        "metadata": {"analysis_start": "2024-01-01", "analysis_end": "2024-03-31"},
        "mine": {
            "timeseries": timeseries(&[("2024-01", 10.0), ("2024-02", 15.0), ("2024-03", 15.5)]),
            "predicted_next_month_area": 16.2,
            "quantified_maps": {
                "2024-01": "/static/quantified_2024-01.png",
                "2024-02": "/static/quantified_2024-02.png"
            }
        },
        "no_go_zones": Value::Object(no_go_zones),
    })
}

pub const RIVER_ZONE: (&str, &[(&str, f64)]) = (
    "no_go_zone_0",
    &[("2024-01", 0.0), ("2024-02", 0.0019), ("2024-03", 0.0025)],
);

pub const FOREST_ZONE: (&str, &[(&str, f64)]) = (
    "no_go_zone_1",
    &[("2024-01", 0.5), ("2024-02", 0.6), ("2024-03", 0.7)],
);

pub fn running(progress: u32) -> Value {
    json!({"progress": progress, "status": "running", "error": null})
}

pub fn done() -> Value {
    json!({"progress": 100, "status": "done", "error": null})
}

pub fn failed(message: &str) -> Value {
    json!({"progress": 30, "status": "error", "error": message})
}
