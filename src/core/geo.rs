//! Outline extraction for drawing uploaded GeoJSON on the map canvas.
//!
//! Only Polygon, MultiPolygon and LineString shapes are drawn; the document
//! is otherwise taken as-is.

use ::geo::{BoundingRect, Coord, LineString, MultiLineString, Rect};
use serde_json::Value;

pub type Ring = LineString<f64>;

/// Every ring in a FeatureCollection, Feature or bare geometry.
pub fn outlines(document: &Value) -> Vec<Ring> {
    let mut rings = Vec::new();
    collect(document, &mut rings);
    rings
}

fn collect(value: &Value, rings: &mut Vec<Ring>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            for feature in array(value, "features") {
                collect(feature, rings);
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect(geometry, rings);
            }
        }
        Some("GeometryCollection") => {
            for geometry in array(value, "geometries") {
                collect(geometry, rings);
            }
        }
        Some("Polygon") | Some("MultiLineString") => {
            rings.extend(array(value, "coordinates").filter_map(ring));
        }
        Some("MultiPolygon") => {
            for polygon in array(value, "coordinates") {
                if let Some(polygon) = polygon.as_array() {
                    rings.extend(polygon.iter().filter_map(ring));
                }
            }
        }
        Some("LineString") => {
            if let Some(line) = value.get("coordinates").and_then(ring) {
                rings.push(line);
            }
        }
        _ => {}
    }
}

fn array<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn ring(value: &Value) -> Option<Ring> {
    let points: Vec<[f64; 2]> = value
        .as_array()?
        .iter()
        .filter_map(|position| {
            let position = position.as_array()?;
            Some([position.first()?.as_f64()?, position.get(1)?.as_f64()?])
        })
        .collect();
    (points.len() >= 2).then(|| LineString::from(points))
}

/// Smallest rectangle covering every ring, `None` when there are no points.
pub fn bounds<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Option<Rect<f64>> {
    MultiLineString::new(rings.into_iter().cloned().collect()).bounding_rect()
}

/// Fits lon/lat bounds into a viewport, preserving aspect ratio and putting
/// north at the top.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    bounds: Rect<f64>,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Projection {
    pub fn fit(bounds: Rect<f64>, width: f64, height: f64, padding: f64) -> Self {
        let usable_w = (width - 2.0 * padding).max(1.0);
        let usable_h = (height - 2.0 * padding).max(1.0);
        let span_w = bounds.width().max(f64::EPSILON);
        let span_h = bounds.height().max(f64::EPSILON);
        let scale = (usable_w / span_w).min(usable_h / span_h);

        Self {
            bounds,
            scale,
            offset_x: (width - bounds.width() * scale) / 2.0,
            offset_y: (height - bounds.height() * scale) / 2.0,
        }
    }

    pub fn apply(&self, position: Coord<f64>) -> (f32, f32) {
        let px = self.offset_x + (position.x - self.bounds.min().x) * self.scale;
        let py = self.offset_y + (self.bounds.max().y - position.y) * self.scale;
        (px as f32, py as f32)
    }
}
