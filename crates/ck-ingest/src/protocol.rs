//! Line protocol for live curve data.
//!
//! Each line is one of:
//! - `{"curves":[{"id":"a","points":[[x,y],...]}, ...]}`
//! - `{"id":"a","points":[[x,y],...]}`
//! - `x,y` or a bare `y`, both for stream [`DEFAULT_STREAM_ID`] (bare `y` gets `x = 0`)

use serde_json::Value;

pub const DEFAULT_STREAM_ID: &str = "default";

/// One point destined for the stream curve named `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamSample {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl StreamSample {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }
}

/// Decode one line. Unrecognised lines yield no samples.
pub fn parse_line(line: &str) -> Vec<StreamSample> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    if let Ok(value) = serde_json::from_str::<Value>(line) {
        if let Some(samples) = parse_json(&value) {
            return samples;
        }
    }
    parse_plain(line).into_iter().collect()
}

fn parse_json(value: &Value) -> Option<Vec<StreamSample>> {
    let object = value.as_object()?;
    if let Some(curves) = object.get("curves").and_then(Value::as_array) {
        let mut samples = Vec::new();
        for curve in curves {
            samples.extend(parse_curve(curve).unwrap_or_default());
        }
        return Some(samples);
    }
    parse_curve(value)
}

fn parse_curve(value: &Value) -> Option<Vec<StreamSample>> {
    let id = value.get("id")?.as_str()?;
    let points = value.get("points")?.as_array()?;
    Some(
        points
            .iter()
            .filter_map(|p| match p.as_array().map(Vec::as_slice) {
                Some([x, y]) => Some(StreamSample::new(id, x.as_f64()?, y.as_f64()?)),
                _ => None,
            })
            .collect(),
    )
}

fn parse_plain(line: &str) -> Option<StreamSample> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => Some(StreamSample::new(
            DEFAULT_STREAM_ID,
            x.parse().ok()?,
            y.parse().ok()?,
        )),
        [y] => Some(StreamSample::new(DEFAULT_STREAM_ID, 0.0, y.parse().ok()?)),
        _ => None,
    }
}
