//! Reduction of raw Golf API payloads to the shapes served to clients.
//!
//! Both functions are total: malformed input produces an error object in the
//! output rather than a Rust error, because clients receive that object as
//! the response body.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::payload::{int_field, render_course_id};

/// Message placed in the `error` field of a malformed payload response.
pub const INVALID_COURSE_DATA: &str = "Invalid course data format";

const POI_GREEN: i64 = 1;
const LOCATION_FRONT: i64 = 1;
const LOCATION_CENTER: i64 = 2;
const LOCATION_BACK: i64 = 3;

/// A latitude/longitude pair. Components that are missing or not JSON
/// numbers (numeric strings included) serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoPoint {
    fn from_entry(entry: &Value) -> Self {
        Self {
            latitude: entry.get("latitude").and_then(Value::as_f64),
            longitude: entry.get("longitude").and_then(Value::as_f64),
        }
    }
}

/// Green locations of a single hole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleGreens {
    pub hole_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_of_green: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_of_green: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_of_green: Option<GeoPoint>,
}

impl HoleGreens {
    fn new(hole_number: i64) -> Self {
        Self {
            hole_number,
            front_of_green: None,
            center_of_green: None,
            back_of_green: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCoordinates {
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub holes: Vec<HoleGreens>,
    /// Number of holes present, which may be fewer than 18 for partial data.
    pub count: usize,
}

/// Output of [`extract_green_centers`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GreenCenters {
    Extracted(NormalizedCoordinates),
    Malformed { error: String, holes: Vec<HoleGreens> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedInfo {
    #[serde(rename = "courseID")]
    pub course_id: String,
    #[serde(rename = "parsMen")]
    pub pars_men: Vec<Value>,
    #[serde(rename = "parsWomen")]
    pub pars_women: Vec<Value>,
}

/// Output of [`extract_pars`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParTable {
    Extracted(NormalizedInfo),
    Malformed { error: String },
}

/// Extracts front, center and back of green for every hole.
///
/// Only entries with `poi == 1` and `location` in 1..=3 are considered.
/// When several entries share a hole and location, the last one wins.
/// Holes come out in ascending order.
pub fn extract_green_centers(raw: &Value) -> GreenCenters {
    let Some(entries) = raw.get("coordinates").and_then(Value::as_array) else {
        return GreenCenters::Malformed {
            error: INVALID_COURSE_DATA.to_string(),
            holes: Vec::new(),
        };
    };

    let mut holes: BTreeMap<i64, HoleGreens> = BTreeMap::new();
    for entry in entries {
        if int_field(entry, "poi") != Some(POI_GREEN) {
            continue;
        }
        let Some(location) = int_field(entry, "location") else {
            continue;
        };
        if !(LOCATION_FRONT..=LOCATION_BACK).contains(&location) {
            continue;
        }
        let Some(hole_number) = int_field(entry, "hole") else {
            continue;
        };

        let hole = holes
            .entry(hole_number)
            .or_insert_with(|| HoleGreens::new(hole_number));
        let point = Some(GeoPoint::from_entry(entry));
        match location {
            LOCATION_FRONT => hole.front_of_green = point,
            LOCATION_CENTER => hole.center_of_green = point,
            _ => hole.back_of_green = point,
        }
    }

    let holes: Vec<HoleGreens> = holes.into_values().collect();
    GreenCenters::Extracted(NormalizedCoordinates {
        course_id: render_course_id(raw),
        count: holes.len(),
        holes,
    })
}

/// Extracts the men's and women's par tables.
///
/// Absent (or non-array) par fields default to empty sequences.
pub fn extract_pars(raw: &Value) -> ParTable {
    if !raw.is_object() {
        return ParTable::Malformed {
            error: INVALID_COURSE_DATA.to_string(),
        };
    }

    let pars = |field: &str| {
        raw.get(field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    ParTable::Extracted(NormalizedInfo {
        course_id: render_course_id(raw),
        pars_men: pars("parsMen"),
        pars_women: pars("parsWomen"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn green(hole: i64, location: i64, lat: f64, lon: f64) -> Value {
        json!({"hole": hole, "poi": 1, "location": location, "latitude": lat, "longitude": lon})
    }

    #[test]
    fn test_green_centers_sorted_with_all_locations() {
        let mut coordinates = Vec::new();
        for hole in [3, 1, 2] {
            for location in [2, 1, 3] {
                coordinates.push(green(hole, location, hole as f64, location as f64));
            }
        }
        let raw = json!({"courseID": "C1", "coordinates": coordinates});

        let GreenCenters::Extracted(out) = extract_green_centers(&raw) else {
            panic!("expected extracted coordinates");
        };
        assert_eq!(out.course_id, "C1");
        assert_eq!(out.count, 3);
        let numbers: Vec<i64> = out.holes.iter().map(|h| h.hole_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        for hole in &out.holes {
            let n = hole.hole_number as f64;
            assert_eq!(
                hole.front_of_green,
                Some(GeoPoint { latitude: Some(n), longitude: Some(1.0) })
            );
            assert_eq!(
                hole.center_of_green,
                Some(GeoPoint { latitude: Some(n), longitude: Some(2.0) })
            );
            assert_eq!(
                hole.back_of_green,
                Some(GeoPoint { latitude: Some(n), longitude: Some(3.0) })
            );
        }
    }

    #[test]
    fn test_green_centers_filters_non_green_entries() {
        let raw = json!({
            "courseID": "C2",
            "coordinates": [
                {"hole": 1, "poi": 11, "location": 2, "latitude": 1.0, "longitude": 1.0},
                {"hole": 1, "poi": 1, "location": 4, "latitude": 1.0, "longitude": 1.0},
                {"poi": 1, "location": 2, "latitude": 1.0, "longitude": 1.0},
                {"hole": 2, "poi": 1, "location": 2, "latitude": 5.5, "longitude": 6.5}
            ]
        });

        let GreenCenters::Extracted(out) = extract_green_centers(&raw) else {
            panic!("expected extracted coordinates");
        };
        assert_eq!(out.count, 1);
        assert_eq!(out.holes[0].hole_number, 2);
        assert!(out.holes[0].front_of_green.is_none());
        assert!(out.holes[0].back_of_green.is_none());
    }

    #[test]
    fn test_green_centers_last_duplicate_wins() {
        let raw = json!({
            "courseID": "C3",
            "coordinates": [green(1, 2, 1.0, 1.0), green(1, 2, 9.0, 9.0)]
        });

        let GreenCenters::Extracted(out) = extract_green_centers(&raw) else {
            panic!("expected extracted coordinates");
        };
        assert_eq!(
            out.holes[0].center_of_green,
            Some(GeoPoint { latitude: Some(9.0), longitude: Some(9.0) })
        );
    }

    #[test]
    fn test_non_numeric_components_become_null() {
        let raw = json!({
            "courseID": "C4",
            "coordinates": [{"hole": 1, "poi": 1, "location": 2, "latitude": "12.5", "longitude": 7.0}]
        });

        let out = serde_json::to_value(extract_green_centers(&raw)).unwrap();
        assert_eq!(
            out["holes"][0]["centerOfGreen"],
            json!({"latitude": null, "longitude": 7.0})
        );
    }

    #[test]
    fn test_green_centers_missing_coordinates() {
        let out = serde_json::to_value(extract_green_centers(&json!({}))).unwrap();
        assert_eq!(out, json!({"error": INVALID_COURSE_DATA, "holes": []}));

        let out = serde_json::to_value(extract_green_centers(&Value::Null)).unwrap();
        assert_eq!(out, json!({"error": INVALID_COURSE_DATA, "holes": []}));
    }

    #[test]
    fn test_green_centers_empty_list_is_not_an_error() {
        let out = serde_json::to_value(extract_green_centers(&json!({"coordinates": []}))).unwrap();
        assert_eq!(out, json!({"courseID": "", "holes": [], "count": 0}));
    }

    #[test]
    fn test_green_centers_wire_shape() {
        let raw = json!({
            "courseID": "X1",
            "coordinates": [{"hole": 1, "poi": 1, "location": 2, "latitude": 10.0, "longitude": 20.0}],
            "apiRequestsLeft": "42"
        });
        let out = serde_json::to_value(extract_green_centers(&raw)).unwrap();
        assert_eq!(
            out,
            json!({
                "courseID": "X1",
                "holes": [{"holeNumber": 1, "centerOfGreen": {"latitude": 10.0, "longitude": 20.0}}],
                "count": 1
            })
        );
    }

    #[test]
    fn test_pars_null_is_error() {
        let out = serde_json::to_value(extract_pars(&Value::Null)).unwrap();
        assert_eq!(out, json!({"error": INVALID_COURSE_DATA}));
    }

    #[test]
    fn test_pars_empty_object_defaults() {
        let out = serde_json::to_value(extract_pars(&json!({}))).unwrap();
        assert_eq!(out, json!({"courseID": "", "parsMen": [], "parsWomen": []}));
    }

    #[test]
    fn test_pars_passthrough() {
        let raw = json!({
            "courseID": "X2",
            "parsMen": [4, 3, 5],
            "parsWomen": [4, 4, 5],
            "apiRequestsLeft": "10"
        });
        let out = serde_json::to_value(extract_pars(&raw)).unwrap();
        assert_eq!(
            out,
            json!({"courseID": "X2", "parsMen": [4, 3, 5], "parsWomen": [4, 4, 5]})
        );
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let raw = json!({"courseID": "X", "coordinates": [green(2, 1, 1.0, 2.0), green(1, 3, 3.0, 4.0)]});
        assert_eq!(extract_green_centers(&raw), extract_green_centers(&raw));
    }
}
