//! Read-only airport and waypoint lookup tables.
//!
//! Both tables are JSON objects keyed by identifier. Airports map to a
//! single `[lat, lon]`; waypoints map to a list of candidates because the
//! same name is used by fixes in different parts of the world. Coordinates
//! may be JSON numbers or numeric strings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ReferenceError;
use crate::models::Coordinates;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

type RawPair = [RawNumber; 2];

/// Airport and waypoint coordinates loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    airports: HashMap<String, Coordinates>,
    waypoints: HashMap<String, Vec<Coordinates>>,
}

impl ReferenceData {
    /// Empty tables; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the two tables from JSON text.
    pub fn from_json(airports_json: &str, waypoints_json: &str) -> Result<Self, ReferenceError> {
        let raw_airports: HashMap<String, RawPair> = serde_json::from_str(airports_json)
            .map_err(|source| ReferenceError::Json {
                what: "airport",
                source,
            })?;
        let raw_waypoints: HashMap<String, Vec<RawPair>> = serde_json::from_str(waypoints_json)
            .map_err(|source| ReferenceError::Json {
                what: "waypoint",
                source,
            })?;

        let airports = raw_airports
            .into_iter()
            .map(|(ident, pair)| {
                let coords = convert_pair("airport", &ident, pair)?;
                Ok((ident.to_ascii_uppercase(), coords))
            })
            .collect::<Result<HashMap<_, _>, ReferenceError>>()?;

        let waypoints = raw_waypoints
            .into_iter()
            .map(|(ident, pairs)| {
                let candidates = pairs
                    .into_iter()
                    .map(|pair| convert_pair("waypoint", &ident, pair))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((ident.to_ascii_uppercase(), candidates))
            })
            .collect::<Result<HashMap<_, _>, ReferenceError>>()?;

        Ok(Self {
            airports,
            waypoints,
        })
    }

    /// Read and parse the airport and waypoint files.
    pub fn load(airports_path: &Path, waypoints_path: &Path) -> Result<Self, ReferenceError> {
        let airports_json = read(airports_path)?;
        let waypoints_json = read(waypoints_path)?;
        let data = Self::from_json(&airports_json, &waypoints_json)?;
        info!(
            airports = data.airport_count(),
            waypoints = data.waypoint_count(),
            "loaded reference data"
        );
        Ok(data)
    }

    /// Coordinates of an airport, or `None` when it is not in the table.
    pub fn airport(&self, ident: &str) -> Option<Coordinates> {
        self.airports.get(&ident.trim().to_ascii_uppercase()).copied()
    }

    /// All candidate positions for a waypoint name, in table order.
    pub fn waypoint_candidates(&self, ident: &str) -> Option<&[Coordinates]> {
        self.waypoints
            .get(&ident.trim().to_ascii_uppercase())
            .map(Vec::as_slice)
            .filter(|candidates| !candidates.is_empty())
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }
}

fn read(path: &Path) -> Result<String, ReferenceError> {
    fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn convert_pair(what: &'static str, ident: &str, pair: RawPair) -> Result<Coordinates, ReferenceError> {
    let [lat, lon] = pair;
    let malformed = |reason: String| ReferenceError::Coordinate {
        what,
        ident: ident.to_string(),
        reason,
    };

    let lat = to_f64(lat).map_err(&malformed)?;
    let lon = to_f64(lon).map_err(&malformed)?;
    Coordinates::new(lat, lon).map_err(|err| malformed(err.to_string()))
}

fn to_f64(raw: RawNumber) -> Result<f64, String> {
    match raw {
        RawNumber::Number(value) => Ok(value),
        RawNumber::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| format!("{text:?} is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = r#"{"KSEA": [47.4502, -122.3088], "kpdx": ["45.5898", "-122.5951"]}"#;
    const WAYPOINTS: &str = r#"{
        "SEA": [[47.435, -122.31]],
        "ALPHA": [[10.0, 20.0], [-33.5, 151.2]],
        "EMPTY": []
    }"#;

    #[test]
    fn looks_up_airports_case_insensitively() {
        let data = ReferenceData::from_json(AIRPORTS, WAYPOINTS).unwrap();
        assert_eq!(
            data.airport("ksea"),
            Some(Coordinates { lat: 47.4502, lon: -122.3088 })
        );
        assert_eq!(
            data.airport("KPDX"),
            Some(Coordinates { lat: 45.5898, lon: -122.5951 })
        );
        assert_eq!(data.airport("KLAX"), None);
    }

    #[test]
    fn returns_all_waypoint_candidates() {
        let data = ReferenceData::from_json(AIRPORTS, WAYPOINTS).unwrap();
        assert_eq!(data.waypoint_candidates("sea").unwrap().len(), 1);
        let alpha = data.waypoint_candidates("ALPHA").unwrap();
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[1], Coordinates { lat: -33.5, lon: 151.2 });
        assert!(data.waypoint_candidates("EMPTY").is_none());
        assert!(data.waypoint_candidates("NOPE").is_none());
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let err = ReferenceData::from_json(r#"{"BAD": ["north", 1]}"#, "{}").unwrap_err();
        assert!(matches!(err, ReferenceError::Coordinate { what: "airport", .. }));

        let err = ReferenceData::from_json("{}", r#"{"FAR": [[100, 0]]}"#).unwrap_err();
        assert!(matches!(err, ReferenceError::Coordinate { what: "waypoint", .. }));

        let err = ReferenceData::from_json("[1, 2]", "{}").unwrap_err();
        assert!(matches!(err, ReferenceError::Json { what: "airport", .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ReferenceData::load(
            Path::new("/nonexistent/airports.json"),
            Path::new("/nonexistent/nav_data.json"),
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::Io { .. }));
    }
}
