//! Core data models for route legs and endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// A latitude/longitude pair in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, RouteError> {
        validate_lat(lat)?;
        validate_lon(lon)?;
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

pub(crate) fn validate_lat(lat: f64) -> Result<(), RouteError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(RouteError::validation(
            "latitude",
            format!("{lat} is not within -90..=90"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_lon(lon: f64) -> Result<(), RouteError> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(RouteError::validation(
            "longitude",
            format!("{lon} is not within -180..=180"),
        ));
    }
    Ok(())
}

/// Where a leg's coordinates came from when it was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSource {
    /// Picked from the waypoint reference table.
    Database,
    /// Typed in by the user.
    #[default]
    Manual,
}

/// A departure or arrival airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub icao: String,
    pub lat: f64,
    pub lon: f64,
}

impl Endpoint {
    pub fn new(icao: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            icao: icao.into(),
            lat: coords.lat,
            lon: coords.lon,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// The fixed airports bounding a route. Set once, never stored as legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub departure: Endpoint,
    pub arrival: Endpoint,
}

impl Endpoints {
    pub fn new(departure: Endpoint, arrival: Endpoint) -> Self {
        Self { departure, arrival }
    }
}

/// Fields supplied by the caller when appending a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeg {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Altitude constraint in feet; `None` leaves it to the pilot.
    pub altitude_ft: Option<f64>,
    pub notes: Option<String>,
    pub source: CoordinateSource,
}

impl NewLeg {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            altitude_ft: None,
            notes: None,
            source: CoordinateSource::Manual,
        }
    }

    pub fn with_altitude(mut self, altitude_ft: f64) -> Self {
        self.altitude_ft = Some(altitude_ft);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_source(mut self, source: CoordinateSource) -> Self {
        self.source = source;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), RouteError> {
        validate_lat(self.lat)?;
        validate_lon(self.lon)?;
        if let Some(alt) = self.altitude_ft {
            if !alt.is_finite() {
                return Err(RouteError::validation(
                    "altitude",
                    format!("{alt} is not a finite number"),
                ));
            }
        }
        Ok(())
    }
}

/// One waypoint entry of the route, at a 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub position: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude_ft: Option<f64>,
    /// Always `false`: a `true` value makes the FMC snap the leg onto its
    /// own navdata and move it.
    #[serde(default)]
    pub resolved_from_database: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Leg {
    pub(crate) fn from_new(position: usize, new: NewLeg) -> Self {
        Self {
            position,
            name: new.name,
            lat: new.lat,
            lon: new.lon,
            altitude_ft: new.altitude_ft,
            resolved_from_database: false,
            notes: new.notes,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Direction of a shift: `Up` is earlier in the route, `Down` is later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Up,
    Down,
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

impl FromStr for ShiftDirection {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            other => Err(RouteError::validation(
                "direction",
                format!("expected u/up or d/down, got {other:?}"),
            )),
        }
    }
}
