//! Route assembly: live distance totals and the exportable route document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::geo::leg_distance;
use crate::models::{Coordinates, Endpoints, Leg, NewLeg, ShiftDirection};
use crate::sequence::SequenceStore;

/// The finished route, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    pub departure: String,
    pub arrival: String,
    pub flight_number: String,
    pub legs: Vec<Leg>,
}

/// Distance of one segment of the route, in nautical miles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegDistance {
    pub from: String,
    pub to: String,
    pub distance_nm: f64,
}

/// Total great-circle distance from departure, through every leg in
/// position order, to arrival.
///
/// The closing segment to the arrival airport is always counted, so an
/// empty store yields the direct departure-to-arrival distance.
pub fn total_distance(endpoints: &Endpoints, store: &SequenceStore) -> f64 {
    segments(endpoints, store)
        .map(|(_, from, _, to)| leg_distance(from.lat, from.lon, to.lat, to.lon))
        .sum()
}

/// Build the exportable route structure from the current store contents.
pub fn assemble(flight_number: &str, endpoints: &Endpoints, store: &SequenceStore) -> RouteDocument {
    RouteDocument {
        departure: endpoints.departure.icao.clone(),
        arrival: endpoints.arrival.icao.clone(),
        flight_number: flight_number.to_string(),
        legs: store.all(),
    }
}

/// Consecutive (from name, from point, to name, to point) pairs of the route.
fn segments<'a>(
    endpoints: &'a Endpoints,
    store: &'a SequenceStore,
) -> impl Iterator<Item = (&'a str, Coordinates, &'a str, Coordinates)> + 'a {
    let departure = (endpoints.departure.icao.as_str(), endpoints.departure.coordinates());
    let arrival = (endpoints.arrival.icao.as_str(), endpoints.arrival.coordinates());

    let points: Vec<(&str, Coordinates)> = std::iter::once(departure)
        .chain(store.iter().map(|leg| (leg.name.as_str(), leg.coordinates())))
        .chain(std::iter::once(arrival))
        .collect();

    (0..points.len() - 1).map(move |idx| {
        let (from_name, from) = points[idx];
        let (to_name, to) = points[idx + 1];
        (from_name, from, to_name, to)
    })
}

/// State of one editing session: the endpoints, flight number and legs.
#[derive(Debug, Clone)]
pub struct SessionContext {
    endpoints: Endpoints,
    flight_number: String,
    store: SequenceStore,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(endpoints: Endpoints, flight_number: impl Into<String>) -> Self {
        Self {
            endpoints,
            flight_number: flight_number.into(),
            store: SequenceStore::new(),
            started_at: Utc::now(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn append(&mut self, leg: NewLeg) -> Result<usize, RouteError> {
        self.store.append(leg)
    }

    pub fn reposition(
        &mut self,
        source: usize,
        steps: usize,
        direction: ShiftDirection,
    ) -> Result<usize, RouteError> {
        self.store.reposition(source, steps, direction)
    }

    pub fn delete(&mut self, position: usize) -> Result<Leg, RouteError> {
        self.store.delete(position)
    }

    /// Recomputed on every call; the store may have changed since the last.
    pub fn total_distance(&self) -> f64 {
        total_distance(&self.endpoints, &self.store)
    }

    /// Per-segment distances, ending with the segment into the arrival airport.
    pub fn leg_distances(&self) -> Vec<LegDistance> {
        segments(&self.endpoints, &self.store)
            .map(|(from_name, from, to_name, to)| LegDistance {
                from: from_name.to_string(),
                to: to_name.to_string(),
                distance_nm: leg_distance(from.lat, from.lon, to.lat, to.lon),
            })
            .collect()
    }

    /// Where the next appended leg would start from.
    pub fn last_point(&self) -> Coordinates {
        self.store
            .last()
            .map(Leg::coordinates)
            .unwrap_or_else(|| self.endpoints.departure.coordinates())
    }

    /// Distance from the current end of the route to a candidate point.
    pub fn distance_from_last(&self, lat: f64, lon: f64) -> f64 {
        let last = self.last_point();
        leg_distance(last.lat, last.lon, lat, lon)
    }

    pub fn assemble(&self) -> RouteDocument {
        assemble(&self.flight_number, &self.endpoints, &self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Endpoint;

    fn sea_pdx() -> Endpoints {
        Endpoints::new(
            Endpoint::new("KSEA", Coordinates { lat: 47.4502, lon: -122.3088 }),
            Endpoint::new("KPDX", Coordinates { lat: 45.5898, lon: -122.5951 }),
        )
    }

    #[test]
    fn empty_route_is_direct_distance() {
        let endpoints = sea_pdx();
        let store = SequenceStore::new();
        let total = total_distance(&endpoints, &store);
        assert!((total - 112.355).abs() < 0.01, "got {total}");
    }

    #[test]
    fn total_includes_closing_segment() {
        let mut session = SessionContext::new(sea_pdx(), "ASA123");
        session.append(NewLeg::new("MID", 46.5, -122.4)).unwrap();
        let total = session.total_distance();
        assert!((total - 112.4547).abs() < 0.001, "got {total}");

        let legs = session.leg_distances();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].from, "KSEA");
        assert_eq!(legs[0].to, "MID");
        assert_eq!(legs[1].to, "KPDX");
        let sum: f64 = legs.iter().map(|leg| leg.distance_nm).sum();
        assert!((sum - total).abs() < 1e-9);
    }

    #[test]
    fn total_follows_route_order() {
        let mut session = SessionContext::new(sea_pdx(), "");
        session.append(NewLeg::new("SOUTH", 45.7, -122.6)).unwrap();
        session.append(NewLeg::new("NORTH", 47.3, -122.3)).unwrap();
        let zigzag = session.total_distance();

        session.reposition(2, 1, ShiftDirection::Up).unwrap();
        let straight = session.total_distance();
        assert!(straight < zigzag, "{straight} !< {zigzag}");
    }

    #[test]
    fn distance_from_last_starts_at_departure() {
        let mut session = SessionContext::new(sea_pdx(), "");
        assert_eq!(session.distance_from_last(47.4502, -122.3088), 0.0);

        session.append(NewLeg::new("A", 46.0, -122.0)).unwrap();
        assert_eq!(session.distance_from_last(46.0, -122.0), 0.0);
        assert_eq!(session.last_point(), Coordinates { lat: 46.0, lon: -122.0 });
    }

    #[test]
    fn assemble_copies_legs_in_order() {
        let mut session = SessionContext::new(sea_pdx(), "ASA123");
        session.append(NewLeg::new("A", 47.0, -122.0)).unwrap();
        session.append(NewLeg::new("B", 46.0, -122.0).with_altitude(9000.0)).unwrap();
        session.reposition(1, 1, ShiftDirection::Down).unwrap();

        let doc = session.assemble();
        assert_eq!(doc.departure, "KSEA");
        assert_eq!(doc.arrival, "KPDX");
        assert_eq!(doc.flight_number, "ASA123");
        let names: Vec<_> = doc.legs.iter().map(|leg| leg.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(doc.legs[0].position, 1);
        assert_eq!(doc.legs[0].altitude_ft, Some(9000.0));
    }
}
