//! Output encodings for a finished route.
//!
//! The portable format is the array layout the FMC imports:
//!
//! ```text
//! ["KSEA","KPDX","ASA123",[[1,"SEA",47.43,-122.3,null,false,null], ...]]
//! ```
//!
//! The map overlay is a KML document with one placemark per airport and
//! leg and one labelled line per segment.

use serde_json::{json, Value};

use crate::error::FormatError;
use crate::geo::{leg_distance, round_to};
use crate::models::{Coordinates, Endpoint, Endpoints, Leg};
use crate::route::RouteDocument;

const LEG_FIELDS: usize = 7;

/// Encode a route in the portable array-of-arrays format.
pub fn to_portable_format(doc: &RouteDocument) -> String {
    let legs: Vec<Value> = doc.legs.iter().map(leg_to_value).collect();
    json!([doc.departure, doc.arrival, doc.flight_number, legs]).to_string()
}

fn leg_to_value(leg: &Leg) -> Value {
    json!([
        leg.position,
        leg.name,
        leg.lat,
        leg.lon,
        leg.altitude_ft.map(altitude_value),
        // The FMC snaps legs flagged as database fixes; never emit true.
        false,
        leg.notes,
    ])
}

/// Whole-foot altitudes are written as integers.
fn altitude_value(alt: f64) -> Value {
    if alt.fract() == 0.0 && alt.abs() < i64::MAX as f64 {
        Value::from(alt as i64)
    } else {
        Value::from(alt)
    }
}

/// Read a route back from its portable encoding.
pub fn parse_portable_format(text: &str) -> Result<RouteDocument, FormatError> {
    let value: Value = serde_json::from_str(text.trim())?;
    let top = value
        .as_array()
        .ok_or_else(|| FormatError::Shape("route is not an array".into()))?;
    if top.len() != 4 {
        return Err(FormatError::Shape(format!(
            "expected 4 top-level fields, found {}",
            top.len()
        )));
    }

    let departure = string_field(&top[0], "departure")?;
    let arrival = string_field(&top[1], "arrival")?;
    let flight_number = string_field(&top[2], "flight number")?;
    let rows = top[3]
        .as_array()
        .ok_or_else(|| FormatError::Shape("leg list is not an array".into()))?;

    let legs = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| leg_from_value(idx + 1, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteDocument {
        departure,
        arrival,
        flight_number,
        legs,
    })
}

fn string_field(value: &Value, what: &str) -> Result<String, FormatError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FormatError::Shape(format!("{what} is not a string")))
}

fn leg_from_value(expected_position: usize, row: &Value) -> Result<Leg, FormatError> {
    let shape = |msg: &str| FormatError::Shape(format!("leg {expected_position}: {msg}"));

    let fields = row.as_array().ok_or_else(|| shape("not an array"))?;
    if fields.len() != LEG_FIELDS {
        return Err(shape(&format!(
            "expected {LEG_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let position = fields[0]
        .as_u64()
        .ok_or_else(|| shape("position is not a positive integer"))? as usize;
    if position != expected_position {
        return Err(shape(&format!("out of order position {position}")));
    }
    let name = fields[1].as_str().ok_or_else(|| shape("name is not a string"))?;
    let lat = fields[2].as_f64().ok_or_else(|| shape("latitude is not a number"))?;
    let lon = fields[3].as_f64().ok_or_else(|| shape("longitude is not a number"))?;
    let coords = Coordinates::new(lat, lon)?;
    let altitude_ft = match &fields[4] {
        Value::Null => None,
        other => Some(other.as_f64().ok_or_else(|| shape("altitude is not a number"))?),
    };
    let resolved_from_database = fields[5]
        .as_bool()
        .ok_or_else(|| shape("database flag is not a boolean"))?;
    let notes = match &fields[6] {
        Value::Null => None,
        other => Some(
            other
                .as_str()
                .ok_or_else(|| shape("notes are not a string"))?
                .to_string(),
        ),
    };

    Ok(Leg {
        position,
        name: name.to_string(),
        lat: coords.lat,
        lon: coords.lon,
        altitude_ft,
        resolved_from_database,
        notes,
    })
}

/// Render the route as a KML overlay.
///
/// Connects departure, every leg in order and, when `include_arrival` is
/// set, the arrival airport. Each connecting line is labelled with its
/// great-circle length in nautical miles rounded to 2 decimals.
pub fn to_map_overlay(endpoints: &Endpoints, doc: &RouteDocument, include_arrival: bool) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    out.push_str("<Document>\n");

    push_airport(&mut out, &endpoints.departure);
    let mut prev = endpoints.departure.coordinates();
    for leg in &doc.legs {
        let here = leg.coordinates();
        push_connector(&mut out, prev, here);
        push_point(&mut out, &leg.name, here);
        prev = here;
    }
    if include_arrival {
        push_connector(&mut out, prev, endpoints.arrival.coordinates());
        push_airport(&mut out, &endpoints.arrival);
    }

    out.push_str("</Document>\n");
    out.push_str("</kml>\n");
    out
}

fn push_airport(out: &mut String, airport: &Endpoint) {
    push_point(out, &airport.icao, airport.coordinates());
}

fn push_point(out: &mut String, name: &str, at: Coordinates) {
    out.push_str("\t<Placemark>\n");
    out.push_str(&format!("\t\t<name>{}</name>\n", escape_markup(name)));
    out.push_str("\t\t<Point>\n");
    out.push_str(&format!("\t\t\t<coordinates>{},{}</coordinates>\n", at.lon, at.lat));
    out.push_str("\t\t</Point>\n");
    out.push_str("\t</Placemark>\n");
}

fn push_connector(out: &mut String, from: Coordinates, to: Coordinates) {
    let dist = round_to(leg_distance(from.lat, from.lon, to.lat, to.lon), 2);
    out.push_str("\t<Placemark>\n");
    out.push_str(&format!("\t\t<name>{dist} nm</name>\n"));
    out.push_str("\t\t<LineString>\n");
    out.push_str("\t\t\t<extrude>1</extrude>\n");
    out.push_str("\t\t\t<tessellate>1</tessellate>\n");
    out.push_str("\t\t\t<altitudeMode>absolute</altitudeMode>\n");
    out.push_str("\t\t\t<coordinates>\n");
    out.push_str(&format!("\t\t\t\t{},{}\n", from.lon, from.lat));
    out.push_str(&format!("\t\t\t\t{},{}\n", to.lon, to.lat));
    out.push_str("\t\t\t</coordinates>\n");
    out.push_str("\t\t</LineString>\n");
    out.push_str("\t</Placemark>\n");
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
