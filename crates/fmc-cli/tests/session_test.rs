//! Scripted end-to-end sessions.
//!
//! Each test feeds a canned answer script through the console and checks
//! the resulting route, the printed messages and any files written.

use std::io::Cursor;

use fmc_cli::{Console, Session, SessionOutcome};
use fmc_core::{parse_portable_format, ReferenceData, RouteDocument};

const AIRPORTS: &str = r#"{"KSEA": [47.4502, -122.3088], "KPDX": [45.5898, -122.5951]}"#;
const WAYPOINTS: &str = r#"{"SEA": [[47.435, -122.31]], "ALPHA": [[10.0, 20.0], [46.5, -122.4]]}"#;

fn reference() -> ReferenceData {
    ReferenceData::from_json(AIRPORTS, WAYPOINTS).unwrap()
}

fn run_script(lines: &[&str]) -> (anyhow::Result<SessionOutcome>, String) {
    let mut script = lines.join("\n");
    script.push('\n');
    let reference = reference();
    let mut console = Console::new(Cursor::new(script), Vec::new());
    let outcome = Session::new(&mut console, &reference).run();
    let output = String::from_utf8(console.output().clone()).unwrap();
    (outcome, output)
}

fn finalized(outcome: anyhow::Result<SessionOutcome>) -> RouteDocument {
    match outcome.unwrap() {
        SessionOutcome::Finalized(doc) => doc,
        SessionOutcome::Discarded => panic!("session was discarded"),
    }
}

fn leg_names(doc: &RouteDocument) -> Vec<&str> {
    doc.legs.iter().map(|leg| leg.name.as_str()).collect()
}

#[test]
fn builds_shifts_and_exports_a_route() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("route.txt");
    let kml = dir.path().join("route.kml");
    let txt_arg = txt.to_str().unwrap().to_string();
    let kml_arg = kml.to_str().unwrap().to_string();

    let (outcome, output) = run_script(&[
        "KSEA", "kpdx", "asa123",
        "e",
        "i", "sea", "c", "9000", "",
        "i", "alpha", "7", "1", "c", "x", "direct",
        "v",
        "s", "2", "u", "1",
        "s", "1", "d", "5",
        "x",
        "f",
        "c", "bad.kml", &txt_arg,
        "c", "y", &kml_arg,
    ]);
    let doc = finalized(outcome);

    assert_eq!(doc.departure, "KSEA");
    assert_eq!(doc.arrival, "KPDX");
    assert_eq!(doc.flight_number, "ASA123");
    assert_eq!(leg_names(&doc), vec!["ALPHA", "SEA"]);
    assert_eq!(doc.legs[0].lat, 46.5);
    assert_eq!(doc.legs[0].notes.as_deref(), Some("direct"));
    assert_eq!(doc.legs[0].altitude_ft, None);
    assert_eq!(doc.legs[1].altitude_ft, Some(9000.0));
    assert!(doc.legs.iter().all(|leg| !leg.resolved_from_database));

    assert!(output.contains("The following options were found for waypoint ALPHA"));
    assert!(output.contains("1) coordinates [46.5, -122.4]"));
    assert!(output.contains("Not an option, please try again"));
    assert!(output.contains("1: SEA, 47.435, -122.31, 9000, 0.914 nm"));
    assert!(output.contains("2: ALPHA, 46.5, -122.4, -, 56.275 nm"));
    assert!(output.contains("ALPHA -> KPDX: 55.266 nm"));
    assert!(output.contains("Total distance is"));
    assert!(output.contains("Waypoint has been shifted 1 space(s) up."));
    assert!(output.contains("Choice exceeds route range; please try again."));
    assert!(output.contains("Sorry, not a valid filename."));

    let written = std::fs::read_to_string(&txt).unwrap();
    assert!(written.ends_with('\n'));
    assert_eq!(parse_portable_format(&written).unwrap(), doc);

    let map = std::fs::read_to_string(&kml).unwrap();
    assert!(map.contains("<name>KPDX</name>"));
    assert_eq!(map.matches("<LineString>").count(), 3);
}

#[test]
fn cancel_requires_confirmation() {
    let (outcome, output) = run_script(&["KSEA", "KPDX", "", "x", "n", "x", "y"]);
    assert_eq!(outcome.unwrap(), SessionOutcome::Discarded);
    assert_eq!(output.matches("Are you sure you want to discard your route?").count(), 2);
}

#[test]
fn cancel_confirmation_is_case_sensitive() {
    let (outcome, output) = run_script(&["KSEA", "KPDX", "", "x", "Y", "f", "n", "n"]);
    assert!(finalized(outcome).legs.is_empty());
    assert_eq!(output.matches("Are you sure you want to discard your route?").count(), 1);
}

#[test]
fn uppercase_c_does_not_confirm_a_waypoint() {
    let (outcome, output) = run_script(&["KSEA", "KPDX", "", "e", "i", "sea", "C", "x", "f", "n", "n"]);
    assert!(finalized(outcome).legs.is_empty());
    assert!(output.contains("cancelling waypoint insertion"));
}

#[test]
fn non_finite_altitude_is_skipped_and_leg_kept() {
    let (outcome, output) = run_script(&[
        "KSEA", "KPDX", "",
        "e",
        "i", "sea", "c", "inf", "",
        "i", "alpha", "1", "c", "NaN", "",
        "i", "one", "46", "-122", "c", "1e400", "",
        "x",
        "f", "n", "n",
    ]);
    let doc = finalized(outcome);

    assert_eq!(leg_names(&doc), vec!["SEA", "ALPHA", "ONE"]);
    assert!(doc.legs.iter().all(|leg| leg.altitude_ft.is_none()));
    assert!(!output.contains("waypoint not added"));
}

#[test]
fn empty_route_view_shows_direct_segment() {
    let (outcome, output) = run_script(&["KSEA", "KPDX", "", "e", "v", "x", "f", "n", "n"]);
    finalized(outcome);
    assert!(output.contains("No route yet!"));
    assert!(output.contains("KSEA -> KPDX: 112.355 nm"));
    assert!(output.contains("Total distance is 112.355 nm."));
}

#[test]
fn unknown_airport_falls_back_to_manual_entry() {
    let (outcome, output) = run_script(&[
        "zzzz", "north", "95", "20", "10", "20",
        "KPDX", "",
        "e", "s", "d", "5", "q", "x",
        "f", "n", "n",
    ]);
    let doc = finalized(outcome);

    assert_eq!(doc.departure, "ZZZZ");
    assert!(doc.legs.is_empty());
    assert!(output.contains("Not in the database, please enter location manually"));
    assert!(output.contains("invalid latitude"));
    assert!(output.contains("No route yet!"));
    assert!(output.contains("Skipping write of route to file."));
    assert!(output.contains("Skipping KML route map generation"));
}

#[test]
fn delete_needs_confirmation_and_renumbers() {
    let (outcome, output) = run_script(&[
        "KSEA", "KPDX", "",
        "e",
        "i", "one", "46", "-122", "c", "", "",
        "i", "two", "45.9", "-122.1", "c", "", "",
        "s", "3",
        "i", "three", "45.8", "-122.2", "n",
        "d", "1", "n",
        "d", "1", "y",
        "x",
        "f", "n", "n",
    ]);
    let doc = finalized(outcome);

    assert_eq!(leg_names(&doc), vec!["TWO"]);
    assert_eq!(doc.legs[0].position, 1);
    assert!(output.contains("cancelling waypoint insertion"));
    assert!(output.contains("Cancelling waypoint deletion."));
    assert!(output.contains("Waypoint 1 (ONE) deleted."));
}

#[test]
fn closed_input_ends_the_session_with_an_error() {
    let (outcome, _) = run_script(&["KSEA"]);
    assert!(outcome.is_err());
}
