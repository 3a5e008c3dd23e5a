//! Interactive route editing session.
//!
//! Flow: collect endpoints and flight number, then loop in the main menu
//! (edit / finish / cancel). Editing opens the route menu (insert / shift /
//! delete / view / back). Finishing prints the route and offers the text and
//! KML dumps. Cancelling, once confirmed, drops the route without output.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use fmc_core::{
    round_to, to_map_overlay, to_portable_format, CoordinateSource, Coordinates, Endpoint,
    Endpoints, NewLeg, ReferenceData, RouteDocument, SessionContext, ShiftDirection,
};
use tracing::{info, warn};

use crate::console::Console;

const ERROR_MSG: &str = "Not an option, please try again";

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Finalized(RouteDocument),
    Discarded,
}

enum MainChoice {
    Edit,
    Finish,
    Cancel,
}

pub struct Session<'a, R, W> {
    console: &'a mut Console<R, W>,
    reference: &'a ReferenceData,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(console: &'a mut Console<R, W>, reference: &'a ReferenceData) -> Self {
        Self { console, reference }
    }

    /// Run one session from endpoint entry to finish or discard.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        let mut ctx = self.collect_endpoints()?;
        info!(
            departure = %ctx.endpoints().departure.icao,
            arrival = %ctx.endpoints().arrival.icao,
            flight = %ctx.flight_number(),
            "route session started"
        );

        loop {
            match self.main_menu()? {
                Some(MainChoice::Edit) => self.route_menu(&mut ctx)?,
                Some(MainChoice::Finish) => break,
                Some(MainChoice::Cancel) => {
                    if self.console.confirm(
                        "\nAre you sure you want to discard your route?\nEnter y to discard, or any other input to cancel",
                        "y",
                    )? {
                        info!(legs = ctx.store().count(), "route discarded");
                        return Ok(SessionOutcome::Discarded);
                    }
                }
                None => self.console.say(ERROR_MSG)?,
            }
        }

        self.finalize(&ctx)
    }

    fn collect_endpoints(&mut self) -> Result<SessionContext> {
        let departure = self.endpoint("departure airport ICAO code")?;
        let arrival = self.endpoint("arrival airport ICAO code")?;
        let flight_number = self
            .console
            .prompt("type flight number, or leave blank to skip")?
            .trim()
            .to_uppercase();
        Ok(SessionContext::new(
            Endpoints::new(departure, arrival),
            flight_number,
        ))
    }

    fn endpoint(&mut self, question: &str) -> Result<Endpoint> {
        let icao = self.console.prompt(question)?.trim().to_uppercase();
        let coords = match self.reference.airport(&icao) {
            Some(coords) => coords,
            None => self.manual_coordinates()?,
        };
        Ok(Endpoint::new(icao, coords))
    }

    /// Ask for latitude and longitude until both parse and are in range.
    fn manual_coordinates(&mut self) -> Result<Coordinates> {
        self.console
            .say("Not in the database, please enter location manually")?;
        loop {
            let lat = self.number("Latitude:")?;
            let lon = self.number("Longitude:")?;
            match Coordinates::new(lat, lon) {
                Ok(coords) => return Ok(coords),
                Err(err) => {
                    warn!(%err, "rejected manual coordinates");
                    self.console.say(format!("{err}; please try again"))?;
                }
            }
        }
    }

    fn number(&mut self, question: &str) -> Result<f64> {
        loop {
            match self.console.prompt(question)?.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => self.console.say(ERROR_MSG)?,
            }
        }
    }

    fn main_menu(&mut self) -> Result<Option<MainChoice>> {
        let answer = self
            .console
            .prompt("\nPlease enter:\ne to edit route\nf to finish\nx to cancel route")?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "e" => Some(MainChoice::Edit),
            "f" => Some(MainChoice::Finish),
            "x" => Some(MainChoice::Cancel),
            _ => None,
        })
    }

    fn route_menu(&mut self, ctx: &mut SessionContext) -> Result<()> {
        loop {
            let answer = self.console.prompt(
                "\nPlease enter:\ni to insert a waypoint\ns to shift a waypoint\nd to delete a waypoint\nv to view route\nx to return to main menu",
            )?;
            match answer.trim().to_lowercase().as_str() {
                "i" => self.insert(ctx)?,
                "s" => self.shift(ctx)?,
                "d" => self.delete(ctx)?,
                "v" => self.view(ctx)?,
                "x" => return Ok(()),
                _ => self.console.say(ERROR_MSG)?,
            }
        }
    }

    fn insert(&mut self, ctx: &mut SessionContext) -> Result<()> {
        let name = self.console.prompt("Waypoint")?.trim().to_uppercase();
        if name.is_empty() {
            return self.console.say(ERROR_MSG);
        }

        let reference = self.reference;
        let (coords, source) = match reference.waypoint_candidates(&name) {
            Some([only]) => (*only, CoordinateSource::Database),
            Some(candidates) => (
                self.choose_candidate(ctx, &name, candidates)?,
                CoordinateSource::Database,
            ),
            None => (self.manual_coordinates()?, CoordinateSource::Manual),
        };

        let dist = ctx.distance_from_last(coords.lat, coords.lon);
        self.console.say(format!(
            "your chosen waypoint is {name}, with coordinates of {}, {} and a leg distance of {} nm.",
            coords.lat,
            coords.lon,
            round_to(dist, 3)
        ))?;
        if !self
            .console
            .confirm("press c to confirm waypoint choice, or anything else to cancel", "c")?
        {
            return self.console.say("cancelling waypoint insertion");
        }

        let mut leg = NewLeg::new(name, coords.lat, coords.lon).with_source(source);
        let altitude = self.console.prompt(
            "VNAV altitude; enter number in feet or enter any non-numerical input to skip:",
        )?;
        // "inf"/"nan" parse as f64 but are not altitudes; treat them as a skip.
        if let Some(alt) = altitude
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|alt| alt.is_finite())
        {
            leg = leg.with_altitude(alt);
        }
        let notes = self.console.prompt("Notes, or leave blank to skip")?;
        if !notes.trim().is_empty() {
            leg = leg.with_notes(notes.trim());
        }

        match ctx.append(leg) {
            Ok(position) => self
                .console
                .say(format!("Waypoint added as number {position}.")),
            Err(err) => {
                warn!(%err, "rejected waypoint");
                self.console.say(format!("{err}; waypoint not added"))
            }
        }
    }

    fn choose_candidate(
        &mut self,
        ctx: &SessionContext,
        name: &str,
        candidates: &[Coordinates],
    ) -> Result<Coordinates> {
        self.console
            .say(format!("The following options were found for waypoint {name}"))?;
        for (idx, candidate) in candidates.iter().enumerate() {
            let dist = ctx.distance_from_last(candidate.lat, candidate.lon);
            self.console.say(format!(
                "{idx}) coordinates [{candidate}], leg distance {}nm",
                round_to(dist, 3)
            ))?;
        }
        loop {
            let choice = self
                .console
                .prompt("choose the correct waypoint by number from the list:")?;
            match choice.trim().parse::<usize>() {
                Ok(idx) if idx < candidates.len() => return Ok(candidates[idx]),
                _ => self.console.say(ERROR_MSG)?,
            }
        }
    }

    fn shift(&mut self, ctx: &mut SessionContext) -> Result<()> {
        match ctx.store().count() {
            0 => return self.console.say("No route yet!"),
            1 => return self.console.say("Cannot shift a route with only one waypoint."),
            _ => {}
        }

        let Some(source) = self.position("Waypoint ID to shift:", ctx)? else {
            return self.console.say(ERROR_MSG);
        };
        let direction = self
            .console
            .prompt("Direction to shift waypoint (u for up/ d for down):")?;
        let Ok(direction) = direction.parse::<ShiftDirection>() else {
            return self.console.say(ERROR_MSG);
        };
        let Ok(steps) = self
            .console
            .prompt("Spaces to shift waypoint:")?
            .trim()
            .parse::<usize>()
        else {
            return self.console.say(ERROR_MSG);
        };

        match ctx.reposition(source, steps, direction) {
            Ok(_) => self.console.say(format!(
                "Waypoint has been shifted {steps} space(s) {direction}."
            )),
            Err(err) if err.is_range() => {
                warn!(%err, "rejected shift");
                self.console
                    .say("Choice exceeds route range; please try again.")
            }
            Err(err) => self.console.say(err),
        }
    }

    fn delete(&mut self, ctx: &mut SessionContext) -> Result<()> {
        let Some(position) = self.position("ID of waypoint to delete", ctx)? else {
            return self.console.say(ERROR_MSG);
        };
        if !self.console.confirm(
            format!(
                "Confirm deletion of waypoint number {position}?\nEnter y to confirm, anything else to cancel."
            ),
            "y",
        )? {
            return self.console.say("Cancelling waypoint deletion.");
        }

        match ctx.delete(position) {
            Ok(leg) => self
                .console
                .say(format!("Waypoint {position} ({}) deleted.", leg.name)),
            Err(err) => self.console.say(err),
        }
    }

    /// Read a position that names an existing leg.
    fn position(&mut self, question: &str, ctx: &SessionContext) -> Result<Option<usize>> {
        let answer = self.console.prompt(question)?;
        Ok(answer
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|pos| ctx.store().get(*pos).is_ok()))
    }

    fn view(&mut self, ctx: &SessionContext) -> Result<()> {
        let segments = ctx.leg_distances();
        if ctx.store().is_empty() {
            self.console.say("No route yet!")?;
        } else {
            self.console
                .say("Route so far:\nID: Name, latitude, longitude, altitude, leg distance")?;
            for (leg, segment) in ctx.store().iter().zip(&segments) {
                let altitude = leg
                    .altitude_ft
                    .map(|alt| alt.to_string())
                    .unwrap_or_else(|| "-".to_string());
                self.console.say(format!(
                    "{}: {}, {}, {}, {}, {} nm",
                    leg.position,
                    leg.name,
                    leg.lat,
                    leg.lon,
                    altitude,
                    round_to(segment.distance_nm, 3)
                ))?;
            }
        }
        if let Some(closing) = segments.last() {
            self.console.say(format!(
                "{} -> {}: {} nm",
                closing.from,
                closing.to,
                round_to(closing.distance_nm, 3)
            ))?;
        }
        self.console.say(format!(
            "Total distance is {} nm.",
            round_to(ctx.total_distance(), 3)
        ))
    }

    fn finalize(&mut self, ctx: &SessionContext) -> Result<SessionOutcome> {
        let doc = ctx.assemble();
        let route_text = to_portable_format(&doc);
        let total = ctx.total_distance();

        self.console.say("\nYour route is:\n")?;
        self.console.say(&route_text)?;
        self.console
            .say(format!("Route distance is {} nautical miles.", round_to(total, 3)))?;
        info!(
            legs = doc.legs.len(),
            total_nm = round_to(total, 3),
            elapsed_s = (Utc::now() - ctx.started_at()).num_seconds(),
            "route finalized"
        );

        if self
            .console
            .confirm("Write route to file? Enter c to confirm, or anything else to skip", "c")?
        {
            let path = self.dump(
                "Please type dumpfile name (full path) ending in .txt",
                "txt",
                &format!("{route_text}\n"),
            )?;
            self.console
                .say(format!("Route has been written to {path}"))?;
        } else {
            self.console.say("Skipping write of route to file.")?;
        }

        if self.console.confirm(
            "Export route as KML map? Enter c to confirm, or anything else to skip",
            "c",
        )? {
            let include_arrival = self.console.confirm(
                "Include arrival airport in route map?\nHint: if the route already has a runway line-up you probably don't want the airport as well.\nEnter y to include, or leave blank to omit",
                "y",
            )?;
            let kml = to_map_overlay(ctx.endpoints(), &doc, include_arrival);
            let path = self.dump(
                "Please type dumpfile name (full path) ending in .kml",
                "kml",
                &kml,
            )?;
            self.console
                .say(format!("Route map has been written to {path}"))?;
        } else {
            self.console.say("Skipping KML route map generation")?;
        }

        Ok(SessionOutcome::Finalized(doc))
    }

    /// Prompt for a file name with the given extension and write `contents`.
    ///
    /// Re-prompts on a bad name or a failed write.
    fn dump(&mut self, question: &str, extension: &str, contents: &str) -> Result<String> {
        loop {
            let path = self.console.prompt(question)?.trim().to_string();
            if !has_extension(&path, extension) {
                self.console.say("Sorry, not a valid filename.")?;
                continue;
            }
            match fs::write(&path, contents) {
                Ok(()) => {
                    info!(%path, bytes = contents.len(), "wrote file");
                    return Ok(path);
                }
                Err(err) => {
                    warn!(%path, %err, "file write failed");
                    self.console
                        .say(format!("Could not write {path}: {err}"))?;
                }
            }
        }
    }
}

fn has_extension(path: &str, extension: &str) -> bool {
    let path = Path::new(path);
    path.extension().is_some_and(|ext| ext == extension)
        && path.file_stem().is_some_and(|stem| !stem.is_empty())
}
