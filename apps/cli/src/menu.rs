//! Interactive numbered menu driving a [`GameSession`].

use anyhow::Result;
use sim_core::RouteId;
use sim_runtime::{GameSession, VehicleStatus};
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::render;

/// Rejected menu input. Handled by asking again; never reaches the simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSelection {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("choice {choice} is out of range (1-{max}, or 0 to cancel)")]
    OutOfRange { choice: usize, max: usize },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    Cancel,
    /// Zero-based index into the listed items.
    Index(usize),
}

/// Parse a 1-based pick from a list of `count` items. Blank or `0` cancels.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, InvalidSelection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Selection::Cancel);
    }
    let choice: usize = trimmed
        .parse()
        .map_err(|_| InvalidSelection::NotANumber(trimmed.to_string()))?;
    match choice {
        0 => Ok(Selection::Cancel),
        n if n <= count => Ok(Selection::Index(n - 1)),
        n => Err(InvalidSelection::OutOfRange {
            choice: n,
            max: count,
        }),
    }
}

pub struct Shell<R, W> {
    session: GameSession,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: GameSession, input: R, out: W) -> Self {
        Self {
            session,
            input,
            out,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run the main menu until the player exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.welcome()?;
        loop {
            self.main_menu()?;
            let Some(choice) = self.read_line()? else {
                break;
            };
            match choice.trim() {
                "1" => self.view_fleet()?,
                "2" => self.view_routes()?,
                "3" => self.assign_flow()?,
                "4" => self.start_trip_flow()?,
                "5" => self.workshop()?,
                "6" => self.advance_day()?,
                "0" => {
                    writeln!(self.out, "Thanks for playing Matatu Fleet Manager!")?;
                    break;
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Next input line without its newline; None at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask until the answer is valid. End of input counts as cancel.
    fn select(&mut self, prompt: &str, count: usize) -> Result<Selection> {
        loop {
            write!(self.out, "{prompt}")?;
            let Some(line) = self.read_line()? else {
                return Ok(Selection::Cancel);
            };
            match parse_selection(&line, count) {
                Ok(sel) => return Ok(sel),
                Err(e) => writeln!(self.out, "Invalid input: {e}.")?,
            }
        }
    }

    fn welcome(&mut self) -> Result<()> {
        let snap = self.session.snapshot();
        writeln!(self.out, "Welcome to Matatu Fleet Manager!")?;
        writeln!(
            self.out,
            "You are starting in {} with KES {}.",
            snap.location, snap.money
        )?;
        if let Some(first) = snap.fleet.first() {
            writeln!(self.out, "Your first matatu is {}.", first.name)?;
        }
        Ok(())
    }

    fn main_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(30);
        writeln!(self.out, "\n{rule}")?;
        writeln!(self.out, "{}", render::player_line(&self.session.snapshot()))?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "\nWhat would you like to do?")?;
        for item in [
            "1. View Your Matatus",
            "2. View Available Routes (from current location)",
            "3. Assign Matatu to Route",
            "4. Start Matatu Trip",
            "5. Visit Workshop",
            "6. Advance Day (Simulate)",
            "0. Exit Game",
        ] {
            writeln!(self.out, "{item}")?;
        }
        write!(self.out, "Enter your choice: ")?;
        Ok(())
    }

    fn view_fleet(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Your Matatus ---")?;
        let snap = self.session.snapshot();
        if snap.fleet.is_empty() {
            writeln!(self.out, "You don't own any matatus yet.")?;
        }
        for (i, v) in snap.fleet.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, render::vehicle_line(v))?;
        }
        Ok(())
    }

    fn view_routes(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Available Routes from Your Location ---")?;
        let snap = self.session.snapshot();
        if snap.eligible_routes.is_empty() {
            writeln!(
                self.out,
                "No routes available from {} at the moment.",
                snap.location
            )?;
        }
        for (i, r) in snap.eligible_routes.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, render::route_line(r))?;
        }
        Ok(())
    }

    fn assign_flow(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Assign Matatu to Route ---")?;
        let snap = self.session.snapshot();
        if snap.fleet.is_empty() {
            writeln!(self.out, "You don't own any matatus yet.")?;
            return Ok(());
        }
        writeln!(self.out, "Select a Matatu to assign/re-assign a route:")?;
        for (i, v) in snap.fleet.iter().enumerate() {
            let status = match v.status {
                VehicleStatus::Idle => "Idle",
                VehicleStatus::OnTrip { .. } => "On Trip",
            };
            writeln!(
                self.out,
                "{}. {} (Status: {}, Current Route: {})",
                i + 1,
                v.name,
                status,
                v.route.as_deref().unwrap_or("None")
            )?;
        }
        let Selection::Index(vehicle_idx) = self.select(
            "Enter number of matatu to assign (or 0 to cancel): ",
            snap.fleet.len(),
        )?
        else {
            writeln!(self.out, "Operation cancelled.")?;
            return Ok(());
        };
        let vehicle = &snap.fleet[vehicle_idx];
        if vehicle.status != VehicleStatus::Idle {
            writeln!(
                self.out,
                "{} is currently on a trip and cannot be re-assigned a route now.",
                vehicle.name
            )?;
            return Ok(());
        }

        writeln!(
            self.out,
            "\nAvailable routes from your current location ({}):",
            snap.location
        )?;
        if snap.eligible_routes.is_empty() {
            writeln!(self.out, "No routes available from {}.", snap.location)?;
            return Ok(());
        }
        for (i, r) in snap.eligible_routes.iter().enumerate() {
            writeln!(
                self.out,
                "{}. {} (Duration: {} turns, Fare/Pax: {})",
                i + 1,
                r.name,
                r.base_duration,
                r.base_fare_per_passenger
            )?;
        }
        let prompt = format!(
            "Choose a route for {} (enter number, or 0 to cancel): ",
            vehicle.name
        );
        let Selection::Index(route_idx) = self.select(&prompt, snap.eligible_routes.len())? else {
            writeln!(self.out, "Route assignment cancelled.")?;
            return Ok(());
        };
        let route = RouteId(snap.eligible_routes[route_idx].name.clone());
        match self.session.assign(vehicle_idx, &route) {
            Ok(()) => writeln!(
                self.out,
                "{} has been assigned to route: {}.",
                vehicle.name, route
            )?,
            Err(e) => writeln!(self.out, "{e}.")?,
        }
        Ok(())
    }

    fn start_trip_flow(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Start Matatu Trip ---")?;
        let snap = self.session.snapshot();
        let ready: Vec<usize> = self
            .session
            .player()
            .dispatchable()
            .into_iter()
            .map(|(idx, _)| idx)
            .collect();
        if ready.is_empty() {
            writeln!(
                self.out,
                "No matatus are currently idle AND assigned to a route."
            )?;
            writeln!(self.out, "Use 'Assign Matatu to Route' first if needed.")?;
            return Ok(());
        }
        writeln!(
            self.out,
            "Available Matatus to start trip (must be idle and have a route):"
        )?;
        for (i, &idx) in ready.iter().enumerate() {
            let v = &snap.fleet[idx];
            writeln!(
                self.out,
                "{}. {} (Route: {})",
                i + 1,
                v.name,
                v.route.as_deref().unwrap_or("N/A")
            )?;
        }
        let Selection::Index(pick) = self.select(
            "Choose a matatu to start trip (enter number, or 0 to cancel): ",
            ready.len(),
        )?
        else {
            writeln!(self.out, "Operation cancelled.")?;
            return Ok(());
        };
        let v = &snap.fleet[ready[pick]];
        match self.session.start_trip(ready[pick]) {
            Ok(turns) => {
                writeln!(
                    self.out,
                    "{} is now on its way via route '{}'.",
                    v.name,
                    v.route.as_deref().unwrap_or("N/A")
                )?;
                writeln!(self.out, "Estimated trip duration: {turns} turns.")?;
            }
            Err(e) => writeln!(self.out, "{e}.")?,
        }
        Ok(())
    }

    fn workshop(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Workshop ---")?;
        writeln!(self.out, "The workshop is not yet open for business.")?;
        writeln!(
            self.out,
            "Future upgrades and matatu purchases will be available here."
        )?;
        Ok(())
    }

    fn advance_day(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Advancing Day ---")?;
        let report = self.session.advance_day();
        for line in render::day_lines(&report) {
            writeln!(self.out, "{line}")?;
        }
        if !report.fleet_empty {
            writeln!(self.out, "Day advanced.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_runtime::GameConfig;
    use std::io::Cursor;

    fn play(script: &str) -> (GameSession, String) {
        let session = GameSession::from_config(&GameConfig::default()).unwrap();
        let mut out = Vec::new();
        let mut shell = Shell::new(session, Cursor::new(script.as_bytes()), &mut out);
        shell.run().unwrap();
        let session = shell.session().clone();
        drop(shell);
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(parse_selection("2\n", 3), Ok(Selection::Index(1)));
        assert_eq!(parse_selection(" 0 ", 3), Ok(Selection::Cancel));
        assert_eq!(parse_selection("", 3), Ok(Selection::Cancel));
        assert_eq!(
            parse_selection("4", 3),
            Err(InvalidSelection::OutOfRange { choice: 4, max: 3 })
        );
        assert_eq!(
            parse_selection("two", 3),
            Err(InvalidSelection::NotANumber("two".into()))
        );
        assert_eq!(
            parse_selection("-1", 3),
            Err(InvalidSelection::NotANumber("-1".into()))
        );
    }

    #[test]
    fn full_trip_through_the_menu() {
        // assign -> dispatch -> five days -> exit
        let script = "3\n1\n1\n4\n1\n6\n6\n6\n6\n6\n0\n";
        let (session, out) = play(script);
        assert!(out.contains("KCK 001A has been assigned to route: Rongai - City Centre."));
        assert!(out.contains("Estimated trip duration: 5 turns."));
        assert!(out.contains("KCK 001A is on its route. 1 turns remaining."));
        assert!(out.contains("Earned KES 1400."));
        assert!(out.contains("Thanks for playing"));
        assert_eq!(session.player().money(), 6400);
        assert_eq!(session.day(), 5);
    }

    #[test]
    fn bad_input_is_reprompted_without_touching_state() {
        let script = "3\nabc\n9\n1\nxyz\n0\n7\n0\n";
        let (session, out) = play(script);
        assert!(out.contains("Invalid input: 'abc' is not a number."));
        assert!(out.contains("choice 9 is out of range"));
        assert!(out.contains("Route assignment cancelled."));
        assert!(out.contains("Invalid choice. Please try again."));
        assert_eq!(session.player().vehicle(0).unwrap().route, None);
    }

    #[test]
    fn busy_vehicle_cannot_be_reassigned() {
        let script = "3\n1\n1\n4\n1\n3\n1\n0\n";
        let (session, out) = play(script);
        assert!(out.contains("KCK 001A is currently on a trip and cannot be re-assigned a route now."));
        assert!(session.player().vehicle(0).unwrap().is_on_trip());
    }

    #[test]
    fn dispatch_without_route_is_explained() {
        let (_, out) = play("4\n6\n5\n");
        assert!(out.contains("No matatus are currently idle AND assigned to a route."));
        assert!(out.contains("No matatus are currently on a trip."));
        assert!(out.contains("The workshop is not yet open for business."));
    }
}
