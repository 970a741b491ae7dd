#![deny(warnings)]

//! Turn-driven runtime for the matatu fleet simulation.
//!
//! A [`GameSession`] owns one route catalog and one player. Front ends call
//! into it one command at a time; every command runs to completion before
//! the next is accepted.

pub mod assignment;
pub mod config;
pub mod snapshot;
pub mod trips;

pub use assignment::assign;
pub use config::{ConfigError, GameConfig, StarterVehicle};
pub use snapshot::{RouteView, SessionSnapshot, VehicleStatus, VehicleView};
pub use trips::{
    advance_day, advance_turn, start_trip, DayReport, DaySummary, TurnOutcome, VehicleEvent,
};

use sim_core::{FleetError, Location, Player, Route, RouteCatalog, RouteId, Vehicle};
use tracing::info;

/// One game: a fresh catalog, the player's ledger and a day counter.
#[derive(Clone, Debug)]
pub struct GameSession {
    catalog: RouteCatalog,
    player: Player,
    day: u32,
}

/// Start a game with the standard catalog and an empty fleet.
pub fn new_game(starting_money: u64, starting_location: Location) -> GameSession {
    GameSession::with_catalog(
        sim_core::initialize_catalog(),
        Player::new(starting_money, starting_location),
    )
}

impl GameSession {
    pub fn with_catalog(catalog: RouteCatalog, player: Player) -> Self {
        Self {
            catalog,
            player,
            day: 0,
        }
    }

    /// Start a game from configuration, including the starter vehicle.
    pub fn from_config(cfg: &GameConfig) -> Result<Self, ConfigError> {
        let location = cfg.location()?;
        let mut session = new_game(cfg.starting_money, location);
        if let Some(starter) = &cfg.starting_vehicle {
            session.acquire(Vehicle::new(starter.name.clone(), starter.capacity))?;
        }
        info!(
            money = cfg.starting_money,
            location = %location,
            vehicles = session.player.fleet().len(),
            "new game"
        );
        Ok(session)
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Days simulated so far. Days with an empty fleet are not counted.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Add a vehicle to the fleet; returns its index.
    pub fn acquire(&mut self, vehicle: Vehicle) -> Result<usize, sim_core::ValidationError> {
        self.player.add_vehicle(vehicle)
    }

    /// Routes that start from the player's current location.
    pub fn eligible_routes(&self) -> Vec<&Route> {
        self.catalog.eligible_routes(self.player.location)
    }

    /// Assign the vehicle at `vehicle_idx` to a catalog route.
    pub fn assign(&mut self, vehicle_idx: usize, route: &RouteId) -> Result<(), FleetError> {
        let route = self
            .catalog
            .get(route)
            .ok_or_else(|| FleetError::UnknownRoute(route.clone()))?;
        let vehicle = self
            .player
            .vehicle_mut(vehicle_idx)
            .ok_or(FleetError::NoSuchVehicle(vehicle_idx))?;
        assignment::assign(vehicle, route)
    }

    /// Dispatch the vehicle at `vehicle_idx`; returns the trip length in turns.
    pub fn start_trip(&mut self, vehicle_idx: usize) -> Result<u32, FleetError> {
        let vehicle = self
            .player
            .vehicle_mut(vehicle_idx)
            .ok_or(FleetError::NoSuchVehicle(vehicle_idx))?;
        trips::start_trip(vehicle, &self.catalog)
    }

    /// Advance every vehicle by one turn and credit completed trips.
    pub fn advance_day(&mut self) -> DayReport {
        let report = trips::advance_day(&mut self.player, &self.catalog);
        if !report.fleet_empty {
            self.day = self.day.saturating_add(1);
        }
        report
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            day: self.day,
            money: self.player.money(),
            location: self.player.location,
            fleet: self
                .player
                .fleet()
                .iter()
                .map(|v| VehicleView::new(v, &self.catalog))
                .collect(),
            eligible_routes: self
                .eligible_routes()
                .into_iter()
                .map(RouteView::from)
                .collect(),
        }
    }
}
