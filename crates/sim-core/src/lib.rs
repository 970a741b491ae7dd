#![deny(warnings)]

//! Core domain models and invariants for the matatu fleet simulation.
//!
//! This crate defines the serializable types shared by the economy helpers,
//! the trip runtime and the CLI: locations, routes and the route catalog,
//! vehicles, and the player ledger. Validation helpers guard the invariants
//! the simulation relies on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default seat count for a newly acquired matatu.
pub const DEFAULT_CAPACITY: u32 = 14;

/// Places a player can operate from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    Rongai,
    Umoja,
    Kayole,
    BuruBuru,
}

impl Location {
    /// Every known location in declaration order.
    pub const ALL: [Location; 4] = [
        Location::Rongai,
        Location::Umoja,
        Location::Kayole,
        Location::BuruBuru,
    ];

    /// Display name, e.g. "BuruBuru".
    pub fn name(self) -> &'static str {
        match self {
            Location::Rongai => "Rongai",
            Location::Umoja => "Umoja",
            Location::Kayole => "Kayole",
            Location::BuruBuru => "BuruBuru",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Location::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownLocation(wanted.to_string()))
    }
}

/// Unique identifier for a route: its name, e.g. "Umoja - CBD".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteId(pub String);

impl RouteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transport route. Immutable once placed in a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route name, unique within a catalog.
    pub id: RouteId,
    /// Trip length in turns before speed upgrades (> 0).
    pub base_duration: u32,
    /// Fare charged per passenger in KES (> 0).
    pub base_fare_per_passenger: u64,
    /// Locations a trip on this route can start from (non-empty).
    pub origins: BTreeSet<Location>,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        base_duration: u32,
        base_fare_per_passenger: u64,
        origins: impl IntoIterator<Item = Location>,
    ) -> Self {
        Self {
            id: RouteId(name.into()),
            base_duration,
            base_fare_per_passenger,
            origins: origins.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Whether a trip on this route may start from `location`.
    pub fn starts_from(&self, location: Location) -> bool {
        self.origins.contains(&location)
    }
}

/// Ordered, read-only list of routes available in a game session.
///
/// A catalog is built once per session; vehicles refer to its routes by
/// [`RouteId`] and never own them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Build a catalog from arbitrary routes, rejecting invalid or duplicate entries.
    pub fn new(routes: Vec<Route>) -> Result<Self, ValidationError> {
        let catalog = Self { routes };
        validate_catalog(&catalog)?;
        Ok(catalog)
    }

    /// The predefined Nairobi routes every new game starts with.
    pub fn standard() -> Self {
        Self {
            routes: vec![
                Route::new("Rongai - City Centre", 5, 100, [Location::Rongai]),
                Route::new("Umoja - CBD", 4, 70, [Location::Umoja]),
                Route::new("Kayole - OTC", 6, 50, [Location::Kayole]),
                Route::new("BuruBuru - Westlands", 5, 80, [Location::BuruBuru]),
            ],
        }
    }

    /// All routes in catalog order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    /// Routes that start from `location`, preserving catalog order.
    pub fn eligible_routes(&self, location: Location) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|r| r.starts_from(location))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Fresh catalog for a new game.
pub fn initialize_catalog() -> RouteCatalog {
    RouteCatalog::standard()
}

/// Whether a vehicle is parked or driving a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripState {
    #[default]
    Idle,
    /// Driving; `turns_remaining` is > 0 between turns.
    OnTrip { turns_remaining: u32 },
}

/// A matatu owned by the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Registration plate, unique within a fleet.
    pub name: String,
    /// Passenger seats (> 0).
    pub capacity: u32,
    /// Shortens trips; 1 is the base level.
    pub speed_level: u32,
    /// Raises fare revenue; 1 is the base level.
    pub fare_bonus_level: u32,
    /// Reserved for breakdown modeling; not used in any computation yet.
    pub maintenance_level: u32,
    /// Handle into the session's route catalog.
    pub route: Option<RouteId>,
    pub trip: TripState,
}

impl Vehicle {
    /// A base-level, idle, unassigned vehicle.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            speed_level: 1,
            fare_bonus_level: 1,
            maintenance_level: 1,
            route: None,
            trip: TripState::Idle,
        }
    }

    pub fn with_speed_level(mut self, level: u32) -> Self {
        self.speed_level = level;
        self
    }

    pub fn with_fare_bonus_level(mut self, level: u32) -> Self {
        self.fare_bonus_level = level;
        self
    }

    pub fn with_maintenance_level(mut self, level: u32) -> Self {
        self.maintenance_level = level;
        self
    }

    pub fn is_on_trip(&self) -> bool {
        matches!(self.trip, TripState::OnTrip { .. })
    }

    /// Turns left on the current trip; 0 while idle.
    pub fn trip_turns_remaining(&self) -> u32 {
        match self.trip {
            TripState::Idle => 0,
            TripState::OnTrip { turns_remaining } => turns_remaining,
        }
    }

    /// Idle with a route bound, i.e. ready to start a trip.
    pub fn is_dispatchable(&self) -> bool {
        !self.is_on_trip() && self.route.is_some()
    }
}

/// The player's ledger: money, current location and owned fleet.
///
/// Money only ever increases: there is no debit operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    money: u64,
    /// Where the player currently operates from.
    pub location: Location,
    /// Owned vehicles in acquisition order.
    fleet: Vec<Vehicle>,
}

impl Player {
    pub fn new(starting_money: u64, location: Location) -> Self {
        Self {
            money: starting_money,
            location,
            fleet: Vec::new(),
        }
    }

    /// Cash on hand in KES.
    pub fn money(&self) -> u64 {
        self.money
    }

    /// Add trip revenue to the balance. Saturates at `u64::MAX`.
    pub fn credit(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    /// Append a vehicle to the fleet, rejecting duplicate names and invalid stats.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<usize, ValidationError> {
        validate_vehicle(&vehicle)?;
        if self.fleet.iter().any(|v| v.name == vehicle.name) {
            return Err(ValidationError::DuplicateVehicle(vehicle.name));
        }
        self.fleet.push(vehicle);
        Ok(self.fleet.len() - 1)
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    /// Mutable access to individual vehicles; the fleet itself cannot grow or shrink here.
    pub fn fleet_mut(&mut self) -> &mut [Vehicle] {
        &mut self.fleet
    }

    pub fn vehicle(&self, index: usize) -> Option<&Vehicle> {
        self.fleet.get(index)
    }

    pub fn vehicle_mut(&mut self, index: usize) -> Option<&mut Vehicle> {
        self.fleet.get_mut(index)
    }

    /// Idle vehicles with a route, paired with their fleet index.
    pub fn dispatchable(&self) -> Vec<(usize, &Vehicle)> {
        self.fleet
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_dispatchable())
            .collect()
    }

    /// Number of vehicles currently on a trip.
    pub fn active_trips(&self) -> usize {
        self.fleet.iter().filter(|v| v.is_on_trip()).count()
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Names must contain something besides whitespace.
    #[error("name must not be empty")]
    EmptyName,
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("route {0} must take at least one turn")]
    NonPositiveDuration(String),
    #[error("route {0} must charge a positive fare")]
    NonPositiveFare(String),
    #[error("route {0} has no origin locations")]
    NoOrigins(String),
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),
    #[error("vehicle {0} must have at least one seat")]
    NonPositiveCapacity(String),
    /// Upgrade levels start at 1.
    #[error("vehicle {vehicle} has invalid upgrade level {level}")]
    InvalidLevel { vehicle: String, level: u32 },
    /// An on-trip vehicle must have turns left.
    #[error("vehicle {0} is on a trip with no turns remaining")]
    StaleCountdown(String),
    #[error("duplicate vehicle: {0}")]
    DuplicateVehicle(String),
}

/// Failures of fleet commands (assignment and dispatch).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FleetError {
    /// Routes cannot change while a trip is underway.
    #[error("{vehicle} is currently on a trip and cannot be re-assigned")]
    VehicleBusy { vehicle: String },
    #[error("{vehicle} has no route assigned")]
    NoRouteAssigned { vehicle: String },
    #[error("route not in catalog: {0}")]
    UnknownRoute(RouteId),
    #[error("no vehicle at fleet index {0}")]
    NoSuchVehicle(usize),
    #[error("{vehicle} has invalid upgrade level {level}")]
    InvalidUpgradeLevel { vehicle: String, level: u32 },
}

/// Validate a single route.
pub fn validate_route(route: &Route) -> Result<(), ValidationError> {
    if route.name().trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if route.base_duration == 0 {
        return Err(ValidationError::NonPositiveDuration(route.name().to_string()));
    }
    if route.base_fare_per_passenger == 0 {
        return Err(ValidationError::NonPositiveFare(route.name().to_string()));
    }
    if route.origins.is_empty() {
        return Err(ValidationError::NoOrigins(route.name().to_string()));
    }
    Ok(())
}

/// Validate every route and the uniqueness of route names.
pub fn validate_catalog(catalog: &RouteCatalog) -> Result<(), ValidationError> {
    let mut ids: BTreeSet<&RouteId> = BTreeSet::new();
    for r in catalog.routes() {
        validate_route(r)?;
        if !ids.insert(&r.id) {
            return Err(ValidationError::DuplicateRoute(r.name().to_string()));
        }
    }
    Ok(())
}

/// Validate vehicle stats and trip state.
pub fn validate_vehicle(v: &Vehicle) -> Result<(), ValidationError> {
    if v.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if v.capacity == 0 {
        return Err(ValidationError::NonPositiveCapacity(v.name.clone()));
    }
    for level in [v.speed_level, v.fare_bonus_level, v.maintenance_level] {
        if level == 0 {
            return Err(ValidationError::InvalidLevel {
                vehicle: v.name.clone(),
                level,
            });
        }
    }
    if v.trip == (TripState::OnTrip { turns_remaining: 0 }) {
        return Err(ValidationError::StaleCountdown(v.name.clone()));
    }
    Ok(())
}
