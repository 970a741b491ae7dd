//! Read-only views of a session for display and export.

use serde::{Deserialize, Serialize};
use sim_core::{Location, Route, RouteCatalog, TripState, Vehicle};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteView {
    pub name: String,
    pub base_duration: u32,
    pub base_fare_per_passenger: u64,
    pub origins: Vec<Location>,
}

impl From<&Route> for RouteView {
    fn from(r: &Route) -> Self {
        Self {
            name: r.name().to_string(),
            base_duration: r.base_duration,
            base_fare_per_passenger: r.base_fare_per_passenger,
            origins: r.origins.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Idle,
    OnTrip { turns_remaining: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleView {
    pub name: String,
    pub capacity: u32,
    pub speed_level: u32,
    pub fare_bonus_level: u32,
    pub maintenance_level: u32,
    /// Route name, or None when unassigned.
    pub route: Option<String>,
    pub status: VehicleStatus,
}

impl VehicleView {
    pub fn new(v: &Vehicle, catalog: &RouteCatalog) -> Self {
        // A handle that is not in the catalog still shows its raw name.
        let route = v
            .route
            .as_ref()
            .map(|id| catalog.get(id).map_or(id.as_str(), Route::name).to_string());
        let status = match v.trip {
            TripState::Idle => VehicleStatus::Idle,
            TripState::OnTrip { turns_remaining } => VehicleStatus::OnTrip { turns_remaining },
        };
        Self {
            name: v.name.clone(),
            capacity: v.capacity,
            speed_level: v.speed_level,
            fare_bonus_level: v.fare_bonus_level,
            maintenance_level: v.maintenance_level,
            route,
            status,
        }
    }
}

/// Everything a front end needs to draw the player status screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Days simulated so far.
    pub day: u32,
    pub money: u64,
    pub location: Location,
    pub fleet: Vec<VehicleView>,
    /// Routes reachable from `location`, in catalog order.
    pub eligible_routes: Vec<RouteView>,
}
