//! Binding idle vehicles to routes.

use sim_core::{FleetError, Route, Vehicle};
use tracing::{info, warn};

/// Point `vehicle` at `route`, replacing any previous assignment.
///
/// Only refused while the vehicle is on a trip. Whether the route starts
/// from the player's location is the caller's concern
/// (see [`sim_core::RouteCatalog::eligible_routes`]).
pub fn assign(vehicle: &mut Vehicle, route: &Route) -> Result<(), FleetError> {
    if vehicle.is_on_trip() {
        warn!(vehicle = %vehicle.name, route = %route.id, "re-assignment refused during trip");
        return Err(FleetError::VehicleBusy {
            vehicle: vehicle.name.clone(),
        });
    }
    vehicle.route = Some(route.id.clone());
    info!(vehicle = %vehicle.name, route = %route.id, "route assigned");
    Ok(())
}
