//! Trip lifecycle: dispatch, per-turn countdown, completion and revenue.
//!
//! A vehicle alternates between [`TripState::Idle`] and
//! [`TripState::OnTrip`]. [`start_trip`] moves it onto the road,
//! [`advance_turn`] counts down and resolves the trip in the same step the
//! countdown reaches zero. The route stays assigned afterwards so the vehicle
//! can be dispatched again straight away.

use serde::{Deserialize, Serialize};
use sim_core::{FleetError, Player, RouteCatalog, RouteId, TripState, Vehicle};
use tracing::{debug, info, warn};

/// Put an idle, routed vehicle on the road. Returns the trip length in turns.
///
/// A vehicle that is already on a trip is not dispatchable and fails with
/// [`FleetError::NoRouteAssigned`], the same as one without a route.
pub fn start_trip(vehicle: &mut Vehicle, catalog: &RouteCatalog) -> Result<u32, FleetError> {
    let route_id = match (&vehicle.route, vehicle.is_on_trip()) {
        (Some(id), false) => id,
        _ => {
            return Err(FleetError::NoRouteAssigned {
                vehicle: vehicle.name.clone(),
            })
        }
    };
    let route = catalog
        .get(route_id)
        .ok_or_else(|| FleetError::UnknownRoute(route_id.clone()))?;
    // Durations never exceed base_duration, so a bad speed level is the only failure.
    let turns = sim_econ::trip_duration(route.base_duration, vehicle.speed_level).map_err(|_| {
        FleetError::InvalidUpgradeLevel {
            vehicle: vehicle.name.clone(),
            level: vehicle.speed_level,
        }
    })?;
    vehicle.trip = TripState::OnTrip {
        turns_remaining: turns,
    };
    info!(vehicle = %vehicle.name, route = %route.id, turns, "trip started");
    Ok(turns)
}

/// What one turn did to a single vehicle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Vehicle was parked; nothing changed.
    Idle,
    /// Still driving.
    Progressed { turns_remaining: u32 },
    /// Arrived; `earnings` must be credited to the owner.
    Completed { route: RouteId, earnings: u64 },
    /// Arrived, but revenue could not be computed (route missing from the
    /// catalog or invalid stats). The vehicle is idle again and earns nothing.
    Abandoned,
}

/// Advance one vehicle by a single turn.
///
/// Revenue is returned, not credited. A caller driving vehicles with this
/// directly must pass `TurnOutcome::Completed { earnings, .. }` to
/// [`Player::credit`] or the fare is lost; [`advance_day`] does that for the
/// whole fleet.
pub fn advance_turn(vehicle: &mut Vehicle, catalog: &RouteCatalog) -> TurnOutcome {
    let TripState::OnTrip { turns_remaining } = vehicle.trip else {
        return TurnOutcome::Idle;
    };
    let remaining = turns_remaining.saturating_sub(1);
    if remaining > 0 {
        vehicle.trip = TripState::OnTrip {
            turns_remaining: remaining,
        };
        debug!(vehicle = %vehicle.name, remaining, "en route");
        return TurnOutcome::Progressed {
            turns_remaining: remaining,
        };
    }

    // Countdown finished: the vehicle parks whatever happens next.
    vehicle.trip = TripState::Idle;
    let Some(route) = vehicle.route.as_ref().and_then(|id| catalog.get(id)) else {
        warn!(vehicle = %vehicle.name, route = ?vehicle.route, "trip ended without a known route");
        return TurnOutcome::Abandoned;
    };
    match sim_econ::trip_earnings(
        vehicle.capacity,
        route.base_fare_per_passenger,
        vehicle.fare_bonus_level,
    ) {
        Ok(earnings) => {
            info!(vehicle = %vehicle.name, route = %route.id, earnings, "trip completed");
            TurnOutcome::Completed {
                route: route.id.clone(),
                earnings,
            }
        }
        Err(e) => {
            warn!(vehicle = %vehicle.name, error = %e, "trip revenue could not be computed");
            TurnOutcome::Abandoned
        }
    }
}

/// Per-vehicle line of a [`DayReport`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleEvent {
    Progressed {
        vehicle: String,
        turns_remaining: u32,
    },
    Completed {
        vehicle: String,
        route: RouteId,
        earnings: u64,
    },
    Abandoned {
        vehicle: String,
    },
}

/// Result of advancing the whole fleet by one day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// The player owns no vehicles; nothing was simulated.
    pub fleet_empty: bool,
    /// Trips that finished this day.
    pub completions: u32,
    /// Revenue credited this day, in KES.
    pub total_earnings: u64,
    /// Vehicles still on the road after the step.
    pub trips_in_progress: u32,
    /// Events in fleet order; idle vehicles produce none.
    pub events: Vec<VehicleEvent>,
}

/// Coarse classification of a day, for end-of-day messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaySummary {
    NoVehicles,
    Earned { completions: u32, total: u64 },
    /// Nobody was driving.
    AllIdle,
    /// No arrivals, but trips are underway.
    StillEnRoute,
}

impl DayReport {
    pub fn summary(&self) -> DaySummary {
        if self.fleet_empty {
            DaySummary::NoVehicles
        } else if self.completions > 0 {
            DaySummary::Earned {
                completions: self.completions,
                total: self.total_earnings,
            }
        } else if self.trips_in_progress > 0 {
            DaySummary::StillEnRoute
        } else {
            DaySummary::AllIdle
        }
    }
}

/// Advance every vehicle in fleet order, crediting completed trips to `player`.
pub fn advance_day(player: &mut Player, catalog: &RouteCatalog) -> DayReport {
    let mut report = DayReport {
        fleet_empty: player.fleet().is_empty(),
        ..DayReport::default()
    };
    if report.fleet_empty {
        debug!("no vehicles to advance");
        return report;
    }

    for idx in 0..player.fleet().len() {
        let Some(vehicle) = player.vehicle_mut(idx) else {
            continue;
        };
        let name = vehicle.name.clone();
        match advance_turn(vehicle, catalog) {
            TurnOutcome::Idle => {}
            TurnOutcome::Progressed { turns_remaining } => {
                report.trips_in_progress += 1;
                report.events.push(VehicleEvent::Progressed {
                    vehicle: name,
                    turns_remaining,
                });
            }
            TurnOutcome::Completed { route, earnings } => {
                player.credit(earnings);
                report.completions += 1;
                report.total_earnings = report.total_earnings.saturating_add(earnings);
                report.events.push(VehicleEvent::Completed {
                    vehicle: name,
                    route,
                    earnings,
                });
            }
            TurnOutcome::Abandoned => {
                report.events.push(VehicleEvent::Abandoned { vehicle: name });
            }
        }
    }
    info!(
        completions = report.completions,
        earnings = report.total_earnings,
        in_progress = report.trips_in_progress,
        "day advanced"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::assign;
    use proptest::prelude::*;
    use sim_core::{Location, Route};

    fn routed(catalog: &RouteCatalog, route_idx: usize, v: Vehicle) -> Vehicle {
        let mut v = v;
        assign(&mut v, &catalog.routes()[route_idx]).unwrap();
        v
    }

    fn single_route(duration: u32, fare: u64) -> RouteCatalog {
        RouteCatalog::new(vec![Route::new("Test", duration, fare, [Location::Rongai])]).unwrap()
    }

    #[test]
    fn full_load_pays_capacity_times_fare() {
        let catalog = RouteCatalog::standard();
        let mut v = routed(&catalog, 0, Vehicle::new("KCK 001A", 14));
        assert_eq!(start_trip(&mut v, &catalog), Ok(5));
        for left in (1..5).rev() {
            assert_eq!(
                advance_turn(&mut v, &catalog),
                TurnOutcome::Progressed {
                    turns_remaining: left
                }
            );
        }
        assert_eq!(
            advance_turn(&mut v, &catalog),
            TurnOutcome::Completed {
                route: RouteId("Rongai - City Centre".into()),
                earnings: 1400
            }
        );
    }

    #[test]
    fn speed_three_shortens_five_turns_to_four() {
        let catalog = single_route(5, 10);
        let mut v = routed(&catalog, 0, Vehicle::new("A", 14).with_speed_level(3));
        assert_eq!(start_trip(&mut v, &catalog), Ok(4));
        assert_eq!(v.trip, TripState::OnTrip { turns_remaining: 4 });
    }

    #[test]
    fn upgraded_vehicle_completes_and_keeps_route() {
        let catalog = single_route(6, 50);
        let mut player = Player::new(0, Location::Rongai);
        let v = routed(
            &catalog,
            0,
            Vehicle::new("A", 14)
                .with_speed_level(2)
                .with_fare_bonus_level(2),
        );
        player.add_vehicle(v).unwrap();
        let v = player.vehicle_mut(0).unwrap();
        assert_eq!(start_trip(v, &catalog), Ok(5));

        for _ in 0..4 {
            let r = advance_day(&mut player, &catalog);
            assert_eq!(r.completions, 0);
            assert_eq!(r.trips_in_progress, 1);
        }
        let r = advance_day(&mut player, &catalog);
        assert_eq!(r.completions, 1);
        assert_eq!(r.total_earnings, 770);
        assert_eq!(player.money(), 770);

        let v = player.vehicle(0).unwrap();
        assert!(!v.is_on_trip());
        assert_eq!(v.trip_turns_remaining(), 0);
        assert_eq!(v.route, Some(RouteId("Test".into())));

        // Credited once: further days change nothing.
        let r = advance_day(&mut player, &catalog);
        assert_eq!(r.summary(), DaySummary::AllIdle);
        assert_eq!(player.money(), 770);
    }

    #[test]
    fn direct_turns_leave_crediting_to_the_caller() {
        let catalog = single_route(1, 100);
        let mut player = Player::new(0, Location::Rongai);
        player
            .add_vehicle(routed(&catalog, 0, Vehicle::new("A", 14)))
            .unwrap();
        let v = player.vehicle_mut(0).unwrap();
        start_trip(v, &catalog).unwrap();
        let outcome = advance_turn(v, &catalog);
        assert!(!v.is_on_trip());
        assert_eq!(player.money(), 0);

        let TurnOutcome::Completed { earnings, .. } = outcome else {
            panic!("expected a completion, got {outcome:?}");
        };
        player.credit(earnings);
        assert_eq!(player.money(), 1400);
    }

    #[test]
    fn start_without_route_fails_and_changes_nothing() {
        let catalog = RouteCatalog::standard();
        let mut v = Vehicle::new("A", 14);
        let before = v.clone();
        assert_eq!(
            start_trip(&mut v, &catalog),
            Err(FleetError::NoRouteAssigned {
                vehicle: "A".into()
            })
        );
        assert_eq!(v, before);
    }

    #[test]
    fn start_while_on_trip_is_refused() {
        let catalog = RouteCatalog::standard();
        let mut v = routed(&catalog, 1, Vehicle::new("A", 14));
        start_trip(&mut v, &catalog).unwrap();
        let before = v.clone();
        assert_eq!(
            start_trip(&mut v, &catalog),
            Err(FleetError::NoRouteAssigned {
                vehicle: "A".into()
            })
        );
        assert_eq!(v, before);
    }

    #[test]
    fn start_with_route_from_another_catalog_fails() {
        let catalog = RouteCatalog::standard();
        let mut v = Vehicle::new("A", 14);
        v.route = Some(RouteId("Ngong - Karen".into()));
        assert_eq!(
            start_trip(&mut v, &catalog),
            Err(FleetError::UnknownRoute(RouteId("Ngong - Karen".into())))
        );
        assert!(!v.is_on_trip());
    }

    #[test]
    fn start_with_zero_speed_level_fails() {
        let catalog = RouteCatalog::standard();
        let mut v = routed(&catalog, 0, Vehicle::new("A", 14).with_speed_level(0));
        assert_eq!(
            start_trip(&mut v, &catalog),
            Err(FleetError::InvalidUpgradeLevel {
                vehicle: "A".into(),
                level: 0
            })
        );
    }

    #[test]
    fn route_missing_at_arrival_abandons_trip() {
        let catalog = RouteCatalog::standard();
        let mut v = Vehicle::new("A", 14);
        v.route = Some(RouteId("Ngong - Karen".into()));
        v.trip = TripState::OnTrip { turns_remaining: 1 };
        assert_eq!(advance_turn(&mut v, &catalog), TurnOutcome::Abandoned);
        assert_eq!(v.trip, TripState::Idle);
    }

    #[test]
    fn empty_fleet_reports_no_vehicles() {
        let catalog = RouteCatalog::standard();
        let mut player = Player::new(5000, Location::Rongai);
        let r = advance_day(&mut player, &catalog);
        assert!(r.fleet_empty);
        assert_eq!(r.completions, 0);
        assert_eq!(r.total_earnings, 0);
        assert_eq!(r.summary(), DaySummary::NoVehicles);
        assert_eq!(player.money(), 5000);
    }

    #[test]
    fn day_sums_completions_in_fleet_order() {
        let catalog = RouteCatalog::standard();
        let mut player = Player::new(0, Location::Umoja);
        // Umoja - CBD: 4 turns at 70.
        for (name, speed) in [("A", 1), ("B", 9), ("C", 1)] {
            let v = routed(&catalog, 1, Vehicle::new(name, 14).with_speed_level(speed));
            player.add_vehicle(v).unwrap();
        }
        for idx in [0, 1] {
            start_trip(player.vehicle_mut(idx).unwrap(), &catalog).unwrap();
        }
        // B needs 2 turns, A needs 4, C stays parked.
        advance_day(&mut player, &catalog);
        let r = advance_day(&mut player, &catalog);
        assert_eq!(
            r.events,
            vec![
                VehicleEvent::Progressed {
                    vehicle: "A".into(),
                    turns_remaining: 2
                },
                VehicleEvent::Completed {
                    vehicle: "B".into(),
                    route: RouteId("Umoja - CBD".into()),
                    earnings: 980
                },
            ]
        );
        assert_eq!(
            r.summary(),
            DaySummary::Earned {
                completions: 1,
                total: 980
            }
        );
        assert_eq!(r.trips_in_progress, 1);
        let r = advance_day(&mut player, &catalog);
        assert_eq!(r.summary(), DaySummary::StillEnRoute);
    }

    proptest! {
        #[test]
        fn idle_vehicle_is_untouched(cap in 1u32..60, s in 1u32..10, f in 1u32..10, route_idx in 0usize..5) {
            let catalog = RouteCatalog::standard();
            let mut v = Vehicle::new("A", cap).with_speed_level(s).with_fare_bonus_level(f);
            if route_idx < 4 {
                v.route = Some(catalog.routes()[route_idx].id.clone());
            }
            let before = v.clone();
            prop_assert_eq!(advance_turn(&mut v, &catalog), TurnOutcome::Idle);
            prop_assert_eq!(v, before);
        }

        #[test]
        fn trip_completes_exactly_once(base in 1u32..20, fare in 1u64..500, s in 1u32..10, f in 1u32..10) {
            let catalog = single_route(base, fare);
            let mut v = routed(&catalog, 0, Vehicle::new("A", 14).with_speed_level(s).with_fare_bonus_level(f));
            let turns = start_trip(&mut v, &catalog).unwrap();
            let mut completions = 0;
            for _ in 0..turns {
                if let TurnOutcome::Completed { earnings, .. } = advance_turn(&mut v, &catalog) {
                    prop_assert_eq!(earnings, sim_econ::trip_earnings(14, fare, f).unwrap());
                    completions += 1;
                }
            }
            prop_assert_eq!(completions, 1);
            prop_assert!(!v.is_on_trip());
            prop_assert!(v.is_dispatchable());
        }
    }
}
