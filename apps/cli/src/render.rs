//! Text formatting for the menu screens.

use sim_runtime::{
    DayReport, DaySummary, RouteView, SessionSnapshot, VehicleEvent, VehicleStatus, VehicleView,
};

pub fn player_line(snap: &SessionSnapshot) -> String {
    let names = if snap.fleet.is_empty() {
        "None".to_string()
    } else {
        snap.fleet
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Player Status: Day {} | Money: KES {} | Location: {} | Matatus: {}",
        snap.day, snap.money, snap.location, names
    )
}

pub fn status_text(status: VehicleStatus) -> String {
    match status {
        VehicleStatus::Idle => "Idle".to_string(),
        VehicleStatus::OnTrip { turns_remaining } => {
            format!("On trip ({turns_remaining} turns left)")
        }
    }
}

pub fn vehicle_line(v: &VehicleView) -> String {
    format!(
        "Matatu: {} | Capacity: {} | Speed: Lvl {} | Fare Bonus: Lvl {} | Maintenance: Lvl {} | Route: {} | Status: {}",
        v.name,
        v.capacity,
        v.speed_level,
        v.fare_bonus_level,
        v.maintenance_level,
        v.route.as_deref().unwrap_or("Not assigned"),
        status_text(v.status)
    )
}

pub fn route_line(r: &RouteView) -> String {
    let origins = r
        .origins
        .iter()
        .map(|l| l.name())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Route: {} | Duration: {} turns | Base Fare: KES {}/passenger | Starts From: {}",
        r.name, r.base_duration, r.base_fare_per_passenger, origins
    )
}

/// Lines describing a simulated day, in fleet order then a closing summary.
pub fn day_lines(report: &DayReport) -> Vec<String> {
    let mut lines = Vec::new();
    for e in &report.events {
        match e {
            VehicleEvent::Progressed {
                vehicle,
                turns_remaining,
            } => lines.push(format!(
                "{vehicle} is on its route. {turns_remaining} turns remaining."
            )),
            VehicleEvent::Completed {
                vehicle,
                route,
                earnings,
            } => {
                lines.push(format!(
                    "SUCCESS! {vehicle} completed its trip on route '{route}'."
                ));
                lines.push(format!("Earned KES {earnings}."));
            }
            VehicleEvent::Abandoned { vehicle } => lines.push(format!(
                "{vehicle} finished a trip on a route that no longer exists; no fare collected."
            )),
        }
    }
    match report.summary() {
        DaySummary::NoVehicles => lines.push("You have no matatus to advance.".to_string()),
        DaySummary::Earned { total, .. } => {
            lines.push(format!("Total earnings this turn: KES {total}."))
        }
        DaySummary::AllIdle => lines.push("No matatus are currently on a trip.".to_string()),
        DaySummary::StillEnRoute => {
            lines.push("No trips completed this turn, but some are still ongoing.".to_string())
        }
    }
    lines
}
