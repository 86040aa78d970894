//! Next-stop resolution for display.

use crate::route::{RouteGeometry, Stop};
use crate::vehicle::VehiclePosition;

/// Find the stop closest to the current vehicle positions.
///
/// Uses the first unit as the representative position and ranks stops by
/// squared Euclidean distance in coordinate space. Ties go to the lowest
/// sequence index. Returns `None` when there are no positions or no stops.
///
/// Coordinate-plane distance is a deliberate approximation: for picking the
/// nearest stop on a single urban route it is indistinguishable from
/// great-circle or path-projected distance, and far cheaper.
pub fn next_stop<'a>(
    geometry: &'a RouteGeometry,
    positions: &[VehiclePosition],
) -> Option<&'a Stop> {
    let representative = positions.first()?;

    let mut best: Option<(&Stop, f64)> = None;
    for stop in geometry.stops() {
        let distance = stop.position.distance_sq(&representative.position);
        // Strict comparison in sequence order keeps the lowest index on ties.
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((stop, distance));
        }
    }

    best.map(|(stop, _)| stop)
}
