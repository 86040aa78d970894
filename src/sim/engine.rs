//! Fleet simulation engine.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::route::RouteGeometry;
use crate::vehicle::VehiclePosition;

/// Number of simulated units per route.
pub const FLEET_SIZE: usize = 6;

/// Steps in one full cycle along the path.
pub const CYCLE_STEPS: u32 = 100;

/// Lower bound of the simulated speed range, km/h.
pub const MIN_SPEED_KMH: f64 = 35.0;

/// Upper bound of the simulated speed range, km/h.
pub const MAX_SPEED_KMH: f64 = 50.0;

/// Owned simulation state: the current fleet and the step counter.
///
/// Re-created by [`SimulationEngine::seed`] whenever the route geometry
/// changes; advanced once per tick.
#[derive(Debug, Clone)]
pub struct SimulationState {
    units: Vec<VehiclePosition>,
    step: u32,
}

impl SimulationState {
    /// State with no units (no route selected, or an empty path).
    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            step: 0,
        }
    }

    /// Current fleet positions.
    pub fn units(&self) -> &[VehiclePosition] {
        &self.units
    }

    /// Step counter, always in [0, 100).
    pub fn step(&self) -> u32 {
        self.step
    }

    /// True when the state holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Simulation engine: seeds and advances a synthetic fleet along a route.
///
/// Holds only the RNG used for the cosmetic speed/heading jitter; the path
/// indices are a pure function of the step counter and geometry, so two
/// engines with different seeds still trace identical trajectories.
pub struct SimulationEngine {
    rng: SmallRng,
}

impl SimulationEngine {
    /// Engine with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Engine with a fixed RNG seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed a fresh fleet from the route geometry.
    ///
    /// With a path of length P, unit `i` starts at path index `i * P / 6`,
    /// spreading the fleet along the route. An empty path yields zero units.
    pub fn seed(&mut self, geometry: &RouteGeometry) -> SimulationState {
        let path = geometry.path();
        if path.is_empty() {
            return SimulationState::empty();
        }

        let units = (0..FLEET_SIZE)
            .map(|i| VehiclePosition {
                unit_id: format!("unit_{:03}", i + 1),
                position: path[base_index(i, path.len())],
                speed_kmh: self.rng.gen_range(MIN_SPEED_KMH..=MAX_SPEED_KMH),
                heading_degrees: self.rng.gen_range(0.0..360.0),
                available: true,
            })
            .collect();

        SimulationState { units, step: 0 }
    }

    /// Advance the fleet one tick and return the new positions.
    ///
    /// The step counter wraps modulo 100; each unit's path index is
    /// recomputed as `(base + step * P / 100) mod P`, so 100 advances bring
    /// every unit back to its seeded position. A no-op returning an empty
    /// list when the path or fleet is empty.
    pub fn advance(
        &mut self,
        state: &mut SimulationState,
        geometry: &RouteGeometry,
    ) -> Vec<VehiclePosition> {
        let path = geometry.path();
        if path.is_empty() || state.units.is_empty() {
            return Vec::new();
        }

        state.step = (state.step + 1) % CYCLE_STEPS;
        let offset = (state.step as usize * path.len()) / CYCLE_STEPS as usize;

        for (i, unit) in state.units.iter_mut().enumerate() {
            let index = (base_index(i, path.len()) + offset) % path.len();
            unit.position = path[index];
            unit.speed_kmh = self.rng.gen_range(MIN_SPEED_KMH..=MAX_SPEED_KMH);
            unit.heading_degrees = self.rng.gen_range(0.0..360.0);
        }

        state.units.clone()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Starting path index for unit `i`.
fn base_index(unit: usize, path_len: usize) -> usize {
    (unit * path_len) / FLEET_SIZE
}

#[cfg(test)]
mod tests {
    use crate::geo::Coordinate;

    use super::*;

    /// Straight line of `n` distinct points.
    fn line_geometry(n: usize) -> RouteGeometry {
        let path = (0..n)
            .map(|i| Coordinate::new(i as f64 * 0.001, i as f64 * 0.001).unwrap())
            .collect();
        RouteGeometry::new(path, Vec::new()).unwrap()
    }

    /// Index of `position` within the geometry path.
    fn path_index(geometry: &RouteGeometry, position: &Coordinate) -> usize {
        geometry
            .path()
            .iter()
            .position(|p| p == position)
            .expect("unit off the path")
    }

    #[test]
    fn test_seed_spreads_units_along_path() {
        let geometry = line_geometry(60);
        let mut engine = SimulationEngine::with_seed(7);

        let state = engine.seed(&geometry);
        assert_eq!(state.units().len(), FLEET_SIZE);
        assert_eq!(state.step(), 0);

        for (i, unit) in state.units().iter().enumerate() {
            assert_eq!(path_index(&geometry, &unit.position), i * 10);
        }
    }

    #[test]
    fn test_seed_unit_ids_zero_padded() {
        let geometry = line_geometry(10);
        let mut engine = SimulationEngine::with_seed(7);

        let state = engine.seed(&geometry);
        assert_eq!(state.units()[0].unit_id, "unit_001");
        assert_eq!(state.units()[5].unit_id, "unit_006");
    }

    #[test]
    fn test_seed_empty_path_yields_no_units() {
        let mut engine = SimulationEngine::with_seed(7);
        let state = engine.seed(&RouteGeometry::empty());
        assert!(state.is_empty());
    }

    #[test]
    fn test_advance_empty_state_is_noop() {
        let mut engine = SimulationEngine::with_seed(7);
        let mut state = SimulationState::empty();
        let units = engine.advance(&mut state, &RouteGeometry::empty());
        assert!(units.is_empty());
        assert_eq!(state.step(), 0);
    }

    #[test]
    fn test_advance_moves_units_forward() {
        let geometry = line_geometry(100);
        let mut engine = SimulationEngine::with_seed(7);
        let mut state = engine.seed(&geometry);

        let units = engine.advance(&mut state, &geometry);
        assert_eq!(state.step(), 1);
        // Offset after one step on a 100-point path is exactly one index.
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(path_index(&geometry, &unit.position), i * 100 / 6 + 1);
        }
    }

    #[test]
    fn test_advance_wraps_at_path_end() {
        let geometry = line_geometry(10);
        let mut engine = SimulationEngine::with_seed(7);
        let mut state = engine.seed(&geometry);

        // Unit 5 starts near the end (index 8); enough steps push it past
        // the last point and back around to the start.
        for _ in 0..50 {
            engine.advance(&mut state, &geometry);
        }
        let index = path_index(&geometry, &state.units()[5].position);
        assert_eq!(index, (8 + 5) % 10);
    }

    #[test]
    fn test_full_cycle_returns_to_seed_positions() {
        let geometry = line_geometry(37);
        let mut engine = SimulationEngine::with_seed(7);
        let mut state = engine.seed(&geometry);
        let seeded: Vec<Coordinate> = state.units().iter().map(|u| u.position).collect();

        for _ in 0..CYCLE_STEPS {
            engine.advance(&mut state, &geometry);
        }

        assert_eq!(state.step(), 0);
        let cycled: Vec<Coordinate> = state.units().iter().map(|u| u.position).collect();
        assert_eq!(seeded, cycled);
    }

    #[test]
    fn test_trajectories_identical_across_seeds() {
        let geometry = line_geometry(42);
        let mut a = SimulationEngine::with_seed(1);
        let mut b = SimulationEngine::with_seed(999);
        let mut state_a = a.seed(&geometry);
        let mut state_b = b.seed(&geometry);

        for _ in 0..25 {
            a.advance(&mut state_a, &geometry);
            b.advance(&mut state_b, &geometry);
        }

        // Path indices are RNG-independent; only speed/heading differ.
        let positions_a: Vec<Coordinate> = state_a.units().iter().map(|u| u.position).collect();
        let positions_b: Vec<Coordinate> = state_b.units().iter().map(|u| u.position).collect();
        assert_eq!(positions_a, positions_b);
    }

    #[test]
    fn test_same_seed_reproduces_speeds_and_headings() {
        let geometry = line_geometry(20);
        let mut a = SimulationEngine::with_seed(42);
        let mut b = SimulationEngine::with_seed(42);
        let mut state_a = a.seed(&geometry);
        let mut state_b = b.seed(&geometry);

        a.advance(&mut state_a, &geometry);
        b.advance(&mut state_b, &geometry);

        assert_eq!(state_a.units(), state_b.units());
    }

    #[test]
    fn test_speed_and_heading_within_bounds() {
        let geometry = line_geometry(12);
        let mut engine = SimulationEngine::with_seed(3);
        let mut state = engine.seed(&geometry);

        for _ in 0..20 {
            for unit in engine.advance(&mut state, &geometry) {
                assert!((MIN_SPEED_KMH..=MAX_SPEED_KMH).contains(&unit.speed_kmh));
                assert!((0.0..360.0).contains(&unit.heading_degrees));
            }
        }
    }

    #[test]
    fn test_short_path_keeps_all_units_on_path() {
        // Fewer points than units: several units share indices, none panic.
        let geometry = line_geometry(3);
        let mut engine = SimulationEngine::with_seed(7);
        let mut state = engine.seed(&geometry);
        assert_eq!(state.units().len(), FLEET_SIZE);

        for _ in 0..10 {
            for unit in engine.advance(&mut state, &geometry) {
                path_index(&geometry, &unit.position);
            }
        }
    }
}
