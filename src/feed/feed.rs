//! Position feed orchestrator.
//!
//! [`PositionFeed`] owns the feed state machine. Per route selection it runs
//! two cancellable tasks: a telemetry poll loop and a simulation tick loop,
//! both keyed to a route generation counter. Every publish re-checks the
//! generation under the single write lock, so once a route is swapped or the
//! feed is stopped, publishes from the superseded tasks become permanently
//! unobservable.
//!
//! The feed never blocks the display on the network: selecting a route
//! publishes a seeded simulation frame immediately, and telemetry replaces
//! it only when a poll succeeds.

use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::route::RouteGeometry;
use crate::sim::{SimulationEngine, SimulationState};
use crate::telemetry::{
    HttpTelemetryClient, TelemetryClient, TelemetryConfig, TelemetryError, TelemetrySource,
};
use crate::vehicle::VehiclePosition;

use super::config::FeedConfig;
use super::status::{FeedPhase, FeedStatus, FeedUpdate};

/// Feed-owned mutable state. Single writer: only the feed and its tasks
/// mutate it, always under the write lock.
struct FeedInner {
    phase: FeedPhase,
    status: FeedStatus,
    positions: Vec<VehiclePosition>,
    geometry: Arc<RouteGeometry>,
    engine: SimulationEngine,
    sim: SimulationState,

    /// Route generation. Bumped on every route selection and on stop;
    /// publishes keyed to an older generation are dropped.
    generation: u64,
}

/// State and broadcast channel shared with the feed's tasks.
struct FeedShared {
    inner: RwLock<FeedInner>,
    update_tx: broadcast::Sender<FeedUpdate>,
}

impl FeedShared {
    /// Send the current frame to subscribers. Called under the write lock,
    /// which serializes publish order.
    fn publish(&self, inner: &FeedInner) {
        let _ = self.update_tx.send(FeedUpdate {
            positions: inner.positions.clone(),
            status: inner.status.clone(),
        });
    }
}

/// Tasks driving one route selection.
struct RouteTasks {
    token: CancellationToken,
    poll: JoinHandle<()>,
    sim: Option<JoinHandle<()>>,
}

impl RouteTasks {
    fn shutdown(self) {
        self.token.cancel();
        self.poll.abort();
        if let Some(sim) = self.sim {
            sim.abort();
        }
    }
}

/// The position feed: publishes the best available vehicle positions.
///
/// Spawns its tasks on the ambient Tokio runtime; [`select_route`] and
/// [`stop`] must be called from within one.
///
/// [`select_route`]: PositionFeed::select_route
/// [`stop`]: PositionFeed::stop
pub struct PositionFeed<C: TelemetryClient> {
    shared: Arc<FeedShared>,
    source: Arc<TelemetrySource<C>>,
    config: FeedConfig,
    tasks: Mutex<Option<RouteTasks>>,
}

impl PositionFeed<HttpTelemetryClient> {
    /// Feed over the production HTTP telemetry client.
    pub fn over_http(telemetry: TelemetryConfig, config: FeedConfig) -> Self {
        Self::new(TelemetrySource::over_http(telemetry), config)
    }
}

impl<C: TelemetryClient + 'static> PositionFeed<C> {
    /// Create a feed in the `Initializing` phase. Nothing is published
    /// until a route is selected.
    pub fn new(source: TelemetrySource<C>, config: FeedConfig) -> Self {
        Self::with_engine(source, config, SimulationEngine::new())
    }

    /// Create a feed with an explicit simulation engine (seeded in tests).
    pub fn with_engine(
        source: TelemetrySource<C>,
        config: FeedConfig,
        engine: SimulationEngine,
    ) -> Self {
        let (update_tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            shared: Arc::new(FeedShared {
                inner: RwLock::new(FeedInner {
                    phase: FeedPhase::Initializing,
                    status: FeedStatus::default(),
                    positions: Vec::new(),
                    geometry: Arc::new(RouteGeometry::empty()),
                    engine,
                    sim: SimulationState::empty(),
                    generation: 0,
                }),
                update_tx,
            }),
            source: Arc::new(source),
            config,
            tasks: Mutex::new(None),
        }
    }

    /// Select a route, replacing any previous selection.
    ///
    /// Cancels the previous route's tasks, reseeds the simulation from the
    /// new geometry, publishes a first frame immediately, and starts the
    /// telemetry poll and simulation tick tasks for the new route.
    pub fn select_route(&self, geometry: RouteGeometry) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.take() {
            previous.shutdown();
        }

        let geometry = Arc::new(geometry);
        let generation = {
            let mut inner = self.shared.inner.write().unwrap();
            inner.generation += 1;
            inner.geometry = Arc::clone(&geometry);
            let seeded = inner.engine.seed(&geometry);
            inner.sim = seeded;
            inner.phase = FeedPhase::Simulating;
            inner.status = FeedStatus::default();
            if self.config.simulation_fallback {
                let positions = inner.sim.units().to_vec();
                inner.status.using_simulation = !positions.is_empty();
                inner.positions = positions;
            } else {
                inner.positions = Vec::new();
            }
            inner.status.last_update = Some(Utc::now());
            self.shared.publish(&inner);
            inner.generation
        };

        tracing::info!(
            generation,
            path_points = geometry.path().len(),
            stops = geometry.stops().len(),
            "Route selected, feed running"
        );

        let token = CancellationToken::new();
        let poll = tokio::spawn(poll_loop(
            Arc::clone(&self.shared),
            Arc::clone(&self.source),
            self.config.clone(),
            generation,
            token.clone(),
        ));
        let sim = self.config.simulation_fallback.then(|| {
            tokio::spawn(sim_loop(
                Arc::clone(&self.shared),
                self.config.clone(),
                generation,
                token.clone(),
            ))
        });
        *tasks = Some(RouteTasks { token, poll, sim });
    }

    /// Tear the feed down. Cancels both tasks; nothing publishes afterwards.
    pub fn stop(&self) {
        if let Some(tasks) = self.tasks.lock().unwrap().take() {
            tasks.shutdown();
        }
        let mut inner = self.shared.inner.write().unwrap();
        if inner.phase != FeedPhase::Stopped {
            inner.phase = FeedPhase::Stopped;
            inner.generation += 1;
            tracing::info!("Position feed stopped");
        }
    }

    /// Subscribe to published updates.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.shared.update_tx.subscribe()
    }

    /// Current positions and status, for late subscribers.
    pub fn snapshot(&self) -> FeedUpdate {
        let inner = self.shared.inner.read().unwrap();
        FeedUpdate {
            positions: inner.positions.clone(),
            status: inner.status.clone(),
        }
    }

    /// Current status metadata.
    pub fn status(&self) -> FeedStatus {
        self.shared.inner.read().unwrap().status.clone()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> FeedPhase {
        self.shared.inner.read().unwrap().phase
    }
}

impl<C: TelemetryClient> Drop for PositionFeed<C> {
    fn drop(&mut self) {
        if let Some(tasks) = self.tasks.lock().unwrap().take() {
            tasks.shutdown();
        }
    }
}

/// Telemetry poll loop: fetch on the poll interval, first tick immediately.
async fn poll_loop<C: TelemetryClient + 'static>(
    shared: Arc<FeedShared>,
    source: Arc<TelemetrySource<C>>,
    config: FeedConfig,
    generation: u64,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        // Cancellation drops the in-flight request and any backoff sleep.
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = source.fetch_positions() => result,
        };

        if !apply_poll_result(&shared, &config, generation, result) {
            break;
        }
    }

    tracing::debug!(generation, "Telemetry poll task stopped");
}

/// Simulation tick loop: advance while the feed is covering for telemetry.
async fn sim_loop(
    shared: Arc<FeedShared>,
    config: FeedConfig,
    generation: u64,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.sim_tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The seeded frame was already published; skip the immediate first tick.
    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = interval.tick() => {}
    }

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        if !advance_simulation(&shared, generation) {
            break;
        }
    }

    tracing::debug!(generation, "Simulation tick task stopped");
}

/// Apply one poll outcome. Returns false once the route is stale or the
/// feed stopped, which ends the calling loop.
fn apply_poll_result(
    shared: &FeedShared,
    config: &FeedConfig,
    generation: u64,
    result: Result<Vec<VehiclePosition>, TelemetryError>,
) -> bool {
    let mut inner = shared.inner.write().unwrap();
    if inner.generation != generation || inner.phase == FeedPhase::Stopped {
        return false;
    }

    match result {
        Ok(units) if !units.is_empty() => {
            tracing::info!(units = units.len(), "Telemetry live, publishing real positions");
            inner.phase = FeedPhase::Live;
            inner.positions = units;
            inner.status.connected = true;
            inner.status.retrying = false;
            inner.status.using_simulation = false;
            inner.status.last_error = None;
            inner.status.last_update = Some(Utc::now());
        }
        Ok(_) => {
            // All units unavailable: a transient miss, not an error.
            tracing::debug!("No units available from telemetry, covering with simulation");
            fall_back(&mut inner, config, None);
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                attempts = e.attempts(),
                "Telemetry poll failed, covering with simulation"
            );
            fall_back(&mut inner, config, Some(e.to_string()));
        }
    }

    shared.publish(&inner);
    true
}

/// Enter (or stay in) the simulating phase after a failed or empty poll.
fn fall_back(inner: &mut FeedInner, config: &FeedConfig, error: Option<String>) {
    inner.phase = FeedPhase::Simulating;
    inner.status.connected = false;
    inner.status.retrying = true;
    if let Some(message) = error {
        inner.status.last_error = Some(message);
    }

    if config.simulation_fallback {
        let units = {
            let FeedInner {
                engine,
                sim,
                geometry,
                ..
            } = &mut *inner;
            engine.advance(sim, geometry)
        };
        if !units.is_empty() {
            inner.positions = units;
            inner.status.using_simulation = true;
        }
    }
    inner.status.last_update = Some(Utc::now());
}

/// One simulation tick. Returns false once the route is stale or the feed
/// stopped.
fn advance_simulation(shared: &FeedShared, generation: u64) -> bool {
    let mut inner = shared.inner.write().unwrap();
    if inner.generation != generation || inner.phase == FeedPhase::Stopped {
        return false;
    }
    if inner.phase != FeedPhase::Simulating {
        // Telemetry is live; the simulation stays parked until needed.
        return true;
    }

    let units = {
        let FeedInner {
            engine,
            sim,
            geometry,
            ..
        } = &mut *inner;
        engine.advance(sim, geometry)
    };
    if units.is_empty() {
        return true; // empty path: nothing to publish
    }

    inner.positions = units;
    inner.status.using_simulation = true;
    inner.status.last_update = Some(Utc::now());
    shared.publish(&inner);
    true
}
