//! Fluent builder for constructing an [`Engine`].

use bl_core::SimParams;
use bl_fleet::{Bus, BusFleet, Passenger, PassengerPool};
use bl_route::{RouteTopology, Stop};

use crate::defaults::{default_buses, default_passengers, default_stops};
use crate::engine::{anchor_to_depot, build_topology};
use crate::{Engine, EngineConfig, SimResult};

/// Fluent builder for [`Engine`].
///
/// Every input is optional:
///
/// | Method                 | Default                  |
/// |------------------------|--------------------------|
/// | `.params(p)`           | `SimParams::default()`   |
/// | `.config(c)`           | `EngineConfig::default()`|
/// | `.stops(v)`            | empty topology           |
/// | `.passengers(v)`       | no passengers            |
/// | `.buses(v)`            | no buses                 |
/// | `.with_default_data()` | replaces all three above with route 171 |
///
/// Loading follows the same rules as the engine's `load_*` operations: a
/// depot is injected into a stop table without one, and buses are anchored
/// to the depot.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new()
///     .params(SimParams { speed_factor: MAX_SPEED_SENTINEL, ..SimParams::default() })
///     .with_default_data()
///     .build()?;
/// engine.run_to_end(&mut NoopObserver)?;
/// ```
#[derive(Default)]
pub struct EngineBuilder {
    params:     SimParams,
    config:     EngineConfig,
    stops:      Option<Vec<Stop>>,
    passengers: Vec<Passenger>,
    buses:      Vec<Bus>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stops(mut self, stops: Vec<Stop>) -> Self {
        self.stops = Some(stops);
        self
    }

    pub fn passengers(mut self, passengers: Vec<Passenger>) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn buses(mut self, buses: Vec<Bus>) -> Self {
        self.buses = buses;
        self
    }

    /// Use the built-in route-171 stops, passengers and buses.
    pub fn with_default_data(self) -> Self {
        self.stops(default_stops())
            .passengers(default_passengers())
            .buses(default_buses())
    }

    /// Validate inputs and return an idle engine at the window start.
    pub fn build(self) -> SimResult<Engine> {
        self.params.validate()?;

        let topology = match self.stops {
            Some(stops) => build_topology(stops)?,
            None        => RouteTopology::empty(),
        };
        let passengers = PassengerPool::new(self.passengers)?;
        let mut buses = self.buses;
        anchor_to_depot(&mut buses, &topology);
        let fleet = BusFleet::new(buses)?;

        Ok(Engine::assemble(self.params, self.config, topology, passengers, fleet))
    }
}
