//! Simulation observer trait for progress reporting and data collection.

use bl_core::{SimClock, SimTime};
use bl_fleet::{BusFleet, PassengerPool};
use bl_route::RouteTopology;

use crate::{EventLog, HistoryLog, RunState};

/// What one tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Passengers admitted to the waiting pool.
    pub admitted: usize,
    /// Bus events executed.
    pub events:   usize,
    pub boarded:  usize,
    pub alighted: usize,
    /// `true` for seconds skipped by a max-speed jump.  Such ticks change no
    /// state and are reported only to keep the tick stream continuous.
    pub nominal:  bool,
}

impl TickReport {
    pub fn nominal() -> Self {
        Self { nominal: true, ..Self::default() }
    }
}

/// Read-only borrow of everything an observer may inspect.
#[derive(Copy, Clone)]
pub struct SimView<'a> {
    pub state:      RunState,
    pub clock:      &'a SimClock,
    pub topology:   &'a RouteTopology,
    pub passengers: &'a PassengerPool,
    pub fleet:      &'a BusFleet,
    pub history:    &'a HistoryLog,
    pub log:        &'a EventLog,
}

/// Callbacks invoked by [`Engine`][crate::Engine] while time advances.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example - boarding counter
///
/// ```rust,ignore
/// struct Boardings(usize);
///
/// impl SimObserver for Boardings {
///     fn on_tick_end(&mut self, _time: SimTime, report: &TickReport) {
///         self.0 += report.boarded;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each simulated second, before any processing.
    fn on_tick_start(&mut self, _time: SimTime) {}

    /// Called at the end of each simulated second.
    fn on_tick_end(&mut self, _time: SimTime, _report: &TickReport) {}

    /// Called every `EngineConfig::snapshot_interval_secs` simulated seconds.
    fn on_snapshot(&mut self, _time: SimTime, _view: &SimView<'_>) {}

    /// Called once when the clock reaches the end of the window.
    fn on_sim_end(&mut self, _time: SimTime, _view: &SimView<'_>) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
