//! The `Engine` struct: run control, loading, and the per-second tick.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use bl_core::{BusId, SimClock, SimParams, SimTime, StopId};
use bl_fleet::{Bus, BusFleet, Passenger, PassengerPool};
use bl_route::{inject_depot, RouteTopology, Stop};
use bl_schedule::{BusEvent, EventKind, EventQueue};

use crate::boarding::exchange;
use crate::defaults::{default_buses, default_passengers, default_stops};
use crate::{
    EngineConfig, EventLog, ExtraBusSpec, HistoryLog, LogEvent, ReferenceMode, SimError,
    SimObserver, SimResult, SimView, TickReport,
};

// ── RunState / TimerHandle ────────────────────────────────────────────────────

/// `Idle → Running ⇄ Paused → … → Completed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunState {
    /// Rewound to the window start, nothing processed yet.
    #[default]
    Idle,
    Running,
    Paused,
    /// The clock reached the end of the window.
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle      => "idle",
            RunState::Running   => "running",
            RunState::Paused    => "paused",
            RunState::Completed => "completed",
        })
    }
}

/// Token for one scheduled run.  Every `start` issues a new generation;
/// `pause` and `reset` revoke it, after which [`Engine::on_timer`] ignores
/// callbacks carrying it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u64,
}

impl TimerHandle {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Owns all mutable simulation state and exposes the control surface.
///
/// The loaded stop, passenger and bus records double as the "last loaded"
/// snapshot: [`reset`](Self::reset) clears their progress in place rather
/// than copying from a separate backup.
///
/// Each tick runs in three phases:
///
/// 1. **Admission**: absent passengers whose arrival time has passed join the
///    waiting pool.
/// 2. **Events**: due bus events are drained in queue order and handled.
///    Arrivals at non-depot stops run the passenger exchange.
/// 3. **Completion**: once the clock reaches the window end the run
///    completes, and loops when `repeat` is set.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder] or
/// [`Engine::with_defaults`].
pub struct Engine {
    params:     SimParams,
    config:     EngineConfig,
    clock:      SimClock,
    state:      RunState,
    topology:   RouteTopology,
    passengers: PassengerPool,
    fleet:      BusFleet,
    queue:      EventQueue,
    history:    HistoryLog,
    log:        EventLog,
    timer:      Option<TimerHandle>,
    next_generation: u64,
    /// Initial admission has run for the current window.
    primed:      bool,
    completions: u64,
}

impl Engine {
    pub(crate) fn assemble(
        params:     SimParams,
        config:     EngineConfig,
        topology:   RouteTopology,
        passengers: PassengerPool,
        fleet:      BusFleet,
    ) -> Self {
        let mut engine = Self {
            clock:   params.make_clock(),
            log:     EventLog::new(config.log_capacity),
            params,
            config,
            state:   RunState::Idle,
            topology,
            passengers,
            fleet,
            queue:   EventQueue::new(),
            history: HistoryLog::new(),
            timer:   None,
            next_generation: 0,
            primed:      false,
            completions: 0,
        };
        engine.reset();
        engine
    }

    /// An engine loaded with the built-in route-171 dataset and default
    /// parameters.
    pub fn with_defaults() -> SimResult<Self> {
        crate::EngineBuilder::new().with_default_data().build()
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// Replace the run parameters.
    ///
    /// A speed-only change while running takes effect on the next tick and
    /// keeps all state.  Anything else resets the engine.
    pub fn configure(&mut self, params: SimParams) -> SimResult<()> {
        params.validate()?;
        if self.state == RunState::Running && self.params.same_window(&params) {
            debug!(speed = params.speed_factor, "speed changed while running");
            self.params = params;
            return Ok(());
        }
        self.params = params;
        self.reset();
        info!(
            start    = %self.params.start_time,
            minutes  = self.params.duration_minutes,
            speed    = self.params.speed_factor,
            repeat   = self.params.repeat,
            "parameters replaced"
        );
        Ok(())
    }

    /// Begin or resume advancing time.  Returns the handle the driver must
    /// present to [`on_timer`](Self::on_timer).
    ///
    /// Starting a completed run resets it first.  Starting an already
    /// running engine returns the current handle.
    pub fn start(&mut self) -> SimResult<TimerHandle> {
        if let (RunState::Running, Some(handle)) = (self.state, self.timer) {
            return Ok(handle);
        }
        if self.state == RunState::Completed {
            self.reset();
        }
        if self.primed {
            self.log.record(self.clock.now, LogEvent::Resumed);
            info!(at = %self.clock.now, "simulation resumed");
        } else {
            self.check_references()?;
            self.prime();
        }
        self.state = RunState::Running;
        let handle = TimerHandle { generation: self.next_generation };
        self.next_generation += 1;
        self.timer = Some(handle);
        Ok(handle)
    }

    /// Stop advancing time.  All state is kept.
    pub fn pause(&mut self) {
        self.timer = None;
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            info!(at = %self.clock.now, "simulation paused");
        }
    }

    /// Rewind to the window start and clear all run progress.  Loaded
    /// records are kept.
    pub fn reset(&mut self) {
        self.timer = None;
        self.clock = self.params.make_clock();
        self.passengers.reset();
        self.fleet.reset(&self.topology);
        self.queue = EventQueue::build_initial(self.fleet.iter(), &self.topology, self.clock.start);
        self.history.clear();
        self.log = EventLog::new(self.config.log_capacity);
        self.state  = RunState::Idle;
        self.primed = false;
        debug!(queued = self.queue.len(), "engine reset");
    }

    /// Pause if running, then process exactly one second.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        self.pause();
        if self.state == RunState::Completed {
            return Ok(TickReport::default());
        }
        if !self.primed {
            self.check_references()?;
            self.prime();
        }
        let now = self.clock.advance();
        let report = self.process_tick(now, observer)?;
        if self.state != RunState::Completed {
            self.state = RunState::Paused;
        }
        Ok(report)
    }

    /// Timer callback.  Advances one scheduler step if `handle` is still the
    /// live one; returns `false` and does nothing otherwise.
    pub fn on_timer<O: SimObserver>(&mut self, handle: TimerHandle, observer: &mut O) -> SimResult<bool> {
        if self.timer != Some(handle) || self.state != RunState::Running {
            debug!(generation = handle.generation, "stale timer ignored");
            return Ok(false);
        }
        self.advance(observer)?;
        Ok(true)
    }

    /// Start if needed and advance without pacing until the current run
    /// completes.  With `repeat` set, returns right after the first loop.
    pub fn run_to_end<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.start()?;
        let target = self.completions + 1;
        while self.completions < target && self.state == RunState::Running {
            self.advance(observer)?;
        }
        Ok(())
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Replace the stop table.  A depot is injected when none exists.
    pub fn load_stops(&mut self, stops: Vec<Stop>) -> SimResult<()> {
        let topology = build_topology(stops)?;
        self.pause();
        self.topology = topology;
        self.reset();
        info!(stops = self.topology.len(), "stops loaded");
        Ok(())
    }

    /// Replace the passenger manifest.
    pub fn load_passengers(&mut self, passengers: Vec<Passenger>) -> SimResult<()> {
        let pool = PassengerPool::new(passengers)?;
        self.pause();
        self.passengers = pool;
        self.reset();
        info!(passengers = self.passengers.len(), "passengers loaded");
        Ok(())
    }

    /// Replace the fleet.  With a depot on the route every bus starts there.
    pub fn load_buses(&mut self, mut buses: Vec<Bus>) -> SimResult<()> {
        anchor_to_depot(&mut buses, &self.topology);
        let fleet = BusFleet::new(buses)?;
        self.pause();
        self.fleet = fleet;
        self.reset();
        info!(buses = self.fleet.len(), "buses loaded");
        Ok(())
    }

    /// Restore the built-in route-171 dataset.
    pub fn reset_to_defaults(&mut self) -> SimResult<()> {
        let topology = build_topology(default_stops())?;
        let passengers = PassengerPool::new(default_passengers())?;
        let mut buses = default_buses();
        anchor_to_depot(&mut buses, &topology);
        let fleet = BusFleet::new(buses)?;

        self.pause();
        self.topology   = topology;
        self.passengers = passengers;
        self.fleet      = fleet;
        self.reset();
        info!("default dataset restored");
        Ok(())
    }

    /// Append a block of extra runs and reset.  Returns the new bus ids.
    pub fn add_extra_bus(&mut self, spec: &ExtraBusSpec) -> SimResult<Vec<BusId>> {
        spec.validate()?;
        if !self.topology.contains(spec.destination) {
            dangling(self.config.reference_mode, "stop", spec.destination.0, "extra service destination")?;
            return Ok(Vec::new());
        }

        let first = self.fleet.max_id().map_or(BusId(1), BusId::next);
        let buses = spec.plan(first, self.params.end_time(), &self.topology);
        let ids: Vec<BusId> = buses.iter().map(|b| b.id).collect();

        self.pause();
        for bus in buses {
            self.fleet.push(bus)?;
        }
        self.reset();

        if let Some(&first) = ids.first() {
            self.log.record(self.clock.now, LogEvent::ExtraServices {
                count:             ids.len(),
                first,
                frequency_minutes: spec.frequency_minutes,
            });
        }
        info!(count = ids.len(), destination = %spec.destination, "extra services added");
        Ok(ids)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn topology(&self) -> &RouteTopology {
        &self.topology
    }

    pub fn passengers(&self) -> &PassengerPool {
        &self.passengers
    }

    pub fn fleet(&self) -> &BusFleet {
        &self.fleet
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The live timer handle, `None` unless running.
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Number of runs that reached the end of the window.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn view(&self) -> SimView<'_> {
        SimView {
            state:      self.state,
            clock:      &self.clock,
            topology:   &self.topology,
            passengers: &self.passengers,
            fleet:      &self.fleet,
            history:    &self.history,
            log:        &self.log,
        }
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// One scheduler step: a single second at normal speed, or a jump to the
    /// next pending event or arrival at max speed.
    fn advance<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        let report = if self.params.is_max_speed() {
            self.jump(observer)?
        } else {
            let now = self.clock.advance();
            self.process_tick(now, observer)?
        };
        if self.state == RunState::Completed && self.params.repeat {
            self.reset();
            self.start()?;
        }
        Ok(report)
    }

    fn jump<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        let now = self.clock.now;
        let target = [self.queue.next_time(), self.passengers.next_arrival()]
            .into_iter()
            .flatten()
            .min()
            .map_or(self.clock.end, |t| t.max(now.offset(1)))
            .min(self.clock.end);

        // Skipped seconds change nothing but are still reported, snapshots
        // included.
        let interval = self.config.snapshot_interval_secs;
        for secs in now.0 + 1..target.0 {
            let time = SimTime(secs);
            observer.on_tick_start(time);
            observer.on_tick_end(time, &TickReport::nominal());
            if interval > 0 && (time - self.clock.start).is_multiple_of(interval) {
                observer.on_snapshot(time, &self.view());
            }
        }
        let now = self.clock.jump_to(target);
        self.process_tick(now, observer)
    }

    // ── Tick processing ───────────────────────────────────────────────────

    pub(crate) fn process_tick<O: SimObserver>(
        &mut self,
        now:      SimTime,
        observer: &mut O,
    ) -> SimResult<TickReport> {
        observer.on_tick_start(now);

        let mut report = TickReport { admitted: self.admit(now), ..TickReport::default() };

        let fleet = &self.fleet;
        let due = self.queue.drain_due(now, |bus| fleet.is_completed(bus));
        report.events = due.len();
        for event in due {
            self.handle_event(event, &mut report)?;
        }

        observer.on_tick_end(now, &report);
        let interval = self.config.snapshot_interval_secs;
        if interval > 0 && self.clock.elapsed_secs().is_multiple_of(interval) {
            observer.on_snapshot(now, &self.view());
        }

        if self.clock.is_finished() {
            self.complete(now, observer);
        }
        Ok(report)
    }

    fn prime(&mut self) {
        let now = self.clock.now;
        if self.queue.is_empty() {
            self.queue = EventQueue::build_initial(self.fleet.iter(), &self.topology, self.clock.start);
        }
        let waiting = self.admit(now);
        if waiting > 0 {
            self.log.record(now, LogEvent::WaitingAtStart { count: waiting });
        }
        self.log.record(now, LogEvent::Started);
        self.primed = true;
        info!(
            start  = %self.clock.start,
            end    = %self.clock.end,
            buses  = self.fleet.len(),
            queued = self.queue.len(),
            "simulation started"
        );
    }

    /// Admit due passengers and record one history entry and log line per
    /// stop.  Returns how many were admitted.
    fn admit(&mut self, now: SimTime) -> usize {
        let admitted = self.passengers.admit_due(now);
        let mut per_stop: BTreeMap<StopId, usize> = BTreeMap::new();
        for &id in &admitted {
            if let Some(p) = self.passengers.get(id) {
                *per_stop.entry(p.boarding_stop).or_default() += 1;
            }
        }
        for (stop, count) in per_stop {
            let waiting = self.passengers.waiting_count_at(stop) as u32;
            self.history.record(now, stop, waiting, 0, 0);
            self.log.record(now, LogEvent::PassengersArrived { stop, count });
        }
        admitted.len()
    }

    fn complete<O: SimObserver>(&mut self, now: SimTime, observer: &mut O) {
        self.state = RunState::Completed;
        self.timer = None;
        self.completions += 1;
        self.log.record(now, LogEvent::Completed);
        info!(
            at        = %now,
            completed = self.fleet.completed_count(),
            buses     = self.fleet.len(),
            "simulation completed"
        );
        observer.on_sim_end(now, &self.view());
    }

    // ── Event handlers ────────────────────────────────────────────────────

    /// Handle one bus event.  Re-handling an event already applied is a
    /// no-op.
    pub(crate) fn handle_event(&mut self, event: BusEvent, report: &mut TickReport) -> SimResult<()> {
        match event.kind {
            EventKind::Arrival   => self.handle_arrival(event, report),
            EventKind::Departure => self.handle_departure(event),
        }
    }

    fn handle_arrival(&mut self, ev: BusEvent, report: &mut TickReport) -> SimResult<()> {
        let mode = self.config.reference_mode;
        if !self.topology.contains(ev.stop) {
            return dangling(mode, "stop", ev.stop.0, "bus arrival");
        }
        let Some(bus) = self.fleet.get_mut(ev.bus) else {
            return dangling(mode, "bus", ev.bus.0, "bus arrival");
        };

        let topology = &self.topology;
        let next = topology.next_stop(ev.stop, bus.destination);
        if !bus.arrive(ev.stop, next, ev.time) {
            return Ok(());
        }
        debug!(bus = %bus.id, stop = %ev.stop, time = %ev.time, "arrival");
        self.log.record(ev.time, LogEvent::BusArrived {
            bus:      bus.id,
            stop:     ev.stop,
            onboard:  bus.load(),
            capacity: bus.capacity,
        });

        if !topology.is_depot(ev.stop) {
            let ex = exchange(bus, &mut self.passengers, topology, ev.stop, ev.time);
            self.history.record(
                ev.time,
                ev.stop,
                ex.waiting_after as u32,
                ex.boarded.len() as u32,
                ex.alighted.len() as u32,
            );
            if !ex.alighted.is_empty() {
                self.log.record(ev.time, LogEvent::Alighted { bus: bus.id, stop: ev.stop, count: ex.alighted.len() });
            }
            if !ex.boarded.is_empty() {
                self.log.record(ev.time, LogEvent::Boarded { bus: bus.id, stop: ev.stop, count: ex.boarded.len() });
            }
            if ex.refused_full {
                self.log.record(ev.time, LogEvent::BusFull { bus: bus.id, stop: ev.stop, waiting: ex.waiting_before });
            }
            if ex.left_behind > 0 {
                self.log.record(ev.time, LogEvent::LeftBehind { bus: bus.id, stop: ev.stop, count: ex.left_behind });
            }
            report.boarded  += ex.boarded.len();
            report.alighted += ex.alighted.len();
        }

        // Fixed one-second dwell.
        self.queue.push(BusEvent::departure(ev.time + 1, bus.id, ev.stop));
        Ok(())
    }

    fn handle_departure(&mut self, ev: BusEvent) -> SimResult<()> {
        let Some(bus) = self.fleet.get_mut(ev.bus) else {
            return dangling(self.config.reference_mode, "bus", ev.bus.0, "bus departure");
        };

        let next = self.topology.next_stop(ev.stop, bus.destination);
        if !bus.depart(ev.stop, next, ev.time) {
            return Ok(());
        }
        match next {
            None => {
                debug!(bus = %bus.id, stop = %ev.stop, time = %ev.time, "trip completed");
                self.log.record(ev.time, LogEvent::TripCompleted { bus: bus.id, stop: ev.stop });
            }
            Some(next) => {
                debug!(bus = %bus.id, from = %ev.stop, to = %next, time = %ev.time, "departure");
                self.log.record(ev.time, LogEvent::BusDeparted { bus: bus.id, stop: ev.stop, next });
                let arrive = ev.time + self.topology.travel_time(ev.stop);
                self.queue.push(BusEvent::arrival(arrive, bus.id, next));
            }
        }
        Ok(())
    }

    // ── Reference checks ──────────────────────────────────────────────────

    /// Verify every stop a bus or passenger names exists.  Lenient mode only
    /// warns.
    fn check_references(&self) -> SimResult<()> {
        let mode = self.config.reference_mode;
        for bus in self.fleet.iter() {
            if !self.topology.contains(bus.start_stop) {
                dangling(mode, "stop", bus.start_stop.0, "bus start stop")?;
            }
            if let Some(dest) = bus.destination.filter(|&d| !self.topology.contains(d)) {
                dangling(mode, "stop", dest.0, "bus destination")?;
            }
        }
        for p in self.passengers.passengers() {
            for stop in [p.boarding_stop, p.alighting_stop] {
                if !self.topology.contains(stop) {
                    dangling(mode, "stop", stop.0, "passenger stop")?;
                }
            }
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn dangling(mode: ReferenceMode, kind: &'static str, id: u32, context: &'static str) -> SimResult<()> {
    match mode {
        ReferenceMode::Strict => Err(SimError::DanglingReference { kind, id, context }),
        ReferenceMode::Lenient => {
            warn!(kind, id, context, "unresolved reference skipped");
            Ok(())
        }
    }
}

/// Inject a depot if needed and index the stops.
pub(crate) fn build_topology(mut stops: Vec<Stop>) -> SimResult<RouteTopology> {
    if stops.is_empty() {
        return Err(SimError::Config("stop table is empty".into()));
    }
    if let Some(depot) = inject_depot(&mut stops) {
        info!(id = %depot, "no depot in stop table, injected one");
    }
    Ok(RouteTopology::new(stops)?)
}

/// Every bus leaves from the depot when the route has one.
pub(crate) fn anchor_to_depot(buses: &mut [Bus], topology: &RouteTopology) {
    if let Some(depot) = topology.depot().map(|s| s.id) {
        for bus in buses {
            bus.start_stop = depot;
        }
    }
}
