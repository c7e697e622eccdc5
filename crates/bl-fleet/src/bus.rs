//! Bus records and per-trip state.

use std::fmt;

use rustc_hash::FxHashSet;

use bl_core::{BusId, PassengerId, RouteId, SimTime, StopId};

/// Trip state machine: `Waiting ⇄ Moving`, then `Completed` (absorbing).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BusStatus {
    /// Standing at `current_stop`.
    #[default]
    Waiting,
    /// Between `current_stop` and `next_stop`.
    Moving,
    Completed,
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusStatus::Waiting   => "waiting",
            BusStatus::Moving    => "moving",
            BusStatus::Completed => "completed",
        })
    }
}

// ── TripState ─────────────────────────────────────────────────────────────────

/// Everything about a bus that changes during a run.
///
/// Every handled arrival and departure key `(stop, time)` is remembered for
/// the whole trip, so a redelivered event is ignored however late it comes.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripState {
    pub status:          BusStatus,
    pub current_stop:    Option<StopId>,
    pub next_stop:       Option<StopId>,
    pub arrival_time:    Option<SimTime>,
    pub departure_time:  Option<SimTime>,
    pub completion_time: Option<SimTime>,
    /// Onboard passengers in boarding order.
    pub onboard:         Vec<PassengerId>,
    /// Running maximum of `onboard / capacity * 100`.  Never decreases.
    pub max_occupancy_pct: f64,
    /// Passengers boarded over the whole trip.
    pub total_boarded:   u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    arrivals_seen:       FxHashSet<(StopId, SimTime)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    departures_seen:     FxHashSet<(StopId, SimTime)>,
}

impl TripState {
    /// State of a bus standing at `stop` before its first departure.
    pub fn at_start(stop: StopId, next: Option<StopId>) -> Self {
        Self {
            current_stop: Some(stop),
            next_stop:    next,
            ..Self::default()
        }
    }
}

// ── Bus ───────────────────────────────────────────────────────────────────────

/// One bus run.  The leading fields are the loaded record; `trip` holds run
/// progress and is rebuilt on reset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bus {
    pub id:          BusId,
    pub capacity:    u32,
    pub start_time:  SimTime,
    pub start_stop:  StopId,
    /// Truncates the route: the bus completes once it reaches this stop.
    pub destination: Option<StopId>,
    pub route:       RouteId,
    pub is_extra:    bool,
    pub trip:        TripState,
}

impl Bus {
    pub fn new(id: BusId, capacity: u32, start_time: SimTime, start_stop: StopId) -> Self {
        Self {
            id,
            capacity,
            start_time,
            start_stop,
            destination: None,
            route:       RouteId::default(),
            is_extra:    false,
            trip:        TripState::at_start(start_stop, None),
        }
    }

    pub fn with_destination(mut self, destination: StopId) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_route(mut self, route: RouteId) -> Self {
        self.route = route;
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.trip.status == BusStatus::Completed
    }

    #[inline]
    pub fn load(&self) -> usize {
        self.trip.onboard.len()
    }

    /// Free seats; zero when full.
    #[inline]
    pub fn seats_free(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.load())
    }

    pub fn occupancy_pct(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.load() as f64 / self.capacity as f64 * 100.0
    }

    /// Seconds from scheduled start to completion.
    pub fn trip_secs(&self) -> Option<u32> {
        self.trip.completion_time.map(|t| t - self.start_time)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Record arrival at `stop`.  Returns `false` (and changes nothing) for a
    /// completed bus or an arrival already handled this trip.
    pub fn arrive(&mut self, stop: StopId, next: Option<StopId>, now: SimTime) -> bool {
        if self.is_completed() || !self.trip.arrivals_seen.insert((stop, now)) {
            return false;
        }
        self.trip.status       = BusStatus::Waiting;
        self.trip.current_stop = Some(stop);
        self.trip.next_stop    = next;
        self.trip.arrival_time = Some(now);
        true
    }

    /// Record departure from `stop`.  Returns `false` (and changes nothing)
    /// for a completed bus or a departure already handled this trip.
    ///
    /// With no `next` stop the trip completes at `now`; otherwise the bus
    /// starts moving towards `next`.
    pub fn depart(&mut self, stop: StopId, next: Option<StopId>, now: SimTime) -> bool {
        if self.is_completed() || !self.trip.departures_seen.insert((stop, now)) {
            return false;
        }
        self.trip.next_stop      = next;
        match next {
            None => {
                self.trip.status          = BusStatus::Completed;
                self.trip.completion_time = Some(now);
            }
            Some(_) => {
                self.trip.status         = BusStatus::Moving;
                self.trip.departure_time = Some(now);
            }
        }
        true
    }

    /// Remove onboard passengers matching `alights_here`, preserving the order
    /// of those who stay.  Returns the removed ids.
    pub fn drop_off(&mut self, mut alights_here: impl FnMut(PassengerId) -> bool) -> Vec<PassengerId> {
        let (leaving, staying): (Vec<PassengerId>, Vec<PassengerId>) =
            self.trip.onboard.iter().copied().partition(|&id| alights_here(id));
        self.trip.onboard = staying;
        leaving
    }

    /// Append boarded passengers and fold the new load into
    /// `max_occupancy_pct`.
    pub fn take_on(&mut self, boarded: &[PassengerId]) {
        self.trip.onboard.extend_from_slice(boarded);
        self.trip.total_boarded += boarded.len() as u32;
        self.trip.max_occupancy_pct = self.trip.max_occupancy_pct.max(self.occupancy_pct());
    }
}
