//! The `Passenger` record and its lifecycle.

use std::fmt;

use bl_core::{BusId, PassengerId, SimTime, StopId};

/// Where a passenger is in their journey.
///
/// Transitions only move forward: `Absent → Waiting → OnBus → Arrived`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassengerStatus {
    /// Not yet at the boarding stop.
    #[default]
    Absent,
    Waiting,
    OnBus,
    /// Dropped off at the alighting stop.  Terminal.
    Arrived,
}

impl fmt::Display for PassengerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PassengerStatus::Absent  => "absent",
            PassengerStatus::Waiting => "waiting",
            PassengerStatus::OnBus   => "on_bus",
            PassengerStatus::Arrived => "arrived",
        })
    }
}

/// One passenger in the manifest.
///
/// The first four fields are the loaded record; the rest is run progress and
/// is cleared by [`Passenger::clear_progress`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passenger {
    pub id:             PassengerId,
    /// When the passenger appears at `boarding_stop`.
    pub arrival_time:   SimTime,
    pub boarding_stop:  StopId,
    pub alighting_stop: StopId,

    pub status:       PassengerStatus,
    pub boarded_time: Option<SimTime>,
    pub arrived_time: Option<SimTime>,
    pub bus:          Option<BusId>,
    /// 1-based position in the stop's queue at admission.
    pub waiting_rank: Option<u32>,
}

impl Passenger {
    pub fn new(
        id:             PassengerId,
        arrival_time:   SimTime,
        boarding_stop:  StopId,
        alighting_stop: StopId,
    ) -> Self {
        Self {
            id,
            arrival_time,
            boarding_stop,
            alighting_stop,
            status:       PassengerStatus::Absent,
            boarded_time: None,
            arrived_time: None,
            bus:          None,
            waiting_rank: None,
        }
    }

    /// Return to the freshly-loaded state.
    pub fn clear_progress(&mut self) {
        self.status       = PassengerStatus::Absent;
        self.boarded_time = None;
        self.arrived_time = None;
        self.bus          = None;
        self.waiting_rank = None;
    }

    /// Seconds spent waiting: boarding minus arrival, or `until` minus
    /// arrival while still waiting.  `None` before admission.
    pub fn wait_secs(&self, until: SimTime) -> Option<u32> {
        match (self.status, self.boarded_time) {
            (_, Some(boarded))            => Some(boarded - self.arrival_time),
            (PassengerStatus::Waiting, _) => Some(until - self.arrival_time),
            _                             => None,
        }
    }

    /// Seconds on the bus, once arrived.
    pub fn travel_secs(&self) -> Option<u32> {
        Some(self.arrived_time? - self.boarded_time?)
    }
}
