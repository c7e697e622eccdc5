//! The `BusEvent` record.

use std::fmt;

use bl_core::{BusId, SimTime, StopId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    Arrival,
    Departure,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Arrival   => "arrival",
            EventKind::Departure => "departure",
        })
    }
}

/// A bus reaching or leaving a stop at a given second.
///
/// `processed` is set when the event leaves the queue through
/// [`EventQueue::drain_due`](crate::EventQueue::drain_due); pending events
/// are always unprocessed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusEvent {
    pub time:      SimTime,
    pub kind:      EventKind,
    pub bus:       BusId,
    pub stop:      StopId,
    pub processed: bool,
}

impl BusEvent {
    pub fn arrival(time: SimTime, bus: BusId, stop: StopId) -> Self {
        Self { time, kind: EventKind::Arrival, bus, stop, processed: false }
    }

    pub fn departure(time: SimTime, bus: BusId, stop: StopId) -> Self {
        Self { time, kind: EventKind::Departure, bus, stop, processed: false }
    }

    /// Two events with the same key describe the same occurrence.
    #[inline]
    pub fn same_as(&self, other: &BusEvent) -> bool {
        self.time == other.time
            && self.kind == other.kind
            && self.bus == other.bus
            && self.stop == other.stop
    }
}

impl fmt::Display for BusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} bus {} stop {}", self.time, self.kind, self.bus, self.stop)
    }
}
