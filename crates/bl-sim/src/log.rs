//! The narrative event log.
//!
//! Entries are typed [`LogEvent`]s rather than pre-formatted strings.  An
//! entry equal to one already recorded at the same second is dropped, so a
//! redelivered event can never produce a duplicate line.

use std::collections::VecDeque;
use std::fmt;

use bl_core::{BusId, SimTime, StopId};
use bl_route::RouteTopology;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum LogEvent {
    Started,
    Resumed,
    Completed,
    WaitingAtStart { count: usize },
    PassengersArrived { stop: StopId, count: usize },
    BusArrived { bus: BusId, stop: StopId, onboard: usize, capacity: u32 },
    BusDeparted { bus: BusId, stop: StopId, next: StopId },
    TripCompleted { bus: BusId, stop: StopId },
    Alighted { bus: BusId, stop: StopId, count: usize },
    Boarded { bus: BusId, stop: StopId, count: usize },
    /// No free seat on arrival while passengers were waiting.
    BusFull { bus: BusId, stop: StopId, waiting: usize },
    /// Seats ran out before everyone waiting could board.
    LeftBehind { bus: BusId, stop: StopId, count: usize },
    ExtraServices { count: usize, first: BusId, frequency_minutes: u32 },
}

impl LogEvent {
    /// Render with stop names resolved through `topology`.
    pub fn render(&self, topology: &RouteTopology) -> String {
        self.describe(&|id| topology.name_of(id))
    }

    fn describe(&self, stop: &dyn Fn(StopId) -> String) -> String {
        match self {
            LogEvent::Started   => "simulation started".into(),
            LogEvent::Resumed   => "simulation resumed".into(),
            LogEvent::Completed => "simulation completed".into(),
            LogEvent::WaitingAtStart { count } => {
                format!("{count} passengers waiting at start")
            }
            LogEvent::PassengersArrived { stop: s, count } => {
                format!("{count} passengers arrived at {}", stop(*s))
            }
            LogEvent::BusArrived { bus, stop: s, onboard, capacity } => {
                format!("bus #{bus} arrived at {} ({onboard}/{capacity})", stop(*s))
            }
            LogEvent::BusDeparted { bus, stop: s, next } => {
                format!("bus #{bus} departed {} for {}", stop(*s), stop(*next))
            }
            LogEvent::TripCompleted { bus, stop: s } => {
                format!("bus #{bus} completed its trip at {}", stop(*s))
            }
            LogEvent::Alighted { bus, stop: s, count } => {
                format!("{count} passengers alighted from bus #{bus} at {}", stop(*s))
            }
            LogEvent::Boarded { bus, stop: s, count } => {
                format!("{count} passengers boarded bus #{bus} at {}", stop(*s))
            }
            LogEvent::BusFull { bus, stop: s, waiting } => {
                format!("bus #{bus} is full at {}; {waiting} passengers could not board", stop(*s))
            }
            LogEvent::LeftBehind { bus, stop: s, count } => {
                format!("bus #{bus} filled up at {}; {count} passengers left waiting", stop(*s))
            }
            LogEvent::ExtraServices { count, first, frequency_minutes } => {
                format!("{count} extra services added from bus #{first}, every {frequency_minutes} min")
            }
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&|id| format!("stop {id}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub time:  SimTime,
    pub event: LogEvent,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.time, self.event)
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// Append-only, time-ordered narrative log with optional bounded capacity.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries:  VecDeque<LogEntry>,
    capacity: Option<usize>,
}

impl EventLog {
    pub fn new(capacity: Option<usize>) -> Self {
        Self { entries: VecDeque::new(), capacity }
    }

    /// Append `event` at `time`.  Returns `false` if an equal entry already
    /// exists for that second.
    pub fn record(&mut self, time: SimTime, event: LogEvent) -> bool {
        let seen = self
            .entries
            .iter()
            .rev()
            .take_while(|e| e.time == time)
            .any(|e| e.event == event);
        if seen {
            return false;
        }
        self.entries.push_back(LogEntry { time, event });
        if let Some(cap) = self.capacity {
            while self.entries.len() > cap {
                self.entries.pop_front();
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}
