//! `EventQueue`: pending bus events ordered by time.
//!
//! # Ordering
//!
//! Events live in a `BTreeMap<SimTime, Vec<BusEvent>>`.  Keys give ascending
//! time; each bucket keeps insertion order.  Draining therefore yields events
//! sorted by time with ties in the order they were pushed, i.e. a stable sort,
//! without ever re-sorting the queue.

use std::collections::BTreeMap;

use bl_core::{BusId, SimTime};
use bl_fleet::Bus;
use bl_route::RouteTopology;

use crate::BusEvent;

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, Vec<BusEvent>>,
    /// Cached event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a queue from the fleet: one departure per bus at its start stop,
    /// plus the arrival at its first reachable stop.
    ///
    /// Start times before `sim_start` are clamped to `sim_start`.  Completed
    /// buses are skipped.
    pub fn build_initial<'a>(
        buses:     impl IntoIterator<Item = &'a Bus>,
        topology:  &RouteTopology,
        sim_start: SimTime,
    ) -> Self {
        let mut queue = Self::new();
        for bus in buses {
            if bus.is_completed() {
                continue;
            }
            let start = bus.start_time.max(sim_start);
            queue.push(BusEvent::departure(start, bus.id, bus.start_stop));
            if let Some(next) = topology.next_stop(bus.start_stop, bus.destination) {
                let arrive = start + topology.travel_time(bus.start_stop);
                queue.push(BusEvent::arrival(arrive, bus.id, next));
            }
        }
        queue
    }

    /// Queue `event` behind any events already scheduled for the same second.
    ///
    /// Returns `false` without queueing if an identical event is already
    /// pending.
    pub fn push(&mut self, event: BusEvent) -> bool {
        let bucket = self.inner.entry(event.time).or_default();
        if bucket.iter().any(|e| e.same_as(&event)) {
            return false;
        }
        bucket.push(BusEvent { processed: false, ..event });
        self.total += 1;
        true
    }

    /// Remove and return every event with `time <= now`, in queue order.
    ///
    /// Events whose bus satisfies `is_completed` are dropped without being
    /// returned.  Returned events are marked processed.
    pub fn drain_due(
        &mut self,
        now:          SimTime,
        is_completed: impl Fn(BusId) -> bool,
    ) -> Vec<BusEvent> {
        let mut due = Vec::new();
        while self.inner.first_key_value().is_some_and(|(&t, _)| t <= now) {
            let Some((_, bucket)) = self.inner.pop_first() else { break };
            self.total -= bucket.len();
            due.extend(
                bucket
                    .into_iter()
                    .filter(|e| !is_completed(e.bus))
                    .map(|e| BusEvent { processed: true, ..e }),
            );
        }
        due
    }

    /// Time of the earliest pending event.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Pending events in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &BusEvent> + '_ {
        self.inner.values().flatten()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
