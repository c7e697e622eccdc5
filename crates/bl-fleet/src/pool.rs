//! `PassengerPool`: the manifest plus the live waiting pool.
//!
//! # Layout
//!
//! ```text
//! passengers: Vec<Passenger>                  manifest order, never reordered
//! index:      PassengerId → slot              (FxHashMap)
//! pending:    BTreeMap<SimTime, Vec<slot>>    not yet admitted, by arrival time
//! waiting:    Vec<slot>                       admitted, FCFS order
//! ```
//!
//! `pending` works like a wake queue: each tick only the passengers due by
//! `now` are popped, so admission costs O(admitted) rather than O(manifest).
//! Because admissions happen in arrival-time order, `waiting` stays sorted by
//! `(arrival_time, manifest slot)` without an explicit sort.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use bl_core::{BusId, PassengerId, SimTime, StopId};

use crate::{FleetError, FleetResult, Passenger, PassengerStatus};

#[derive(Clone, Debug, Default)]
pub struct PassengerPool {
    passengers: Vec<Passenger>,
    index:      FxHashMap<PassengerId, usize>,
    pending:    BTreeMap<SimTime, Vec<usize>>,
    waiting:    Vec<usize>,
}

impl PassengerPool {
    /// Build a pool from a manifest.  All progress fields are cleared.
    pub fn new(passengers: Vec<Passenger>) -> FleetResult<Self> {
        let mut index = FxHashMap::default();
        for (slot, p) in passengers.iter().enumerate() {
            if index.insert(p.id, slot).is_some() {
                return Err(FleetError::DuplicatePassenger(p.id));
            }
        }
        let mut pool = Self {
            passengers,
            index,
            pending: BTreeMap::new(),
            waiting: Vec::new(),
        };
        pool.reset();
        Ok(pool)
    }

    /// Clear every passenger's progress and re-queue them all as absent.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.waiting.clear();
        for (slot, p) in self.passengers.iter_mut().enumerate() {
            p.clear_progress();
            self.pending.entry(p.arrival_time).or_default().push(slot);
        }
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Move every absent passenger with `arrival_time <= now` into the waiting
    /// pool.  Returns the admitted ids in admission order.
    ///
    /// Already-waiting passengers are never re-admitted: they left `pending`
    /// when they were admitted.
    pub fn admit_due(&mut self, now: SimTime) -> Vec<PassengerId> {
        let mut admitted = Vec::new();
        while self.pending.first_key_value().is_some_and(|(&t, _)| t <= now) {
            let Some((_, slots)) = self.pending.pop_first() else { break };
            for slot in slots {
                let stop = self.passengers[slot].boarding_stop;
                let rank = self.waiting_count_at(stop) as u32 + 1;
                let p = &mut self.passengers[slot];
                p.status       = PassengerStatus::Waiting;
                p.waiting_rank = Some(rank);
                self.waiting.push(slot);
                admitted.push(p.id);
            }
        }
        admitted
    }

    /// Arrival time of the earliest passenger not yet admitted.
    pub fn next_arrival(&self) -> Option<SimTime> {
        self.pending.keys().next().copied()
    }

    // ── Boarding / alighting ──────────────────────────────────────────────

    /// Move `ids` from the waiting pool onto `bus`.  Ids that are not waiting
    /// are skipped.  Returns how many boarded.
    pub fn board(&mut self, ids: &[PassengerId], bus: BusId, now: SimTime) -> usize {
        let mut boarded = 0;
        for id in ids {
            let Some(&slot) = self.index.get(id) else { continue };
            let p = &mut self.passengers[slot];
            if p.status != PassengerStatus::Waiting {
                continue;
            }
            p.status       = PassengerStatus::OnBus;
            p.boarded_time = Some(now);
            p.bus          = Some(bus);
            boarded += 1;
        }
        let passengers = &self.passengers;
        self.waiting.retain(|&slot| passengers[slot].status == PassengerStatus::Waiting);
        boarded
    }

    /// Mark an on-bus passenger as arrived.  Returns `false` if `id` is
    /// unknown or not on a bus.
    pub fn alight(&mut self, id: PassengerId, now: SimTime) -> bool {
        match self.get_mut(id) {
            Some(p) if p.status == PassengerStatus::OnBus => {
                p.status       = PassengerStatus::Arrived;
                p.arrived_time = Some(now);
                true
            }
            _ => false,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn get(&self, id: PassengerId) -> Option<&Passenger> {
        self.index.get(&id).map(|&slot| &self.passengers[slot])
    }

    fn get_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        self.index.get(&id).map(|&slot| &mut self.passengers[slot])
    }

    /// The manifest in load order.
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// Every waiting passenger in FCFS order.
    pub fn waiting(&self) -> impl Iterator<Item = &Passenger> + '_ {
        self.waiting.iter().map(|&slot| &self.passengers[slot])
    }

    /// Waiting passengers at `stop` in FCFS order.
    pub fn waiting_at(&self, stop: StopId) -> impl Iterator<Item = &Passenger> + '_ {
        self.waiting().filter(move |p| p.boarding_stop == stop)
    }

    pub fn waiting_count_at(&self, stop: StopId) -> usize {
        self.waiting_at(stop).count()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn count_with(&self, status: PassengerStatus) -> usize {
        self.passengers.iter().filter(|p| p.status == status).count()
    }
}
