//! Passenger exchange when a bus stands at a stop.
//!
//! Order of operations:
//!
//! 1. everyone whose alighting stop this is leaves the bus;
//! 2. waiting passengers at the stop are filtered to those the bus can carry
//!    (a truncated bus only takes riders whose alighting stop is not past its
//!    destination);
//! 3. the eligible set is sorted by arrival time (stable, so manifest order
//!    breaks ties) and the first `seats_free` board.
//!
//! The bus never holds more than `capacity` passengers afterwards.

use bl_core::{PassengerId, SimTime, StopId};
use bl_fleet::{Bus, Passenger, PassengerPool};
use bl_route::RouteTopology;

/// Outcome of one exchange, used for history and log bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exchange {
    pub alighted: Vec<PassengerId>,
    pub boarded:  Vec<PassengerId>,
    /// Everyone waiting at the stop before boarding, eligible or not.
    pub waiting_before: usize,
    /// Everyone still waiting at the stop afterwards.
    pub waiting_after:  usize,
    /// Passengers were waiting but the bus had no free seat after alighting.
    pub refused_full:   bool,
    /// Waiting passengers left behind because boarding filled the bus.
    pub left_behind:    usize,
}

/// Run the alight-then-board exchange for `bus` at `stop`.
pub fn exchange(
    bus:      &mut Bus,
    pool:     &mut PassengerPool,
    topology: &RouteTopology,
    stop:     StopId,
    now:      SimTime,
) -> Exchange {
    // ── 1. Alighting ──────────────────────────────────────────────────────
    let alighted = bus.drop_off(|id| pool.get(id).is_some_and(|p| p.alighting_stop == stop));
    for &id in &alighted {
        pool.alight(id, now);
    }

    // ── 2–3. Eligibility, ordering, admission ─────────────────────────────
    let seats = bus.seats_free();
    let waiting_before = pool.waiting_count_at(stop);
    let limit = bus.destination.and_then(|d| topology.order_of(d));

    let mut eligible: Vec<&Passenger> = pool
        .waiting_at(stop)
        .filter(|p| can_carry(p, limit, topology))
        .collect();
    eligible.sort_by_key(|p| p.arrival_time);
    let boarded: Vec<PassengerId> = eligible.iter().take(seats).map(|p| p.id).collect();

    pool.board(&boarded, bus.id, now);
    bus.take_on(&boarded);

    let waiting_after = waiting_before - boarded.len();
    let filled_up = seats > 0 && bus.seats_free() == 0;

    Exchange {
        alighted,
        waiting_before,
        waiting_after,
        refused_full: waiting_before > 0 && seats == 0,
        left_behind:  if filled_up { waiting_after } else { 0 },
        boarded,
    }
}

/// A bus truncated at order `limit` only carries riders alighting at or
/// before it.  Unknown alighting stops are never reachable on a truncated
/// run.
fn can_carry(p: &Passenger, limit: Option<u32>, topology: &RouteTopology) -> bool {
    match limit {
        None        => true,
        Some(limit) => topology.order_of(p.alighting_stop).is_some_and(|o| o <= limit),
    }
}
