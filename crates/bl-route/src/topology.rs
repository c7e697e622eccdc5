//! Route topology: stop arena plus a precomputed next-stop index.
//!
//! # Data layout
//!
//! Stops are held in a `Vec` sorted by `(route, order)`.  Two side tables are
//! built once at construction:
//!
//! ```text
//! index: StopId → arena slot         (FxHashMap)
//! next:  arena slot → arena slot     (Vec<Option<usize>>, order + 1 on same route)
//! ```
//!
//! so `next_stop` and `travel_time` are O(1) lookups instead of scans.

use rustc_hash::FxHashMap;
use tracing::warn;

use bl_core::{RouteId, StopId};

use crate::{RouteError, RouteResult, Stop};

/// Travel time used when a stop has no `time_to_next` or is unknown.
pub const DEFAULT_TRAVEL_SECS: u32 = 300;

/// Immutable, indexed view of a stop table.
///
/// Construct with [`RouteTopology::new`]; replaced wholesale on reload.
#[derive(Clone, Debug, Default)]
pub struct RouteTopology {
    stops: Vec<Stop>,
    index: FxHashMap<StopId, usize>,
    next:  Vec<Option<usize>>,
    depot: Option<usize>,
}

impl RouteTopology {
    /// A topology with no stops.  Every query answers "none" or the default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate `stops` and build the lookup tables.
    ///
    /// Rejects duplicate ids and duplicate `(route, order)` pairs.  Gaps in
    /// the order sequence are tolerated with a warning: a trip simply ends at
    /// the last stop before the gap.
    pub fn new(mut stops: Vec<Stop>) -> RouteResult<Self> {
        stops.sort_by(|a, b| (&a.route, a.order).cmp(&(&b.route, b.order)));

        let mut index: FxHashMap<StopId, usize> = FxHashMap::default();
        index.reserve(stops.len());

        let next: Vec<Option<usize>> = {
            let mut by_order: FxHashMap<(&RouteId, u32), usize> = FxHashMap::default();
            for (slot, stop) in stops.iter().enumerate() {
                if index.insert(stop.id, slot).is_some() {
                    return Err(RouteError::DuplicateStop(stop.id));
                }
                if by_order.insert((&stop.route, stop.order), slot).is_some() {
                    return Err(RouteError::DuplicateOrder {
                        route: stop.route.clone(),
                        order: stop.order,
                    });
                }
            }
            stops
                .iter()
                .map(|s| by_order.get(&(&s.route, s.order + 1)).copied())
                .collect()
        };

        for (slot, stop) in stops.iter().enumerate() {
            let is_last_on_route = stops.get(slot + 1).is_none_or(|n| n.route != stop.route);
            if next[slot].is_none() && !is_last_on_route {
                warn!(
                    route = %stop.route,
                    after = stop.order,
                    "gap in stop order; trips end at stop {}", stop.id
                );
            }
        }

        let depot = stops.iter().position(Stop::is_depot);

        Ok(Self { stops, index, next, depot })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// All stops in `(route, order)` order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.index.get(&id).map(|&slot| &self.stops[slot])
    }

    #[inline]
    pub fn contains(&self, id: StopId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn order_of(&self, id: StopId) -> Option<u32> {
        self.get(id).map(|s| s.order)
    }

    /// Stop name, or the bare id for unknown stops.
    pub fn name_of(&self, id: StopId) -> String {
        self.get(id).map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    /// The order-0 stop, if the table has one.
    pub fn depot(&self) -> Option<&Stop> {
        self.depot.map(|slot| &self.stops[slot])
    }

    /// Unknown stops are not depots.
    pub fn is_depot(&self, id: StopId) -> bool {
        self.get(id).is_some_and(Stop::is_depot)
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// The stop after `current`, honouring an optional destination cut-off.
    ///
    /// With a destination, returns `None` once the bus is at the destination
    /// or at/after its order.  The cut-off never changes the path itself.  An
    /// unknown destination is ignored.
    pub fn next_stop(&self, current: StopId, destination: Option<StopId>) -> Option<StopId> {
        let &slot = self.index.get(&current)?;
        if let Some(dest) = destination {
            if dest == current {
                return None;
            }
            if let Some(dest_order) = self.order_of(dest) {
                if self.stops[slot].order >= dest_order {
                    return None;
                }
            }
        }
        self.next[slot].map(|n| self.stops[n].id)
    }

    /// Seconds from `from` to its next stop.  Falls back to
    /// [`DEFAULT_TRAVEL_SECS`] for terminal or unknown stops.
    pub fn travel_time(&self, from: StopId) -> u32 {
        self.get(from)
            .and_then(|s| s.time_to_next)
            .unwrap_or(DEFAULT_TRAVEL_SECS)
    }
}
