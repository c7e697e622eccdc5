//! The `Stop` record and depot detection.

use bl_core::{RouteId, StopId};

/// Name given to a depot injected by [`inject_depot`].
pub const DEPOT_NAME: &str = "Depot";

/// One stop on a route.  Immutable once loaded; the whole table is replaced on
/// reload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id:    StopId,
    pub name:  String,
    /// Position along the route.  `0` is the depot.
    pub order: u32,
    /// Seconds to the next stop.  `None` at the terminal stop.
    pub time_to_next: Option<u32>,
    pub route: RouteId,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, order: u32, time_to_next: Option<u32>) -> Self {
        Self {
            id,
            name: name.into(),
            order,
            time_to_next,
            route: RouteId::default(),
        }
    }

    pub fn with_route(mut self, route: RouteId) -> Self {
        self.route = route;
        self
    }

    #[inline]
    pub fn is_depot(&self) -> bool {
        self.order == 0
    }

    /// Order-0 stops and stops named like a depot both count when deciding
    /// whether a table needs a synthetic depot.
    fn looks_like_depot(&self) -> bool {
        self.is_depot() || self.name.to_lowercase().contains("depot")
    }
}

/// Prepend a synthetic depot unless `stops` already has one.
///
/// The depot takes id `0`, or one past the largest id when `0` is in use.  It
/// inherits the first stop's route and has a one-second hop to order 1.
/// Returns the id of the injected stop.
pub fn inject_depot(stops: &mut Vec<Stop>) -> Option<StopId> {
    if stops.iter().any(Stop::looks_like_depot) {
        return None;
    }
    let id = if stops.iter().any(|s| s.id == StopId(0)) {
        stops.iter().map(|s| s.id).max().unwrap_or_default().next()
    } else {
        StopId(0)
    };
    let route = stops.first().map(|s| s.route.clone()).unwrap_or_default();
    stops.insert(0, Stop::new(id, DEPOT_NAME, 0, Some(1)).with_route(route));
    Some(id)
}
