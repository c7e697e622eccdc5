//! Extra (short-turn) bus services added at runtime.

use bl_core::{BusId, RouteId, SimTime, StopId};
use bl_fleet::Bus;
use bl_route::RouteTopology;

use crate::{SimError, SimResult};

/// Upper bound on buses generated by one request.
pub const MAX_EXTRA_BUSES: usize = 10;

/// Request for a block of extra runs at a fixed headway.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtraBusSpec {
    /// Headway between consecutive runs, in minutes.
    pub frequency_minutes: u32,
    pub start_time:        SimTime,
    /// Ignored when the route has a depot: every run leaves from there.
    pub start_stop:        StopId,
    /// Each run completes at this stop.
    pub destination:       StopId,
    pub capacity:          u32,
    /// `None` takes the destination stop's route.
    pub route:             Option<RouteId>,
}

impl ExtraBusSpec {
    pub fn validate(&self) -> SimResult<()> {
        if self.frequency_minutes == 0 {
            return Err(SimError::Config("extra service frequency must be positive".into()));
        }
        if self.capacity == 0 {
            return Err(SimError::Config("extra service capacity must be positive".into()));
        }
        Ok(())
    }

    /// Lay out runs every `frequency_minutes` from `start_time` while the
    /// departure is before `end`, capped at [`MAX_EXTRA_BUSES`].  Ids count
    /// up from `first_id`.  Runs leave from the route's depot when it has one.
    pub fn plan(&self, first_id: BusId, end: SimTime, topology: &RouteTopology) -> Vec<Bus> {
        let headway = self.frequency_minutes * 60;
        let start_stop = topology.depot().map_or(self.start_stop, |s| s.id);
        let route = self
            .route
            .clone()
            .or_else(|| topology.get(self.destination).map(|s| s.route.clone()))
            .unwrap_or_default();

        let mut buses = Vec::new();
        let mut id = first_id;
        let mut t = self.start_time;
        while buses.len() < MAX_EXTRA_BUSES && t < end {
            let mut bus = Bus::new(id, self.capacity, t, start_stop)
                .with_destination(self.destination)
                .with_route(route.clone());
            bus.is_extra = true;
            buses.push(bus);
            id = id.next();
            t = t + headway;
        }
        buses
    }
}
