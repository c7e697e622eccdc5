//! `BusFleet`: id-indexed storage for every bus in the run.

use rustc_hash::FxHashMap;

use bl_core::BusId;
use bl_route::RouteTopology;

use crate::{Bus, FleetError, FleetResult, TripState};

/// The buses of one run, in load order.
#[derive(Clone, Debug, Default)]
pub struct BusFleet {
    buses: Vec<Bus>,
    index: FxHashMap<BusId, usize>,
}

impl BusFleet {
    /// Build a fleet.  Trip state is left as given; call
    /// [`reset`](Self::reset) to derive it from a topology.
    pub fn new(buses: Vec<Bus>) -> FleetResult<Self> {
        let mut fleet = Self::default();
        for bus in buses {
            fleet.push(bus)?;
        }
        Ok(fleet)
    }

    /// Append one bus.  Fails on a duplicate id.
    pub fn push(&mut self, bus: Bus) -> FleetResult<()> {
        if self.index.contains_key(&bus.id) {
            return Err(FleetError::DuplicateBus(bus.id));
        }
        self.index.insert(bus.id, self.buses.len());
        self.buses.push(bus);
        Ok(())
    }

    /// Put every bus back at its start stop with no progress.
    pub fn reset(&mut self, topology: &RouteTopology) {
        for bus in &mut self.buses {
            let next = topology.next_stop(bus.start_stop, bus.destination);
            bus.trip = TripState::at_start(bus.start_stop, next);
        }
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn get(&self, id: BusId) -> Option<&Bus> {
        self.index.get(&id).map(|&slot| &self.buses[slot])
    }

    pub fn get_mut(&mut self, id: BusId) -> Option<&mut Bus> {
        self.index.get(&id).map(|&slot| &mut self.buses[slot])
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bus> + '_ {
        self.buses.iter()
    }

    /// Largest id in the fleet, or `None` when empty.
    pub fn max_id(&self) -> Option<BusId> {
        self.buses.iter().map(|b| b.id).max()
    }

    pub fn completed_count(&self) -> usize {
        self.buses.iter().filter(|b| b.is_completed()).count()
    }

    /// `true` if `id` names a bus that has finished its trip.
    pub fn is_completed(&self, id: BusId) -> bool {
        self.get(id).is_some_and(Bus::is_completed)
    }
}
