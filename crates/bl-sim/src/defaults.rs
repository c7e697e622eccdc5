//! Built-in dataset for route 171, used by `reset_to_defaults` and demos.
//!
//! Six stops (depot + A–E), twenty passengers arriving between 07:01 and
//! 07:14, and nine 3-seat buses leaving the depot every 15 minutes from
//! 07:00 to 09:00.

use bl_core::{BusId, PassengerId, SimTime, StopId};
use bl_fleet::{Bus, Passenger};
use bl_route::Stop;

const STOPS: [(u32, &str, Option<u32>); 6] = [
    (0, "Depot",  Some(60)),
    (1, "Stop A", Some(240)),
    (2, "Stop B", Some(180)),
    (3, "Stop C", Some(300)),
    (4, "Stop D", Some(360)),
    (5, "Stop E", None),
];

/// `(id, h, m, boarding, alighting)`
const PASSENGERS: [(u32, u32, u32, u32, u32); 20] = [
    (1,  7, 1,  1, 2),
    (2,  7, 1,  4, 5),
    (3,  7, 1,  3, 4),
    (4,  7, 1,  1, 3),
    (5,  7, 2,  1, 4),
    (6,  7, 2,  3, 4),
    (7,  7, 3,  3, 5),
    (8,  7, 3,  2, 5),
    (9,  7, 3,  2, 5),
    (10, 7, 5,  2, 5),
    (11, 7, 6,  4, 5),
    (12, 7, 7,  1, 4),
    (13, 7, 8,  4, 5),
    (14, 7, 8,  3, 4),
    (15, 7, 13, 1, 3),
    (16, 7, 13, 3, 5),
    (17, 7, 14, 4, 5),
    (18, 7, 14, 3, 5),
    (19, 7, 14, 3, 4),
    (20, 7, 14, 3, 5),
];

const BUS_COUNT:       u32 = 9;
const BUS_CAPACITY:    u32 = 3;
const FIRST_DEPARTURE: u32 = 7 * 3_600;
const HEADWAY_SECS:    u32 = 15 * 60;

pub fn default_stops() -> Vec<Stop> {
    STOPS
        .iter()
        .enumerate()
        .map(|(order, &(id, name, next))| Stop::new(StopId(id), name, order as u32, next))
        .collect()
}

pub fn default_passengers() -> Vec<Passenger> {
    PASSENGERS
        .iter()
        .map(|&(id, h, m, from, to)| {
            let arrival = SimTime(h * 3_600 + m * 60);
            Passenger::new(PassengerId(id), arrival, StopId(from), StopId(to))
        })
        .collect()
}

pub fn default_buses() -> Vec<Bus> {
    (0..BUS_COUNT)
        .map(|i| {
            let start = SimTime(FIRST_DEPARTURE + i * HEADWAY_SECS);
            Bus::new(BusId(i + 1), BUS_CAPACITY, start, StopId(0))
        })
        .collect()
}
