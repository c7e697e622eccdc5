//! `bl-fleet`: mutable per-run state for passengers and buses.
//!
//! | Type             | Role                                                   |
//! |------------------|--------------------------------------------------------|
//! | [`Passenger`]    | manifest record + `Absent → Waiting → OnBus → Arrived` |
//! | [`PassengerPool`]| manifest, arrival schedule, FCFS waiting pool          |
//! | [`Bus`]          | loaded bus record + [`TripState`]                      |
//! | [`BusFleet`]     | id-indexed bus storage                                 |
//!
//! Nothing here decides *when* things happen; the engine in `bl-sim` drives
//! every transition.

pub mod bus;
pub mod error;
pub mod fleet;
pub mod passenger;
pub mod pool;

#[cfg(test)]
mod tests;

pub use bus::{Bus, BusStatus, TripState};
pub use error::{FleetError, FleetResult};
pub use fleet::BusFleet;
pub use passenger::{Passenger, PassengerStatus};
pub use pool::PassengerPool;
