//! `bl-schedule`: the discrete-event queue.
//!
//! Buses are the only event sources.  Each bus alternates
//!
//! ```text
//! Departure(stop, t) ──travel──▶ Arrival(next, t + travel) ──1 s dwell──▶ Departure(next, …)
//! ```
//!
//! until a departure finds no next stop.  [`EventQueue`] holds the pending
//! edges of that chain for every bus, ordered by time with ties in push order.

pub mod event;
pub mod queue;


pub use event::{BusEvent, EventKind};
pub use queue::EventQueue;
