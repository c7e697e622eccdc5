//! `bl-route`: the stop table of a single bus route.
//!
//! A [`RouteTopology`] answers the two questions the engine asks on every
//! bus event: "which stop comes after X (for this bus)?" and "how long does
//! the hop from X take?".  Both are answered from indices built once at load
//! time.
//!
//! ```rust,ignore
//! let mut stops = load_stops_csv(path)?;
//! inject_depot(&mut stops);
//! let topo = RouteTopology::new(stops)?;
//! assert_eq!(topo.next_stop(StopId(1), None), Some(StopId(2)));
//! ```

pub mod error;
pub mod stop;
pub mod topology;


pub use error::{RouteError, RouteResult};
pub use stop::{inject_depot, Stop, DEPOT_NAME};
pub use topology::{RouteTopology, DEFAULT_TRAVEL_SECS};
