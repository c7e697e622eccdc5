//! `bl-core`: foundational types for the busline simulator.
//!
//! Every other `bl-*` crate depends on this one.  It has no `bl-*`
//! dependencies and a single external one (`thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `StopId`, `BusId`, `PassengerId`, `RouteId`           |
//! | [`time`]        | `SimTime`, `SimClock`                                 |
//! | [`params`]      | `SimParams`, `Pacing`, max-speed sentinel             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | `SimTime` round-trips as an `HH:MM:SS` string.             |

pub mod error;
pub mod ids;
pub mod params;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{BusId, PassengerId, RouteId, StopId, DEFAULT_ROUTE};
pub use params::{Pacing, SimParams, MAX_SPEED_SENTINEL};
pub use time::{SimClock, SimTime};
