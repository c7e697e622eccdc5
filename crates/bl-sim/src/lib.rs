//! `bl-sim`: discrete-event engine for the busline simulator.
//!
//! # Tick
//!
//! ```text
//! every simulated second (or every jump at max speed):
//!   ① Admission - absent passengers with arrival_time <= now start waiting.
//!   ② Events    - drain due bus events in queue order:
//!                   Arrival(bus, stop)   → exchange passengers (non-depot),
//!                                          queue Departure at +1 s
//!                   Departure(bus, stop) → queue Arrival at next stop, or
//!                                          complete the trip
//!   ③ Complete  - at the window end: Completed, or reset + restart when
//!                 `repeat` is set.
//! ```
//!
//! # Modules
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | `engine`   | [`Engine`], [`RunState`], [`TimerHandle`]              |
//! | `builder`  | [`EngineBuilder`]                                      |
//! | `boarding` | alight-then-board exchange at a stop                   |
//! | `extra`    | [`ExtraBusSpec`] and extra-run generation              |
//! | `history`  | [`HistoryLog`] per-stop counts                         |
//! | `log`      | [`EventLog`] typed narrative log                       |
//! | `observer` | [`SimObserver`], [`SimView`], [`TickReport`]           |
//! | `pacer`    | [`Pacer`] wall-clock driver                            |
//! | `defaults` | built-in route-171 dataset                             |
//!
//! # Cargo features
//!
//! | Feature | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on config, log and history types |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bl_sim::{Engine, NoopObserver};
//!
//! let mut engine = Engine::with_defaults()?;
//! engine.run_to_end(&mut NoopObserver)?;
//! for entry in engine.log().iter() {
//!     println!("{entry}");
//! }
//! ```

pub mod boarding;
pub mod builder;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod extra;
pub mod history;
pub mod log;
pub mod observer;
pub mod pacer;


pub use boarding::Exchange;
pub use builder::EngineBuilder;
pub use config::{EngineConfig, ReferenceMode};
pub use engine::{Engine, RunState, TimerHandle};
pub use error::{SimError, SimResult};
pub use extra::{ExtraBusSpec, MAX_EXTRA_BUSES};
pub use history::{HistoryEntry, HistoryLog};
pub use log::{EventLog, LogEntry, LogEvent};
pub use observer::{NoopObserver, SimObserver, SimView, TickReport};
pub use pacer::Pacer;
