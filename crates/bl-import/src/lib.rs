//! `bl-import`: turn uploaded CSV tables into validated records.
//!
//! Each loader returns the full batch or the first error, naming the row and
//! field at fault.  Semantic checks that need more than one table (does the
//! boarding stop exist? is there a depot?) belong to the engine.
//!
//! ```rust,ignore
//! let stops      = bl_import::load_stops_csv(Path::new("stops.csv"))?;
//! let passengers = bl_import::load_passengers_csv(Path::new("passengers.csv"))?;
//! let buses      = bl_import::load_buses_csv(Path::new("buses.csv"))?;
//! ```

pub mod error;
pub mod loader;
mod table;


pub use error::{ImportError, ImportResult};
pub use loader::{
    load_buses_csv, load_buses_reader, load_passengers_csv, load_passengers_reader,
    load_stops_csv, load_stops_reader,
};
