//! `bl-output`: run reports for the busline simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                  |
//! |-----------|---------|----------------------------------------------------------------|
//! | *(none)*  | CSV     | `stop_summary.csv`, `passengers.csv`, `buses.csv`, `history.csv`, `event_log.csv`, `kpis.csv` |
//! | `sqlite`  | SQLite  | `report.db`                                                    |
//!
//! Both implement [`ReportWriter`] and are driven by [`ReportObserver`],
//! which implements `bl_sim::SimObserver` and writes once when the run ends.
//! [`Report::from_view`] can also be called directly on `Engine::view()`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bl_output::{CsvWriter, ReportObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = ReportObserver::new(writer);
//! engine.run_to_end(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportObserver;
pub use row::{
    BusDetailRow, HistoryRow, KpiSummary, LogRow, PassengerDetailRow, Report, StopSummaryRow,
};
pub use writer::ReportWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
