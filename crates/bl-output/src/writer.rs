//! The `ReportWriter` trait implemented by all report backends.

use crate::{
    BusDetailRow, HistoryRow, KpiSummary, LogRow, OutputResult, PassengerDetailRow, Report,
    StopSummaryRow,
};

/// Trait implemented by the CSV and SQLite writers.
///
/// Each table is written in one call.  Errors surface through the returned
/// result; [`ReportObserver`][crate::ReportObserver] stores them for later.
pub trait ReportWriter {
    fn write_stop_summary(&mut self, rows: &[StopSummaryRow]) -> OutputResult<()>;

    fn write_passengers(&mut self, rows: &[PassengerDetailRow]) -> OutputResult<()>;

    fn write_buses(&mut self, rows: &[BusDetailRow]) -> OutputResult<()>;

    fn write_history(&mut self, rows: &[HistoryRow]) -> OutputResult<()>;

    fn write_log(&mut self, rows: &[LogRow]) -> OutputResult<()>;

    fn write_kpis(&mut self, kpis: &KpiSummary) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write every table of `report`, stopping at the first error.
    fn write_report(&mut self, report: &Report) -> OutputResult<()> {
        self.write_stop_summary(&report.stops)?;
        self.write_passengers(&report.passengers)?;
        self.write_buses(&report.buses)?;
        self.write_history(&report.history)?;
        self.write_log(&report.log)?;
        self.write_kpis(&report.kpis)
    }
}
