//! `ReportObserver<W>`: bridges `SimObserver` to a `ReportWriter`.

use tracing::{debug, info};

use bl_core::SimTime;
use bl_sim::{SimObserver, SimView};

use crate::row::Report;
use crate::writer::ReportWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes the full report to any [`ReportWriter`]
/// backend when a run ends.
///
/// Only the first completed run is written; a repeating engine does not
/// append further copies.  Errors from the writer are stored internally
/// because `SimObserver` methods have no return value.  After the run, check
/// for errors with [`take_error`][Self::take_error].
pub struct ReportObserver<W: ReportWriter> {
    writer:     W,
    report:     Option<Report>,
    last_error: Option<OutputError>,
}

impl<W: ReportWriter> ReportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, report: None, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// The report written at the end of the run, once there is one.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> SimObserver for ReportObserver<W> {
    fn on_sim_end(&mut self, time: SimTime, view: &SimView<'_>) {
        if self.report.is_some() {
            debug!(at = %time, "report already written, skipping");
            return;
        }
        let report = Report::from_view(view);
        let result = self.writer.write_report(&report);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
        info!(
            at         = %time,
            passengers = report.passengers.len(),
            log_lines  = report.log.len(),
            "report written"
        );
        self.report = Some(report);
    }
}
