//! CSV report backend.
//!
//! Creates six files in the output directory:
//! `stop_summary.csv`, `passengers.csv`, `buses.csv`, `history.csv`,
//! `event_log.csv` and `kpis.csv`.
//!
//! Times are written as `HH:MM:SS`, minutes with two decimals, and missing
//! values as empty cells.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportWriter;
use crate::{
    BusDetailRow, HistoryRow, KpiSummary, LogRow, OutputResult, PassengerDetailRow, StopSummaryRow,
};

/// Writes a report as six CSV files.
pub struct CsvWriter {
    stops:      Writer<File>,
    passengers: Writer<File>,
    buses:      Writer<File>,
    history:    Writer<File>,
    log:        Writer<File>,
    kpis:       Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the six files and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut stops = Writer::from_path(dir.join("stop_summary.csv"))?;
        stops.write_record([
            "stop_id", "name", "order", "route", "total_passengers",
            "waiting", "on_bus", "arrived", "avg_wait_minutes",
        ])?;

        let mut passengers = Writer::from_path(dir.join("passengers.csv"))?;
        passengers.write_record([
            "passenger_id", "arrival_time", "boarding_stop", "alighting_stop", "bus_id",
            "status", "boarded_time", "arrived_time", "wait_minutes", "travel_minutes",
        ])?;

        let mut buses = Writer::from_path(dir.join("buses.csv"))?;
        buses.write_record([
            "bus_id", "capacity", "route", "start_time", "start_stop", "current_stop",
            "next_stop", "status", "total_carried", "load", "occupancy_pct",
            "trip_minutes", "is_extra",
        ])?;

        let mut history = Writer::from_path(dir.join("history.csv"))?;
        history.write_record(["time", "stop_id", "stop_name", "waiting", "boarded", "alighted"])?;

        let mut log = Writer::from_path(dir.join("event_log.csv"))?;
        log.write_record(["time", "message"])?;

        let mut kpis = Writer::from_path(dir.join("kpis.csv"))?;
        kpis.write_record(["metric", "value"])?;

        Ok(Self { stops, passengers, buses, history, log, kpis, finished: false })
    }
}

impl ReportWriter for CsvWriter {
    fn write_stop_summary(&mut self, rows: &[StopSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.stops.write_record(&[
                row.stop_id.to_string(),
                row.name.clone(),
                row.order.to_string(),
                row.route.clone(),
                row.total_passengers.to_string(),
                row.waiting.to_string(),
                row.on_bus.to_string(),
                row.arrived.to_string(),
                fmt_minutes(row.avg_wait_minutes),
            ])?;
        }
        Ok(())
    }

    fn write_passengers(&mut self, rows: &[PassengerDetailRow]) -> OutputResult<()> {
        for row in rows {
            self.passengers.write_record(&[
                row.passenger_id.to_string(),
                row.arrival_time.to_string(),
                row.boarding_stop.clone(),
                row.alighting_stop.clone(),
                opt(row.bus_id),
                row.status.to_string(),
                opt(row.boarded_time),
                opt(row.arrived_time),
                row.wait_minutes.map(fmt_minutes).unwrap_or_default(),
                row.travel_minutes.map(fmt_minutes).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_buses(&mut self, rows: &[BusDetailRow]) -> OutputResult<()> {
        for row in rows {
            self.buses.write_record(&[
                row.bus_id.to_string(),
                row.capacity.to_string(),
                row.route.clone(),
                row.start_time.to_string(),
                row.start_stop.clone(),
                row.current_stop.clone().unwrap_or_default(),
                row.next_stop.clone().unwrap_or_default(),
                row.status.clone(),
                row.total_carried.to_string(),
                row.load.to_string(),
                format!("{:.1}", row.occupancy_pct),
                row.trip_minutes.map(fmt_minutes).unwrap_or_default(),
                (row.is_extra as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_history(&mut self, rows: &[HistoryRow]) -> OutputResult<()> {
        for row in rows {
            self.history.write_record(&[
                row.time.to_string(),
                row.stop_id.to_string(),
                row.stop_name.clone(),
                row.waiting.to_string(),
                row.boarded.to_string(),
                row.alighted.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_log(&mut self, rows: &[LogRow]) -> OutputResult<()> {
        for row in rows {
            self.log.write_record([row.time.to_string(), row.message.clone()])?;
        }
        Ok(())
    }

    fn write_kpis(&mut self, kpis: &KpiSummary) -> OutputResult<()> {
        let metrics = [
            ("total_passengers",    kpis.total_passengers.to_string()),
            ("arrived_passengers",  kpis.arrived_passengers.to_string()),
            ("completion_rate_pct", format!("{:.1}", kpis.completion_rate_pct)),
            ("avg_wait_minutes",    fmt_minutes(kpis.avg_wait_minutes)),
            ("avg_travel_minutes",  fmt_minutes(kpis.avg_travel_minutes)),
            ("total_buses",         kpis.total_buses.to_string()),
            ("completed_buses",     kpis.completed_buses.to_string()),
            ("avg_trip_minutes",    fmt_minutes(kpis.avg_trip_minutes)),
        ];
        for (name, value) in metrics {
            self.kpis.write_record([name, value.as_str()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.stops.flush()?;
        self.passengers.flush()?;
        self.buses.flush()?;
        self.history.flush()?;
        self.log.flush()?;
        self.kpis.flush()?;
        Ok(())
    }
}

fn fmt_minutes(m: f64) -> String {
    format!("{m:.2}")
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}
