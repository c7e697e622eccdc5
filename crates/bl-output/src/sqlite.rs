//! SQLite report backend (feature `sqlite`).
//!
//! Creates a single `report.db` file in the output directory with six
//! tables: `stop_summary`, `passengers`, `buses`, `history`, `event_log` and
//! `kpis`.  Times are stored as `HH:MM:SS` text, missing values as NULL.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::writer::ReportWriter;
use crate::{
    BusDetailRow, HistoryRow, KpiSummary, LogRow, OutputResult, PassengerDetailRow, StopSummaryRow,
};

/// Writes a report to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Create `dir` if needed, open (or create) `report.db` and initialise
    /// the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("report.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS stop_summary (
                 stop_id          INTEGER PRIMARY KEY,
                 name             TEXT    NOT NULL,
                 stop_order       INTEGER NOT NULL,
                 route            TEXT    NOT NULL,
                 total_passengers INTEGER NOT NULL,
                 waiting          INTEGER NOT NULL,
                 on_bus           INTEGER NOT NULL,
                 arrived          INTEGER NOT NULL,
                 avg_wait_minutes REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS passengers (
                 passenger_id   INTEGER PRIMARY KEY,
                 arrival_time   TEXT    NOT NULL,
                 boarding_stop  TEXT    NOT NULL,
                 alighting_stop TEXT    NOT NULL,
                 bus_id         INTEGER,
                 status         TEXT    NOT NULL,
                 boarded_time   TEXT,
                 arrived_time   TEXT,
                 wait_minutes   REAL,
                 travel_minutes REAL
             );
             CREATE TABLE IF NOT EXISTS buses (
                 bus_id        INTEGER PRIMARY KEY,
                 capacity      INTEGER NOT NULL,
                 route         TEXT    NOT NULL,
                 start_time    TEXT    NOT NULL,
                 start_stop    TEXT    NOT NULL,
                 current_stop  TEXT,
                 next_stop     TEXT,
                 status        TEXT    NOT NULL,
                 total_carried INTEGER NOT NULL,
                 load          INTEGER NOT NULL,
                 occupancy_pct REAL    NOT NULL,
                 trip_minutes  REAL,
                 is_extra      INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS history (
                 time      TEXT    NOT NULL,
                 stop_id   INTEGER NOT NULL,
                 stop_name TEXT    NOT NULL,
                 waiting   INTEGER NOT NULL,
                 boarded   INTEGER NOT NULL,
                 alighted  INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS event_log (
                 seq     INTEGER PRIMARY KEY,
                 time    TEXT NOT NULL,
                 message TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS kpis (
                 metric TEXT PRIMARY KEY,
                 value  REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl ReportWriter for SqliteWriter {
    fn write_stop_summary(&mut self, rows: &[StopSummaryRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO stop_summary \
                 (stop_id, name, stop_order, route, total_passengers, waiting, on_bus, arrived, avg_wait_minutes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.stop_id,
                    row.name,
                    row.order,
                    row.route,
                    row.total_passengers,
                    row.waiting,
                    row.on_bus,
                    row.arrived,
                    row.avg_wait_minutes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_passengers(&mut self, rows: &[PassengerDetailRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO passengers \
                 (passenger_id, arrival_time, boarding_stop, alighting_stop, bus_id, status, \
                  boarded_time, arrived_time, wait_minutes, travel_minutes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.passenger_id,
                    row.arrival_time.to_string(),
                    row.boarding_stop,
                    row.alighting_stop,
                    row.bus_id,
                    row.status.to_string(),
                    row.boarded_time.map(|t| t.to_string()),
                    row.arrived_time.map(|t| t.to_string()),
                    row.wait_minutes,
                    row.travel_minutes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_buses(&mut self, rows: &[BusDetailRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO buses \
                 (bus_id, capacity, route, start_time, start_stop, current_stop, next_stop, status, \
                  total_carried, load, occupancy_pct, trip_minutes, is_extra) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.bus_id,
                    row.capacity,
                    row.route,
                    row.start_time.to_string(),
                    row.start_stop,
                    row.current_stop,
                    row.next_stop,
                    row.status,
                    row.total_carried,
                    row.load,
                    row.occupancy_pct,
                    row.trip_minutes,
                    row.is_extra as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_history(&mut self, rows: &[HistoryRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO history (time, stop_id, stop_name, waiting, boarded, alighted) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.time.to_string(),
                    row.stop_id,
                    row.stop_name,
                    row.waiting,
                    row.boarded,
                    row.alighted,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_log(&mut self, rows: &[LogRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached("INSERT INTO event_log (time, message) VALUES (?1, ?2)")?;
            for row in rows {
                stmt.execute(params![row.time.to_string(), row.message])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_kpis(&mut self, kpis: &KpiSummary) -> OutputResult<()> {
        let metrics = [
            ("total_passengers",    kpis.total_passengers as f64),
            ("arrived_passengers",  kpis.arrived_passengers as f64),
            ("completion_rate_pct", kpis.completion_rate_pct),
            ("avg_wait_minutes",    kpis.avg_wait_minutes),
            ("avg_travel_minutes",  kpis.avg_travel_minutes),
            ("total_buses",         kpis.total_buses as f64),
            ("completed_buses",     kpis.completed_buses as f64),
            ("avg_trip_minutes",    kpis.avg_trip_minutes),
        ];
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached("INSERT OR REPLACE INTO kpis (metric, value) VALUES (?1, ?2)")?;
            for (metric, value) in metrics {
                stmt.execute(params![metric, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
