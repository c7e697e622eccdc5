//! Report and writer tests for bl-output.

use tempfile::TempDir;

use bl_core::{BusId, PassengerId, SimParams, SimTime, StopId, MAX_SPEED_SENTINEL};
use bl_fleet::{Bus, Passenger, PassengerStatus};
use bl_route::Stop;
use bl_sim::{Engine, EngineBuilder, NoopObserver};

use crate::{CsvWriter, Report, ReportObserver, ReportWriter};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn t(s: &str) -> SimTime {
    SimTime::parse_hms(s).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Depot → Stop 1 → Stop 2, one 3-seat bus, four riders at 07:01 for Stop 2.
/// Three ride, one is left waiting until 08:00.
fn finished_engine() -> Engine {
    let mut engine = EngineBuilder::new()
        .params(SimParams { speed_factor: MAX_SPEED_SENTINEL, ..SimParams::default() })
        .stops(vec![
            Stop::new(StopId(0), "Depot",  0, Some(240)),
            Stop::new(StopId(1), "Stop 1", 1, Some(240)),
            Stop::new(StopId(2), "Stop 2", 2, None),
        ])
        .passengers(
            (1..=4)
                .map(|id| Passenger::new(PassengerId(id), t("07:01:00"), StopId(1), StopId(2)))
                .collect(),
        )
        .buses(vec![Bus::new(BusId(1), 3, t("07:00:00"), StopId(0))])
        .build()
        .unwrap();
    engine.run_to_end(&mut NoopObserver).unwrap();
    engine
}

fn read_csv(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
    let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    let rows = rdr.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

// ── Report rows ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use super::*;

    #[test]
    fn kpis() {
        let engine = finished_engine();
        let kpis = Report::from_view(&engine.view()).kpis;

        assert_eq!(kpis.total_passengers, 4);
        assert_eq!(kpis.arrived_passengers, 3);
        assert!(close(kpis.completion_rate_pct, 75.0));
        // 3 × 3 min boarded, plus 59 min still waiting at 08:00.
        assert!(close(kpis.avg_wait_minutes, 17.0));
        assert!(close(kpis.avg_travel_minutes, 241.0 / 60.0));
        assert_eq!((kpis.completed_buses, kpis.total_buses), (1, 1));
        assert!(close(kpis.avg_trip_minutes, 482.0 / 60.0));
    }

    #[test]
    fn stop_summary() {
        let engine = finished_engine();
        let report = Report::from_view(&engine.view());

        assert_eq!(report.stops.len(), 3);
        let depot = &report.stops[0];
        assert_eq!((depot.name.as_str(), depot.total_passengers), ("Depot", 0));
        assert!(close(depot.avg_wait_minutes, 0.0));

        let s1 = &report.stops[1];
        assert_eq!(s1.route, "171");
        assert_eq!((s1.total_passengers, s1.waiting, s1.on_bus, s1.arrived), (4, 1, 0, 3));
        assert!(close(s1.avg_wait_minutes, 17.0));
    }

    #[test]
    fn passenger_and_bus_detail() {
        let engine = finished_engine();
        let report = Report::from_view(&engine.view());

        let p1 = &report.passengers[0];
        assert_eq!(p1.boarding_stop, "Stop 1");
        assert_eq!(p1.alighting_stop, "Stop 2");
        assert_eq!(p1.bus_id, Some(1));
        assert_eq!(p1.status, PassengerStatus::Arrived);
        assert_eq!(p1.boarded_time, Some(t("07:04:00")));
        assert!(close(p1.wait_minutes.unwrap(), 3.0));

        let p4 = &report.passengers[3];
        assert_eq!(p4.status, PassengerStatus::Waiting);
        assert_eq!(p4.bus_id, None);
        assert!(close(p4.wait_minutes.unwrap(), 59.0));
        assert_eq!(p4.travel_minutes, None);

        let bus = &report.buses[0];
        assert_eq!(bus.status, "completed");
        assert_eq!(bus.current_stop.as_deref(), Some("Stop 2"));
        assert_eq!(bus.next_stop, None);
        assert_eq!((bus.total_carried, bus.load), (3, 0));
        // Completed buses report their peak.
        assert!(close(bus.occupancy_pct, 100.0));
        assert!(!bus.is_extra);
    }

    #[test]
    fn history_and_log_are_chronological() {
        let engine = finished_engine();
        let report = Report::from_view(&engine.view());

        assert!(report.history.windows(2).all(|w| w[0].time <= w[1].time));
        assert!(report.log.windows(2).all(|w| w[0].time <= w[1].time));
        assert_eq!(report.history[0].stop_name, "Stop 1");
        assert!(report.log.iter().any(|l| l.message == "3 passengers boarded bus #1 at Stop 1"));
        assert_eq!(report.log.last().unwrap().message, "simulation completed");
    }

    #[test]
    fn empty_engine_report() {
        let engine = EngineBuilder::new().build().unwrap();
        let report = Report::from_view(&engine.view());
        assert!(report.passengers.is_empty());
        assert!(close(report.kpis.completion_rate_pct, 0.0));
        assert!(close(report.kpis.avg_wait_minutes, 0.0));
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for file in [
            "stop_summary.csv",
            "passengers.csv",
            "buses.csv",
            "history.csv",
            "event_log.csv",
            "kpis.csv",
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn csv_creates_nested_dir() {
        let dir = tmp();
        let nested = dir.path().join("out").join("run1");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("kpis.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_csv(&dir, "history.csv");
        assert_eq!(headers, ["time", "stop_id", "stop_name", "waiting", "boarded", "alighted"]);
        assert!(rows.is_empty());

        let (headers, _) = read_csv(&dir, "event_log.csv");
        assert_eq!(headers, ["time", "message"]);
    }

    #[test]
    fn csv_full_report() {
        let engine = finished_engine();
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_report(&Report::from_view(&engine.view())).unwrap();
        w.finish().unwrap();

        let (_, passengers) = read_csv(&dir, "passengers.csv");
        assert_eq!(passengers.len(), 4);
        assert_eq!(&passengers[0][1], "07:01:00");
        assert_eq!(&passengers[0][4], "1");
        assert_eq!(&passengers[0][5], "arrived");
        assert_eq!(&passengers[0][7], "07:08:01");
        assert_eq!(&passengers[3][4], "");
        assert_eq!(&passengers[3][5], "waiting");
        assert_eq!(&passengers[3][8], "59.00");

        let (_, buses) = read_csv(&dir, "buses.csv");
        assert_eq!(buses.len(), 1);
        assert_eq!(&buses[0][10], "100.0");
        assert_eq!(&buses[0][11], "8.03");
        assert_eq!(&buses[0][12], "0");

        let (_, kpis) = read_csv(&dir, "kpis.csv");
        let rate = kpis.iter().find(|r| &r[0] == "completion_rate_pct").unwrap();
        assert_eq!(&rate[1], "75.0");
        let wait = kpis.iter().find(|r| &r[0] == "avg_wait_minutes").unwrap();
        assert_eq!(&wait[1], "17.00");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn observer_writes_on_end() {
        let mut engine = finished_engine();
        engine.reset();

        let dir = tmp();
        let mut obs = ReportObserver::new(CsvWriter::new(dir.path()).unwrap());
        engine.run_to_end(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.report().map(|r| r.kpis.arrived_passengers), Some(3));

        let (_, log) = read_csv(&dir, "event_log.csv");
        assert_eq!(log.len(), engine.log().len());
        assert_eq!(&log[log.len() - 1][1], "simulation completed");
    }

    #[test]
    fn observer_writes_once_when_repeating() {
        let mut engine = finished_engine();
        engine.configure(SimParams { repeat: true, speed_factor: MAX_SPEED_SENTINEL, ..SimParams::default() }).unwrap();

        let dir = tmp();
        let mut obs = ReportObserver::new(CsvWriter::new(dir.path()).unwrap());
        engine.run_to_end(&mut obs).unwrap();
        engine.run_to_end(&mut obs).unwrap();
        assert_eq!(engine.completions(), 3);
        drop(obs.into_writer());

        let (_, passengers) = read_csv(&dir, "passengers.csv");
        assert_eq!(passengers.len(), 4);
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;

    use crate::sqlite::SqliteWriter;

    fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("report.db").exists());
    }

    #[test]
    fn sqlite_full_report() {
        let engine = finished_engine();
        let dir = tmp();
        let mut obs = ReportObserver::new(SqliteWriter::new(dir.path()).unwrap());
        let mut engine = engine;
        engine.reset();
        engine.run_to_end(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let conn = rusqlite::Connection::open(dir.path().join("report.db")).unwrap();
        assert_eq!(count(&conn, "stop_summary"), 3);
        assert_eq!(count(&conn, "passengers"), 4);
        assert_eq!(count(&conn, "buses"), 1);
        assert_eq!(count(&conn, "kpis"), 8);
        assert_eq!(count(&conn, "event_log"), engine.log().len() as i64);

        let rate: f64 = conn
            .query_row("SELECT value FROM kpis WHERE metric = 'completion_rate_pct'", [], |r| r.get(0))
            .unwrap();
        assert!(close(rate, 75.0));
    }

    #[test]
    fn sqlite_missing_values_are_null() {
        let engine = finished_engine();
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_report(&Report::from_view(&engine.view())).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("report.db")).unwrap();
        let (bus, travel): (Option<i64>, Option<f64>) = conn
            .query_row(
                "SELECT bus_id, travel_minutes FROM passengers WHERE passenger_id = 4",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!((bus, travel), (None, None));

        let extra: i64 = conn
            .query_row("SELECT is_extra FROM buses WHERE bus_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(extra, 0);
    }

    #[test]
    fn sqlite_finish_idempotent() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
