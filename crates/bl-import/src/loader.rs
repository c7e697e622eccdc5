//! CSV loaders for the three input tables.
//!
//! # Formats
//!
//! A header row is optional.  Blank lines are ignored.
//!
//! ```csv
//! id,name,order,timeToNext,route_id
//! 0,Depot,0,60,171
//! 1,Market,1,240,171
//! 5,Harbour,5,null,171
//! ```
//!
//! ```csv
//! id,arrivalTime,boardingStop,alightingStop
//! 1,07:01:00,1,2
//! ```
//!
//! ```csv
//! bus_id,capacity,start_time,start_location_stop_id,route_id
//! 1,3,07:00,0,171
//! ```
//!
//! A blank `route_id` falls back to the default route.  The first malformed
//! row rejects the whole batch; nothing is partially loaded.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::debug;

use bl_core::{BusId, PassengerId, RouteId, StopId};
use bl_fleet::{Bus, Passenger};
use bl_route::Stop;

use crate::table::{read_rows, Row};
use crate::{ImportError, ImportResult};

const STOP_COLUMNS: &[&str] = &[
    "id", "name", "order", "timetonext", "time_to_next", "route_id", "routeid",
];

const PASSENGER_COLUMNS: &[&str] = &[
    "id", "arrivaltime", "arrival_time", "boardingstop", "boarding_stop",
    "alightingstop", "alighting_stop",
];

const BUS_COLUMNS: &[&str] = &[
    "bus_id", "busid", "capacity", "start_time", "starttime",
    "start_location_stop_id", "startlocationstopid", "route_id", "routeid",
];

// ── Stops ─────────────────────────────────────────────────────────────────────

pub fn load_stops_csv(path: &Path) -> ImportResult<Vec<Stop>> {
    load_stops_reader(File::open(path)?)
}

/// Like [`load_stops_csv`] but accepts any `Read` source.
pub fn load_stops_reader<R: Read>(reader: R) -> ImportResult<Vec<Stop>> {
    let rows = read_rows(reader, STOP_COLUMNS)?;
    let mut ids = IdSet::default();
    let stops = rows
        .iter()
        .map(|row| {
            row.require_columns(5)?;
            let id = row.u32(0, "id")?;
            ids.insert(row, id)?;
            let name = row.cell(1);
            if name.is_empty() {
                return Err(row.field_error("name", "stop name must not be empty"));
            }
            Ok(Stop {
                id:           StopId(id),
                name:         name.to_owned(),
                order:        row.u32(2, "order")?,
                time_to_next: row.opt_u32(3, "timeToNext")?,
                route:        RouteId::or_default(row.cell(4)),
            })
        })
        .collect::<ImportResult<Vec<_>>>()?;
    finish("stop", stops)
}

// ── Passengers ────────────────────────────────────────────────────────────────

pub fn load_passengers_csv(path: &Path) -> ImportResult<Vec<Passenger>> {
    load_passengers_reader(File::open(path)?)
}

/// Like [`load_passengers_csv`] but accepts any `Read` source.
pub fn load_passengers_reader<R: Read>(reader: R) -> ImportResult<Vec<Passenger>> {
    let rows = read_rows(reader, PASSENGER_COLUMNS)?;
    let mut ids = IdSet::default();
    let passengers = rows
        .iter()
        .map(|row| {
            row.require_columns(4)?;
            let id = row.u32(0, "id")?;
            ids.insert(row, id)?;
            let arrival = row.time(1, "arrivalTime")?;
            let boarding = row.u32(2, "boardingStop")?;
            let alighting = row.u32(3, "alightingStop")?;
            if boarding == alighting {
                return Err(row.field_error(
                    "alightingStop",
                    format!("boarding and alighting stop are both {boarding}"),
                ));
            }
            Ok(Passenger::new(PassengerId(id), arrival, StopId(boarding), StopId(alighting)))
        })
        .collect::<ImportResult<Vec<_>>>()?;
    finish("passenger", passengers)
}

// ── Buses ─────────────────────────────────────────────────────────────────────

pub fn load_buses_csv(path: &Path) -> ImportResult<Vec<Bus>> {
    load_buses_reader(File::open(path)?)
}

/// Like [`load_buses_csv`] but accepts any `Read` source.
pub fn load_buses_reader<R: Read>(reader: R) -> ImportResult<Vec<Bus>> {
    let rows = read_rows(reader, BUS_COLUMNS)?;
    let mut ids = IdSet::default();
    let buses = rows
        .iter()
        .map(|row| {
            row.require_columns(5)?;
            let id = row.u32(0, "busId")?;
            ids.insert(row, id)?;
            let capacity = row.u32(1, "capacity")?;
            if capacity == 0 {
                return Err(row.field_error("capacity", "capacity must be greater than zero"));
            }
            let start = row.time_hm(2, "startTime")?;
            let stop = row.u32(3, "startLocationStopId")?;
            Ok(Bus::new(BusId(id), capacity, start, StopId(stop))
                .with_route(RouteId::or_default(row.cell(4))))
        })
        .collect::<ImportResult<Vec<_>>>()?;
    finish("bus", buses)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct IdSet(FxHashSet<u32>);

impl IdSet {
    fn insert(&mut self, row: &Row, id: u32) -> ImportResult<()> {
        if !self.0.insert(id) {
            return Err(ImportError::DuplicateId { row: row.line, id });
        }
        Ok(())
    }
}

fn finish<T>(what: &'static str, records: Vec<T>) -> ImportResult<Vec<T>> {
    if records.is_empty() {
        return Err(ImportError::NoRecords(what));
    }
    debug!(count = records.len(), "imported {what} records");
    Ok(records)
}
