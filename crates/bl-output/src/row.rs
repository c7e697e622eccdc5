//! Plain data rows written by report backends, and the [`Report`] that
//! derives them from a finished run.
//!
//! Durations are computed in whole seconds and reported as fractional
//! minutes.

use bl_core::SimTime;
use bl_fleet::{Passenger, PassengerStatus};
use bl_sim::SimView;

/// Per-stop totals over the passengers boarding there.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSummaryRow {
    pub stop_id:          u32,
    pub name:             String,
    pub order:            u32,
    pub route:            String,
    pub total_passengers: u32,
    pub waiting:          u32,
    pub on_bus:           u32,
    pub arrived:          u32,
    pub avg_wait_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassengerDetailRow {
    pub passenger_id:   u32,
    pub arrival_time:   SimTime,
    pub boarding_stop:  String,
    pub alighting_stop: String,
    pub bus_id:         Option<u32>,
    pub status:         PassengerStatus,
    pub boarded_time:   Option<SimTime>,
    pub arrived_time:   Option<SimTime>,
    /// Measured to the end of the run for passengers still waiting.
    pub wait_minutes:   Option<f64>,
    pub travel_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusDetailRow {
    pub bus_id:        u32,
    pub capacity:      u32,
    pub route:         String,
    pub start_time:    SimTime,
    pub start_stop:    String,
    pub current_stop:  Option<String>,
    pub next_stop:     Option<String>,
    pub status:        String,
    pub total_carried: u32,
    pub load:          u32,
    /// Peak occupancy for completed buses, current occupancy otherwise.
    pub occupancy_pct: f64,
    pub trip_minutes:  Option<f64>,
    pub is_extra:      bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub time:      SimTime,
    pub stop_id:   u32,
    pub stop_name: String,
    pub waiting:   u32,
    pub boarded:   u32,
    pub alighted:  u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub time:    SimTime,
    pub message: String,
}

/// Run-level indicators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KpiSummary {
    pub total_passengers:    u32,
    pub arrived_passengers:  u32,
    pub completion_rate_pct: f64,
    pub avg_wait_minutes:    f64,
    pub avg_travel_minutes:  f64,
    pub total_buses:         u32,
    pub completed_buses:     u32,
    pub avg_trip_minutes:    f64,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Every report table for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub stops:      Vec<StopSummaryRow>,
    pub passengers: Vec<PassengerDetailRow>,
    pub buses:      Vec<BusDetailRow>,
    pub history:    Vec<HistoryRow>,
    pub log:        Vec<LogRow>,
    pub kpis:       KpiSummary,
}

impl Report {
    /// Build all tables from the engine's current state.  Waits of
    /// passengers still waiting run to the view's clock.
    pub fn from_view(view: &SimView<'_>) -> Self {
        let now = view.clock.now;
        let topo = view.topology;
        let manifest = view.passengers.passengers();

        let stops = topo
            .stops()
            .iter()
            .map(|stop| {
                let here: Vec<&Passenger> =
                    manifest.iter().filter(|p| p.boarding_stop == stop.id).collect();
                let count = |status: PassengerStatus| here.iter().filter(|p| p.status == status).count() as u32;
                StopSummaryRow {
                    stop_id:          stop.id.0,
                    name:             stop.name.clone(),
                    order:            stop.order,
                    route:            stop.route.to_string(),
                    total_passengers: here.len() as u32,
                    waiting:          count(PassengerStatus::Waiting),
                    on_bus:           count(PassengerStatus::OnBus),
                    arrived:          count(PassengerStatus::Arrived),
                    avg_wait_minutes: mean(here.iter().filter_map(|p| p.wait_secs(now)).map(minutes)),
                }
            })
            .collect();

        let passengers = manifest
            .iter()
            .map(|p| PassengerDetailRow {
                passenger_id:   p.id.0,
                arrival_time:   p.arrival_time,
                boarding_stop:  topo.name_of(p.boarding_stop),
                alighting_stop: topo.name_of(p.alighting_stop),
                bus_id:         p.bus.map(|b| b.0),
                status:         p.status,
                boarded_time:   p.boarded_time,
                arrived_time:   p.arrived_time,
                wait_minutes:   p.wait_secs(now).map(minutes),
                travel_minutes: p.travel_secs().map(minutes),
            })
            .collect();

        let buses = view
            .fleet
            .iter()
            .map(|b| BusDetailRow {
                bus_id:        b.id.0,
                capacity:      b.capacity,
                route:         b.route.to_string(),
                start_time:    b.start_time,
                start_stop:    topo.name_of(b.start_stop),
                current_stop:  b.trip.current_stop.map(|s| topo.name_of(s)),
                next_stop:     b.trip.next_stop.map(|s| topo.name_of(s)),
                status:        b.trip.status.to_string(),
                total_carried: b.trip.total_boarded,
                load:          b.load() as u32,
                occupancy_pct: if b.is_completed() { b.trip.max_occupancy_pct } else { b.occupancy_pct() },
                trip_minutes:  b.trip_secs().map(minutes),
                is_extra:      b.is_extra,
            })
            .collect();

        let history = view
            .history
            .entries()
            .iter()
            .map(|e| HistoryRow {
                time:      e.time,
                stop_id:   e.stop.0,
                stop_name: topo.name_of(e.stop),
                waiting:   e.waiting,
                boarded:   e.boarded,
                alighted:  e.alighted,
            })
            .collect();

        let log = view
            .log
            .iter()
            .map(|e| LogRow { time: e.time, message: e.event.render(topo) })
            .collect();

        let total = manifest.len() as u32;
        let arrived = view.passengers.count_with(PassengerStatus::Arrived) as u32;
        let kpis = KpiSummary {
            total_passengers:    total,
            arrived_passengers:  arrived,
            completion_rate_pct: if total == 0 { 0.0 } else { arrived as f64 / total as f64 * 100.0 },
            avg_wait_minutes:    mean(manifest.iter().filter_map(|p| p.wait_secs(now)).map(minutes)),
            avg_travel_minutes:  mean(manifest.iter().filter_map(Passenger::travel_secs).map(minutes)),
            total_buses:         view.fleet.len() as u32,
            completed_buses:     view.fleet.completed_count() as u32,
            avg_trip_minutes:    mean(view.fleet.iter().filter_map(|b| b.trip_secs()).map(minutes)),
        };

        Self { stops, passengers, buses, history, log, kpis }
    }
}

fn minutes(secs: u32) -> f64 {
    secs as f64 / 60.0
}

/// Arithmetic mean, 0 for an empty input.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
