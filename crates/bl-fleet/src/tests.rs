//! Unit tests for bl-fleet.

use bl_core::{BusId, PassengerId, SimTime, StopId};
use bl_route::{RouteTopology, Stop};

use crate::{Bus, BusFleet, BusStatus, Passenger, PassengerPool, PassengerStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(s: &str) -> SimTime {
    SimTime::parse_hms(s).unwrap()
}

fn pax(id: u32, arrival: &str, from: u32, to: u32) -> Passenger {
    Passenger::new(PassengerId(id), t(arrival), StopId(from), StopId(to))
}

#[cfg(test)]
mod pool {
    use super::*;

    #[test]
    fn admission_is_windowed() {
        let mut pool = PassengerPool::new(vec![
            pax(1, "07:01:00", 1, 2),
            pax(2, "07:00:00", 1, 2),
            pax(3, "07:05:00", 2, 3),
        ])
        .unwrap();

        assert_eq!(pool.next_arrival(), Some(t("07:00:00")));
        assert_eq!(pool.admit_due(t("07:01:00")), [PassengerId(2), PassengerId(1)]);
        // Nothing new in the same window.
        assert!(pool.admit_due(t("07:01:00")).is_empty());
        assert_eq!(pool.next_arrival(), Some(t("07:05:00")));
        assert_eq!(pool.waiting_len(), 2);
        assert_eq!(pool.count_with(PassengerStatus::Absent), 1);
    }

    #[test]
    fn waiting_rank_counts_per_stop() {
        let mut pool = PassengerPool::new(vec![
            pax(1, "07:00:00", 1, 2),
            pax(2, "07:00:00", 2, 3),
            pax(3, "07:00:10", 1, 3),
        ])
        .unwrap();
        pool.admit_due(t("07:00:10"));
        let rank = |id| pool.get(PassengerId(id)).and_then(|p| p.waiting_rank);
        assert_eq!(rank(1), Some(1));
        assert_eq!(rank(2), Some(1));
        assert_eq!(rank(3), Some(2));
    }

    #[test]
    fn waiting_order_is_fcfs_with_manifest_tiebreak() {
        let mut pool = PassengerPool::new(vec![
            pax(10, "07:02:00", 1, 2),
            pax(11, "07:01:00", 1, 2),
            pax(12, "07:01:00", 1, 2),
        ])
        .unwrap();
        pool.admit_due(t("07:02:00"));
        let order: Vec<_> = pool.waiting_at(StopId(1)).map(|p| p.id.0).collect();
        assert_eq!(order, [11, 12, 10]);
    }

    #[test]
    fn board_and_alight() {
        let mut pool = PassengerPool::new(vec![pax(1, "07:00:00", 1, 2), pax(2, "07:00:00", 1, 2)]).unwrap();
        pool.admit_due(t("07:00:00"));

        let boarded = pool.board(&[PassengerId(1), PassengerId(99)], BusId(5), t("07:03:00"));
        assert_eq!(boarded, 1);
        assert_eq!(pool.waiting_len(), 1);
        let p = pool.get(PassengerId(1)).unwrap();
        assert_eq!(p.status, PassengerStatus::OnBus);
        assert_eq!(p.bus, Some(BusId(5)));
        assert_eq!(p.wait_secs(t("08:00:00")), Some(180));

        assert!(pool.alight(PassengerId(1), t("07:07:00")));
        assert!(!pool.alight(PassengerId(1), t("07:08:00")), "arrived is terminal");
        assert!(!pool.alight(PassengerId(2), t("07:08:00")), "still waiting");
        let p = pool.get(PassengerId(1)).unwrap();
        assert_eq!(p.status, PassengerStatus::Arrived);
        assert_eq!(p.travel_secs(), Some(240));
    }

    #[test]
    fn reset_clears_progress() {
        let mut pool = PassengerPool::new(vec![pax(1, "07:00:00", 1, 2)]).unwrap();
        pool.admit_due(t("07:00:00"));
        pool.board(&[PassengerId(1)], BusId(1), t("07:00:30"));
        pool.reset();
        let p = pool.get(PassengerId(1)).unwrap();
        assert_eq!(p.status, PassengerStatus::Absent);
        assert_eq!(p.boarded_time, None);
        assert_eq!(pool.waiting_len(), 0);
        assert_eq!(pool.next_arrival(), Some(t("07:00:00")));
    }

    #[test]
    fn duplicate_ids_rejected() {
        assert!(PassengerPool::new(vec![pax(1, "07:00:00", 1, 2), pax(1, "07:01:00", 2, 3)]).is_err());
    }

    #[test]
    fn still_waiting_wait_runs_to_until() {
        let mut pool = PassengerPool::new(vec![pax(1, "07:00:00", 1, 2)]).unwrap();
        assert_eq!(pool.get(PassengerId(1)).unwrap().wait_secs(t("08:00:00")), None);
        pool.admit_due(t("07:00:00"));
        assert_eq!(pool.get(PassengerId(1)).unwrap().wait_secs(t("08:00:00")), Some(3600));
    }
}

#[cfg(test)]
mod bus {
    use super::*;

    fn bus() -> Bus {
        Bus::new(BusId(1), 4, t("07:00:00"), StopId(0))
    }

    #[test]
    fn arrive_then_depart_cycle() {
        let mut b = bus();
        assert!(b.depart(StopId(0), Some(StopId(1)), t("07:00:00")));
        assert_eq!(b.trip.status, BusStatus::Moving);
        assert!(b.arrive(StopId(1), Some(StopId(2)), t("07:04:00")));
        assert_eq!(b.trip.status, BusStatus::Waiting);
        assert_eq!(b.trip.current_stop, Some(StopId(1)));
        assert!(b.depart(StopId(1), None, t("07:04:01")));
        assert!(b.is_completed());
        assert_eq!(b.trip_secs(), Some(241));
    }

    #[test]
    fn repeated_events_are_ignored() {
        let mut b = bus();
        assert!(b.arrive(StopId(1), Some(StopId(2)), t("07:04:00")));
        let snapshot = b.clone();
        assert!(!b.arrive(StopId(1), Some(StopId(2)), t("07:04:00")));
        assert_eq!(b, snapshot);

        assert!(b.depart(StopId(1), Some(StopId(2)), t("07:04:01")));
        let snapshot = b.clone();
        assert!(!b.depart(StopId(1), Some(StopId(2)), t("07:04:01")));
        assert_eq!(b, snapshot);
    }

    #[test]
    fn older_events_are_ignored_after_moving_on() {
        let mut b = Bus::new(BusId(1), 4, t("07:00:00"), StopId(0));
        assert!(b.depart(StopId(0), Some(StopId(1)), t("07:00:00")));
        assert!(b.arrive(StopId(1), Some(StopId(2)), t("07:04:00")));
        assert!(b.depart(StopId(1), Some(StopId(2)), t("07:04:01")));
        assert!(b.arrive(StopId(2), Some(StopId(3)), t("07:08:01")));
        let snapshot = b.clone();

        assert!(!b.arrive(StopId(1), Some(StopId(2)), t("07:04:00")));
        assert!(!b.depart(StopId(1), Some(StopId(2)), t("07:04:01")));
        assert!(!b.depart(StopId(0), Some(StopId(1)), t("07:00:00")));
        assert_eq!(b, snapshot);
        assert_eq!(b.trip.current_stop, Some(StopId(2)));
    }

    #[test]
    fn completed_is_absorbing() {
        let mut b = bus();
        b.depart(StopId(0), None, t("07:00:00"));
        assert!(!b.arrive(StopId(1), None, t("07:01:00")));
        assert!(!b.depart(StopId(1), Some(StopId(2)), t("07:02:00")));
        assert_eq!(b.trip.completion_time, Some(t("07:00:00")));
    }

    #[test]
    fn occupancy_max_is_monotonic() {
        let mut b = bus();
        b.take_on(&[PassengerId(1), PassengerId(2), PassengerId(3)]);
        assert_eq!(b.trip.max_occupancy_pct, 75.0);
        let left = b.drop_off(|id| id != PassengerId(2));
        assert_eq!(left, [PassengerId(1), PassengerId(3)]);
        b.take_on(&[]);
        assert_eq!(b.occupancy_pct(), 25.0);
        assert_eq!(b.trip.max_occupancy_pct, 75.0);
        assert_eq!(b.seats_free(), 3);
        assert_eq!(b.trip.total_boarded, 3);
    }
}

#[cfg(test)]
mod fleet {
    use super::*;

    #[test]
    fn reset_positions_at_start() {
        let topo = RouteTopology::new(vec![
            Stop::new(StopId(0), "Depot", 0, Some(60)),
            Stop::new(StopId(1), "A", 1, Some(60)),
            Stop::new(StopId(2), "B", 2, None),
        ])
        .unwrap();
        let mut fleet = BusFleet::new(vec![
            Bus::new(BusId(1), 3, t("07:00:00"), StopId(0)),
            Bus::new(BusId(2), 3, t("07:15:00"), StopId(1)).with_destination(StopId(1)),
        ])
        .unwrap();
        fleet.get_mut(BusId(1)).unwrap().depart(StopId(0), None, t("07:00:00"));
        fleet.reset(&topo);

        let b1 = fleet.get(BusId(1)).unwrap();
        assert_eq!(b1.trip.status, BusStatus::Waiting);
        assert_eq!(b1.trip.next_stop, Some(StopId(1)));
        let b2 = fleet.get(BusId(2)).unwrap();
        assert_eq!(b2.trip.next_stop, None, "already at its destination");
        assert_eq!(fleet.max_id(), Some(BusId(2)));
    }

    #[test]
    fn duplicate_bus_rejected() {
        let mut fleet = BusFleet::new(vec![Bus::new(BusId(1), 3, t("07:00:00"), StopId(0))]).unwrap();
        assert!(fleet.push(Bus::new(BusId(1), 3, t("07:15:00"), StopId(0))).is_err());
        assert_eq!(fleet.len(), 1);
    }
}
