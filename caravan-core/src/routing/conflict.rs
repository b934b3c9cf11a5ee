//! Delay estimation against the fleet's existing reservations.

use petgraph::stable_graph::NodeIndex;

use crate::Seconds;
use crate::loading::PlannerConfig;
use crate::model::RoadGraph;
use super::reservations::ReservationTable;

/// The vehicle being planned, as the estimator sees it.
#[derive(Debug, Clone, Copy)]
pub struct VehicleProfile<'a> {
    pub id: &'a str,
    /// Cruise speed in m/s, already resolved against the config defaults.
    pub speed: f64,
    /// Vehicle length in meters.
    pub length: f64,
}

/// Estimates the delay for traversing the edge `from -> to`, departing
/// `from` at `depart` and (absent any wait) reaching `to` at `arrive`.
///
/// Returns zero when the traversal is conflict-free. Otherwise the longest
/// wait needed to clear every overlapping reservation, plus the flat
/// inconvenience surcharge, plus the scaled head-on surcharge when an
/// opposing traversal forces the wait. The vehicle's own reservations never
/// conflict with it.
#[allow(clippy::too_many_arguments)]
pub fn estimate_conflict_delay(
    graph: &RoadGraph,
    reservations: &ReservationTable,
    vehicle: &VehicleProfile<'_>,
    from: NodeIndex,
    to: NodeIndex,
    edge_meters: f64,
    depart: Seconds,
    arrive: Seconds,
    config: &PlannerConfig,
) -> Seconds {
    let from_key = graph.key_at(from);
    let to_key = graph.key_at(to);

    let mut max_wait: f64 = 0.0;

    // Full occupation of the segment: front entering `from` until the tail
    // clears `to`.
    let enter = depart;
    let exit = depart + (edge_meters + vehicle.length) / vehicle.speed;

    for occupation in reservations.segment_reservations(from_key, to_key) {
        if occupation.vehicle == vehicle.id {
            continue;
        }
        if occupation.exit <= enter || occupation.enter >= exit {
            continue;
        }

        let mut wait = (occupation.exit - enter).max(0.0);
        // An opposing traversal that forces any wait makes the edge
        // effectively forbidden.
        if wait > 0.0 && occupation.from == to_key && occupation.to == from_key {
            wait += config.head_on_penalty_seconds / 1000.0;
        }
        max_wait = max_wait.max(wait);
    }

    // Occupation window at the destination node.
    let clear_until = arrive + config.node_clearance_seconds;
    for occupation in reservations.node_reservations(to_key) {
        if occupation.vehicle == vehicle.id {
            continue;
        }
        if occupation.exit <= arrive || occupation.enter >= clear_until {
            continue;
        }
        max_wait = max_wait.max((occupation.exit - arrive).max(0.0));
    }

    if max_wait > 0.0 {
        max_wait + config.inconvenience_penalty_seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::reservations::{NodeOccupation, SegmentOccupation};
    use geo::Point;

    fn setup() -> (RoadGraph, NodeIndex, NodeIndex, f64) {
        let mut graph = RoadGraph::new(6_371_000.0, 8);
        let a = graph.ensure_node(Point::new(0.0, 0.0));
        let b = graph.ensure_node(Point::new(0.001, 0.0));
        graph.connect(a, b);
        let meters = graph.edge_meters(a, b).unwrap();
        (graph, a, b, meters)
    }

    fn vehicle(id: &str) -> VehicleProfile<'_> {
        VehicleProfile {
            id,
            speed: 10.0,
            length: 5.0,
        }
    }

    #[test]
    fn empty_table_costs_nothing() {
        let (graph, a, b, meters) = setup();
        let table = ReservationTable::new();
        let config = PlannerConfig::default();
        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v1"),
            a,
            b,
            meters,
            0.0,
            meters / 10.0,
            &config,
        );
        assert_eq!(delay, 0.0);
    }

    #[test]
    fn same_direction_overlap_waits_out_the_leader() {
        let (graph, a, b, meters) = setup();
        let config = PlannerConfig::default();
        let mut table = ReservationTable::new();
        table.reserve_segment(SegmentOccupation {
            vehicle: "leader".into(),
            from: graph.key_at(a),
            to: graph.key_at(b),
            enter: 0.0,
            exit: 12.0,
        });

        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v2"),
            a,
            b,
            meters,
            0.0,
            meters / 10.0,
            &config,
        );
        // Wait until the leader's tail clears, plus the flat surcharge.
        assert!((delay - (12.0 + config.inconvenience_penalty_seconds)).abs() < 1e-9);
    }

    #[test]
    fn head_on_overlap_is_effectively_forbidden() {
        let (graph, a, b, meters) = setup();
        let config = PlannerConfig::default();
        let mut table = ReservationTable::new();
        table.reserve_segment(SegmentOccupation {
            vehicle: "oncoming".into(),
            from: graph.key_at(b),
            to: graph.key_at(a),
            enter: 0.0,
            exit: 12.0,
        });

        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v2"),
            a,
            b,
            meters,
            0.0,
            meters / 10.0,
            &config,
        );
        assert!(delay >= config.head_on_penalty_seconds / 1000.0);
    }

    #[test]
    fn own_reservations_are_ignored() {
        let (graph, a, b, meters) = setup();
        let config = PlannerConfig::default();
        let mut table = ReservationTable::new();
        table.reserve_segment(SegmentOccupation {
            vehicle: "v1".into(),
            from: graph.key_at(a),
            to: graph.key_at(b),
            enter: 0.0,
            exit: 1_000.0,
        });

        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v1"),
            a,
            b,
            meters,
            0.0,
            meters / 10.0,
            &config,
        );
        assert_eq!(delay, 0.0);
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        let (graph, a, b, meters) = setup();
        let config = PlannerConfig::default();
        let mut table = ReservationTable::new();
        table.reserve_segment(SegmentOccupation {
            vehicle: "early".into(),
            from: graph.key_at(a),
            to: graph.key_at(b),
            enter: 0.0,
            exit: 10.0,
        });

        // Departing long after the earlier vehicle cleared.
        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v2"),
            a,
            b,
            meters,
            500.0,
            500.0 + meters / 10.0,
            &config,
        );
        assert_eq!(delay, 0.0);
    }

    #[test]
    fn node_window_overlap_defers_arrival() {
        let (graph, a, b, meters) = setup();
        let config = PlannerConfig::default();
        let arrive = meters / 10.0;

        let mut table = ReservationTable::new();
        table.reserve_node(NodeOccupation {
            vehicle: "holder".into(),
            node: graph.key_at(b),
            enter: arrive - 1.0,
            exit: arrive + 6.0,
        });

        let delay = estimate_conflict_delay(
            &graph,
            &table,
            &vehicle("v2"),
            a,
            b,
            meters,
            0.0,
            arrive,
            &config,
        );
        assert!((delay - (6.0 + config.inconvenience_penalty_seconds)).abs() < 1e-9);
    }
}
