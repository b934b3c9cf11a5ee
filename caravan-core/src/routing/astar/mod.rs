//! Time-aware A* over the working road graph.
//!
//! Edge cost is free-flow travel time plus the estimated conflict delay
//! against the fleet's reservations, so the search naturally steers around
//! contested segments when a detour is cheaper than waiting.

mod state;

use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;

use self::state::OpenEntry;
use super::conflict::{VehicleProfile, estimate_conflict_delay};
use super::fleet::TimedNode;
use super::reservations::ReservationTable;
use crate::Seconds;
use crate::error::Error;
use crate::loading::PlannerConfig;
use crate::model::RoadGraph;
use crate::spatial;

/// Plans a single vehicle from `start` to `goal`, departing at `start_time`.
///
/// Returns the timed path, every node stamped with the absolute time the
/// vehicle front reaches it. Conflict delays are folded into those stamps as
/// though the vehicle waited at the upstream node.
///
/// # Errors
///
/// [`Error::InvalidSpeed`] for a non-positive speed, [`Error::BudgetExceeded`]
/// when the configured expansion cap runs out, and [`Error::Unreachable`]
/// when the open set drains before the goal is popped.
pub fn find_timed_path(
    graph: &RoadGraph,
    reservations: &ReservationTable,
    vehicle: &VehicleProfile<'_>,
    start: NodeIndex,
    goal: NodeIndex,
    start_time: Seconds,
    config: &PlannerConfig,
) -> Result<Vec<TimedNode>, Error> {
    if vehicle.speed <= 0.0 {
        return Err(Error::InvalidSpeed(vehicle.speed));
    }

    let goal_point = graph.point_at(goal);
    let heuristic = |node: NodeIndex| {
        spatial::haversine_distance(config.earth_radius_meters, graph.point_at(node), goal_point)
            / vehicle.speed
    };

    let estimated_nodes = graph.node_count().min(1024);
    let mut best_g: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    best_g.insert(start, 0.0);
    heap.push(OpenEntry {
        f: heuristic(start),
        g: 0.0,
        node: start,
    });

    let mut expansions = 0usize;

    while let Some(OpenEntry { g, node, .. }) = heap.pop() {
        if node == goal {
            return Ok(reconstruct(graph, &parents, &best_g, start, goal, start_time));
        }

        // Skip entries superseded by a better path.
        if best_g.get(&node).is_some_and(|&best| g > best) {
            continue;
        }

        expansions += 1;
        if let Some(limit) = config.search_expansion_limit {
            if expansions > limit {
                return Err(Error::BudgetExceeded(limit));
            }
        }

        let depart = start_time + g;
        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let meters = edge.weight().meters;
            let travel = meters / vehicle.speed;
            let penalty = estimate_conflict_delay(
                graph,
                reservations,
                vehicle,
                node,
                next,
                meters,
                depart,
                depart + travel,
                config,
            );
            let next_g = g + travel + penalty;

            match best_g.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_g);
                    parents.insert(next, node);
                    heap.push(OpenEntry {
                        f: next_g + heuristic(next),
                        g: next_g,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_g < *entry.get() {
                        *entry.get_mut() = next_g;
                        parents.insert(next, node);
                        heap.push(OpenEntry {
                            f: next_g + heuristic(next),
                            g: next_g,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    Err(Error::Unreachable)
}

/// Walks the parent map backward from the goal and stamps each node with
/// its absolute arrival time.
fn reconstruct(
    graph: &RoadGraph,
    parents: &HashMap<NodeIndex, NodeIndex>,
    best_g: &HashMap<NodeIndex, f64>,
    start: NodeIndex,
    goal: NodeIndex,
    start_time: Seconds,
) -> Vec<TimedNode> {
    let mut order = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&previous) => {
                order.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    order.reverse();

    order
        .into_iter()
        .map(|index| TimedNode {
            key: graph.key_at(index),
            position: graph.point_at(index),
            time: start_time + best_g[&index],
        })
        .collect()
}
