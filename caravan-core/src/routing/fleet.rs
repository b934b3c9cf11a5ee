//! Priority-ordered fleet planning over a shared reservation table.

use geo::Point;
use log::{debug, info, warn};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::astar::find_timed_path;
use super::conflict::VehicleProfile;
use super::reservations::{NodeOccupation, ReservationTable, SegmentOccupation};
use crate::error::Error;
use crate::loading::{PlannerConfig, build_road_graph};
use crate::model::{NodeKey, RoadFeature, RoadGraph, VehicleRequest};
use crate::spatial;
use crate::{Meters, Seconds};

/// A path waypoint stamped with the absolute time the vehicle front
/// reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedNode {
    pub key: NodeKey,
    pub position: Point<f64>,
    pub time: Seconds,
}

/// Outcome of planning one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Success,
    FailedNoPath,
}

/// A planned (or failed) route for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub vehicle_id: String,
    pub status: PlanStatus,
    /// Timed waypoints from the projected origin to the projected
    /// destination. Empty on failure.
    pub path: Vec<TimedNode>,
    pub total_time_seconds: Seconds,
    pub total_distance_meters: Meters,
    /// Present on failures; explains why no path was produced.
    pub diagnostic: Option<String>,
}

impl RoutePlan {
    fn failed(vehicle_id: &str, error: &Error) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            status: PlanStatus::FailedNoPath,
            path: Vec::new(),
            total_time_seconds: 0.0,
            total_distance_meters: 0.0,
            diagnostic: Some(error.to_string()),
        }
    }
}

/// A request whose endpoints are already snapped onto the working graph.
struct ProjectedRequest<'a> {
    request: &'a VehicleRequest,
    start: NodeIndex,
    goal: NodeIndex,
}

/// Plans the whole fleet against a fresh graph built from `features`.
///
/// Every origin and destination is projected onto the session's working
/// graph in input order, so later projections see the nodes earlier ones
/// inserted. Requests are then planned one by one in ascending start-time
/// order (stable on ties); each planned path extends the reservation table
/// the following vehicles are costed against.
///
/// One plan is returned per request. Failures never escape as errors; a
/// request that cannot be planned yields a [`PlanStatus::FailedNoPath`] plan
/// carrying a diagnostic.
pub fn plan_all_vehicle_routes(
    features: &[RoadFeature],
    requests: &[VehicleRequest],
    config: &PlannerConfig,
) -> Vec<RoutePlan> {
    let mut graph = build_road_graph(features, config);
    if graph.node_count() == 0 {
        warn!(
            "Road features produced an empty graph; failing all {} requests",
            requests.len()
        );
        return requests
            .iter()
            .map(|request| RoutePlan::failed(&request.id, &Error::EmptyGraph))
            .collect();
    }

    let mut plans = Vec::with_capacity(requests.len());
    let mut queue: Vec<ProjectedRequest<'_>> = Vec::with_capacity(requests.len());

    for request in requests {
        match project_endpoints(&mut graph, request) {
            Ok((start, goal)) => queue.push(ProjectedRequest {
                request,
                start,
                goal,
            }),
            Err(error) => {
                warn!("{}: projection failed: {error}", request.id);
                plans.push(RoutePlan::failed(&request.id, &error));
            }
        }
    }

    // Earlier departures plan first and become obstacles for the rest.
    queue.sort_by(|a, b| a.request.start_time.total_cmp(&b.request.start_time));

    let mut reservations = ReservationTable::new();
    let mut planned = 0usize;

    for entry in &queue {
        let request = entry.request;
        let vehicle = VehicleProfile {
            id: &request.id,
            speed: request.speed_or(config.default_vehicle_speed),
            length: request.length_or(config.default_vehicle_length),
        };

        match find_timed_path(
            &graph,
            &reservations,
            &vehicle,
            entry.start,
            entry.goal,
            request.start_time,
            config,
        ) {
            Ok(path) => {
                reserve_path(&mut reservations, &vehicle, &path, config);
                let plan = success_plan(request, path, config);
                debug!(
                    "{}: planned {} waypoints, {:.1} s",
                    request.id,
                    plan.path.len(),
                    plan.total_time_seconds
                );
                plans.push(plan);
                planned += 1;
            }
            Err(error) => {
                warn!("{}: {error}", request.id);
                plans.push(RoutePlan::failed(&request.id, &error));
            }
        }
    }

    info!("Planned {planned} of {} vehicle routes", requests.len());
    plans
}

fn success_plan(request: &VehicleRequest, path: Vec<TimedNode>, config: &PlannerConfig) -> RoutePlan {
    let total_time_seconds = match (path.first(), path.last()) {
        (Some(first), Some(last)) => last.time - first.time,
        _ => 0.0,
    };
    let total_distance_meters = path
        .windows(2)
        .map(|pair| {
            spatial::haversine_distance(
                config.earth_radius_meters,
                pair[0].position,
                pair[1].position,
            )
        })
        .sum();

    RoutePlan {
        vehicle_id: request.id.clone(),
        status: PlanStatus::Success,
        path,
        total_time_seconds,
        total_distance_meters,
        diagnostic: None,
    }
}

fn project_endpoints(
    graph: &mut RoadGraph,
    request: &VehicleRequest,
) -> Result<(NodeIndex, NodeIndex), Error> {
    let start = project_point(graph, request.origin)?;
    let goal = project_point(graph, request.destination)?;
    Ok((start, goal))
}

fn project_point(graph: &mut RoadGraph, point: Point<f64>) -> Result<NodeIndex, Error> {
    let locus = graph.nearest_locus(point).ok_or(Error::ProjectionFailed {
        lat: point.y(),
        lng: point.x(),
    })?;
    Ok(graph.insert_projection(locus))
}

/// Writes the path's segment and node occupations into the table.
///
/// Each hop reserves its segment plus the window around its upstream node;
/// the final hop also closes out the destination node, so every path node
/// ends up with exactly one occupation window.
fn reserve_path(
    reservations: &mut ReservationTable,
    vehicle: &VehicleProfile<'_>,
    path: &[TimedNode],
    config: &PlannerConfig,
) {
    let half_window = config.node_safety_window_seconds / 2.0;

    for (hop, pair) in path.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        let meters =
            spatial::haversine_distance(config.earth_radius_meters, a.position, b.position);

        reservations.reserve_segment(SegmentOccupation {
            vehicle: vehicle.id.to_string(),
            from: a.key,
            to: b.key,
            enter: a.time,
            exit: a.time + (meters + vehicle.length) / vehicle.speed,
        });
        reservations.reserve_node(NodeOccupation {
            vehicle: vehicle.id.to_string(),
            node: a.key,
            enter: a.time - half_window,
            exit: a.time + config.node_clearance_seconds + half_window,
        });

        if hop == path.len() - 2 {
            reservations.reserve_node(NodeOccupation {
                vehicle: vehicle.id.to_string(),
                node: b.key,
                enter: b.time - half_window,
                exit: b.time + config.node_clearance_seconds + half_window,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Point<f64> {
        Point::new(lng, lat)
    }

    fn request(id: &str, origin: Point<f64>, destination: Point<f64>, start: f64) -> VehicleRequest {
        VehicleRequest {
            id: id.to_string(),
            origin,
            destination,
            speed: Some(10.0),
            length: Some(5.0),
            start_time: start,
        }
    }

    #[test]
    fn empty_feature_set_fails_every_request() {
        let plans = plan_all_vehicle_routes(
            &[],
            &[request("v1", point(0.0, 0.0), point(0.0, 0.001), 0.0)],
            &PlannerConfig::default(),
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].status, PlanStatus::FailedNoPath);
        assert!(plans[0].diagnostic.is_some());
    }

    #[test]
    fn plans_come_back_in_priority_order() {
        let features = vec![RoadFeature::road(
            "road",
            vec![point(0.0, 0.0), point(0.0, 0.002)],
        )];
        let requests = vec![
            request("late", point(0.0, 0.0), point(0.0, 0.002), 500.0),
            request("early", point(0.0, 0.0), point(0.0, 0.002), 0.0),
        ];

        let plans = plan_all_vehicle_routes(&features, &requests, &PlannerConfig::default());
        assert_eq!(plans[0].vehicle_id, "early");
        assert_eq!(plans[1].vehicle_id, "late");
    }

    #[test]
    fn equal_start_times_keep_input_order() {
        let features = vec![RoadFeature::road(
            "road",
            vec![point(0.0, 0.0), point(0.0, 0.002)],
        )];
        let requests = vec![
            request("first", point(0.0, 0.0), point(0.0, 0.002), 10.0),
            request("second", point(0.0, 0.0), point(0.0, 0.002), 10.0),
        ];

        let plans = plan_all_vehicle_routes(&features, &requests, &PlannerConfig::default());
        assert_eq!(plans[0].vehicle_id, "first");
        assert_eq!(plans[1].vehicle_id, "second");
    }

    #[test]
    fn default_speed_and_length_fill_missing_fields() {
        let features = vec![RoadFeature::road(
            "road",
            vec![point(0.0, 0.0), point(0.0, 0.001)],
        )];
        let requests = vec![VehicleRequest {
            id: "v1".to_string(),
            origin: point(0.0, 0.0),
            destination: point(0.0, 0.001),
            speed: None,
            length: None,
            start_time: 0.0,
        }];

        let config = PlannerConfig {
            default_vehicle_speed: 20.0,
            ..PlannerConfig::default()
        };
        let plans = plan_all_vehicle_routes(&features, &requests, &config);
        assert_eq!(plans[0].status, PlanStatus::Success);

        let expected = plans[0].total_distance_meters / 20.0;
        assert!((plans[0].total_time_seconds - expected).abs() < 1e-6);
    }

    #[test]
    fn non_positive_speed_fails_the_request() {
        let features = vec![RoadFeature::road(
            "road",
            vec![point(0.0, 0.0), point(0.0, 0.001)],
        )];
        let mut bad = request("v1", point(0.0, 0.0), point(0.0, 0.001), 0.0);
        bad.speed = Some(0.0);

        let plans = plan_all_vehicle_routes(&features, &[bad], &PlannerConfig::default());
        assert_eq!(plans[0].status, PlanStatus::FailedNoPath);
    }

    #[test]
    fn planning_twice_is_reproducible() {
        let features = vec![
            RoadFeature::road("r1", vec![point(0.0, 0.0), point(0.0, 0.002)]),
            RoadFeature::road("r2", vec![point(-0.0005, 0.001), point(0.0005, 0.001)]),
        ];
        let requests = vec![
            request("v1", point(0.0, 0.0), point(0.0, 0.002), 0.0),
            request("v2", point(-0.0005, 0.001), point(0.0005, 0.001), 5.0),
        ];

        let config = PlannerConfig::default();
        let first = plan_all_vehicle_routes(&features, &requests, &config);
        let second = plan_all_vehicle_routes(&features, &requests, &config);
        assert_eq!(first, second);
    }
}
