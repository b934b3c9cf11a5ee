use geo::Point;
use log::{debug, info};

use super::config::PlannerConfig;
use crate::model::{RoadFeature, RoadGraph};
use crate::spatial;

/// A normalized road centerline: deduplicated vertices, loop flag.
struct Polyline {
    points: Vec<Point<f64>>,
    closed: bool,
}

impl Polyline {
    /// Consecutive vertex pairs, including the wrap-around pair for loops.
    fn segments(&self) -> Vec<(Point<f64>, Point<f64>)> {
        let mut segments: Vec<(Point<f64>, Point<f64>)> = self
            .points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        if self.closed {
            segments.push((self.points[self.points.len() - 1], self.points[0]));
        }
        segments
    }
}

/// One discovered segment crossing, remembered with both host segments so
/// the split phase can find the edges it has to cut.
struct Crossing {
    point: Point<f64>,
    segments: [(Point<f64>, Point<f64>); 2],
}

/// Builds the base road graph from the editor's feature snapshot.
///
/// Blocked and non-road features are ignored. Every pairwise polyline
/// intersection (self-intersections included) is materialized as a graph
/// node, so no two edges of the result cross except at a shared endpoint.
pub fn build_road_graph(features: &[RoadFeature], config: &PlannerConfig) -> RoadGraph {
    let polylines = normalize_features(features, config);
    info!(
        "Building road graph from {} routable polylines ({} features)",
        polylines.len(),
        features.len()
    );

    let mut graph = RoadGraph::new(config.earth_radius_meters, config.node_key_decimal_digits);
    seed_edges(&mut graph, &polylines);

    let crossings = discover_intersections(&polylines, config);
    debug!("{} segment crossings discovered", crossings.len());
    materialize_splits(&mut graph, &crossings, config);

    info!(
        "Road graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Drops consecutive duplicate vertices, discards degenerate polylines, and
/// detects loops (coincident terminals), dropping the duplicate terminal.
fn normalize_features(features: &[RoadFeature], config: &PlannerConfig) -> Vec<Polyline> {
    let tolerance = config.coordinate_equality_tolerance;

    features
        .iter()
        .filter(|feature| feature.is_routable())
        .filter_map(|feature| feature.geometry.as_deref())
        .filter_map(|line| {
            let mut points: Vec<Point<f64>> = Vec::with_capacity(line.len());
            for &point in line {
                let duplicate = points
                    .last()
                    .is_some_and(|&previous| spatial::points_equal(previous, point, tolerance));
                if !duplicate {
                    points.push(point);
                }
            }

            if points.len() < 2 {
                return None;
            }

            let mut closed = false;
            if points.len() >= 3 && spatial::points_equal(points[0], points[points.len() - 1], tolerance)
            {
                points.pop();
                closed = true;
            }

            Some(Polyline { points, closed })
        })
        .collect()
}

/// Adds one undirected edge per consecutive vertex pair, plus the
/// wrap-around edge for loops.
fn seed_edges(graph: &mut RoadGraph, polylines: &[Polyline]) {
    for line in polylines {
        let indices: Vec<_> = line
            .points
            .iter()
            .map(|&point| graph.ensure_node(point))
            .collect();
        for pair in indices.windows(2) {
            graph.connect(pair[0], pair[1]);
        }
        if line.closed {
            graph.connect(indices[indices.len() - 1], indices[0]);
        }
    }
}

/// Tests every segment pair across every ordered polyline pair (self-pairs
/// included) and records the crossings in collection order.
fn discover_intersections(polylines: &[Polyline], config: &PlannerConfig) -> Vec<Crossing> {
    let mut crossings = Vec::new();
    for i in 0..polylines.len() {
        for j in i..polylines.len() {
            collect_crossings(polylines, i, j, config, &mut crossings);
        }
    }
    crossings
}

fn collect_crossings(
    polylines: &[Polyline],
    i: usize,
    j: usize,
    config: &PlannerConfig,
    out: &mut Vec<Crossing>,
) {
    let first = &polylines[i];
    let second = &polylines[j];
    let same_line = i == j;

    let first_segments = first.segments();
    let second_segments = second.segments();

    for (si, &(a1, a2)) in first_segments.iter().enumerate() {
        let start = if same_line { si + 1 } else { 0 };
        for (sj, &(b1, b2)) in second_segments.iter().enumerate().skip(start) {
            if same_line {
                // Adjacent segments share a vertex, not a crossing.
                if sj == si + 1 {
                    continue;
                }
                if first.closed && si == 0 && sj == first_segments.len() - 1 {
                    continue;
                }
            }

            let Some(point) =
                spatial::segment_intersection(a1, a2, b1, b2, config.intersection_epsilon)
            else {
                continue;
            };

            let point = snap_to_vertex(point, polylines, config.coordinate_equality_tolerance);
            out.push(Crossing {
                point,
                segments: [(a1, a2), (b1, b2)],
            });
        }
    }
}

/// Snaps an intersection point onto the first vertex of any normalized
/// polyline within the equality tolerance, so coincident points share a
/// node key. The tolerance is coarser than the node-key grid, so a crossing
/// left unsnapped could land on a different key than the vertex it touches.
fn snap_to_vertex(point: Point<f64>, polylines: &[Polyline], tolerance: f64) -> Point<f64> {
    for line in polylines {
        for &vertex in &line.points {
            if spatial::points_equal(point, vertex, tolerance) {
                return vertex;
            }
        }
    }
    point
}

/// Turns each recorded crossing into a graph node and cuts every host edge
/// at its crossings.
///
/// Split points are grouped per host segment and applied nearest-to-start
/// first, so a segment crossed several times ends up as a chain through all
/// of its crossings and the result does not depend on discovery order.
fn materialize_splits(graph: &mut RoadGraph, crossings: &[Crossing], config: &PlannerConfig) {
    let tolerance = config.coordinate_equality_tolerance;

    let mut hosts: Vec<((Point<f64>, Point<f64>), Vec<Point<f64>>)> = Vec::new();
    for crossing in crossings {
        graph.ensure_node(crossing.point);

        for &(a, b) in &crossing.segments {
            // A crossing on a segment endpoint needs no split there.
            if spatial::points_equal(crossing.point, a, tolerance)
                || spatial::points_equal(crossing.point, b, tolerance)
            {
                continue;
            }

            let entry = hosts.iter_mut().find(|((ha, hb), _)| {
                (spatial::points_equal(*ha, a, tolerance)
                    && spatial::points_equal(*hb, b, tolerance))
                    || (spatial::points_equal(*ha, b, tolerance)
                        && spatial::points_equal(*hb, a, tolerance))
            });
            match entry {
                Some((_, points)) => points.push(crossing.point),
                None => hosts.push(((a, b), vec![crossing.point])),
            }
        }
    }

    for ((a, b), mut points) in hosts {
        let (Some(ia), Some(ib)) = (graph.node_at_point(a), graph.node_at_point(b)) else {
            continue;
        };
        if !graph.has_edge(ia, ib) {
            continue;
        }

        points.sort_by(|x, y| {
            spatial::segment_parameter(a, b, *x).total_cmp(&spatial::segment_parameter(a, b, *y))
        });

        graph.disconnect(ia, ib);
        let mut previous = ia;
        for point in points {
            let next = graph.ensure_node(point);
            graph.connect(previous, next);
            previous = next;
        }
        graph.connect(previous, ib);
    }
}
