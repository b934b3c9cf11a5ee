//! Geodesic and planar primitives for the road plane.
//!
//! Distances are great-circle; projection and intersection treat (lng, lat)
//! as Euclidean. Drawn roads span at most a few hundred meters, so the
//! planar distortion stays below the tolerance used to accept intersections.

use geo::Point;

/// Denominator threshold below which two segments count as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Great-circle (Haversine) distance in meters between two points.
///
/// `radius` is the sphere radius in meters. Symmetric, and zero for
/// identical points.
pub fn haversine_distance(radius: f64, p: Point<f64>, q: Point<f64>) -> f64 {
    let phi1 = p.y().to_radians();
    let phi2 = q.y().to_radians();
    let delta_phi = (q.y() - p.y()).to_radians();
    let delta_lambda = (q.x() - p.x()).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * radius * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Parameter of `c`'s perpendicular foot along the segment from `a` to `b`,
/// in the lng/lat plane. Not clamped: values outside [0, 1] fall beyond the
/// segment ends. Zero for a degenerate segment.
pub fn segment_parameter(a: Point<f64>, b: Point<f64>, c: Point<f64>) -> f64 {
    let ab_x = b.x() - a.x();
    let ab_y = b.y() - a.y();
    let length_sq = ab_x * ab_x + ab_y * ab_y;
    if length_sq == 0.0 {
        return 0.0;
    }
    ((c.x() - a.x()) * ab_x + (c.y() - a.y()) * ab_y) / length_sq
}

/// Nearest point to `c` on the segment from `a` to `b`, in the lng/lat plane.
///
/// The parameter is clamped to [0, 1], so the result always lies on the
/// segment. A degenerate segment (`a == b`) projects onto `a`.
pub fn project_onto_segment(a: Point<f64>, b: Point<f64>, c: Point<f64>) -> Point<f64> {
    let t = segment_parameter(a, b, c).clamp(0.0, 1.0);
    Point::new(
        a.x() + t * (b.x() - a.x()),
        a.y() + t * (b.y() - a.y()),
    )
}

/// Parametric intersection of segments (a, b) and (c, d) in the lng/lat plane.
///
/// `epsilon` widens the accepted parameter range to [-epsilon, 1 + epsilon]
/// on both segments, admitting intersections that touch segment endpoints.
/// Parallel and out-of-range pairs return `None`.
pub fn segment_intersection(
    a: Point<f64>,
    b: Point<f64>,
    c: Point<f64>,
    d: Point<f64>,
    epsilon: f64,
) -> Option<Point<f64>> {
    let s1_x = b.x() - a.x();
    let s1_y = b.y() - a.y();
    let s2_x = d.x() - c.x();
    let s2_y = d.y() - c.y();

    let denominator = -s2_x * s1_y + s1_x * s2_y;
    if denominator.abs() < PARALLEL_EPSILON {
        return None;
    }

    let s = (-s1_y * (a.x() - c.x()) + s1_x * (a.y() - c.y())) / denominator;
    let t = (s2_x * (a.y() - c.y()) - s2_y * (a.x() - c.x())) / denominator;

    let low = -epsilon;
    let high = 1.0 + epsilon;
    if s < low || s > high || t < low || t > high {
        return None;
    }

    Some(Point::new(a.x() + t * s1_x, a.y() + t * s1_y))
}

/// Coordinate equality with an absolute per-axis tolerance.
pub fn points_equal(p: Point<f64>, q: Point<f64>, tolerance: f64) -> bool {
    (p.y() - q.y()).abs() < tolerance && (p.x() - q.x()).abs() < tolerance
}
