//! Road graph node and edge payloads.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::Meters;

/// Fixed-point node identity: latitude and longitude scaled by the key grid
/// and rounded to the nearest integer.
///
/// Two coordinates that land on the same grid cell are the same node. The
/// derived ordering (latitude first, then longitude) gives segments a
/// canonical endpoint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub lat: i64,
    pub lng: i64,
}

impl NodeKey {
    /// Quantizes a coordinate onto the key grid. `scale` is 10^digits.
    pub fn quantize(point: Point<f64>, scale: f64) -> Self {
        Self {
            lat: (point.y() * scale).round() as i64,
            lng: (point.x() * scale).round() as i64,
        }
    }
}

/// Node payload: its identity key and the exact drawn coordinate.
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub key: NodeKey,
    pub geometry: Point<f64>,
}

/// Edge payload: great-circle length of the segment.
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub meters: Meters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_rounds_to_grid() {
        let scale = 1e8;
        let key = NodeKey::quantize(Point::new(0.000_000_014, -0.000_000_016), scale);
        assert_eq!(key, NodeKey { lat: -2, lng: 1 });
    }

    #[test]
    fn nearby_points_share_a_key() {
        let scale = 1e8;
        let a = NodeKey::quantize(Point::new(0.001, 0.002), scale);
        let b = NodeKey::quantize(Point::new(0.001 + 1e-10, 0.002 - 1e-10), scale);
        assert_eq!(a, b);
    }

    #[test]
    fn ordering_is_latitude_first() {
        let low = NodeKey { lat: 1, lng: 100 };
        let high = NodeKey { lat: 2, lng: -100 };
        assert!(low < high);
    }
}
