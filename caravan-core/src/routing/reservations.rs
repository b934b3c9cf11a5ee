//! Space-time reservation bookkeeping shared across the fleet.

use hashbrown::HashMap;

use crate::Seconds;
use crate::model::NodeKey;

/// Canonical unordered identity of a road segment: the two endpoint keys in
/// ascending order. Direction of travel lives in the occupation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey(NodeKey, NodeKey);

impl SegmentKey {
    pub fn new(a: NodeKey, b: NodeKey) -> Self {
        if b < a { Self(b, a) } else { Self(a, b) }
    }
}

/// One vehicle's reserved traversal of a segment, from the front entering
/// `from` until the tail clears `to`.
#[derive(Debug, Clone)]
pub struct SegmentOccupation {
    pub vehicle: String,
    pub from: NodeKey,
    pub to: NodeKey,
    pub enter: Seconds,
    pub exit: Seconds,
}

/// One vehicle's occupation window around a node visit, safety buffer
/// included.
#[derive(Debug, Clone)]
pub struct NodeOccupation {
    pub vehicle: String,
    pub node: NodeKey,
    pub enter: Seconds,
    pub exit: Seconds,
}

/// Append-only space-time index over segment and node occupations.
///
/// There is no removal and no time index; readers scan the per-key lists
/// linearly, which stays cheap because each key sees few reservations.
#[derive(Debug, Default)]
pub struct ReservationTable {
    segments: HashMap<SegmentKey, Vec<SegmentOccupation>>,
    nodes: HashMap<NodeKey, Vec<NodeOccupation>>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve_segment(&mut self, occupation: SegmentOccupation) {
        let key = SegmentKey::new(occupation.from, occupation.to);
        self.segments.entry(key).or_default().push(occupation);
    }

    pub fn reserve_node(&mut self, occupation: NodeOccupation) {
        self.nodes.entry(occupation.node).or_default().push(occupation);
    }

    /// Reservations touching the undirected segment {a, b}, in insertion
    /// order.
    pub fn segment_reservations(&self, a: NodeKey, b: NodeKey) -> &[SegmentOccupation] {
        self.segments
            .get(&SegmentKey::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reservations touching the given node, in insertion order.
    pub fn node_reservations(&self, node: NodeKey) -> &[NodeOccupation] {
        self.nodes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(lat: i64, lng: i64) -> NodeKey {
        NodeKey { lat, lng }
    }

    #[test]
    fn segment_key_ignores_direction() {
        let a = key(0, 0);
        let b = key(0, 100);
        assert_eq!(SegmentKey::new(a, b), SegmentKey::new(b, a));
    }

    #[test]
    fn queries_see_both_directions() {
        let mut table = ReservationTable::new();
        let a = key(0, 0);
        let b = key(0, 100);
        table.reserve_segment(SegmentOccupation {
            vehicle: "v1".into(),
            from: b,
            to: a,
            enter: 0.0,
            exit: 10.0,
        });

        let found = table.segment_reservations(a, b);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].from, b);
        assert_eq!(found[0].to, a);
    }

    #[test]
    fn node_reservations_accumulate_in_order() {
        let mut table = ReservationTable::new();
        let n = key(5, 5);
        for (vehicle, start) in [("v1", 0.0), ("v2", 20.0)] {
            table.reserve_node(NodeOccupation {
                vehicle: vehicle.into(),
                node: n,
                enter: start,
                exit: start + 10.0,
            });
        }

        let found = table.node_reservations(n);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].vehicle, "v1");
        assert_eq!(found[1].vehicle, "v2");
        assert!(table.node_reservations(key(9, 9)).is_empty());
    }
}
