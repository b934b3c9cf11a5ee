//! Mutable road network graph with identity-preserving splits and
//! projection of free coordinates onto the nearest road.

use geo::Point;
use hashbrown::HashMap;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use super::components::{NodeKey, RoadEdge, RoadNode};
use crate::Meters;
use crate::spatial;

/// Result of snapping a free coordinate onto the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// The nearest locus is an existing node.
    OnNode(NodeIndex),
    /// The nearest locus lies on the interior of the edge between `a` and `b`.
    OnEdge {
        a: NodeIndex,
        b: NodeIndex,
        point: Point<f64>,
    },
}

/// Undirected road connectivity graph.
///
/// Nodes are identified by their quantized coordinate key; edges carry the
/// great-circle distance between their endpoints. Nodes are never removed,
/// so a [`NodeIndex`] stays valid for the life of the graph; edges come and
/// go as intersections and projections split them.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub graph: StableUnGraph<RoadNode, RoadEdge>,
    nodes_by_key: HashMap<NodeKey, NodeIndex>,
    key_scale: f64,
    earth_radius: f64,
}

impl RoadGraph {
    /// An empty graph quantizing keys to `node_key_decimal_digits` fractional
    /// digits and measuring edges on a sphere of `earth_radius_meters`.
    pub fn new(earth_radius_meters: f64, node_key_decimal_digits: u32) -> Self {
        Self {
            graph: StableUnGraph::default(),
            nodes_by_key: HashMap::new(),
            key_scale: 10f64.powi(node_key_decimal_digits as i32),
            earth_radius: earth_radius_meters,
        }
    }

    /// Quantizes a coordinate onto this graph's key grid.
    pub fn key_of(&self, point: Point<f64>) -> NodeKey {
        NodeKey::quantize(point, self.key_scale)
    }

    /// Returns the node holding `point`'s key, inserting it if absent.
    pub fn ensure_node(&mut self, point: Point<f64>) -> NodeIndex {
        let key = self.key_of(point);
        match self.nodes_by_key.entry(key) {
            hashbrown::hash_map::Entry::Occupied(entry) => *entry.get(),
            hashbrown::hash_map::Entry::Vacant(entry) => {
                let index = self.graph.add_node(RoadNode {
                    key,
                    geometry: point,
                });
                entry.insert(index);
                index
            }
        }
    }

    /// Looks up a node by coordinate key.
    pub fn node_at_point(&self, point: Point<f64>) -> Option<NodeIndex> {
        self.nodes_by_key.get(&self.key_of(point)).copied()
    }

    /// Adds the undirected edge between `a` and `b`, weighted by their
    /// great-circle distance. Self-loops and existing edges are left alone.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b || self.graph.find_edge(a, b).is_some() {
            return;
        }
        let meters =
            spatial::haversine_distance(self.earth_radius, self.point_at(a), self.point_at(b));
        self.graph.add_edge(a, b, RoadEdge { meters });
    }

    /// Removes the edge between `a` and `b`, if present.
    pub fn disconnect(&mut self, a: NodeIndex, b: NodeIndex) {
        if let Some(edge) = self.graph.find_edge(a, b) {
            self.graph.remove_edge(edge);
        }
    }

    /// Replaces the edge (a, b) with (a, x) and (x, b).
    ///
    /// Both replacement edges carry fresh great-circle weights, so their sum
    /// equals the distance from `a` to `b` up to floating-point error.
    pub fn split_edge(&mut self, a: NodeIndex, b: NodeIndex, x: NodeIndex) {
        self.disconnect(a, b);
        self.connect(a, x);
        self.connect(x, b);
    }

    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }

    /// Great-circle length of the edge between `a` and `b`, if one exists.
    pub fn edge_meters(&self, a: NodeIndex, b: NodeIndex) -> Option<Meters> {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(|weight| weight.meters)
    }

    pub fn point_at(&self, index: NodeIndex) -> Point<f64> {
        self.graph[index].geometry
    }

    pub fn key_at(&self, index: NodeIndex) -> NodeKey {
        self.graph[index].key
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as canonically ordered key pairs with their weights.
    ///
    /// Sorted, so two graphs with the same topology compare equal regardless
    /// of insertion history.
    pub fn edge_list(&self) -> Vec<(NodeKey, NodeKey, Meters)> {
        let mut edges: Vec<(NodeKey, NodeKey, Meters)> = self
            .graph
            .edge_references()
            .map(|edge| {
                let a = self.graph[edge.source()].key;
                let b = self.graph[edge.target()].key;
                let (a, b) = if b < a { (b, a) } else { (a, b) };
                (a, b, edge.weight().meters)
            })
            .collect();
        edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        edges
    }

    /// Finds the locus of the graph nearest to `target`.
    ///
    /// Every node and every edge is examined; a node wins ties against a
    /// segment at equal distance, and among segments the first seen wins.
    /// `None` only for a graph with no nodes.
    pub fn nearest_locus(&self, target: Point<f64>) -> Option<Projection> {
        let mut best: Option<(f64, Projection)> = None;

        for index in self.graph.node_indices() {
            let d = spatial::haversine_distance(self.earth_radius, target, self.point_at(index));
            if best.as_ref().is_none_or(|(best_d, _)| d < *best_d) {
                best = Some((d, Projection::OnNode(index)));
            }
        }

        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            let point = spatial::project_onto_segment(self.point_at(a), self.point_at(b), target);
            let d = spatial::haversine_distance(self.earth_radius, target, point);
            if best.as_ref().is_none_or(|(best_d, _)| d < *best_d) {
                best = Some((d, Projection::OnEdge { a, b, point }));
            }
        }

        best.map(|(_, projection)| projection)
    }

    /// Materializes a projection as a graph node.
    ///
    /// A projection onto an existing node returns that node. A projection
    /// onto an edge interior whose key is already taken returns the existing
    /// node and leaves the edge alone; otherwise the host edge is split at
    /// the projected point.
    pub fn insert_projection(&mut self, projection: Projection) -> NodeIndex {
        match projection {
            Projection::OnNode(index) => index,
            Projection::OnEdge { a, b, point } => {
                if let Some(existing) = self.node_at_point(point) {
                    return existing;
                }
                let x = self.ensure_node(point);
                self.split_edge(a, b, x);
                x
            }
        }
    }
}
