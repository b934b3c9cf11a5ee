use std::cmp::Ordering;

use petgraph::stable_graph::NodeIndex;

/// Open-set entry: estimated total time, accumulated time, node.
#[derive(Copy, Clone)]
pub(super) struct OpenEntry {
    pub(super) f: f64,
    pub(super) g: f64,
    pub(super) node: NodeIndex,
}

// Implement Ord for OpenEntry to use in BinaryHeap
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by f (reversed from standard Rust BinaryHeap); ties fall
        // back to the node index so pop order stays deterministic.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}
