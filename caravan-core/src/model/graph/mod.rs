//! Road connectivity graph

pub mod components;
pub mod network;

pub use components::{NodeKey, RoadEdge, RoadNode};
pub use network::{Projection, RoadGraph};
