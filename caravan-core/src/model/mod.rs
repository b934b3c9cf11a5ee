//! Data model for drawn road networks and fleet requests.

pub mod features;
pub mod graph;
pub mod requests;

pub use features::{FeatureKind, FeatureProperties, RoadFeature};
pub use graph::{NodeKey, Projection, RoadEdge, RoadGraph, RoadNode};
pub use requests::VehicleRequest;
