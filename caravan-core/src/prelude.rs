// Re-export of the planning entry point and its boundary types
pub use crate::error::Error;
pub use crate::loading::{PlannerConfig, build_road_graph};
pub use crate::model::{FeatureKind, RoadFeature, RoadGraph, VehicleRequest};
pub use crate::routing::{PlanStatus, RoutePlan, TimedNode, plan_all_vehicle_routes};

// Core scalar aliases
pub use crate::Meters;
pub use crate::Seconds;
