//! Collision-aware, time-parameterized route planning for fleets of
//! length-bearing vehicles ("trailers") over user-drawn road networks on a
//! geographic surface.
//!
//! The planner consumes a static snapshot of road features plus a list of
//! vehicle requests and returns one timed plan per request:
//!
//! 1. [`loading::build_road_graph`] turns drawn polylines into a planar
//!    connectivity graph, splitting edges at every pairwise intersection.
//! 2. [`routing::astar`] plans a single vehicle in time, pricing each edge by
//!    its free-flow travel time plus the estimated delay against existing
//!    reservations.
//! 3. [`routing::plan_all_vehicle_routes`] orchestrates the whole fleet in
//!    start-time priority order, extending the reservation table after each
//!    planned vehicle.
//!
//! Map editing, feature persistence, rendering and the serving shell are
//! external collaborators; the types in [`model`] form the boundary.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod spatial;

pub use error::Error;
pub use loading::{PlannerConfig, build_road_graph};
pub use model::{FeatureKind, FeatureProperties, NodeKey, RoadFeature, RoadGraph, VehicleRequest};
pub use routing::{PlanStatus, RoutePlan, TimedNode, plan_all_vehicle_routes};

/// Absolute or relative simulation time in seconds.
pub type Seconds = f64;

/// Great-circle length in meters.
pub type Meters = f64;
