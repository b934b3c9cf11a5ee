//! Time-aware routing: single-vehicle search, conflict estimation, and
//! fleet orchestration.

pub mod astar;
pub mod conflict;
pub mod fleet;
pub mod reservations;

pub use astar::find_timed_path;
pub use conflict::{VehicleProfile, estimate_conflict_delay};
pub use fleet::{PlanStatus, RoutePlan, TimedNode, plan_all_vehicle_routes};
pub use reservations::{NodeOccupation, ReservationTable, SegmentKey, SegmentOccupation};
