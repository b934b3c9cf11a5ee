use serde::{Deserialize, Serialize};

/// Tunable constants for graph construction and planning.
///
/// Hosts usually start from [`PlannerConfig::default`] and override a few
/// knobs; every field has a stock default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Mean Earth radius in meters used for every great-circle distance.
    pub earth_radius_meters: f64,
    /// Per-axis absolute tolerance for coordinate equality.
    pub coordinate_equality_tolerance: f64,
    /// Parametric slack admitted when accepting segment intersections.
    pub intersection_epsilon: f64,
    /// How long a vehicle occupies an intersection beyond its front's arrival.
    pub node_clearance_seconds: f64,
    /// Symmetric safety buffer applied around node occupations.
    pub node_safety_window_seconds: f64,
    /// Flat surcharge whenever traversing an edge would induce any wait.
    pub inconvenience_penalty_seconds: f64,
    /// Scaled by 1/1000 and added on probable head-on conflicts.
    pub head_on_penalty_seconds: f64,
    /// Cruise speed in m/s for requests that do not carry one.
    pub default_vehicle_speed: f64,
    /// Length in meters for requests that do not carry one.
    pub default_vehicle_length: f64,
    /// Fractional digits kept when quantizing coordinates into node keys.
    pub node_key_decimal_digits: u32,
    /// Optional cap on search expansions; an exceeded cap fails the request.
    pub search_expansion_limit: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            earth_radius_meters: 6_371_000.0,
            coordinate_equality_tolerance: 1e-7,
            intersection_epsilon: 1e-5,
            node_clearance_seconds: 10.0,
            node_safety_window_seconds: 15.0,
            inconvenience_penalty_seconds: 30.0,
            head_on_penalty_seconds: 1e6,
            default_vehicle_speed: 10.0,
            default_vehicle_length: 10.0,
            node_key_decimal_digits: 8,
            search_expansion_limit: None,
        }
    }
}
