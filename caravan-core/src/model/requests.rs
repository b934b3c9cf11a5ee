//! Vehicle planning requests.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::Seconds;

/// One vehicle's request: where it starts, where it is headed, and when it
/// wants to leave.
///
/// Origin and destination are free coordinates; the planner snaps both onto
/// the road graph before searching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRequest {
    pub id: String,
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    /// Constant cruise speed in m/s. `None` falls back to the configured
    /// default; a non-positive value fails the request.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Vehicle length in meters, tail included. `None` falls back to the
    /// configured default.
    #[serde(default)]
    pub length: Option<f64>,
    /// Desired absolute start time in seconds.
    pub start_time: Seconds,
}

impl VehicleRequest {
    /// Cruise speed, falling back to `default_speed` when the request
    /// carries none.
    pub fn speed_or(&self, default_speed: f64) -> f64 {
        self.speed.unwrap_or(default_speed)
    }

    /// Vehicle length, falling back to `default_length` when the request
    /// carries none. Never negative.
    pub fn length_or(&self, default_length: f64) -> f64 {
        self.length.unwrap_or(default_length).max(0.0)
    }
}
