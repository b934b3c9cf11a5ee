//! Road features as authored by the host editor.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Kind of drawn feature. Only [`FeatureKind::Road`] features can contribute
/// edges to the road graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Road,
    Blocked,
    Marker,
    Polygon,
}

/// Property bag the editor attaches to a feature.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureProperties {
    pub is_blocked: bool,
}

/// One drawn feature: an identifier, a kind, and an optional polyline.
///
/// Features are owned by the editor and passed in by value; the planner
/// never mutates or persists them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadFeature {
    pub id: String,
    pub kind: FeatureKind,
    /// Ordered centerline coordinates. Absent for markers and polygons.
    #[serde(default)]
    pub geometry: Option<Vec<Point<f64>>>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

impl RoadFeature {
    /// An open road carrying the given centerline.
    pub fn road(id: impl Into<String>, polyline: Vec<Point<f64>>) -> Self {
        Self {
            id: id.into(),
            kind: FeatureKind::Road,
            geometry: Some(polyline),
            properties: FeatureProperties::default(),
        }
    }

    /// A road the editor has marked blocked; invisible to the planner.
    pub fn blocked_road(id: impl Into<String>, polyline: Vec<Point<f64>>) -> Self {
        Self {
            id: id.into(),
            kind: FeatureKind::Road,
            geometry: Some(polyline),
            properties: FeatureProperties { is_blocked: true },
        }
    }

    /// `true` when the feature contributes edges to the road graph.
    pub fn is_routable(&self) -> bool {
        self.kind == FeatureKind::Road && !self.properties.is_blocked
    }
}
