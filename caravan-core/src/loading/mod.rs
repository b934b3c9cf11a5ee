//! Turning the editor's feature snapshot into a routable road graph.

mod builder;
mod config;

pub use builder::build_road_graph;
pub use config::PlannerConfig;
