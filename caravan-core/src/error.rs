use thiserror::Error;

/// Planner failure kinds. None of these escape the fleet entry point; each
/// is folded into a failed plan for the request that triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("road features produced an empty graph")]
    EmptyGraph,
    #[error("no road to project ({lat}, {lng}) onto")]
    ProjectionFailed { lat: f64, lng: f64 },
    #[error("no conflict-free route to the destination")]
    Unreachable,
    #[error("search expansion limit of {0} exceeded")]
    BudgetExceeded(usize),
    #[error("vehicle speed must be positive, got {0}")]
    InvalidSpeed(f64),
}
