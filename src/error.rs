//! Error handling for trellis construction and solving

use std::fmt;

/// Unified error for both phases of planning. Build failures name the
/// offending waypoint(s); the solver resets itself to the empty state on any
/// build failure, so the caller may safely retry with different samplers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// `build` was called with no waypoints at all.
    NoWaypoints,
    /// A sampler failed to produce samples for the given waypoint.
    SamplingFailed { point: usize },
    /// A sampler returned a malformed group: empty, value count not matching
    /// `num_samples * num_dofs`, or a DOF count different from the other
    /// waypoints of the same build.
    InvalidSamples { point: usize, reason: String },
    /// The edge evaluator found no valid transition between two adjacent
    /// waypoints.
    NoValidTransition { from: usize, to: usize },
    /// The same ordered vertex pair was inserted twice within one build.
    DuplicateEdge { src: usize, dst: usize },
    /// `solve` was called before a successful `build`.
    NotBuilt,
    /// Every terminal vertex is unreachable from the virtual start.
    NoFeasiblePath,
    /// Backtracking did not assign a sample to the given waypoint.
    IncompletePath { point: usize },
    /// Out-of-range indices and other programmer errors.
    InternalInconsistency(String),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::NoWaypoints => write!(f, "No waypoints were given to plan for"),
            PlanningError::SamplingFailed { point } => {
                write!(f, "No samples were produced for waypoint {}", point)
            }
            PlanningError::InvalidSamples { point, reason } => {
                write!(f, "Invalid samples for waypoint {}: {}", point, reason)
            }
            PlanningError::NoValidTransition { from, to } => write!(
                f,
                "Not a single valid transition between waypoints ({}, {})",
                from, to
            ),
            PlanningError::DuplicateEdge { src, dst } => {
                write!(f, "Edge ({}, {}) has already been added to the graph", src, dst)
            }
            PlanningError::NotBuilt => write!(f, "The graph must be built before solving"),
            PlanningError::NoFeasiblePath => {
                write!(f, "No waypoint sequence is reachable from the start")
            }
            PlanningError::IncompletePath { point } => {
                write!(f, "No sample was assigned to waypoint {}", point)
            }
            PlanningError::InternalInconsistency(msg) => {
                write!(f, "Internal inconsistency: {}", msg)
            }
        }
    }
}

impl std::error::Error for PlanningError {}

/// Result type alias for planning operations.
pub type PlanningResult<T> = Result<T, PlanningError>;
