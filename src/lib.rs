//! Rust implementation of a Cartesian-to-joint trajectory planner for
//! industrial robots ("Descartes style" planning)
//!
//! A Cartesian path gives the pose the tool center point must take at every
//! waypoint, but says nothing about the joints: each waypoint typically has
//! many inverse kinematics solutions, and picking them greedily produces
//! trajectories with large configuration jumps. This crate selects one joint
//! configuration per waypoint so that the summed transition cost over the
//! whole path is globally minimal.
//!
//! The selection works on a trellis graph: a virtual start vertex, one vertex
//! layer per waypoint (one vertex per IK sample), and scored edges between
//! samples of adjacent waypoints only. A single Dijkstra run from the virtual
//! start then yields the cheapest joint trajectory.
//!
//! # Features
//!
//! - Pluggable sampling: any type implementing [planner_traits::PointSampler]
//!   can supply the IK candidates of a waypoint; [samplers::ProxySampler]
//!   wraps candidate sets that were computed up front.
//! - Pluggable transition scoring through [planner_traits::EdgeEvaluator];
//!   the bundled [edge_evaluators::WeightedJointDistance] scores the
//!   coefficient-weighted joint-space distance and can reject transitions
//!   above a cost threshold.
//! - Invalid transitions never enter the graph, so an infeasible plan is
//!   detected during construction, not after an expensive search.
//! - The sample store behind the solver is replaceable
//!   ([planner_traits::SamplesContainer]) for memory-constrained planning.
//! - `f32` and `f64` planning precision.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rs_descartes_planner::edge_evaluators::WeightedJointDistance;
//! use rs_descartes_planner::graph_solver::GraphSolver;
//! use rs_descartes_planner::planner_traits::{PointSampler, SampleGroup};
//! use rs_descartes_planner::samplers::ProxySampler;
//!
//! // Two waypoints with two 1-DOF candidates each.
//! let samplers: Vec<Arc<dyn PointSampler<f64>>> = vec![
//!     Arc::new(ProxySampler::new(SampleGroup::new(0, 1, vec![0.0, 2.0]))),
//!     Arc::new(ProxySampler::new(SampleGroup::new(1, 1, vec![1.9, 0.5]))),
//! ];
//!
//! let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::<f64>::new()));
//! solver.build(&samplers).expect("trellis must build");
//! let solution = solver.solve().expect("path must exist");
//!
//! // 2.0 -> 1.9 is the cheapest transition.
//! assert_eq!(solution[0].values, vec![2.0]);
//! assert_eq!(solution[1].values, vec![1.9]);
//! ```

pub mod planner_traits;

pub mod error;

pub mod containers;

pub mod samplers;

#[path = "path_plan/graph_solver.rs"]
pub mod graph_solver;

#[path = "path_plan/edge_evaluators.rs"]
pub mod edge_evaluators;

pub mod waypoint;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(test)]
mod tests;
