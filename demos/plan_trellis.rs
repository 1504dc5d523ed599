//! Plans a six-axis joint trajectory over precomputed IK candidates.
//!
//! The candidate sets stand in for an IK solver here; in a real cell each
//! waypoint sampler would query the robot kinematics instead.

use anyhow::Result;
use nalgebra::{Translation3, UnitQuaternion};
use std::sync::Arc;

use rs_descartes_planner::edge_evaluators::{WeightedJointDistance, DEFAULT_TRANSITION_COSTS};
use rs_descartes_planner::graph_solver::GraphSolver;
use rs_descartes_planner::planner_traits::{PointSampler, SampleGroup};
use rs_descartes_planner::samplers::ProxySampler;
use rs_descartes_planner::utils::dump_group;
use rs_descartes_planner::waypoint::{densify, Pose};

fn main() -> Result<()> {
    // A coarse Cartesian stroke, densified so that adjacent waypoints stay
    // within 2 cm / 5 degrees of each other.
    let stroke = [
        Pose::from_parts(Translation3::new(0.5, 0.0, 0.4), UnitQuaternion::identity()),
        Pose::from_parts(Translation3::new(0.5, 0.1, 0.4), UnitQuaternion::identity()),
        Pose::from_parts(
            Translation3::new(0.5, 0.1, 0.5),
            UnitQuaternion::from_euler_angles(0.0, 0.3, 0.0),
        ),
    ];
    let dense = densify(&stroke, 0.02, 5.0_f64.to_radians());
    println!(
        "Densified the stroke from {} to {} waypoints",
        stroke.len(),
        dense.len()
    );

    // Joint candidates per waypoint, as an IK solver would return them: the
    // elbow-up solutions drift slowly, the elbow-down alternative is far away
    // in joint space and must not be picked.
    let layers: Vec<Vec<[f64; 6]>> = (0..dense.len())
        .map(|step| {
            let drift = 0.01 * step as f64;
            vec![
                [drift, -0.4 + drift, 0.9, 0.0, 0.5, 0.0],
                [3.0 * drift + 2.8, 1.1, -0.9, 3.1, -0.5, 3.1],
            ]
        })
        .collect();

    let samplers: Vec<Arc<dyn PointSampler<f64>>> = layers
        .iter()
        .enumerate()
        .map(|(point, candidates)| {
            let values = candidates.iter().flatten().copied().collect();
            Arc::new(ProxySampler::new(SampleGroup::new(point as i32, 6, values)))
                as Arc<dyn PointSampler<f64>>
        })
        .collect();

    let evaluator = Arc::new(
        WeightedJointDistance::with_coefficients(DEFAULT_TRANSITION_COSTS.to_vec())
            .with_limit(2.0),
    );
    let mut solver = GraphSolver::new(evaluator);
    solver.build(&samplers)?;
    println!(
        "Trellis: {} vertices, {} edges",
        solver.num_vertices(),
        solver.num_edges()
    );

    let solution = solver.solve()?;
    println!("Selected joint configuration per waypoint:");
    for group in &solution {
        dump_group(group);
    }
    Ok(())
}
