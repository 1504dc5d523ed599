//! End-to-end trellis solver tests: concrete plans, failure modes and the
//! shape of the built graph.

use std::sync::Arc;

use crate::edge_evaluators::{WeightedJointDistance, DEFAULT_TRANSITION_COSTS};
use crate::error::PlanningError;
use crate::graph_solver::GraphSolver;
use crate::planner_traits::{
    EdgeEvaluator, EdgeProperties, PointSampler, SampleGroup, VIRTUAL_POINT_ID,
};
use crate::samplers::ProxySampler;
use crate::tests::test_utils::{
    build_1dof, path_cost, plan_1dof, samplers_1dof, samplers_6dof, SIX_AXIS_LAYERS,
};

/// Marks every transition invalid; scoring is delegated to the default
/// evaluator so the edge metadata stays well formed.
struct RejectingEvaluator;

impl EdgeEvaluator<f64> for RejectingEvaluator {
    fn evaluate(
        &self,
        s1: &SampleGroup<f64>,
        s2: &SampleGroup<f64>,
        exclude_s1: &[usize],
        exclude_s2: &[usize],
    ) -> Vec<EdgeProperties<f64>> {
        WeightedJointDistance::new()
            .evaluate(s1, s2, exclude_s1, exclude_s2)
            .into_iter()
            .map(|mut edge| {
                edge.valid = false;
                edge
            })
            .collect()
    }
}

/// Returns every transition twice, which a correct build must refuse.
struct DuplicatingEvaluator;

impl EdgeEvaluator<f64> for DuplicatingEvaluator {
    fn evaluate(
        &self,
        s1: &SampleGroup<f64>,
        s2: &SampleGroup<f64>,
        exclude_s1: &[usize],
        exclude_s2: &[usize],
    ) -> Vec<EdgeProperties<f64>> {
        let mut edges = WeightedJointDistance::new().evaluate(s1, s2, exclude_s1, exclude_s2);
        let duplicates = edges.clone();
        edges.extend(duplicates);
        edges
    }
}

#[test]
fn test_zero_cost_straight_line() {
    let path = plan_1dof(&[&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]]).expect("must plan");
    assert_eq!(path, vec![0.0, 0.0, 0.0]);
    assert_eq!(path_cost(&path), 0.0);
}

#[test]
fn test_avoids_expensive_candidate() {
    let path = plan_1dof(&[&[0.0], &[1.0, 10.0], &[2.0]]).expect("must plan");
    assert_eq!(path, vec![0.0, 1.0, 2.0]);
    assert_eq!(path_cost(&path), 2.0);
}

#[test]
fn test_picks_globally_cheapest_pair() {
    let path = plan_1dof(&[&[0.0, 5.0], &[3.0, 4.0], &[0.0, 5.0]]).expect("must plan");
    assert_eq!(path, vec![5.0, 4.0, 5.0]);
    assert_eq!(path_cost(&path), 2.0);
}

#[test]
fn test_considers_continuation_cost() {
    // The first middle candidate is cheaper to enter (0.1 vs 0.3) but more
    // expensive to leave; a greedy per-layer choice would take it.
    let path = plan_1dof(&[&[0.0], &[-0.1, 0.3], &[1.0]]).expect("must plan");
    assert_eq!(path, vec![0.0, 0.3, 1.0]);
    assert!((path_cost(&path) - 1.0).abs() < 1e-12);
}

#[test]
fn test_five_waypoints_hand_computed() {
    let path = plan_1dof(&[
        &[0.0, 100.0],
        &[10.0, 1.0],
        &[2.0, 90.0],
        &[80.0, 3.0],
        &[4.0, 70.0],
    ])
    .expect("must plan");
    assert_eq!(path, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(path_cost(&path), 4.0);
}

#[test]
fn test_trivial_two_waypoint_plan() {
    let path = plan_1dof(&[&[0.5], &[0.7]]).expect("must plan");
    assert_eq!(path, vec![0.5, 0.7]);
}

#[test]
fn test_equal_cost_terminals_resolve_to_first_sample() {
    // Both last-layer candidates cost 1.0; the smaller vertex id wins.
    let path = plan_1dof(&[&[0.0], &[1.0, -1.0]]).expect("must plan");
    assert_eq!(path, vec![0.0, 1.0]);
}

#[test]
fn test_single_waypoint_returns_first_sample() {
    let solver = build_1dof(&[&[3.0, 1.0]]).expect("must build");
    assert_eq!(solver.num_points(), 1);
    assert_eq!(solver.terminals().len(), 2);

    let solution = solver.solve().expect("must solve");
    assert_eq!(solution.len(), 1);
    assert_eq!(solution[0].values, vec![3.0]);
}

#[test]
fn test_threshold_forces_the_only_feasible_path() {
    // 0.1 -> 1.6 costs 1.5 and is rejected by the limit, so the plan must go
    // through the middle candidate that is more expensive to enter.
    let evaluator = Arc::new(WeightedJointDistance::new().with_limit(1.0));
    let mut solver = GraphSolver::new(evaluator);
    solver
        .build(&samplers_1dof(&[&[0.0], &[0.1, 0.8], &[1.6]]))
        .expect("must build");
    let solution = solver.solve().expect("must solve");
    let path: Vec<f64> = solution.iter().map(|group| group.values[0]).collect();
    assert_eq!(path, vec![0.0, 0.8, 1.6]);
}

#[test]
fn test_six_axis_plan_with_default_coefficients() {
    let evaluator = Arc::new(WeightedJointDistance::with_coefficients(
        DEFAULT_TRANSITION_COSTS.to_vec(),
    ));
    let mut solver = GraphSolver::new(evaluator);
    solver
        .build(&samplers_6dof(&SIX_AXIS_LAYERS))
        .expect("must build");
    let solution = solver.solve().expect("must solve");

    assert_eq!(solution.len(), 3);
    assert_eq!(solution[0].values, vec![0.0; 6]);
    assert_eq!(solution[1].values, vec![0.1; 6]);
    assert_eq!(solution[2].values, vec![0.2; 6]);
}

#[test]
fn test_f32_planning() {
    let samplers: Vec<Arc<dyn PointSampler<f32>>> = vec![
        Arc::new(ProxySampler::new(SampleGroup::new(0, 1, vec![0.0_f32, 4.0]))),
        Arc::new(ProxySampler::new(SampleGroup::new(1, 1, vec![3.5_f32, 1.0]))),
    ];
    let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::<f32>::new()));
    solver.build(&samplers).expect("must build");
    let solution = solver.solve().expect("must solve");
    assert_eq!(solution[0].values, vec![4.0_f32]);
    assert_eq!(solution[1].values, vec![3.5_f32]);
}

#[test]
fn test_no_valid_transition_aborts_build() {
    let mut solver = GraphSolver::new(Arc::new(RejectingEvaluator));
    let result = solver.build(&samplers_1dof(&[&[0.0], &[0.0]]));
    assert_eq!(
        result,
        Err(PlanningError::NoValidTransition { from: 0, to: 1 })
    );
    assert!(!solver.is_built());
}

#[test]
fn test_duplicate_edges_abort_build() {
    let mut solver = GraphSolver::new(Arc::new(DuplicatingEvaluator));
    let result = solver.build(&samplers_1dof(&[&[0.0], &[1.0]]));
    assert_eq!(result, Err(PlanningError::DuplicateEdge { src: 1, dst: 2 }));
}

#[test]
fn test_failed_sampling_names_the_waypoint() {
    let empty = ProxySampler::new(SampleGroup::<f64> {
        point_id: 0,
        num_samples: 0,
        num_dofs: 1,
        values: vec![],
    });
    let samplers: Vec<Arc<dyn PointSampler<f64>>> = vec![
        Arc::new(empty),
        Arc::new(ProxySampler::new(SampleGroup::new(1, 1, vec![1.0]))),
    ];
    let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::new()));
    assert_eq!(
        solver.build(&samplers),
        Err(PlanningError::SamplingFailed { point: 0 })
    );
}

#[test]
fn test_malformed_group_is_rejected() {
    // two declared samples but values for only one
    let broken = ProxySampler::new(SampleGroup::<f64> {
        point_id: 0,
        num_samples: 2,
        num_dofs: 1,
        values: vec![0.0],
    });
    let samplers: Vec<Arc<dyn PointSampler<f64>>> = vec![
        Arc::new(broken),
        Arc::new(ProxySampler::new(SampleGroup::new(1, 1, vec![1.0]))),
    ];
    let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::new()));
    assert!(matches!(
        solver.build(&samplers),
        Err(PlanningError::InvalidSamples { point: 0, .. })
    ));
}

#[test]
fn test_inconsistent_dofs_are_rejected() {
    let samplers: Vec<Arc<dyn PointSampler<f64>>> = vec![
        Arc::new(ProxySampler::new(SampleGroup::new(0, 1, vec![0.0]))),
        Arc::new(ProxySampler::new(SampleGroup::new(1, 2, vec![0.0, 1.0]))),
    ];
    let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::new()));
    assert!(matches!(
        solver.build(&samplers),
        Err(PlanningError::InvalidSamples { point: 1, .. })
    ));
}

#[test]
fn test_empty_input_is_rejected() {
    let mut solver = GraphSolver::<f64>::new(Arc::new(WeightedJointDistance::new()));
    assert_eq!(solver.build(&[]), Err(PlanningError::NoWaypoints));
}

#[test]
fn test_solve_requires_build() {
    let solver = GraphSolver::<f64>::new(Arc::new(WeightedJointDistance::new()));
    assert_eq!(solver.solve(), Err(PlanningError::NotBuilt));
}

#[test]
fn test_solver_is_reusable_after_failure() {
    let mut solver = GraphSolver::new(Arc::new(WeightedJointDistance::new()));

    assert!(solver.build(&[]).is_err());
    assert!(!solver.is_built());
    assert_eq!(solver.num_vertices(), 0);
    assert_eq!(solver.solve(), Err(PlanningError::NotBuilt));

    solver
        .build(&samplers_1dof(&[&[0.0], &[1.0]]))
        .expect("retry must build");
    assert!(solver.is_built());
    assert!(solver.solve().is_ok());
}

#[test]
fn test_graph_shape() {
    // 5.0 -> 0.4 costs 4.6 and is rejected, so the second first-layer sample
    // must get neither a virtual-start edge nor any outgoing edge.
    let evaluator = Arc::new(WeightedJointDistance::new().with_limit(1.0));
    let mut solver = GraphSolver::new(evaluator);
    solver
        .build(&samplers_1dof(&[&[0.0, 5.0], &[0.4], &[0.8]]))
        .expect("must build");

    // virtual start + 2 + 1 + 1 samples
    assert_eq!(solver.num_vertices(), 5);
    assert_eq!(solver.terminals(), &[4]);

    // vertex 0 is the only virtual vertex; every other vertex belongs to
    // exactly one waypoint layer
    let virtual_vertex = solver.vertex_properties(0).expect("vertex 0 must exist");
    assert_eq!(virtual_vertex.point_id, VIRTUAL_POINT_ID);
    for vertex in 1..solver.num_vertices() {
        let props = solver.vertex_properties(vertex).expect("vertex must exist");
        assert!(props.point_id >= 0 && (props.point_id as usize) < solver.num_points());
    }

    let pairs = solver.edge_pairs();
    assert_eq!(pairs, vec![(0, 1), (1, 3), (3, 4)]);

    // every vertex except the virtual start belongs to exactly one waypoint
    // layer, and every edge advances by exactly one layer
    let layer = |vertex: usize| {
        let props = solver.vertex_properties(vertex).expect("vertex must exist");
        (props.point_id + 1) as usize
    };
    for &(src, dst) in &pairs {
        assert_eq!(layer(dst), layer(src) + 1, "edge ({}, {})", src, dst);
    }

    // no ordered vertex pair may repeat
    let mut deduplicated = pairs.clone();
    deduplicated.sort_unstable();
    deduplicated.dedup();
    assert_eq!(deduplicated.len(), pairs.len());

    let solution = solver.solve().expect("must solve");
    let path: Vec<f64> = solution.iter().map(|group| group.values[0]).collect();
    assert_eq!(path, vec![0.0, 0.4, 0.8]);
}

#[test]
fn test_solution_groups_are_bound_to_waypoints() {
    let solver = build_1dof(&[&[0.0, 1.0], &[2.0, 3.0]]).expect("must build");
    let solution = solver.solve().expect("must solve");
    for (point, group) in solution.iter().enumerate() {
        assert_eq!(group.point_id, point as i32);
        assert_eq!(group.num_samples, 1);
        assert_eq!(group.num_dofs, 1);
    }
}
