//! Joint-space transition scoring between adjacent waypoints

use num_traits::Float;
use rayon::prelude::*;
use std::fmt::Debug;

use crate::planner_traits::{EdgeEvaluator, EdgeProperties, SampleGroup, VertexProperties};
use crate::utils::transition_cost;

/// Reasonable default transition cost coefficients for a six-axis arm.
/// Rotation of the smaller wrist joints is more tolerable than rotation of
/// the base joints. The sum of all weights is 6.0.
pub const DEFAULT_TRANSITION_COSTS: [f64; 6] = [1.2, 1.1, 1.1, 0.9, 0.9, 0.8];

/// Edge evaluator scoring a transition as the coefficient-weighted sum of
/// per-joint rotation deltas. Transitions costing more than
/// `max_transition_cost` are reported as invalid, which keeps jerky
/// reconfigurations out of the trellis entirely.
#[derive(Debug, Clone)]
pub struct WeightedJointDistance<FloatT: Float> {
    /// Per-joint cost coefficients. Joints beyond the vector length (or all
    /// joints, when empty) are weighted 1.0.
    pub coefficients: Vec<FloatT>,

    /// Maximum allowed transition cost between adjacent samples. Infinity
    /// accepts every transition.
    pub max_transition_cost: FloatT,
}

impl<FloatT: Float> Default for WeightedJointDistance<FloatT> {
    fn default() -> Self {
        WeightedJointDistance {
            coefficients: Vec::new(),
            max_transition_cost: FloatT::infinity(),
        }
    }
}

impl<FloatT: Float> WeightedJointDistance<FloatT> {
    /// Unweighted evaluator accepting every transition.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coefficients(coefficients: Vec<FloatT>) -> Self {
        WeightedJointDistance {
            coefficients,
            max_transition_cost: FloatT::infinity(),
        }
    }

    pub fn with_limit(mut self, max_transition_cost: FloatT) -> Self {
        self.max_transition_cost = max_transition_cost;
        self
    }
}

impl<FloatT> EdgeEvaluator<FloatT> for WeightedJointDistance<FloatT>
where
    FloatT: Float + Debug + Send + Sync,
{
    fn evaluate(
        &self,
        s1: &SampleGroup<FloatT>,
        s2: &SampleGroup<FloatT>,
        exclude_s1: &[usize],
        exclude_s2: &[usize],
    ) -> Vec<EdgeProperties<FloatT>> {
        let src_indices: Vec<usize> = (0..s1.num_samples)
            .filter(|index| !exclude_s1.contains(index))
            .collect();
        let dst_indices: Vec<usize> = (0..s2.num_samples)
            .filter(|index| !exclude_s2.contains(index))
            .collect();

        // Rows are independent, so they are scored in parallel. The collect
        // keeps row order, preserving the row-major output contract.
        let rows: Vec<Vec<EdgeProperties<FloatT>>> = src_indices
            .par_iter()
            .map(|&src_index| {
                let from = match s1.sample(src_index) {
                    Some(values) => values,
                    None => return Vec::new(),
                };
                dst_indices
                    .iter()
                    .filter_map(|&dst_index| {
                        let to = s2.sample(dst_index)?;
                        let weight = transition_cost(from, to, &self.coefficients);
                        Some(EdgeProperties {
                            weight,
                            valid: weight.is_finite() && weight <= self.max_transition_cost,
                            src_vtx: VertexProperties {
                                point_id: s1.point_id,
                                sample_index: src_index,
                            },
                            dst_vtx: VertexProperties {
                                point_id: s2.point_id,
                                sample_index: dst_index,
                            },
                        })
                    })
                    .collect()
            })
            .collect();

        rows.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(point_id: i32, samples: &[&[f64]]) -> SampleGroup<f64> {
        let num_dofs = samples[0].len();
        let values = samples.iter().flat_map(|s| s.iter().copied()).collect();
        SampleGroup::new(point_id, num_dofs, values)
    }

    #[test]
    fn test_row_major_order() {
        let s1 = group(0, &[&[0.0], &[1.0]]);
        let s2 = group(1, &[&[2.0], &[3.0], &[4.0]]);
        let edges = WeightedJointDistance::new().evaluate(&s1, &s2, &[], &[]);

        assert_eq!(edges.len(), 6);
        for (index, edge) in edges.iter().enumerate() {
            assert_eq!(edge.src_vtx.sample_index, index / 3);
            assert_eq!(edge.dst_vtx.sample_index, index % 3);
            assert_eq!(edge.src_vtx.point_id, 0);
            assert_eq!(edge.dst_vtx.point_id, 1);
        }
        // |0 - 4| for the last edge of the first row
        assert_eq!(edges[2].weight, 4.0);
        assert!(edges.iter().all(|edge| edge.valid));
    }

    #[test]
    fn test_weighting_and_limit() {
        let s1 = group(0, &[&[0.0, 0.0]]);
        let s2 = group(1, &[&[1.0, 1.0], &[0.1, 0.0]]);
        let evaluator =
            WeightedJointDistance::with_coefficients(vec![2.0, 0.5]).with_limit(1.0);
        let edges = evaluator.evaluate(&s1, &s2, &[], &[]);

        assert_eq!(edges.len(), 2);
        // 2.0 * 1 + 0.5 * 1 = 2.5, above the limit
        assert_eq!(edges[0].weight, 2.5);
        assert!(!edges[0].valid);
        // 2.0 * 0.1 = 0.2, acceptable
        assert!((edges[1].weight - 0.2).abs() < 1e-12);
        assert!(edges[1].valid);
    }

    #[test]
    fn test_exclusion_lists_shrink_output() {
        let s1 = group(0, &[&[0.0], &[1.0], &[2.0]]);
        let s2 = group(1, &[&[0.0], &[1.0]]);
        let edges = WeightedJointDistance::new().evaluate(&s1, &s2, &[1], &[0]);

        // 2 remaining sources x 1 remaining destination
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].src_vtx.sample_index, 0);
        assert_eq!(edges[1].src_vtx.sample_index, 2);
        assert!(edges.iter().all(|edge| edge.dst_vtx.sample_index == 1));
    }

    #[test]
    fn test_missing_coefficients_default_to_one() {
        let s1 = group(0, &[&[0.0, 0.0]]);
        let s2 = group(1, &[&[1.0, 3.0]]);
        let evaluator = WeightedJointDistance::with_coefficients(vec![2.0]);
        let edges = evaluator.evaluate(&s1, &s2, &[], &[]);
        // 2.0 * 1 + 1.0 * 3 = 5.0
        assert_eq!(edges[0].weight, 5.0);
    }
}
