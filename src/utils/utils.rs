//! Helper functions

use num_traits::Float;

use crate::planner_traits::{PointData, SampleGroup};

/// Calculates the transition cost between two joint configurations, weighted
/// by the given coefficients (rotating heavy base joints is more expensive).
/// Joints beyond the coefficient vector length are weighted 1.0, so an empty
/// vector gives the plain sum of rotation deltas.
pub fn transition_cost<FloatT: Float>(
    from: &[FloatT],
    to: &[FloatT],
    coefficients: &[FloatT],
) -> FloatT {
    from.iter()
        .zip(to)
        .enumerate()
        .fold(FloatT::zero(), |cost, (joint, (&a, &b))| {
            let coefficient = coefficients
                .get(joint)
                .copied()
                .unwrap_or_else(FloatT::one);
            cost + (a - b).abs() * coefficient
        })
}

/// Print all samples of the group, one row per sample.
#[allow(dead_code)]
pub fn dump_group(group: &SampleGroup<f64>) {
    if group.num_samples == 0 {
        println!("No samples");
    }
    for sample_idx in 0..group.num_samples {
        if let Some(sample) = group.sample(sample_idx) {
            let mut row_str = String::new();
            for value in sample {
                row_str.push_str(&format!("{:7.3} ", value));
            }
            println!("[{}]", row_str.trim_end());
        }
    }
}

/// Print a single configuration with its waypoint index.
#[allow(dead_code)]
pub fn dump_point(point: &PointData<f64>) {
    let mut row_str = String::new();
    for value in &point.values {
        row_str.push_str(&format!("{:7.3} ", value));
    }
    println!("{}: [{}]", point.point_id, row_str.trim_end());
}
