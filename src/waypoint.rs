//! Cartesian waypoint helpers
//!
//! The trellis solver consumes one sampler per waypoint; this module prepares
//! the waypoint list itself. A coarse Cartesian path is densified so that no
//! step between adjacent poses exceeds the given translation and rotation
//! increments, which keeps adjacent IK candidate sets close enough for the
//! edge evaluator to score meaningfully.

extern crate nalgebra as na;

use na::Isometry3;

/// Pose of the robot tool center point: Cartesian position plus rotation
/// quaternion.
pub type Pose = Isometry3<f64>;

/// Returns the path with intermediate poses inserted between every adjacent
/// pair so that no translation step exceeds `step_m` (meters) and no rotation
/// step exceeds `step_rad` (radians). The input poses are all preserved and
/// keep their relative order; an input shorter than two poses is returned as
/// is.
pub fn densify(poses: &[Pose], step_m: f64, step_rad: f64) -> Vec<Pose> {
    if poses.len() < 2 {
        return poses.to_vec();
    }

    let mut dense = Vec::with_capacity(2 * poses.len());
    dense.push(poses[0]);
    for pair in poses.windows(2) {
        add_intermediate_poses(&pair[0], &pair[1], step_m, step_rad, &mut dense);
        dense.push(pair[1]);
    }
    dense
}

/// Add intermediate poses between start and end. The start and end poses
/// themselves are not added.
fn add_intermediate_poses(
    start: &Pose,
    end: &Pose,
    step_m: f64,
    step_rad: f64,
    poses: &mut Vec<Pose>,
) {
    let translation_diff = end.translation.vector - start.translation.vector;
    let translation_distance = translation_diff.norm();

    let rotation_diff = end.rotation * start.rotation.inverse();
    let rotation_angle = rotation_diff.angle();

    // Steps needed to honor both limits; the greater count gives the finer
    // granularity between poses.
    let translation_steps = (translation_distance / step_m).ceil() as usize;
    let rotation_steps = (rotation_angle / step_rad).ceil() as usize;
    let steps = translation_steps.max(rotation_steps).max(1);

    let translation_step = translation_diff / steps as f64;

    for i in 1..steps {
        let fraction = i as f64 / steps as f64;

        let intermediate_translation = start.translation.vector + translation_step * i as f64;
        let intermediate_rotation = start.rotation.slerp(&end.rotation, fraction);

        poses.push(Pose::from_parts(
            intermediate_translation.into(),
            intermediate_rotation,
        ));
    }
}
