//! Defines the value types and traits that connect the trellis solver to its
//! collaborators: samplers that produce joint-space candidates for a Cartesian
//! waypoint, evaluators that score transitions between candidates of adjacent
//! waypoints, and containers that cache the candidate sets.

use num_traits::Float;
use tracing::warn;

use crate::error::PlanningError;

/// Index of the waypoint a sample or vertex belongs to. Waypoints are counted
/// from 0; the virtual start vertex of the trellis carries [VIRTUAL_POINT_ID].
pub type PointId = i32;

/// Point id of the virtual start vertex (it precedes waypoint 0).
pub const VIRTUAL_POINT_ID: PointId = -1;

/// A single joint-space configuration, one value per degree of freedom.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData<FloatT: Float> {
    /// Waypoint this configuration belongs to, [VIRTUAL_POINT_ID] when unbound
    /// (interpolated points are not tied to any waypoint).
    pub point_id: PointId,
    /// Joint values, `values.len()` is the number of degrees of freedom.
    pub values: Vec<FloatT>,
}

impl<FloatT: Float> PointData<FloatT> {
    pub fn new(point_id: PointId, values: Vec<FloatT>) -> Self {
        PointData { point_id, values }
    }

    /// Number of degrees of freedom of this configuration.
    pub fn dofs(&self) -> usize {
        self.values.len()
    }

    /// Linear blend between this configuration and `other`, `t` in [0, 1].
    /// The result is not bound to a waypoint.
    pub fn interpolate(&self, t: FloatT, other: &PointData<FloatT>) -> PointData<FloatT> {
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| a + t * (b - a))
            .collect();
        PointData {
            point_id: VIRTUAL_POINT_ID,
            values,
        }
    }
}

/// All joint-space candidates (IK solutions) for one waypoint, stored row-major:
/// sample `s` occupies `values[s * num_dofs .. (s + 1) * num_dofs]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup<FloatT: Float> {
    /// Waypoint these samples belong to.
    pub point_id: PointId,
    /// Number of samples in the group.
    pub num_samples: usize,
    /// Degrees of freedom per sample.
    pub num_dofs: usize,
    /// Sample data, `num_samples * num_dofs` values.
    pub values: Vec<FloatT>,
}

impl<FloatT: Float> SampleGroup<FloatT> {
    /// Creates a group from row-major sample data. The value count must be a
    /// multiple of `num_dofs`.
    pub fn new(point_id: PointId, num_dofs: usize, values: Vec<FloatT>) -> Self {
        debug_assert!(num_dofs > 0 && values.len() % num_dofs == 0);
        SampleGroup {
            point_id,
            num_samples: if num_dofs > 0 { values.len() / num_dofs } else { 0 },
            num_dofs,
            values,
        }
    }

    /// Creates a single-sample group holding the given configuration.
    pub fn from_point(point: &PointData<FloatT>) -> Self {
        SampleGroup {
            point_id: point.point_id,
            num_samples: 1,
            num_dofs: point.values.len(),
            values: point.values.clone(),
        }
    }

    /// Borrows one sample as a slice, `None` when the index is out of range.
    pub fn sample(&self, sample_idx: usize) -> Option<&[FloatT]> {
        if sample_idx >= self.num_samples {
            return None;
        }
        let start = sample_idx * self.num_dofs;
        Some(&self.values[start..start + self.num_dofs])
    }

    /// Extracts one sample as an owned [PointData] bound to this group's
    /// waypoint, `None` when the index is out of range.
    pub fn at(&self, sample_idx: usize) -> Option<PointData<FloatT>> {
        self.sample(sample_idx).map(|values| PointData {
            point_id: self.point_id,
            values: values.to_vec(),
        })
    }
}

/// Identifies the sample a trellis vertex stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexProperties {
    /// Waypoint of the sample, [VIRTUAL_POINT_ID] for the virtual start.
    pub point_id: PointId,
    /// Index of the sample within its group.
    pub sample_index: usize,
}

/// One scored transition between a sample of waypoint `k` and a sample of
/// waypoint `k + 1`. Each edge carries both endpoint descriptors so the chosen
/// samples can be recovered from the path alone.
#[derive(Debug, Clone, Copy)]
pub struct EdgeProperties<FloatT: Float> {
    /// Transition cost, finite and non-negative when `valid`.
    pub weight: FloatT,
    /// Invalid transitions are never inserted into the trellis.
    pub valid: bool,
    pub src_vtx: VertexProperties,
    pub dst_vtx: VertexProperties,
}

/// Produces the complete joint-space candidate set for one Cartesian waypoint.
/// Implementations know the robot: IK solvers, joint limits, degrees of
/// freedom. Every group returned within one plan must use the same DOF count.
pub trait PointSampler<FloatT: Float> {
    /// Generates all feasible samples for the waypoint this sampler was
    /// created for. A successful result contains at least one sample.
    fn generate(&self) -> Result<SampleGroup<FloatT>, PlanningError>;

    /// Returns the samples closest to the given reference configuration.
    /// Used by sparse planners only; the trellis solver never calls it.
    fn closest(&self, _reference: &PointData<FloatT>) -> Option<SampleGroup<FloatT>> {
        warn!("closest() is not implemented by this sampler");
        None
    }
}

/// Scores all transitions between the samples of two adjacent waypoints.
pub trait EdgeEvaluator<FloatT: Float> {
    /// Evaluates every ordered pair of samples between `s1` (n1 samples) and
    /// `s2` (n2 samples), returning `n1 * n2` edges in row-major order: the
    /// source sample index is the outer loop, the destination index the inner
    /// one. Sample indices listed in `exclude_s1` / `exclude_s2` are skipped,
    /// shrinking the output accordingly.
    ///
    /// Each returned edge must carry the sample descriptors of both endpoints
    /// and, when valid, a finite non-negative weight.
    fn evaluate(
        &self,
        s1: &SampleGroup<FloatT>,
        s2: &SampleGroup<FloatT>,
        exclude_s1: &[usize],
        exclude_s2: &[usize],
    ) -> Vec<EdgeProperties<FloatT>>;
}

/// Random-access store of sample groups keyed by waypoint index. The default
/// implementation keeps everything in memory; memory-constrained planners may
/// specialize it to recompute samples on demand.
pub trait SamplesContainer<FloatT: Float> {
    /// Drops previous content and resizes to `n` empty slots.
    fn allocate(&mut self, n: usize);

    /// Drops all content.
    fn clear(&mut self);

    /// True when a group has been stored for the given waypoint.
    fn has(&self, idx: usize) -> bool;

    /// Number of allocated slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the group stored for the given waypoint, if any.
    fn at(&self, idx: usize) -> Option<&SampleGroup<FloatT>>;

    /// Stores a group for the given waypoint, replacing previous content.
    fn put(&mut self, idx: usize, group: SampleGroup<FloatT>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sample_extraction() {
        let group = SampleGroup::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(group.num_samples, 3);

        let point = group.at(1).expect("sample 1 must exist");
        assert_eq!(point.point_id, 3);
        assert_eq!(point.values, vec![2.0, 3.0]);

        assert!(group.at(3).is_none());
        assert_eq!(group.sample(2), Some(&[4.0, 5.0][..]));
    }

    #[test]
    fn test_group_from_point() {
        let point = PointData::new(7, vec![0.5, -0.5, 1.5]);
        let group = SampleGroup::from_point(&point);
        assert_eq!(group.point_id, 7);
        assert_eq!(group.num_samples, 1);
        assert_eq!(group.num_dofs, 3);
        assert_eq!(group.at(0), Some(point));
    }

    #[test]
    fn test_point_interpolation() {
        let a = PointData::new(0, vec![0.0, 10.0]);
        let b = PointData::new(1, vec![1.0, 20.0]);
        let mid = a.interpolate(0.5, &b);
        assert_eq!(mid.point_id, VIRTUAL_POINT_ID);
        assert_eq!(mid.values, vec![0.5, 15.0]);

        // t = 0 and t = 1 reproduce the endpoints
        assert_eq!(a.interpolate(0.0, &b).values, a.values);
        assert_eq!(a.interpolate(1.0, &b).values, b.values);
    }
}
