//! Convenience samplers for callers that already have their candidates

use num_traits::Float;

use crate::error::{PlanningError, PlanningResult};
use crate::planner_traits::{PointData, PointSampler, SampleGroup};

/// Sampler that holds a precomputed sample group and returns it verbatim.
/// Exists so that callers who computed IK solutions up front do not need to
/// implement [PointSampler] themselves.
#[derive(Debug, Clone)]
pub struct ProxySampler<FloatT: Float> {
    sample_group: SampleGroup<FloatT>,
}

impl<FloatT: Float> ProxySampler<FloatT> {
    /// Stores the given group; `generate` will return it as is.
    pub fn new(sample_group: SampleGroup<FloatT>) -> Self {
        ProxySampler { sample_group }
    }

    /// Wraps a single configuration into a one-sample group.
    pub fn from_point(point: &PointData<FloatT>) -> Self {
        ProxySampler {
            sample_group: SampleGroup::from_point(point),
        }
    }
}

impl<FloatT: Float> PointSampler<FloatT> for ProxySampler<FloatT> {
    fn generate(&self) -> PlanningResult<SampleGroup<FloatT>> {
        if self.sample_group.num_samples == 0 {
            return Err(PlanningError::SamplingFailed {
                point: self.sample_group.point_id.max(0) as usize,
            });
        }
        Ok(self.sample_group.clone())
    }
}
