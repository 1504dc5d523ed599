//! Default in-memory store for per-waypoint sample groups

use num_traits::Float;

use crate::planner_traits::{SampleGroup, SamplesContainer};

/// Dense indexed buffer of sample groups, one slot per waypoint. All slots are
/// preallocated by `allocate` so filling the container during a build does not
/// reallocate.
#[derive(Debug, Default)]
pub struct DenseSamplesContainer<FloatT: Float> {
    slots: Vec<Option<SampleGroup<FloatT>>>,
}

impl<FloatT: Float> DenseSamplesContainer<FloatT> {
    pub fn new() -> Self {
        DenseSamplesContainer { slots: Vec::new() }
    }
}

impl<FloatT: Float> SamplesContainer<FloatT> for DenseSamplesContainer<FloatT> {
    fn allocate(&mut self, n: usize) {
        self.slots.clear();
        self.slots.resize_with(n, || None);
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn has(&self, idx: usize) -> bool {
        self.slots.get(idx).map_or(false, Option::is_some)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn at(&self, idx: usize) -> Option<&SampleGroup<FloatT>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn put(&mut self, idx: usize, group: SampleGroup<FloatT>) {
        if idx < self.slots.len() {
            self.slots[idx] = Some(group);
        }
    }
}
