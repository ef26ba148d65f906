//! Totally ordered path cost for priority queues.

use std::cmp::Ordering;

/// An `f64` cost ordered with [`f64::total_cmp`], so it can key a
/// `BinaryHeap`.  Edge weights are always finite and positive, so the NaN
/// ordering never matters in practice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
