//! Bounded top-k selection shared by both trees' nearest-neighbor queries.
//!
//! Each candidate point seen during a k-NN walk is offered to a
//! [`NearestCollector`], which keeps the `k` smallest squared distances in a
//! capped max-heap: while fewer than `k` candidates have been seen, every
//! candidate is kept; afterwards a candidate only displaces the current
//! worst-of-the-best. This is `O(log k)` per candidate.

use crate::geometry::{squared_distance, IndexPoint, MetricPoint, Point};
use crate::heap::PointHeap;

/// Accumulates the `k` nearest candidates to a target point.
#[derive(Debug)]
pub struct NearestCollector {
    heap: PointHeap,
    target: Point,
    k: usize,
}

impl NearestCollector {
    /// Create a collector for the `k` nearest neighbors of `target`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is zero; callers return an empty result for `k == 0`
    /// before constructing a collector.
    pub fn new(target: Point, k: usize) -> Self {
        assert!(k > 0, "NearestCollector requires k > 0");
        NearestCollector {
            heap: PointHeap::new_max(),
            target,
            k,
        }
    }

    /// Offer a candidate point; it is kept if it is among the `k` nearest
    /// seen so far.
    pub fn offer(&mut self, candidate: IndexPoint) {
        let metric = squared_distance(self.target, candidate.point);
        let mp = MetricPoint {
            point: candidate.point,
            index: candidate.index,
            metric,
        };
        if self.heap.len() < self.k {
            self.heap.push(mp);
        } else if metric < self.heap.peek().metric {
            let _ = self.heap.pop();
            self.heap.push(mp);
        }
    }

    /// Finish the query, returning the kept candidates in ascending order of
    /// distance to the target.
    pub fn into_sorted(self) -> Vec<IndexPoint> {
        self.heap
            .report_reversed()
            .into_iter()
            .map(MetricPoint::to_index_point)
            .collect()
    }
}
