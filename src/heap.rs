//! Array-based binary heap over [`MetricPoint`], configurable as min- or
//! max-ordered at construction.
//!
//! Both trees use a max-ordered `PointHeap` of capacity `k` for bounded top-k
//! selection during nearest-neighbor queries (see [`crate::knn`]). The heap
//! itself never limits capacity; bounding is the caller's job.

use crate::geometry::MetricPoint;

/// Error raised by the checked accessors of [`PointHeap`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeapError {
    /// `try_peek` or `try_pop` was called on an empty heap.
    #[error("empty heap")]
    Empty,
}

/// A min- or max-heap over [`MetricPoint`], ordered by `metric`.
#[derive(Debug, Clone)]
pub struct PointHeap {
    points: Vec<MetricPoint>,
    is_min: bool,
}

impl PointHeap {
    /// Create an empty min-heap: `pop` returns the smallest metric first.
    pub fn new_min() -> Self {
        PointHeap {
            points: Vec::new(),
            is_min: true,
        }
    }

    /// Create an empty max-heap: `pop` returns the largest metric first.
    pub fn new_max() -> Self {
        PointHeap {
            points: Vec::new(),
            is_min: false,
        }
    }

    /// Current element count.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Push a point onto the heap, sifting it up to its ordered position.
    pub fn push(&mut self, p: MetricPoint) {
        self.points.push(p);
        let mut index = self.points.len() - 1;
        while index > 0 {
            let parent = Self::parent(index);
            if !self.violates_order(index, parent) {
                break;
            }
            self.points.swap(index, parent);
            index = parent;
        }
    }

    /// The root element: smallest metric for a min-heap, largest for a max-heap.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty. Callers are expected to check [`len`]
    /// first; use [`try_peek`] for a checked variant.
    ///
    /// [`len`]: PointHeap::len
    /// [`try_peek`]: PointHeap::try_peek
    pub fn peek(&self) -> &MetricPoint {
        match self.try_peek() {
            Ok(p) => p,
            Err(_) => panic!("can't peek empty heap"),
        }
    }

    /// Checked variant of [`peek`](PointHeap::peek).
    pub fn try_peek(&self) -> Result<&MetricPoint, HeapError> {
        self.points.first().ok_or(HeapError::Empty)
    }

    /// Remove and return the root element.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty. Callers are expected to check [`len`]
    /// first; use [`try_pop`] for a checked variant.
    ///
    /// [`len`]: PointHeap::len
    /// [`try_pop`]: PointHeap::try_pop
    pub fn pop(&mut self) -> MetricPoint {
        match self.try_pop() {
            Ok(p) => p,
            Err(_) => panic!("can't pop empty heap"),
        }
    }

    /// Checked variant of [`pop`](PointHeap::pop).
    pub fn try_pop(&mut self) -> Result<MetricPoint, HeapError> {
        if self.points.is_empty() {
            return Err(HeapError::Empty);
        }
        // Move the last element into the root slot, then restore order.
        let p = self.points.swap_remove(0);
        self.heapify(0);
        Ok(p)
    }

    /// Drain the heap in pop order: ascending metric for a min-heap,
    /// descending for a max-heap.
    ///
    /// Consumes the heap so a drained heap cannot be reused by accident.
    pub fn report(mut self) -> Vec<MetricPoint> {
        let n = self.len();
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            result.push(self.pop());
        }
        result
    }

    /// Drain the heap into reverse pop order, so a max-heap used for top-k
    /// selection yields ascending-by-metric output.
    pub fn report_reversed(self) -> Vec<MetricPoint> {
        let mut result = self.report();
        result.reverse();
        result
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn is_leaf(&self, i: usize) -> bool {
        i > self.points.len() / 2
    }

    /// True if the element at `child` must sit above the element at `parent`.
    fn violates_order(&self, child: usize, parent: usize) -> bool {
        if self.is_min {
            self.points[child].metric < self.points[parent].metric
        } else {
            self.points[child].metric > self.points[parent].metric
        }
    }

    /// Sift the element at `i` down until both children respect heap order.
    fn heapify(&mut self, i: usize) {
        let size = self.points.len();
        if size <= 1 || self.is_leaf(i) {
            return;
        }
        let l = Self::left(i);
        let r = Self::right(i);
        let mut top = i;
        if l < size && self.violates_order(l, top) {
            top = l;
        }
        if r < size && self.violates_order(r, top) {
            top = r;
        }
        if top != i {
            self.points.swap(i, top);
            self.heapify(top);
        }
    }
}
