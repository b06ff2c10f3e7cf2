//! Bucket quad tree: a fixed-capacity point bucket per node, subdividing
//! into four quadrants on overflow.
//!
//! Unlike the kd-tree, points carry their identity through every operation:
//! a stored point can be looked up by exact coordinates, re-tagged in place,
//! and excluded from queries by index. Capacity is a one-time subdivision
//! trigger — points already stored in a node stay there after it subdivides.

use crate::geometry::{squared_distance, IndexPoint, Point, Rect};
use crate::knn::NearestCollector;

/// Bucket size a node fills before subdividing.
pub const DEFAULT_CAPACITY: usize = 4;

/// A bucketed quad tree over [`IndexPoint`]s.
#[derive(Debug, Clone)]
pub struct QuadTree {
    capacity: usize,
    points: Vec<IndexPoint>,
    boundary: Rect,

    ne: Option<Box<QuadTree>>,
    se: Option<Box<QuadTree>>,
    sw: Option<Box<QuadTree>>,
    nw: Option<Box<QuadTree>>,
}

impl QuadTree {
    /// Create an empty tree covering `boundary` with the default capacity.
    pub fn new(boundary: Rect) -> Self {
        Self::with_capacity(boundary, DEFAULT_CAPACITY)
    }

    /// Create an empty tree covering `boundary` with a custom bucket capacity.
    ///
    /// The capacity applies to this node only; nodes created by subdivision
    /// use [`DEFAULT_CAPACITY`].
    pub fn with_capacity(boundary: Rect, capacity: usize) -> Self {
        QuadTree {
            capacity,
            points: Vec::new(),
            boundary,
            ne: None,
            se: None,
            sw: None,
            nw: None,
        }
    }

    /// The region this tree covers.
    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Whether this node has split into quadrants.
    pub fn is_subdivided(&self) -> bool {
        self.ne.is_some()
    }

    /// Insert a point, returning whether it was stored.
    ///
    /// A point outside the boundary is silently rejected with `false`; that
    /// is a defined outcome, not an error.
    pub fn insert(&mut self, p: IndexPoint) -> bool {
        if !self.boundary.contains_point(p.point) {
            return false;
        }

        if self.points.len() < self.capacity && !self.is_subdivided() {
            self.points.push(p);
            return true;
        }

        if !self.is_subdivided() {
            self.subdivide();
        }

        if self.se.as_mut().unwrap().insert(p) {
            return true;
        }
        if self.sw.as_mut().unwrap().insert(p) {
            return true;
        }
        if self.nw.as_mut().unwrap().insert(p) {
            return true;
        }
        if self.ne.as_mut().unwrap().insert(p) {
            return true;
        }
        false
    }

    fn subdivide(&mut self) {
        let x = self.boundary.x;
        let y = self.boundary.y;
        let w = self.boundary.w / 2.0;
        let h = self.boundary.h / 2.0;
        self.ne = Some(Box::new(QuadTree::new(Rect { x: x + w, y, w, h })));
        self.se = Some(Box::new(QuadTree::new(Rect {
            x: x + w,
            y: y + h,
            w,
            h,
        })));
        self.sw = Some(Box::new(QuadTree::new(Rect { x, y: y + h, w, h })));
        self.nw = Some(Box::new(QuadTree::new(Rect { x, y, w, h })));
    }

    /// Find a stored point whose coordinates exactly equal `p`'s.
    ///
    /// Returns the first match: this node's own bucket first, then the
    /// quadrants in ne, se, sw, nw order.
    pub fn search(&self, p: IndexPoint) -> Option<IndexPoint> {
        if !self.boundary.contains_point(p.point) {
            return None;
        }
        for stored in &self.points {
            if stored.point == p.point {
                return Some(*stored);
            }
        }
        if !self.is_subdivided() {
            return None;
        }
        for child in [&self.ne, &self.se, &self.sw, &self.nw] {
            if let Some(found) = child.as_ref().unwrap().search(p) {
                return Some(found);
            }
        }
        None
    }

    /// Re-tag the identity of a stored point found by exact coordinates,
    /// in place, returning the updated point.
    ///
    /// Same traversal and match rule as [`search`](QuadTree::search); the
    /// point does not need to be removed and reinserted.
    pub fn update_index(&mut self, p: IndexPoint, new_index: i64) -> Option<IndexPoint> {
        if !self.boundary.contains_point(p.point) {
            return None;
        }
        for stored in &mut self.points {
            if stored.point == p.point {
                stored.index = new_index;
                return Some(*stored);
            }
        }
        if !self.is_subdivided() {
            return None;
        }
        for child in [&mut self.ne, &mut self.se, &mut self.sw, &mut self.nw] {
            if let Some(updated) = child.as_mut().unwrap().update_index(p, new_index) {
                return Some(updated);
            }
        }
        None
    }

    /// Report every stored point lying inside `r`.
    pub fn query(&self, r: Rect) -> Vec<Point> {
        self.query_filtered(r, None)
    }

    /// As [`query`](QuadTree::query), additionally dropping any point whose
    /// index equals `excluded_index`.
    pub fn query_exclude_index(&self, r: Rect, excluded_index: i64) -> Vec<Point> {
        self.query_filtered(r, Some(excluded_index))
    }

    fn query_filtered(&self, r: Rect, excluded_index: Option<i64>) -> Vec<Point> {
        let mut results = Vec::new();
        self.query_into(r, excluded_index, &mut results);
        results
    }

    fn query_into(&self, r: Rect, excluded_index: Option<i64>, results: &mut Vec<Point>) {
        if self.boundary.is_disjoint(r) {
            return;
        }
        for stored in &self.points {
            if excluded_index == Some(stored.index) {
                continue;
            }
            if r.contains_point(stored.point) {
                results.push(stored.point);
            }
        }
        if !self.is_subdivided() {
            return;
        }
        for child in [&self.ne, &self.se, &self.sw, &self.nw] {
            child.as_ref().unwrap().query_into(r, excluded_index, results);
        }
    }

    /// Report every stored point within `radius` of `center`.
    ///
    /// Runs a rectangular query over a box anchored at
    /// `(center - radius, center - radius)` that is `radius` wide and tall,
    /// then post-filters by squared distance. The box is narrower than the
    /// full circle; callers depend on this footprint, so it stays.
    pub fn query_circle(&self, center: Point, radius: f64) -> Vec<Point> {
        self.query_circle_filtered(center, radius, None)
    }

    /// As [`query_circle`](QuadTree::query_circle), additionally dropping any
    /// point whose index equals `excluded_index`.
    pub fn query_circle_exclude_index(
        &self,
        center: Point,
        radius: f64,
        excluded_index: i64,
    ) -> Vec<Point> {
        self.query_circle_filtered(center, radius, Some(excluded_index))
    }

    fn query_circle_filtered(
        &self,
        center: Point,
        radius: f64,
        excluded_index: Option<i64>,
    ) -> Vec<Point> {
        let bbox = Rect {
            x: center.x - radius,
            y: center.y - radius,
            w: radius,
            h: radius,
        };
        self.query_filtered(bbox, excluded_index)
            .into_iter()
            .filter(|p| squared_distance(center, *p) < radius * radius)
            .collect()
    }

    /// The `k` stored points nearest to `target`, ascending by distance.
    ///
    /// A stored point whose index equals `target.index` is excluded, so a
    /// point never appears in its own neighbor list even at distance zero.
    /// Every node is visited; there is no quadrant pruning.
    pub fn nearest_neighbors(&self, target: IndexPoint, k: usize) -> Vec<IndexPoint> {
        if k == 0 {
            return Vec::new();
        }
        let mut collector = NearestCollector::new(target.point, k);
        self.collect_nearest(&target, &mut collector);
        collector.into_sorted()
    }

    fn collect_nearest(&self, target: &IndexPoint, collector: &mut NearestCollector) {
        for stored in &self.points {
            if stored.index == target.index {
                continue;
            }
            collector.offer(*stored);
        }
        if !self.is_subdivided() {
            return;
        }
        for child in [&self.ne, &self.se, &self.sw, &self.nw] {
            child.as_ref().unwrap().collect_nearest(target, collector);
        }
    }

    /// Empty the bucket and drop all four quadrants, returning this node to
    /// an unsubdivided empty leaf.
    pub fn clear(&mut self) {
        self.points.clear();
        self.ne = None;
        self.se = None;
        self.sw = None;
        self.nw = None;
    }

    /// Count of stored points.
    pub fn size(&self) -> usize {
        let mut count = self.points.len();
        if !self.is_subdivided() {
            return count;
        }
        for child in [&self.ne, &self.se, &self.sw, &self.nw] {
            count += child.as_ref().unwrap().size();
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn boundary() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn random_points(n: usize, seed: u64) -> Vec<IndexPoint> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| IndexPoint::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0), i as i64))
            .collect()
    }

    #[test]
    fn test_insert_and_size() {
        let mut qt = QuadTree::new(boundary());
        assert_eq!(qt.size(), 0);
        assert!(qt.insert(IndexPoint::new(0.0, 0.0, 0)));
        assert_eq!(qt.size(), 1);
        // Outside the boundary: rejected, size unchanged.
        assert!(!qt.insert(IndexPoint::new(-1.0, 0.0, 1)));
        assert_eq!(qt.size(), 1);
        assert!(qt.insert(IndexPoint::new(10.0, 0.0, 2)));
        assert_eq!(qt.size(), 2);

        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..5 {
            let x = rng.gen_range(0.0..100.0);
            let y = rng.gen_range(0.0..100.0);
            assert!(qt.insert(IndexPoint::new(x, y, 3 + i)));
        }
        assert_eq!(qt.size(), 7);
    }

    #[test]
    fn test_subdivision_keeps_existing_points_in_place() {
        let mut qt = QuadTree::with_capacity(boundary(), 2);
        assert!(qt.insert(IndexPoint::new(10.0, 10.0, 0)));
        assert!(qt.insert(IndexPoint::new(20.0, 20.0, 1)));
        assert!(!qt.is_subdivided());
        // Third insert overflows the bucket and triggers the one-time split.
        assert!(qt.insert(IndexPoint::new(30.0, 30.0, 2)));
        assert!(qt.is_subdivided());
        assert_eq!(qt.size(), 3);
        // All three still findable.
        for (x, y) in [(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)] {
            assert!(qt.search(IndexPoint::new(x, y, -1)).is_some());
        }
    }

    #[test]
    fn test_insert_many() {
        let mut qt = QuadTree::new(boundary());
        let points = random_points(500, 4);
        for p in &points {
            assert!(qt.insert(*p));
        }
        assert_eq!(qt.size(), points.len());
    }

    #[test]
    fn test_search_exact_match_only() {
        let mut qt = QuadTree::new(boundary());
        qt.insert(IndexPoint::new(12.5, 40.25, 3));
        let found = qt.search(IndexPoint::new(12.5, 40.25, -1)).unwrap();
        assert_eq!(found.index, 3);
        assert!(qt.search(IndexPoint::new(12.5, 40.26, -1)).is_none());
        assert!(qt.search(IndexPoint::new(-5.0, -5.0, -1)).is_none());
    }

    #[test]
    fn test_update_index_then_search() {
        let mut qt = QuadTree::new(boundary());
        let points = random_points(100, 8);
        for p in &points {
            qt.insert(*p);
        }
        let target = points[37];
        let updated = qt.update_index(target, 9999).unwrap();
        assert_eq!(updated.index, 9999);
        assert_eq!(updated.point, target.point);
        let found = qt.search(target).unwrap();
        assert_eq!(found.index, 9999);
        // Size unchanged by a re-tag.
        assert_eq!(qt.size(), points.len());
    }

    #[test]
    fn test_update_index_missing_point() {
        let mut qt = QuadTree::new(boundary());
        qt.insert(IndexPoint::new(5.0, 5.0, 0));
        assert!(qt.update_index(IndexPoint::new(6.0, 6.0, 0), 1).is_none());
    }

    #[test]
    fn test_query_matches_brute_force() {
        let mut qt = QuadTree::new(boundary());
        let points = random_points(400, 21);
        for p in &points {
            qt.insert(*p);
        }
        let windows = [
            Rect::new(25.0, 25.0, 50.0, 50.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(80.0, 5.0, 15.0, 60.0),
        ];
        for r in windows {
            let mut expected: Vec<Point> = points
                .iter()
                .map(|p| p.point)
                .filter(|p| r.contains_point(*p))
                .collect();
            let mut actual = qt.query(r);
            let key = |p: &Point| (p.x.to_bits(), p.y.to_bits());
            expected.sort_by_key(key);
            actual.sort_by_key(key);
            assert_eq!(actual, expected, "query mismatch for window {:?}", r);
        }
        assert!(qt.query(Rect::new(200.0, 200.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_query_exclude_index() {
        let mut qt = QuadTree::new(boundary());
        qt.insert(IndexPoint::new(10.0, 10.0, 0));
        qt.insert(IndexPoint::new(11.0, 11.0, 1));
        let all = qt.query(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(all.len(), 2);
        let filtered = qt.query_exclude_index(Rect::new(0.0, 0.0, 50.0, 50.0), 1);
        assert_eq!(filtered, vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_query_circle_narrow_box() {
        let mut qt = QuadTree::new(boundary());
        // Inside the narrow box (left/below center) and within the radius.
        qt.insert(IndexPoint::new(48.0, 48.0, 0));
        // Within the radius but right of center: outside the radius-wide box.
        qt.insert(IndexPoint::new(52.0, 50.0, 1));
        // Inside the box but outside the radius.
        qt.insert(IndexPoint::new(41.0, 41.0, 2));
        let center = Point::new(50.0, 50.0);
        let found = qt.query_circle(center, 10.0);
        assert_eq!(found, vec![Point::new(48.0, 48.0)]);
    }

    #[test]
    fn test_query_circle_exclude_index() {
        let mut qt = QuadTree::new(boundary());
        qt.insert(IndexPoint::new(48.0, 48.0, 0));
        qt.insert(IndexPoint::new(47.0, 47.0, 1));
        let center = Point::new(50.0, 50.0);
        assert_eq!(qt.query_circle(center, 10.0).len(), 2);
        let found = qt.query_circle_exclude_index(center, 10.0, 0);
        assert_eq!(found, vec![Point::new(47.0, 47.0)]);
    }

    #[test]
    fn test_nearest_neighbors_excludes_own_index() {
        let mut qt = QuadTree::new(boundary());
        let points = random_points(50, 13);
        for p in &points {
            qt.insert(*p);
        }
        let target = points[10];
        let neighbors = qt.nearest_neighbors(target, 5);
        assert_eq!(neighbors.len(), 5);
        // The target sits at distance zero from itself but must not appear.
        assert!(neighbors.iter().all(|p| p.index != target.index));
        for pair in neighbors.windows(2) {
            assert!(
                squared_distance(target.point, pair[0].point)
                    <= squared_distance(target.point, pair[1].point)
            );
        }
    }

    #[test]
    fn test_nearest_neighbors_matches_brute_force() {
        let mut qt = QuadTree::new(boundary());
        let points = random_points(200, 17);
        for p in &points {
            qt.insert(*p);
        }
        let target = IndexPoint::new(62.0, 31.0, -1);
        let k = 9;
        let result = qt.nearest_neighbors(target, k);
        assert_eq!(result.len(), k);

        let mut expected: Vec<f64> = points
            .iter()
            .map(|p| squared_distance(target.point, p.point))
            .collect();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (i, found) in result.iter().enumerate() {
            assert_eq!(squared_distance(target.point, found.point), expected[i]);
        }
    }

    #[test]
    fn test_nearest_neighbors_k_zero() {
        let mut qt = QuadTree::new(boundary());
        qt.insert(IndexPoint::new(1.0, 1.0, 0));
        assert!(qt.nearest_neighbors(IndexPoint::new(2.0, 2.0, -1), 0).is_empty());
    }

    #[test]
    fn test_clear_resets() {
        let mut qt = QuadTree::with_capacity(boundary(), 2);
        for p in random_points(30, 2) {
            qt.insert(p);
        }
        assert!(qt.is_subdivided());
        qt.clear();
        assert_eq!(qt.size(), 0);
        assert!(!qt.is_subdivided());
        assert!(qt.query(boundary()).is_empty());
        // Back to an insertable leaf.
        assert!(qt.insert(IndexPoint::new(50.0, 50.0, 0)));
        assert_eq!(qt.size(), 1);
    }
}
