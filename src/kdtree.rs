//! Region tree: a kd-tree variant holding one point per node.
//!
//! The splitting axis alternates with depth (even depths compare `x`, odd
//! depths compare `y`), and every node carries the axis-aligned region of the
//! plane it is responsible for, clipped from its parent's region at the
//! parent's split coordinate. Range queries use the regions to prune; the
//! nearest-neighbor query deliberately does not — it visits every node and
//! lets the bounded top-k selection do the work.

use crate::geometry::{IndexPoint, Point, Rect};
use crate::knn::NearestCollector;

/// A kd-tree over [`IndexPoint`]s supporting range and nearest-neighbor
/// queries.
///
/// Insertion order determines the tree shape; there is no rebalancing, so
/// adversarial insertion order can degrade operations to linear time.
#[derive(Debug, Clone)]
pub struct KdTree {
    point: Option<IndexPoint>,
    region: Rect,
    left: Option<Box<KdTree>>,
    right: Option<Box<KdTree>>,
}

impl KdTree {
    /// Create an empty tree covering `region`.
    pub fn new(region: Rect) -> Self {
        KdTree {
            point: None,
            region,
            left: None,
            right: None,
        }
    }

    /// Create a tree whose root already holds `p`.
    pub fn with_point(p: IndexPoint, region: Rect) -> Self {
        KdTree {
            point: Some(p),
            region,
            left: None,
            right: None,
        }
    }

    /// The region this node is responsible for.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Insert a point.
    ///
    /// Points are never rejected: the tree accepts coordinates outside its
    /// region, they just land in the outermost slice of it.
    pub fn insert(&mut self, p: IndexPoint) {
        self.insert_at(p, 0);
    }

    fn insert_at(&mut self, p: IndexPoint, depth: usize) {
        let held = match &self.point {
            Some(held) => *held,
            None => {
                self.point = Some(p);
                return;
            }
        };
        if depth % 2 == 0 {
            // Compare x; the region is clipped at the held point's x.
            if p.point.x < held.point.x {
                match &mut self.left {
                    Some(left) => left.insert_at(p, depth + 1),
                    None => {
                        let rect = Rect {
                            x: self.region.x,
                            y: self.region.y,
                            w: held.point.x - self.region.x,
                            h: self.region.h,
                        };
                        self.left = Some(Box::new(KdTree::with_point(p, rect)));
                    }
                }
            } else {
                match &mut self.right {
                    Some(right) => right.insert_at(p, depth + 1),
                    None => {
                        let rect = Rect {
                            x: held.point.x,
                            y: self.region.y,
                            w: self.region.w - (held.point.x - self.region.x),
                            h: self.region.h,
                        };
                        self.right = Some(Box::new(KdTree::with_point(p, rect)));
                    }
                }
            }
        } else {
            // Compare y; the region is clipped at the held point's y.
            if p.point.y < held.point.y {
                match &mut self.left {
                    Some(left) => left.insert_at(p, depth + 1),
                    None => {
                        let rect = Rect {
                            x: self.region.x,
                            y: self.region.y,
                            w: self.region.w,
                            h: held.point.y - self.region.y,
                        };
                        self.left = Some(Box::new(KdTree::with_point(p, rect)));
                    }
                }
            } else {
                match &mut self.right {
                    Some(right) => right.insert_at(p, depth + 1),
                    None => {
                        let rect = Rect {
                            x: self.region.x,
                            y: held.point.y,
                            w: self.region.w,
                            h: self.region.h - (held.point.y - self.region.y),
                        };
                        self.right = Some(Box::new(KdTree::with_point(p, rect)));
                    }
                }
            }
        }
    }

    /// Report every stored point lying inside `r`.
    ///
    /// Per child, a three-way test in this order: if `r` strictly contains
    /// the child's region the whole subtree is reported without per-point
    /// tests; else if `r` overlaps the region the child is searched
    /// recursively; else the child is skipped.
    pub fn query(&self, r: Rect) -> Vec<Point> {
        let mut results = Vec::new();
        self.query_into(r, &mut results);
        results
    }

    fn query_into(&self, r: Rect, results: &mut Vec<Point>) {
        if let Some(held) = &self.point {
            if r.contains_point(held.point) {
                results.push(held.point);
            }
        }
        if let Some(left) = &self.left {
            if r.contains(left.region) {
                left.report_subtree(results);
            } else if r.overlaps(left.region) {
                left.query_into(r, results);
            }
        }
        if let Some(right) = &self.right {
            if r.contains(right.region) {
                right.report_subtree(results);
            } else if r.overlaps(right.region) {
                right.query_into(r, results);
            }
        }
    }

    fn report_subtree(&self, results: &mut Vec<Point>) {
        if let Some(held) = &self.point {
            results.push(held.point);
        }
        if let Some(left) = &self.left {
            left.report_subtree(results);
        }
        if let Some(right) = &self.right {
            right.report_subtree(results);
        }
    }

    /// The `k` stored points nearest to `target`, ascending by distance.
    ///
    /// Visits every node — there is no bounding-region pruning here, matching
    /// the tree's per-frame usage pattern where `k` is small and rebuilds are
    /// frequent. The target's own index is not excluded; use the quadtree if
    /// self-exclusion is needed.
    pub fn nearest_neighbors(&self, target: IndexPoint, k: usize) -> Vec<IndexPoint> {
        if k == 0 {
            return Vec::new();
        }
        let mut collector = NearestCollector::new(target.point, k);
        self.collect_nearest(&mut collector);
        collector.into_sorted()
    }

    fn collect_nearest(&self, collector: &mut NearestCollector) {
        if let Some(held) = &self.point {
            collector.offer(*held);
        }
        if let Some(left) = &self.left {
            left.collect_nearest(collector);
        }
        if let Some(right) = &self.right {
            right.collect_nearest(collector);
        }
    }

    /// Count of stored points.
    pub fn size(&self) -> usize {
        let mut count = usize::from(self.point.is_some());
        if let Some(left) = &self.left {
            count += left.size();
        }
        if let Some(right) = &self.right {
            count += right.size();
        }
        count
    }

    /// Drop the held point and both subtrees, leaving an empty root with the
    /// original region.
    pub fn clear(&mut self) {
        self.point = None;
        self.left = None;
        self.right = None;
    }
}
