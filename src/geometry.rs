use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A point in 2D space.
///
/// Compared for equality by exact field match (no epsilon); identity lookups
/// in the quadtree rely on this.
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle, used both for node regions and query windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Create a new rectangle from its origin and size.
    ///
    /// # Panics
    ///
    /// Panics if `w` or `h` is negative.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        assert!(w >= 0.0 && h >= 0.0, "Rect extents must be non-negative");
        Rect { x, y, w, h }
    }

    /// Whether the point lies within the rectangle, edges included.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Whether `other` lies strictly inside this rectangle.
    ///
    /// Strict containment: a rectangle touching an edge is not contained.
    /// The kd-tree uses this to report a whole subtree without per-point
    /// tests, so the strictness matters for correctness, not just speed.
    pub fn contains(&self, other: Rect) -> bool {
        self.x < other.x
            && self.y < other.y
            && self.x + self.w > other.x + other.w
            && self.y + self.h > other.y + other.h
    }

    /// Whether the two rectangles share no points at all.
    pub fn is_disjoint(&self, other: Rect) -> bool {
        let a_left = self.x;
        let a_right = self.x + self.w;
        let a_top = self.y + self.h;
        let a_bottom = self.y;
        let b_left = other.x;
        let b_right = other.x + other.w;
        let b_top = other.y + other.h;
        let b_bottom = other.y;

        a_left > b_right || a_bottom > b_top || a_right < b_left || a_top < b_bottom
    }

    /// Whether the two rectangles share at least one point (edge contact counts).
    pub fn overlaps(&self, other: Rect) -> bool {
        !self.is_disjoint(other)
    }
}

/// A point tagged with a caller-assigned integer identity.
///
/// The index is opaque to the trees: it is only used to exclude a point from
/// its own nearest-neighbor result and to re-tag a stored point via
/// [`QuadTree::update_index`](crate::QuadTree::update_index).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexPoint {
    pub point: Point,
    pub index: i64,
}

impl IndexPoint {
    /// Create an index point from raw coordinates.
    pub fn new(x: f64, y: f64, index: i64) -> Self {
        IndexPoint {
            point: Point { x, y },
            index,
        }
    }

    /// Tag an existing point with an identity.
    pub fn from_point(point: Point, index: i64) -> Self {
        IndexPoint { point, index }
    }
}

/// A point tagged with a transient distance metric.
///
/// Constructed only while a nearest-neighbor query is running and consumed
/// immediately by the [`PointHeap`](crate::PointHeap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPoint {
    pub point: Point,
    pub index: i64,
    pub metric: f64,
}

impl MetricPoint {
    /// Drop the metric, keeping the point and its identity.
    pub fn to_index_point(self) -> IndexPoint {
        IndexPoint {
            point: self.point,
            index: self.index,
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    squared_distance(p, q).sqrt()
}

/// Square of the Euclidean distance between two points.
///
/// Both trees rank nearest-neighbor candidates by this, avoiding the square
/// root per candidate.
pub fn squared_distance(p: Point, q: Point) -> f64 {
    (q.x - p.x) * (q.x - p.x) + (q.y - p.y) * (q.y - p.y)
}
