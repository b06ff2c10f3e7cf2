//! # In-memory 2D point indexes
//!
//! Two independent spatial indexes over points in the plane, sharing one
//! heap-based top-k selection for nearest-neighbor queries:
//!
//! - [`KdTree`] — an adaptive region-splitting binary tree. One point per
//!   node, splitting axis alternating with depth, each node owning a clipped
//!   sub-rectangle of its parent's region. Range queries prune on region
//!   containment/overlap.
//! - [`QuadTree`] — a capacity-triggered quad-subdivision tree. Each node
//!   buckets up to a fixed number of points and splits into four quadrants on
//!   overflow. Supports identity lookup, in-place re-tagging, and exclusion
//!   filters.
//!
//! Both structures are transient and single-threaded: no locking, no
//! persistence, no rebalancing. They are built to be filled and queried from
//! one caller per frame and rebuilt at will.
//!
//! ## Range queries
//!
//! ```rust
//! use point_index::{IndexPoint, QuadTree, Rect};
//!
//! let mut qt = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! assert!(qt.insert(IndexPoint::new(10.0, 20.0, 0)));
//! assert!(qt.insert(IndexPoint::new(60.0, 70.0, 1)));
//! // Points outside the boundary are rejected, not stored.
//! assert!(!qt.insert(IndexPoint::new(-5.0, 20.0, 2)));
//!
//! let found = qt.query(Rect::new(0.0, 0.0, 50.0, 50.0));
//! assert_eq!(found.len(), 1);
//! ```
//!
//! ## Nearest neighbors
//!
//! ```rust
//! use point_index::{IndexPoint, KdTree, Rect};
//!
//! let mut tree = KdTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! tree.insert(IndexPoint::new(10.0, 10.0, 0));
//! tree.insert(IndexPoint::new(50.0, 50.0, 1));
//! tree.insert(IndexPoint::new(90.0, 90.0, 2));
//!
//! let nearest = tree.nearest_neighbors(IndexPoint::new(45.0, 45.0, -1), 2);
//! assert_eq!(nearest.len(), 2);
//! assert_eq!(nearest[0].index, 1);
//! ```

pub mod geometry;
pub mod heap;
pub mod kdtree;
pub mod knn;
pub mod quadtree;

pub use geometry::{distance, squared_distance, IndexPoint, MetricPoint, Point, Rect};
pub use heap::{HeapError, PointHeap};
pub use kdtree::KdTree;
pub use knn::NearestCollector;
pub use quadtree::{QuadTree, DEFAULT_CAPACITY};
