//! Spatial index for click/hover hit testing
//!
//! R-tree (via `rstar`) over layout-space node footprints, rebuilt once
//! per scene. O(log n) lookups keep pointer handling cheap even for large
//! client books.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Index entry: a node's collision circle in layout space.
#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub id: String,
    bounds: AABB<[f32; 2]>,
    pub center: [f32; 2],
    pub radius: f32,
}

impl SpatialNode {
    pub fn new(id: impl Into<String>, center: [f32; 2], radius: f32) -> Self {
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        Self {
            id: id.into(),
            bounds,
            center,
            radius,
        }
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let edge = distance_to_node(*point, self);
        edge * edge
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Distance from a point to the node's boundary (0 inside).
fn distance_to_node(point: [f32; 2], node: &SpatialNode) -> f32 {
    let dx = point[0] - node.center[0];
    let dy = point[1] - node.center[1];
    ((dx * dx + dy * dy).sqrt() - node.radius).max(0.0)
}

/// Hit-test index over the current scene's nodes.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from scratch; call once per new scene.
    pub fn rebuild(&mut self, nodes: impl Iterator<Item = SpatialNode>) {
        let nodes: Vec<_> = nodes.collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    /// Nearest node within `threshold` of `point`, if any.
    pub fn hit_test(&self, point: [f32; 2], threshold: f32) -> Option<&SpatialNode> {
        let search = AABB::from_corners(
            [point[0] - threshold, point[1] - threshold],
            [point[0] + threshold, point[1] + threshold],
        );

        self.tree
            .locate_in_envelope_intersecting(&search)
            .min_by(|a, b| {
                let da = distance_to_node(point, a);
                let db = distance_to_node(point, b);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .filter(|node| distance_to_node(point, node) <= threshold)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
