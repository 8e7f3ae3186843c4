//! Geometry kernel - stateless pure functions over layout space
//!
//! Everything here is deterministic and total: coincident inputs produce
//! stable no-op results (None / zero-size boxes), never NaN.

use egui::{Pos2, Rect, Vec2};

use super::types::Node;

/// Segments shorter than this after shortening are treated as degenerate
/// and skipped by callers.
pub const MIN_SEGMENT_LEN: f32 = 2.0;

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Bounding box of all nodes, inflated by each node's collision radius so
/// the box fully contains rendered shapes, not just centers. `None` when
/// there are no nodes.
pub fn bounding_box(nodes: &[Node]) -> Option<Rect> {
    let mut iter = nodes.iter();
    let first = iter.next()?;

    let mut bounds = footprint(first);
    for node in iter {
        bounds = bounds.union(footprint(node));
    }
    Some(bounds)
}

/// Square footprint of a node's collision circle.
pub fn footprint(node: &Node) -> Rect {
    let r = node.collision_radius();
    Rect::from_center_size(node.center, Vec2::splat(r * 2.0))
}

/// Line segment between the boundaries of two collision circles, pulled in
/// by `gap` on each end. `None` when the centers coincide or the shapes
/// (plus gaps) overlap enough that no drawable segment remains - callers
/// skip the draw rather than render a degenerate line.
pub fn shorten_segment(
    center_a: Pos2,
    radius_a: f32,
    center_b: Pos2,
    radius_b: f32,
    gap: f32,
) -> Option<(Pos2, Pos2)> {
    let delta = center_b - center_a;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return None;
    }

    let trim_a = radius_a + gap;
    let trim_b = radius_b + gap;
    if dist - trim_a - trim_b < MIN_SEGMENT_LEN {
        return None;
    }

    let dir = delta / dist;
    let start = center_a + dir * trim_a;
    let end = center_b - dir * trim_b;
    Some((start, end))
}

// =============================================================================
// TESTS
// =============================================================================
