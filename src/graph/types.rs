//! Core types for the relationship mind-map
//!
//! Snapshot types mirror the host's business-layer summaries; scene types
//! are the computed output optimized for rendering and hit testing.

use egui::{Pos2, Vec2};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::geometry;
use crate::error::SnapshotError;

// =============================================================================
// SNAPSHOT INPUT (from the data/business layer)
// =============================================================================

/// Category key assigned to clients the host failed to classify.
pub const UNCATEGORIZED_KEY: &str = "uncategorized";

/// One client, pre-classified by the host (category/status/tier are
/// business decisions made upstream - the core only consumes them).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category_key: Option<String>,
    pub status_key: String,
    pub tier_key: String,
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub completed_count: u32,
}

/// One task, used only for hub-level aggregates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: Uuid,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub completed: bool,
}

/// A shared reconciliation concern linking several clients; drives the
/// secondary (cross-category) edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub client_ids: Vec<Uuid>,
}

/// Read-only data snapshot the host supplies per refresh. The scene is
/// rebuilt wholesale from each snapshot - no incremental patching.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default)]
    pub clients: Vec<ClientSummary>,
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
    #[serde(default)]
    pub reconciliations: Vec<ReconciliationSummary>,
}

impl DataSnapshot {
    /// Decode a snapshot the host delivers as JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// SCENE TYPES (computed for rendering)
// =============================================================================

/// Node kind drives renderer dispatch. Marked non-exhaustive so future
/// kinds fall through to the client draw routine instead of breaking hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeKind {
    Hub,
    Category,
    Client,
}

/// Node footprint in layout space. `center` is always the geometric
/// center, never a corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Circle { radius: f32 },
    RoundedRect { size: Vec2, corner_radius: f32 },
}

/// Kind-specific read-only summary carried for presentation. The core
/// never interprets business meaning, only renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Hub {
        client_count: usize,
        open_tasks: usize,
    },
    Category {
        key: String,
        member_count: usize,
        /// Aggregate task completion of the members, 0.0-1.0.
        completion: f32,
    },
    Client {
        status_key: String,
        tier_key: String,
        task_count: u32,
        completed_count: u32,
    },
}

/// A positioned node in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub center: Pos2,
    pub shape: NodeShape,
    pub payload: NodePayload,
}

impl Node {
    /// Effective circular footprint used for overlap checks and edge
    /// shortening: the radius for circles, `max(w, h) / 2` for rects.
    pub fn collision_radius(&self) -> f32 {
        match self.shape {
            NodeShape::Circle { radius } => radius,
            NodeShape::RoundedRect { size, .. } => size.max_elem() / 2.0,
        }
    }
}

/// Structural weight of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTier {
    /// hub->category and category->client relationships.
    Primary,
    /// Cross-category reconciliation links, rendered fainter/dashed.
    Secondary,
}

/// An edge between two nodes, referenced by id only. Geometry is derived
/// at render time from the referenced nodes' current centers.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub tier: EdgeTier,
}

/// Complete positioned scene, rebuilt per data snapshot.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, keeping the id index current.
    pub fn push_node(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Collision-radius-inclusive bounding box of all nodes; `None` for an
    /// empty scene.
    pub fn bounds(&self) -> Option<egui::Rect> {
        geometry::bounding_box(&self.nodes)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Layout tunables. Defaults are the values the visual scenarios were
/// tuned against; hosts may override via settings files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Hub circle radius.
    pub hub_radius: f32,
    /// Category rounded-rect size.
    pub category_size: Vec2,
    pub category_corner_radius: f32,
    /// Client pill size.
    pub client_size: Vec2,
    pub client_corner_radius: f32,
    /// Base radius of the category ring (grown as needed to avoid overlap).
    pub ring_radius: f32,
    /// Base radius of each category's client fan.
    pub fan_radius: f32,
    /// Fan radius growth per member past `density_threshold`.
    pub fan_radius_step: f32,
    /// Members beyond this count widen the fan ring.
    pub density_threshold: usize,
    /// Fan span stops growing past this many members.
    pub max_fanout: usize,
    /// Angular span of a full fan (radians).
    pub max_fan_span: f32,
    /// Required clearance between sibling shapes.
    pub sibling_margin: f32,
    /// Hard cap on separation passes so one layout cannot stall the UI
    /// thread.
    pub relax_iterations: usize,
    /// Stop early once no correction exceeds this (layout units).
    pub relax_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hub_radius: 56.0,
            category_size: Vec2::new(148.0, 56.0),
            category_corner_radius: 12.0,
            client_size: Vec2::new(124.0, 44.0),
            client_corner_radius: 22.0,
            ring_radius: 260.0,
            fan_radius: 160.0,
            fan_radius_step: 14.0,
            density_threshold: 6,
            max_fanout: 12,
            max_fan_span: std::f32::consts::PI * 1.5,
            sibling_margin: 12.0,
            relax_iterations: 20,
            relax_tolerance: 0.5,
        }
    }
}

/// Viewport tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Auto-fit padding as a fraction of the larger bbox dimension.
    pub fit_padding: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            fit_padding: 0.10,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
