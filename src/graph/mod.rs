//! Relationship mind-map visualization module
//!
//! Renders a work hub, its service categories, and their clients as a
//! pannable/zoomable node graph, recomputed per data snapshot.
//!
//! # Architecture
//!
//! ```text
//! DataSnapshot (from the business layer)
//!        │
//!        ▼
//! LayoutEngine (radial placement + sibling separation)
//!        │
//!        ▼
//! Scene (positioned nodes/edges)
//!        │
//!        ├──► SceneRenderer (drawable primitives)
//!        │         ▲
//!        │         │ transform
//!        │    Camera (pan/zoom/auto-fit)
//!        │         ▲
//!        └──► input (pointer/wheel state machine, hit testing)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut view = MindMapView::new();
//! view.set_container_size(Vec2::new(width, height));
//! view.set_snapshot(&snapshot);
//! for event in view.pointer_event(PointerEvent::Down(pos)) { /* host reacts */ }
//! let primitives = view.primitives();
//! ```

pub mod camera;
pub mod colors;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod render;
pub mod spatial;
pub mod types;

pub use camera::{Camera, Transform};
pub use input::{GraphEvent, InputState, PointerEvent};
pub use layout::LayoutEngine;
pub use render::{DrawPrimitive, SceneRenderer};
pub use types::{
    CameraConfig, ClientSummary, DataSnapshot, Edge, EdgeTier, LayoutConfig, Node, NodeKind,
    NodePayload, NodeShape, ReconciliationSummary, Scene, TaskSummary,
};

use egui::Vec2;

use spatial::{SpatialIndex, SpatialNode};

/// Node-count change beyond which a new snapshot re-fits the viewport.
/// Small additions/removals keep the user's pan/zoom; only large topology
/// changes reset it.
const REFIT_NODE_DELTA: usize = 2;

// =============================================================================
// MIND MAP VIEW
// =============================================================================

/// Top-level assembly: owns the camera, input state, layout engine, and
/// the current scene. An explicit object the caller holds - no module
/// globals, no storage, no navigation.
pub struct MindMapView {
    camera: Camera,
    input: InputState,
    engine: LayoutEngine,
    renderer: SceneRenderer,
    scene: Scene,
    spatial: SpatialIndex,
    /// Node count at the last auto-fit; `None` until the first scene.
    fitted_node_count: Option<usize>,
}

impl Default for MindMapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapView {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default(), CameraConfig::default())
    }

    pub fn with_config(layout: LayoutConfig, camera: CameraConfig) -> Self {
        Self {
            camera: Camera::new(camera),
            input: InputState::new(),
            engine: LayoutEngine::with_config(layout),
            renderer: SceneRenderer::new(),
            scene: Scene::new(),
            spatial: SpatialIndex::new(),
            fitted_node_count: None,
        }
    }

    // =========================================================================
    // HOST BOUNDARY
    // =========================================================================

    /// Report the rendering surface size (on mount and on resize).
    pub fn set_container_size(&mut self, size: Vec2) {
        self.camera.set_container_size(size);
        // A pending first fit can now be satisfied.
        if self.fitted_node_count.is_none() && !self.scene.nodes.is_empty() {
            self.fit_to_content();
        }
    }

    /// Take a fresh data snapshot: rebuild the scene wholesale, refresh
    /// the hit-test index, and re-fit the viewport only when the topology
    /// changed materially.
    pub fn set_snapshot(&mut self, snapshot: &DataSnapshot) {
        self.scene = self.engine.build_scene(snapshot);
        self.rebuild_spatial();

        let scene = &self.scene;
        self.input.prune(|id| scene.contains(id));

        let count = self.scene.nodes.len();
        let needs_fit = match self.fitted_node_count {
            None => true,
            Some(prev) => count.abs_diff(prev) > REFIT_NODE_DELTA,
        };
        if needs_fit {
            self.fit_to_content();
        }
    }

    /// Process one pointer event; returns events for the host.
    pub fn pointer_event(&mut self, event: PointerEvent) -> Vec<GraphEvent> {
        input::handle_pointer(event, &mut self.camera, &mut self.input, &self.spatial)
    }

    /// Wheel zoom at the given cursor position.
    pub fn wheel(&mut self, delta_y: f32, cursor: egui::Pos2) {
        input::handle_wheel(delta_y, cursor, &mut self.camera);
    }

    /// Fit the viewport to the current scene (explicit host command, also
    /// used internally per the re-fit policy).
    pub fn fit_to_content(&mut self) {
        self.camera.auto_fit(self.scene.bounds());
        if !self.scene.nodes.is_empty() && self.camera.container().min_elem() > 0.0 {
            self.fitted_node_count = Some(self.scene.nodes.len());
        }
    }

    /// Drawable primitives for the current scene/transform/selection.
    pub fn primitives(&self) -> Vec<DrawPrimitive> {
        self.renderer
            .render(&self.scene, &self.camera, self.input.selected_node.as_deref())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.input.selected_node.as_deref()
    }

    pub fn hovered_node(&self) -> Option<&str> {
        self.input.hovered_node.as_deref()
    }

    pub fn is_panning(&self) -> bool {
        self.input.is_panning()
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn rebuild_spatial(&mut self) {
        self.spatial.rebuild(self.scene.nodes.iter().map(|n| {
            SpatialNode::new(
                n.id.clone(),
                [n.center.x, n.center.y],
                n.collision_radius(),
            )
        }));
    }
}
