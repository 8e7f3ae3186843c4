//! Scene renderer - turns a scene + transform into drawable primitives
//!
//! Pure function of `(scene, camera, selection)`. The output is a flat
//! list of screen-space primitives so the host can draw on whatever
//! surface it owns (SVG, canvas, GPU); nothing here touches a concrete
//! rendering API.
//!
//! Draw order: edges first, then nodes, so lines sit underneath shapes.
//! Edge segments terminate at shape boundaries, never centers.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use super::camera::{visible_rect, Camera, Transform};
use super::colors::{self, NodeVisual};
use super::geometry;
use super::types::{Edge, EdgeTier, Node, NodeKind, NodePayload, NodeShape, Scene};

/// Gap between an edge end and the shape boundary (layout units).
const EDGE_GAP: f32 = 4.0;

/// Selection ring clearance around the node footprint (layout units).
const SELECTION_RING_GAP: f32 = 5.0;

/// Attention halo clearance (layout units).
const ATTENTION_HALO_GAP: f32 = 9.0;

/// A drawable primitive in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
        dashed: bool,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    RoundedRect {
        rect: Rect,
        corner_radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Text {
        pos: Pos2,
        text: String,
        size: f32,
        color: Color32,
    },
}

/// Renders scenes into primitive lists.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    /// Labels are dropped below this scale (too small to read).
    pub label_min_scale: f32,
    /// Opacity multiplier for ghosted (dormant/archived) nodes.
    pub ghost_opacity: f32,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self {
            label_min_scale: 0.45,
            ghost_opacity: 0.25,
        }
    }
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the primitive list for one frame.
    pub fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        selection: Option<&str>,
    ) -> Vec<DrawPrimitive> {
        let mut transform = camera.transform();
        if !transform.is_finite() {
            // Programmer error upstream; fail fast in dev, draw something
            // sane in production.
            debug_assert!(false, "non-finite viewport transform reached the renderer");
            transform = Transform::identity();
        }

        let container = camera.container();
        let cull = if container.x > 0.0 && container.y > 0.0 {
            Some(visible_rect(&transform, container).expand(EDGE_GAP * 2.0))
        } else {
            None
        };

        let mut out = Vec::with_capacity(scene.edges.len() + scene.nodes.len() * 3);

        for edge in &scene.edges {
            self.render_edge(&mut out, edge, scene, &transform, cull);
        }
        for node in &scene.nodes {
            if let Some(cull) = cull {
                if !cull.intersects(geometry::footprint(node)) {
                    continue;
                }
            }
            self.render_node(&mut out, node, &transform, selection == Some(node.id.as_str()));
        }

        out
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    fn render_edge(
        &self,
        out: &mut Vec<DrawPrimitive>,
        edge: &Edge,
        scene: &Scene,
        transform: &Transform,
        cull: Option<Rect>,
    ) {
        // Dangling edges are dropped silently, not treated as fatal.
        let (Some(from), Some(to)) = (scene.node(&edge.from), scene.node(&edge.to)) else {
            return;
        };

        if let Some(cull) = cull {
            if !cull.intersects(geometry::footprint(from)) && !cull.intersects(geometry::footprint(to))
            {
                return;
            }
        }

        // Terminate at shape boundaries; degenerate segments are skipped.
        let Some((start, end)) = geometry::shorten_segment(
            from.center,
            from.collision_radius(),
            to.center,
            to.collision_radius(),
            EDGE_GAP,
        ) else {
            return;
        };

        let (color, width) = colors::edge_stroke(edge.tier);
        out.push(DrawPrimitive::Line {
            from: transform.layout_to_screen(start),
            to: transform.layout_to_screen(end),
            stroke: Stroke::new(width * transform.scale, color),
            dashed: edge.tier == EdgeTier::Secondary,
        });
    }

    // =========================================================================
    // NODES
    // =========================================================================

    fn render_node(
        &self,
        out: &mut Vec<DrawPrimitive>,
        node: &Node,
        transform: &Transform,
        selected: bool,
    ) {
        // Unknown kinds draw as clients rather than breaking the frame.
        match node.kind {
            NodeKind::Hub => self.render_hub(out, node, transform),
            NodeKind::Category => self.render_category(out, node, transform),
            _ => self.render_client(out, node, transform),
        }

        if selected {
            self.render_selection_ring(out, node, transform);
        }
    }

    fn render_hub(&self, out: &mut Vec<DrawPrimitive>, node: &Node, transform: &Transform) {
        let visual = colors::hub_visual();
        self.render_shape(out, node, transform, &visual);

        if transform.scale >= self.label_min_scale {
            let center = transform.layout_to_screen(node.center);
            out.push(text(center, &node.label, 15.0 * transform.scale, visual.text));

            if let NodePayload::Hub {
                client_count,
                open_tasks,
            } = &node.payload
            {
                let sub = format!("{client_count} clients · {open_tasks} open");
                let below = center + Vec2::new(0.0, 16.0 * transform.scale);
                out.push(text(below, &sub, 10.0 * transform.scale, dim(visual.text)));
            }
        }
    }

    fn render_category(&self, out: &mut Vec<DrawPrimitive>, node: &Node, transform: &Transform) {
        let visual = colors::category_visual();
        self.render_shape(out, node, transform, &visual);

        if transform.scale >= self.label_min_scale {
            let center = transform.layout_to_screen(node.center);
            out.push(text(center, &node.label, 13.0 * transform.scale, visual.text));

            if let NodePayload::Category {
                member_count,
                completion,
                ..
            } = &node.payload
            {
                let sub = format!("{member_count} · {:.0}%", completion * 100.0);
                let below = center + Vec2::new(0.0, 13.0 * transform.scale);
                out.push(text(below, &sub, 9.0 * transform.scale, dim(visual.text)));
            }
        }
    }

    fn render_client(&self, out: &mut Vec<DrawPrimitive>, node: &Node, transform: &Transform) {
        let visual = match &node.payload {
            NodePayload::Client {
                status_key,
                tier_key,
                ..
            } => colors::client_visual(status_key, tier_key),
            // Payload of an unexpected shape still draws a plain pill.
            _ => NodeVisual::default(),
        };
        self.render_shape(out, node, transform, &visual);

        if visual.attention {
            let center = transform.layout_to_screen(node.center);
            out.push(DrawPrimitive::Circle {
                center,
                radius: (node.collision_radius() + ATTENTION_HALO_GAP) * transform.scale,
                fill: Color32::TRANSPARENT,
                stroke: Stroke::new(1.5 * transform.scale, colors::attention_halo()),
            });
        }

        if transform.scale >= self.label_min_scale {
            let center = transform.layout_to_screen(node.center);
            let color = self.apply_ghost(visual.text, visual.ghosted);
            out.push(text(center, &node.label, 11.0 * transform.scale, color));

            if let NodePayload::Client {
                task_count,
                completed_count,
                ..
            } = &node.payload
            {
                if *task_count > 0 {
                    let sub = format!("{completed_count}/{task_count}");
                    let below = center + Vec2::new(0.0, 11.0 * transform.scale);
                    out.push(text(below, &sub, 8.0 * transform.scale, dim(color)));
                }
            }
        }
    }

    /// Shape primitive for a node, with ghost opacity applied.
    fn render_shape(
        &self,
        out: &mut Vec<DrawPrimitive>,
        node: &Node,
        transform: &Transform,
        visual: &NodeVisual,
    ) {
        let fill = self.apply_ghost(visual.fill, visual.ghosted);
        let border = self.apply_ghost(visual.border, visual.ghosted);
        let stroke = Stroke::new(visual.border_width * transform.scale, border);
        let center = transform.layout_to_screen(node.center);

        match node.shape {
            NodeShape::Circle { radius } => out.push(DrawPrimitive::Circle {
                center,
                radius: radius * transform.scale,
                fill,
                stroke,
            }),
            NodeShape::RoundedRect {
                size,
                corner_radius,
            } => out.push(DrawPrimitive::RoundedRect {
                rect: Rect::from_center_size(center, size * transform.scale),
                corner_radius: corner_radius * transform.scale,
                fill,
                stroke,
            }),
        }
    }

    fn render_selection_ring(
        &self,
        out: &mut Vec<DrawPrimitive>,
        node: &Node,
        transform: &Transform,
    ) {
        out.push(DrawPrimitive::Circle {
            center: transform.layout_to_screen(node.center),
            radius: (node.collision_radius() + SELECTION_RING_GAP) * transform.scale,
            fill: Color32::TRANSPARENT,
            stroke: Stroke::new(2.0 * transform.scale, colors::selection_ring()),
        });
    }

    fn apply_ghost(&self, color: Color32, ghosted: bool) -> Color32 {
        if ghosted {
            color.gamma_multiply(self.ghost_opacity)
        } else {
            color
        }
    }
}

fn text(pos: Pos2, text: &str, size: f32, color: Color32) -> DrawPrimitive {
    DrawPrimitive::Text {
        pos,
        text: text.to_string(),
        size,
        color,
    }
}

fn dim(color: Color32) -> Color32 {
    color.gamma_multiply(0.7)
}

// =============================================================================
// TESTS
// =============================================================================
