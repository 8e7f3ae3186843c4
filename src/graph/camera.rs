//! Camera - pan/zoom transform between layout space and screen space
//!
//! The transform is a plain translate + uniform scale, owned exclusively
//! by the camera and replaced wholesale by auto-fit or mutated
//! incrementally by pan/zoom gestures. The renderer only reads it.

use egui::{Pos2, Rect, Vec2};

use super::types::CameraConfig;

/// `screen = layout * scale + translate`. Scale is kept within the
/// camera's configured limits on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Identity transform (layout space == screen space).
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn layout_to_screen(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.scale + self.translate).to_pos2()
    }

    pub fn screen_to_layout(&self, p: Pos2) -> Pos2 {
        ((p - self.translate).to_vec2() / self.scale).to_pos2()
    }

    /// True when every component is finite and the scale is usable.
    /// Renderer guard against programmer errors reaching draw code.
    pub fn is_finite(&self) -> bool {
        self.translate.x.is_finite()
            && self.translate.y.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
    }
}

/// Visible layout-space rect for a transform and container size.
pub fn visible_rect(transform: &Transform, container: Vec2) -> Rect {
    let min = transform.screen_to_layout(Pos2::ZERO);
    let max = transform.screen_to_layout(container.to_pos2());
    Rect::from_min_max(min, max)
}

// =============================================================================
// CAMERA
// =============================================================================

/// Owns the viewport transform and the container size the host reports.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    config: CameraConfig,
    container: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            transform: Transform::identity(),
            config,
            container: Vec2::ZERO,
        }
    }

    /// Current transform (read-only copy).
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn container(&self) -> Vec2 {
        self.container
    }

    /// The host reports container size on mount and on resize; the core
    /// never measures the surface itself.
    pub fn set_container_size(&mut self, size: Vec2) {
        self.container = size;
    }

    /// Pan by a screen-pixel delta (independent of the current scale).
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.transform.translate += screen_delta;
    }

    /// Multiplicative zoom anchored at `cursor` (screen space): the layout
    /// point under the cursor stays under the cursor after the change.
    pub fn zoom_at(&mut self, factor: f32, cursor: Pos2) {
        let old_scale = self.transform.scale;
        let new_scale = (old_scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if (new_scale - old_scale).abs() < 1e-4 {
            return;
        }

        let anchor = self.transform.screen_to_layout(cursor);
        self.transform.scale = new_scale;
        self.transform.translate = cursor.to_vec2() - anchor.to_vec2() * new_scale;
    }

    /// Replace the transform so `bounds` (plus padding) fills the
    /// container, centered. Idempotent for an unchanged scene/container;
    /// ignores pan/zoom history. No-op when the container is unsized or
    /// `bounds` is absent/degenerate, leaving the current transform alone.
    pub fn auto_fit(&mut self, bounds: Option<Rect>) {
        let Some(bounds) = bounds else { return };
        if self.container.x <= 0.0 || self.container.y <= 0.0 {
            return;
        }
        if !(bounds.width() > 0.0) || !(bounds.height() > 0.0) {
            return;
        }

        let pad = bounds.width().max(bounds.height()) * self.config.fit_padding;
        let padded = bounds.expand(pad);

        let scale = (self.container.x / padded.width())
            .min(self.container.y / padded.height())
            .clamp(self.config.min_scale, self.config.max_scale);

        self.transform.scale = scale;
        self.transform.translate =
            self.container / 2.0 - padded.center().to_vec2() * scale;
    }

    /// Visible layout-space bounds for the current transform.
    pub fn visible_bounds(&self) -> Rect {
        visible_rect(&self.transform, self.container)
    }

    /// Back to identity.
    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }
}

// =============================================================================
// TESTS
// =============================================================================
