//! Input handling - pointer/wheel interaction with the mind map
//!
//! The host forwards discrete pointer events; this module runs the
//! pan/click state machine and selection tracking. Wheel zoom is handled
//! independently of the drag state.

use egui::Pos2;

use super::camera::Camera;
use super::spatial::SpatialIndex;

/// Press/release movement under this many screen pixels counts as a click.
const CLICK_DRAG_TOLERANCE: f32 = 4.0;

/// Wheel delta to multiplicative zoom factor (per event).
const WHEEL_ZOOM_RATE: f32 = 0.001;

/// Extra screen-pixel slop around node boundaries for hit testing.
const HIT_SLOP: f32 = 2.0;

/// Discrete pointer events as the host reports them (screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    Leave,
}

/// Events the core emits back to the host. The host decides what
/// navigation or detail action results; the core never navigates itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    /// A node became selected.
    NodeClicked(String),
    /// The selection was cleared (re-click or background click).
    SelectionCleared,
}

/// Drag-state machine: background presses pan, node presses arm a click.
#[derive(Debug, Clone, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Panning {
        last: Pos2,
        moved: f32,
    },
    Pressed {
        start: Pos2,
        node: String,
    },
}

/// Tracks pointer state for the mind-map view.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    drag: DragState,
    pub hovered_node: Option<String>,
    pub selected_node: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.drag, DragState::Panning { .. })
    }

    /// Toggle selection: clicking the selected node deselects it.
    fn toggle_selection(&mut self, node_id: &str) -> GraphEvent {
        if self.selected_node.as_deref() == Some(node_id) {
            self.selected_node = None;
            GraphEvent::SelectionCleared
        } else {
            self.selected_node = Some(node_id.to_string());
            GraphEvent::NodeClicked(node_id.to_string())
        }
    }

    /// Drop selection/hover referencing nodes a new scene no longer has.
    pub fn prune(&mut self, node_exists: impl Fn(&str) -> bool) {
        if let Some(id) = self.selected_node.as_deref() {
            if !node_exists(id) {
                self.selected_node = None;
            }
        }
        if let Some(id) = self.hovered_node.as_deref() {
            if !node_exists(id) {
                self.hovered_node = None;
            }
        }
    }
}

/// Node under a screen position, if any.
fn hit_test(screen_pos: Pos2, camera: &Camera, spatial: &SpatialIndex) -> Option<String> {
    let transform = camera.transform();
    let layout_pos = transform.screen_to_layout(screen_pos);
    let threshold = HIT_SLOP / transform.scale;
    spatial
        .hit_test([layout_pos.x, layout_pos.y], threshold)
        .map(|n| n.id.clone())
}

/// Process one pointer event: update the camera/state, return any events
/// for the host. Idempotent under rapid repeats - only the latest
/// transform matters.
pub fn handle_pointer(
    event: PointerEvent,
    camera: &mut Camera,
    state: &mut InputState,
    spatial: &SpatialIndex,
) -> Vec<GraphEvent> {
    let mut events = Vec::new();

    match event {
        PointerEvent::Down(pos) => {
            state.drag = match hit_test(pos, camera, spatial) {
                Some(node) => DragState::Pressed { start: pos, node },
                None => DragState::Panning {
                    last: pos,
                    moved: 0.0,
                },
            };
        }

        PointerEvent::Move(pos) => {
            match &mut state.drag {
                DragState::Panning { last, moved } => {
                    let delta = pos - *last;
                    *moved += delta.length();
                    *last = pos;
                    camera.pan(delta);
                }
                DragState::Pressed { start, .. } => {
                    // A press that wanders stops being a click; node
                    // presses never pan.
                    if (pos - *start).length() > CLICK_DRAG_TOLERANCE {
                        state.drag = DragState::Idle;
                    }
                }
                DragState::Idle => {}
            }
            state.hovered_node = hit_test(pos, camera, spatial);
        }

        PointerEvent::Up(pos) => {
            match std::mem::take(&mut state.drag) {
                DragState::Pressed { node, .. } => {
                    // Release over the same node completes the click.
                    if hit_test(pos, camera, spatial).as_deref() == Some(node.as_str()) {
                        events.push(state.toggle_selection(&node));
                    }
                }
                DragState::Panning { moved, .. } => {
                    // A stationary background press/release clears selection.
                    if moved <= CLICK_DRAG_TOLERANCE && state.selected_node.take().is_some() {
                        events.push(GraphEvent::SelectionCleared);
                    }
                }
                DragState::Idle => {}
            }
        }

        PointerEvent::Leave => {
            state.drag = DragState::Idle;
            state.hovered_node = None;
        }
    }

    events
}

/// Wheel zoom, anchored at the cursor. Independent of the drag state.
pub fn handle_wheel(delta_y: f32, cursor: Pos2, camera: &mut Camera) {
    if delta_y == 0.0 {
        return;
    }
    let factor = 1.0 + delta_y * WHEEL_ZOOM_RATE;
    camera.zoom_at(factor, cursor);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::spatial::SpatialNode;
    use egui::Vec2;

    fn setup() -> (Camera, InputState, SpatialIndex) {
        let mut camera = Camera::default();
        camera.set_container_size(Vec2::new(800.0, 600.0));

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(
            vec![
                SpatialNode::new("hub", [100.0, 100.0], 30.0),
                SpatialNode::new("cat:a", [300.0, 100.0], 40.0),
            ]
            .into_iter(),
        );
        (camera, InputState::new(), spatial)
    }

    #[test]
    fn click_on_node_selects_then_deselects() {
        let (mut camera, mut state, spatial) = setup();
        let on_hub = Pos2::new(100.0, 100.0);

        let events = handle_pointer(PointerEvent::Down(on_hub), &mut camera, &mut state, &spatial);
        assert!(events.is_empty());
        let events = handle_pointer(PointerEvent::Up(on_hub), &mut camera, &mut state, &spatial);
        assert_eq!(events, vec![GraphEvent::NodeClicked("hub".to_string())]);
        assert_eq!(state.selected_node.as_deref(), Some("hub"));

        handle_pointer(PointerEvent::Down(on_hub), &mut camera, &mut state, &spatial);
        let events = handle_pointer(PointerEvent::Up(on_hub), &mut camera, &mut state, &spatial);
        assert_eq!(events, vec![GraphEvent::SelectionCleared]);
        assert!(state.selected_node.is_none());
    }

    #[test]
    fn background_drag_pans_camera() {
        let (mut camera, mut state, spatial) = setup();
        let start = Pos2::new(500.0, 400.0);

        handle_pointer(PointerEvent::Down(start), &mut camera, &mut state, &spatial);
        assert!(state.is_panning());
        handle_pointer(
            PointerEvent::Move(Pos2::new(550.0, 370.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        handle_pointer(
            PointerEvent::Up(Pos2::new(550.0, 370.0)),
            &mut camera,
            &mut state,
            &spatial,
        );

        assert_eq!(camera.transform().translate, Vec2::new(50.0, -30.0));
        assert!(!state.is_panning());
    }

    #[test]
    fn background_click_clears_selection() {
        let (mut camera, mut state, spatial) = setup();
        state.selected_node = Some("hub".to_string());

        let empty = Pos2::new(600.0, 500.0);
        handle_pointer(PointerEvent::Down(empty), &mut camera, &mut state, &spatial);
        let events = handle_pointer(PointerEvent::Up(empty), &mut camera, &mut state, &spatial);

        assert_eq!(events, vec![GraphEvent::SelectionCleared]);
        assert!(state.selected_node.is_none());
    }

    #[test]
    fn node_press_with_drag_does_not_pan_or_click() {
        let (mut camera, mut state, spatial) = setup();
        let before = camera.transform();

        handle_pointer(
            PointerEvent::Down(Pos2::new(100.0, 100.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        handle_pointer(
            PointerEvent::Move(Pos2::new(160.0, 100.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        let events = handle_pointer(
            PointerEvent::Up(Pos2::new(160.0, 100.0)),
            &mut camera,
            &mut state,
            &spatial,
        );

        assert!(events.is_empty());
        assert_eq!(camera.transform(), before);
        assert!(state.selected_node.is_none());
    }

    #[test]
    fn leave_resets_to_idle() {
        let (mut camera, mut state, spatial) = setup();
        handle_pointer(
            PointerEvent::Down(Pos2::new(600.0, 500.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        assert!(state.is_panning());

        handle_pointer(PointerEvent::Leave, &mut camera, &mut state, &spatial);
        assert!(!state.is_panning());
        assert!(state.hovered_node.is_none());
    }

    #[test]
    fn hover_tracks_node_under_cursor() {
        let (mut camera, mut state, spatial) = setup();
        handle_pointer(
            PointerEvent::Move(Pos2::new(300.0, 100.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        assert_eq!(state.hovered_node.as_deref(), Some("cat:a"));

        handle_pointer(
            PointerEvent::Move(Pos2::new(700.0, 500.0)),
            &mut camera,
            &mut state,
            &spatial,
        );
        assert!(state.hovered_node.is_none());
    }

    #[test]
    fn wheel_zooms_at_cursor() {
        let (mut camera, _state, _spatial) = setup();
        handle_wheel(120.0, Pos2::new(400.0, 300.0), &mut camera);
        assert!(camera.transform().scale > 1.0);

        handle_wheel(0.0, Pos2::new(400.0, 300.0), &mut camera);
    }

    #[test]
    fn prune_drops_stale_selection() {
        let mut state = InputState::new();
        state.selected_node = Some("client:gone".to_string());
        state.hovered_node = Some("hub".to_string());

        state.prune(|id| id == "hub");
        assert!(state.selected_node.is_none());
        assert_eq!(state.hovered_node.as_deref(), Some("hub"));
    }
}
