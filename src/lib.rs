//! OpsHub relationship mind-map widget
//!
//! This crate contains ONLY the mind-map core - no persistence, no app
//! shell, no navigation. The host dashboard feeds it a read-only data
//! snapshot and pointer/wheel events; it hands back a positioned scene,
//! drawable primitives, and click events.

pub mod error;
pub mod graph;

pub use error::SnapshotError;
pub use graph::{
    // Camera / transform
    Camera,
    CameraConfig,
    // Snapshot input types
    ClientSummary,
    DataSnapshot,
    // Renderer output
    DrawPrimitive,
    // Scene types
    Edge,
    EdgeTier,
    // Events
    GraphEvent,
    // Layout
    LayoutConfig,
    LayoutEngine,
    // Top-level assembly
    MindMapView,
    Node,
    NodeKind,
    NodePayload,
    NodeShape,
    PointerEvent,
    ReconciliationSummary,
    Scene,
    SceneRenderer,
    TaskSummary,
    Transform,
};
