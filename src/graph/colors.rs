//! Status/tier palette for mind-map nodes and edges
//!
//! Maps the host's pre-classified status and tier keys to fills, borders,
//! and emphasis flags. Presentation only - nothing here feeds back into
//! layout positions.

use egui::Color32;

use super::types::EdgeTier;

/// Resolved visual style for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub fill: Color32,
    pub border: Color32,
    pub text: Color32,
    pub border_width: f32,
    /// Render at reduced opacity (dormant/archived clients).
    pub ghosted: bool,
    /// Render an attention halo (overdue/blocked clients).
    pub attention: bool,
}

impl Default for NodeVisual {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgb(55, 65, 81),
            border: Color32::from_rgb(107, 114, 128),
            text: Color32::WHITE,
            border_width: 2.0,
            ghosted: false,
            attention: false,
        }
    }
}

/// Hub node: dark slate disc with a strong border.
pub fn hub_visual() -> NodeVisual {
    NodeVisual {
        fill: Color32::from_rgb(31, 41, 55),
        border: Color32::from_rgb(156, 163, 175),
        border_width: 3.0,
        ..NodeVisual::default()
    }
}

/// Category nodes: indigo family.
pub fn category_visual() -> NodeVisual {
    NodeVisual {
        fill: Color32::from_rgb(49, 46, 129),
        border: Color32::from_rgb(129, 140, 248),
        ..NodeVisual::default()
    }
}

/// Client pills keyed off the host's status classification.
pub fn client_visual(status_key: &str, tier_key: &str) -> NodeVisual {
    let mut visual = match status_key.to_ascii_lowercase().as_str() {
        // Healthy - green family
        "active" | "current" => NodeVisual {
            fill: Color32::from_rgb(21, 128, 61),
            border: Color32::from_rgb(74, 222, 128),
            ..NodeVisual::default()
        },
        // In motion - blue family
        "onboarding" | "pending" => NodeVisual {
            fill: Color32::from_rgb(30, 64, 175),
            border: Color32::from_rgb(96, 165, 250),
            ..NodeVisual::default()
        },
        // Needs a look - amber family
        "review" | "attention" => NodeVisual {
            fill: Color32::from_rgb(146, 64, 14),
            border: Color32::from_rgb(251, 191, 36),
            attention: true,
            ..NodeVisual::default()
        },
        // Late - red family
        "overdue" | "blocked" => NodeVisual {
            fill: Color32::from_rgb(153, 27, 27),
            border: Color32::from_rgb(248, 113, 113),
            attention: true,
            ..NodeVisual::default()
        },
        // Sleeping - gray, ghosted
        "inactive" | "dormant" | "archived" => NodeVisual {
            fill: Color32::from_rgb(55, 65, 81),
            border: Color32::from_rgb(107, 114, 128),
            ghosted: true,
            ..NodeVisual::default()
        },
        _ => NodeVisual::default(),
    };

    // Premium clients get a gold border regardless of status.
    if tier_key.eq_ignore_ascii_case("premium") {
        visual.border = Color32::from_rgb(217, 180, 80);
        visual.border_width = 2.5;
    }
    visual
}

/// Edge stroke (color, width) by tier. Secondary links are fainter; the
/// renderer additionally dashes them.
pub fn edge_stroke(tier: EdgeTier) -> (Color32, f32) {
    match tier {
        EdgeTier::Primary => (Color32::from_rgb(107, 114, 128), 1.5),
        EdgeTier::Secondary => (Color32::from_rgba_unmultiplied(107, 114, 128, 110), 1.0),
    }
}

/// Selection ring color.
pub fn selection_ring() -> Color32 {
    Color32::from_rgb(96, 165, 250)
}

/// Attention halo color.
pub fn attention_halo() -> Color32 {
    Color32::from_rgb(251, 191, 36)
}
