use emath::Pos2;
use serde::Serialize;

use crate::graph::{Edge, Node, weighted_degrees};
use crate::settings::FocusSettings;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub center: Pos2,
    pub zoom: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub focus_node_id: Option<String>,
    pub camera: Option<Camera>,
}

pub fn most_active(degrees: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &degree) in degrees.iter().enumerate() {
        match best {
            Some((_, best_degree)) if degree <= best_degree => {}
            _ => best = Some((index, degree)),
        }
    }
    best.map(|(index, _)| index)
}

pub fn zoom_for(node_count: usize, settings: &FocusSettings) -> f32 {
    if node_count == 0 {
        return 1.0;
    }
    (settings.zoom_numerator / (node_count as f32).sqrt()).clamp(settings.min_zoom, settings.max_zoom)
}

pub fn select_focus(nodes: &[Node], edges: &[Edge], settings: &FocusSettings) -> Focus {
    let degrees = weighted_degrees(nodes, edges);
    let Some(index) = most_active(&degrees) else {
        return Focus::default();
    };

    let node = &nodes[index];
    Focus {
        focus_node_id: Some(node.id.clone()),
        camera: Some(Camera {
            center: node.position + settings.offset,
            zoom: zoom_for(nodes.len(), settings),
        }),
    }
}
