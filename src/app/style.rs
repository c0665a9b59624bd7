use eframe::egui::Color32;

use crate::model::{ClusterId, NodeHandle, NodeRecord};

use super::selection::StyleContext;

pub(in crate::app) const PALETTE: [Color32; 8] = [
    Color32::from_rgb(0x0A, 0x84, 0xFF),
    Color32::from_rgb(0x30, 0xD1, 0x58),
    Color32::from_rgb(0xFF, 0x9F, 0x0A),
    Color32::from_rgb(0xBF, 0x5A, 0xF2),
    Color32::from_rgb(0x64, 0xD2, 0xFF),
    Color32::from_rgb(0xFF, 0x37, 0x5F),
    Color32::from_rgb(0xFF, 0xD6, 0x0A),
    Color32::from_rgb(0x5E, 0x5C, 0xE6),
];

const SELECTED_COLOR: Color32 = Color32::from_rgb(0xFF, 0x45, 0x3A);
const AFFECTED_COLOR: Color32 = Color32::from_rgb(0xFF, 0x3B, 0x30);
// rgba(28, 28, 30, 0.9) and rgba(255, 59, 48, 0.9), premultiplied
const LABEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(25, 25, 27, 230);
const ALERT_LABEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(230, 53, 43, 230);

pub(in crate::app) fn cluster_color(cluster: Option<ClusterId>) -> Color32 {
    let index = cluster.map_or(0, |cluster| cluster.0 as usize % PALETTE.len());
    PALETTE[index]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(in crate::app) enum Emphasis {
    Normal,
    Selected,
    Affected,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct NodeStyle {
    pub emphasis: Emphasis,
    pub color: Color32,
    pub sphere_radius: f32,
    pub glow_radius: f32,
    pub glow_alpha: f32,
    pub ring: bool,
    pub label_background: Color32,
}

const RING_WIDTH: f32 = 1.0;

impl NodeStyle {
    /// Inner and outer radius of the alert ring, just outside the glow.
    pub(in crate::app) fn ring_span(&self) -> Option<(f32, f32)> {
        self.ring.then_some((self.glow_radius, self.glow_radius + RING_WIDTH))
    }
}

pub(in crate::app) fn emphasis(
    handle: NodeHandle,
    record: &NodeRecord,
    context: &StyleContext<'_>,
) -> Emphasis {
    if context.affected.contains(&record.id) {
        return Emphasis::Affected;
    }

    let focused = context.focused_node == Some(handle);
    let in_focused_cluster =
        context.focused_cluster.is_some() && record.cluster == context.focused_cluster;
    if focused || in_focused_cluster {
        Emphasis::Selected
    } else {
        Emphasis::Normal
    }
}

pub(in crate::app) fn resolve(
    handle: NodeHandle,
    record: &NodeRecord,
    context: &StyleContext<'_>,
) -> NodeStyle {
    match emphasis(handle, record, context) {
        Emphasis::Normal => NodeStyle {
            emphasis: Emphasis::Normal,
            color: cluster_color(record.cluster),
            sphere_radius: 3.0,
            glow_radius: 4.0,
            glow_alpha: 0.15,
            ring: false,
            label_background: LABEL_BACKGROUND,
        },
        Emphasis::Selected => NodeStyle {
            emphasis: Emphasis::Selected,
            color: SELECTED_COLOR,
            sphere_radius: 4.0,
            glow_radius: 5.5,
            glow_alpha: 0.15,
            ring: false,
            label_background: LABEL_BACKGROUND,
        },
        Emphasis::Affected => NodeStyle {
            emphasis: Emphasis::Affected,
            color: AFFECTED_COLOR,
            sphere_radius: 4.0,
            glow_radius: 8.0,
            glow_alpha: 0.6,
            ring: true,
            label_background: ALERT_LABEL_BACKGROUND,
        },
    }
}
