use eframe::egui::{self, Pos2, Ui};

use super::super::ViewModel;
use super::super::camera::Projected;

const ORBIT_RADIANS_PER_POINT: f32 = 0.006;
const PICK_SLOP: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_orbit(&mut self, response: &egui::Response) {
        if self.animator.is_animating() || !response.dragged_by(egui::PointerButton::Primary) {
            return;
        }

        let delta = response.drag_delta();
        if delta == egui::Vec2::ZERO {
            return;
        }

        self.camera.orbit(
            -delta.x * ORBIT_RADIANS_PER_POINT,
            delta.y * ORBIT_RADIANS_PER_POINT,
        );
    }

    pub(in crate::app) fn handle_dolly(&mut self, ui: &Ui, response: &egui::Response) {
        if self.animator.is_animating() || !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let factor = (1.0 - (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.dolly(factor);
    }
}

/// The node under `pointer`, preferring the one nearest the camera when
/// discs overlap.
pub(in crate::app) fn pick_node(
    pointer: Pos2,
    projected: &[Option<Projected>],
    radii: &[f32],
) -> Option<usize> {
    projected
        .iter()
        .zip(radii)
        .enumerate()
        .filter_map(|(index, (point, radius))| {
            let point = point.as_ref()?;
            (point.screen.distance(pointer) <= radius + PICK_SLOP).then_some((index, point.depth))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
