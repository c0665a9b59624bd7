use eframe::egui::{Pos2, Rect, pos2};
use glam::{Mat4, Vec3};

use super::CameraRig;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 20_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Projected {
    pub screen: Pos2,
    pub depth: f32,
    pub scale: f32,
}

/// Perspective projection of the rig onto a canvas rect, rebuilt every frame
/// from the rig's position and target.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Projection {
    view_projection: Mat4,
    view: Mat4,
    rect: Rect,
    focal: f32,
}

impl Projection {
    pub(in crate::app) fn new(rig: &CameraRig, rect: Rect, field_of_view_deg: f32) -> Self {
        let fov = field_of_view_deg.clamp(5.0, 150.0).to_radians();
        let aspect = (rect.width() / rect.height().max(1.0)).max(0.01);
        let view = Mat4::look_at_rh(rig.position, rig.target, Vec3::Y);
        let projection = Mat4::perspective_rh(fov, aspect, NEAR_PLANE, FAR_PLANE);

        Self {
            view_projection: projection * view,
            view,
            rect,
            focal: rect.height() * 0.5 / (fov * 0.5).tan(),
        }
    }

    /// `None` for points behind the camera or outside the depth range.
    pub(in crate::app) fn project(&self, point: Vec3) -> Option<Projected> {
        let clip = self.view_projection * point.extend(1.0);
        if clip.w <= NEAR_PLANE {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        if !ndc.is_finite() || ndc.z > 1.0 {
            return None;
        }

        let depth = -(self.view * point.extend(1.0)).z;
        let center = self.rect.center();
        Some(Projected {
            screen: pos2(
                center.x + ndc.x * self.rect.width() * 0.5,
                center.y - ndc.y * self.rect.height() * 0.5,
            ),
            depth,
            scale: self.focal / depth,
        })
    }
}
