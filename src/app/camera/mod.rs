mod animator;
mod framing;
mod projection;

use glam::Vec3;

pub(in crate::app) use animator::CameraAnimator;
pub(in crate::app) use framing::{CameraMove, Framer, Framing};
pub(in crate::app) use projection::{Projected, Projection};

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 5000.0;
const MAX_PITCH: f32 = 1.5;

/// Camera position plus the point it looks at. The view orientation is always
/// derived from the pair, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraRig {
    pub(in crate::app) fn new(framing: Framing) -> Self {
        Self {
            position: framing.position,
            target: framing.look_at,
        }
    }

    pub(in crate::app) fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub(in crate::app) fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let current_yaw = offset.x.atan2(offset.z);
        let current_pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let next_yaw = current_yaw + yaw;
        let next_pitch = (current_pitch + pitch).clamp(-MAX_PITCH, MAX_PITCH);

        let direction = Vec3::new(
            next_pitch.cos() * next_yaw.sin(),
            next_pitch.sin(),
            next_pitch.cos() * next_yaw.cos(),
        );
        self.position = self.target + direction * radius;
    }

    /// Moves the camera along its view axis; `factor < 1` moves closer.
    pub(in crate::app) fn dolly(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON || !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let next = (radius * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = self.target + offset * (next / radius);
    }
}
