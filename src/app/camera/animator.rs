use std::time::Duration;

use glam::Vec3;

use super::CameraRig;

pub(in crate::app) fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: CameraRig,
    to: CameraRig,
    started_at: f64,
    duration_secs: f64,
}

impl Tween {
    fn progress(&self, now: f64) -> f32 {
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_secs).clamp(0.0, 1.0) as f32
    }
}

/// Single-slot camera tween. A later [`CameraAnimator::animate`] call replaces
/// whatever is in flight; there is no queue.
#[derive(Debug, Default)]
pub(in crate::app) struct CameraAnimator {
    tween: Option<Tween>,
}

impl CameraAnimator {
    /// Starts a tween from where `rig` is right now, not from the end of any
    /// tween that is still running.
    pub(in crate::app) fn animate(
        &mut self,
        rig: &CameraRig,
        position: Vec3,
        look_at: Vec3,
        duration: Duration,
        now: f64,
    ) {
        self.tween = Some(Tween {
            from: *rig,
            to: CameraRig {
                position,
                target: look_at,
            },
            started_at: now,
            duration_secs: duration.as_secs_f64(),
        });
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub(in crate::app) fn tick(&mut self, rig: &mut CameraRig, now: f64) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };

        let t = tween.progress(now);
        if t >= 1.0 {
            *rig = tween.to;
            self.tween = None;
            return false;
        }

        let eased = ease_in_out_cubic(t);
        rig.position = tween.from.position.lerp(tween.to.position, eased);
        rig.target = tween.from.target.lerp(tween.to.target, eased);
        true
    }
}
