use glam::Vec3;

use crate::model::{Body, Link};
use crate::settings::LayoutSettings;

const ALPHA_MIN: f32 = 0.001;
const MIN_DISTANCE_SQ: f32 = 1.0;

/// Moves node bodies. Implementations see positions and links only, never
/// node content.
pub(in crate::app) trait LayoutEngine {
    /// Advances one step. Returns `true` while bodies are still moving.
    fn tick(&mut self, bodies: &mut [Body], links: &[Link]) -> bool;

    fn is_settled(&self) -> bool;
}

/// Link springs, pairwise charge and a centering pull, cooled by a decaying
/// `alpha` until a fixed tick budget runs out.
pub(in crate::app) struct ForceLayout {
    config: LayoutSettings,
    alpha: f32,
    alpha_decay: f32,
    ticks_left: usize,
}

impl ForceLayout {
    pub(in crate::app) fn new(config: LayoutSettings) -> Self {
        let total_ticks = config.warmup_ticks + config.cooldown_ticks;
        let alpha_decay = if total_ticks == 0 {
            1.0
        } else {
            1.0 - ALPHA_MIN.powf(1.0 / total_ticks as f32)
        };

        Self {
            config,
            alpha: 1.0,
            alpha_decay,
            ticks_left: total_ticks,
        }
    }

    pub(in crate::app) fn warm_up(&mut self, bodies: &mut [Body], links: &[Link]) {
        for _ in 0..self.config.warmup_ticks {
            if !self.tick(bodies, links) {
                break;
            }
        }
    }

    fn apply_links(&self, bodies: &mut [Body], links: &[Link]) {
        let strength = self.config.link_strength * self.alpha;
        for link in links {
            let (source, target) = (link.source.index(), link.target.index());
            if source == target || source >= bodies.len() || target >= bodies.len() {
                continue;
            }

            let delta = (bodies[target].position + bodies[target].velocity)
                - (bodies[source].position + bodies[source].velocity);
            let length = delta.length();
            if length <= f32::EPSILON {
                continue;
            }

            let correction = delta * ((length - self.config.link_distance) / length * strength * 0.5);
            bodies[target].velocity -= correction;
            bodies[source].velocity += correction;
        }
    }

    fn apply_charge(&self, bodies: &mut [Body]) {
        let strength = self.config.charge_strength * self.alpha;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let delta = bodies[j].position - bodies[i].position;
                let distance_sq = delta.length_squared().max(MIN_DISTANCE_SQ);
                let push = delta * (strength / distance_sq);
                bodies[i].velocity += push;
                bodies[j].velocity -= push;
            }
        }
    }

    fn apply_center(&self, bodies: &mut [Body]) {
        let count = bodies.len() as f32;
        let centroid = bodies.iter().map(|body| body.position).sum::<Vec3>() / count;
        let shift = centroid * self.config.center_strength;
        for body in bodies.iter_mut() {
            body.position -= shift;
        }
    }
}

impl LayoutEngine for ForceLayout {
    fn tick(&mut self, bodies: &mut [Body], links: &[Link]) -> bool {
        if self.ticks_left == 0 || bodies.is_empty() {
            self.ticks_left = 0;
            return false;
        }
        self.ticks_left -= 1;

        self.apply_links(bodies, links);
        self.apply_charge(bodies);

        let keep = (1.0 - self.config.velocity_decay).clamp(0.0, 1.0);
        for body in bodies.iter_mut() {
            body.velocity *= keep;
            if !body.velocity.is_finite() {
                body.velocity = Vec3::ZERO;
            }
            body.position += body.velocity;
        }

        self.apply_center(bodies);
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;
        self.ticks_left > 0
    }

    fn is_settled(&self) -> bool {
        self.ticks_left == 0
    }
}
