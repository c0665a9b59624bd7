use std::time::Duration;

use glam::Vec3;

use crate::error::ViewerError;
use crate::settings::CameraSettings;

const DEGENERATE_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Framing {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct CameraMove {
    pub framing: Framing,
    pub duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub(in crate::app) fn of(points: &[Vec3]) -> Option<Self> {
        let mut finite = points.iter().copied().filter(|point| point.is_finite());
        let first = finite.next()?;
        Some(finite.fold(
            Self {
                min: first,
                max: first,
            },
            |bounds, point| Self {
                min: bounds.min.min(point),
                max: bounds.max.max(point),
            },
        ))
    }

    pub(in crate::app) fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub(in crate::app) fn spread(&self) -> f32 {
        (self.max - self.min).max_element()
    }

    #[cfg(test)]
    fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct Framer {
    settings: CameraSettings,
}

impl Framer {
    pub(in crate::app) fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }

    pub(in crate::app) fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub(in crate::app) fn overview(&self) -> CameraMove {
        CameraMove {
            framing: Framing {
                position: Vec3::new(0.0, 0.0, self.settings.overview_distance),
                look_at: Vec3::ZERO,
            },
            duration: self.settings.node_transition(),
        }
    }

    /// Places the camera on the ray from the origin through `position`,
    /// `node_standoff` units beyond the node.
    pub(in crate::app) fn node(&self, position: Vec3) -> Result<CameraMove, ViewerError> {
        let length = position.length();
        if !position.is_finite() || length < DEGENERATE_EPSILON {
            return Err(ViewerError::DegenerateGeometry {
                subject: format!("node at {position}"),
            });
        }

        let scale = 1.0 + self.settings.node_standoff / length;
        Ok(CameraMove {
            framing: Framing {
                position: position * scale,
                look_at: position,
            },
            duration: self.settings.node_transition(),
        })
    }

    pub(in crate::app) fn cluster(&self, members: &[Vec3]) -> Result<CameraMove, ViewerError> {
        let Some(bounds) = Bounds::of(members) else {
            return Err(ViewerError::DegenerateGeometry {
                subject: "cluster without positioned members".to_owned(),
            });
        };

        let center = bounds.center();
        let distance = (bounds.spread() * 2.0).max(self.settings.cluster_min_distance);
        Ok(CameraMove {
            framing: Framing {
                position: center + Vec3::new(0.0, 0.0, distance),
                look_at: center,
            },
            duration: self.settings.cluster_transition(),
        })
    }
}
