//! Play field topology
//!
//! The visible screen spans `[0, width] x [0, height]`. A dead zone of
//! margin surrounds it; entities only wrap (or, for bullets, get removed) once
//! they leave the extended rectangle `[-dead_zone, width + dead_zone]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Extended play field rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub dead_zone: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, dead_zone: f32) -> Self {
        Self {
            width,
            height,
            dead_zone,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::splat(-self.dead_zone)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width + self.dead_zone, self.height + self.dead_zone)
    }

    /// Distance covered by one full trip across the extended field
    #[inline]
    pub fn span(&self) -> Vec2 {
        self.max() - self.min()
    }

    /// Teleport a position that left the extended field to the opposite edge,
    /// keeping the overflow distance
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        let min = self.min();
        let max = self.max();
        let span = self.span();
        Vec2::new(
            wrap_axis(pos.x, min.x, max.x, span.x),
            wrap_axis(pos.y, min.y, max.y, span.y),
        )
    }

    /// True once a point lies strictly past any edge of the extended field
    pub fn is_outside(&self, pos: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        pos.x < min.x || pos.x > max.x || pos.y < min.y || pos.y > max.y
    }

    /// True for points on or inside the extended field
    pub fn contains(&self, pos: Vec2) -> bool {
        !self.is_outside(pos)
    }
}

#[inline]
fn wrap_axis(v: f32, min: f32, max: f32, span: f32) -> f32 {
    if v < min {
        v + span
    } else if v > max {
        v - span
    } else {
        v
    }
}
