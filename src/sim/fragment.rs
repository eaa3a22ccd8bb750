//! Asteroid fragmentation
//!
//! A destroyed medium or large asteroid breaks into three pieces one size
//! down. The pieces leave along the striker's direction of travel and that
//! direction rotated by 120° and 240°.

use glam::Vec2;

use super::state::Asteroid;
use crate::rotate_degrees;
use crate::tuning::Tuning;

/// Pieces produced by breaking one medium or large asteroid
pub const FRAGMENT_COUNT: usize = 3;

/// What struck the asteroid, reduced to the direction that seeds the split
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactVector {
    /// Striker with non-zero velocity (bullet, drifting ship)
    Moving(Vec2),
    /// Ship at rest; its facing stands in for the missing velocity
    Stationary(Vec2),
}

impl ImpactVector {
    /// Unit direction of the impact
    pub fn direction(&self) -> Vec2 {
        let raw = match *self {
            ImpactVector::Moving(vel) => vel,
            ImpactVector::Stationary(facing) => facing,
        };
        raw.try_normalize().unwrap_or_else(|| {
            log::warn!("Degenerate impact vector {raw:?}, splitting along +x");
            Vec2::X
        })
    }
}

/// The three split directions: `dir`, then `dir` rotated by 120° and 240°
pub fn split_directions(dir: Vec2) -> [Vec2; FRAGMENT_COUNT] {
    [dir, rotate_degrees(dir, 120.0), rotate_degrees(dir, 240.0)]
}

/// Children of a destroyed asteroid (none for a small one)
pub fn fragment(parent: &Asteroid, impact: ImpactVector, tuning: &Tuning) -> Vec<Asteroid> {
    let Some(child_size) = parent.size().smaller() else {
        return Vec::new();
    };

    let offset = tuning.asteroid_radius(child_size);
    let children: Vec<Asteroid> = split_directions(impact.direction())
        .into_iter()
        .map(|dir| Asteroid::new(parent.pos() + dir * offset, dir, child_size, tuning))
        .collect();

    log::debug!(
        "{} asteroid at ({:.1}, {:.1}) split into {} {} pieces",
        parent.size().as_str(),
        parent.pos().x,
        parent.pos().y,
        children.len(),
        child_size.as_str()
    );

    children
}
