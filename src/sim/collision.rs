//! Collision detection between bullets, the ship and asteroids
//!
//! Every body is a circle. Bullet hits use a doubled reach,
//! `2 * (bullet radius + asteroid radius)`, which is deliberately forgiving
//! compared to the drawn sizes. Ship hits use the plain sum of radii.

use glam::Vec2;

use super::state::{Asteroid, Bullet, Ship};
use crate::tuning::Tuning;

/// Strict overlap test between two centres
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// Centre distance below which a bullet destroys an asteroid
#[inline]
pub fn bullet_reach(bullet_radius: f32, asteroid_radius: f32) -> f32 {
    2.0 * (bullet_radius + asteroid_radius)
}

pub fn bullet_hits_asteroid(bullet: &Bullet, asteroid: &Asteroid, tuning: &Tuning) -> bool {
    within_reach(
        bullet.pos(),
        asteroid.pos(),
        bullet_reach(tuning.bullet_radius, asteroid.radius()),
    )
}

pub fn ship_hits_asteroid(ship: &Ship, asteroid: &Asteroid, tuning: &Tuning) -> bool {
    within_reach(ship.pos(), asteroid.pos(), tuning.ship_radius + asteroid.radius())
}

/// Index of the first asteroid (in field order) the bullet strikes
pub fn first_bullet_hit(bullet: &Bullet, asteroids: &[Asteroid], tuning: &Tuning) -> Option<usize> {
    asteroids
        .iter()
        .position(|asteroid| bullet_hits_asteroid(bullet, asteroid, tuning))
}
