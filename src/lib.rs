//! Planetoids - a single-wave asteroids simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, wrap topology, collisions, fragmentation)
//! - `tuning`: Data-driven game balance, injected into every wave
//! - `error`: Construction-time failures
//!
//! Rendering, audio playback and input polling live outside this crate. The
//! simulation reports what happened through [`sim::GameEvent`]s.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::WaveError;
pub use tuning::Tuning;

use glam::Vec2;

/// Default game balance (mirrors the classic Planetoids level files)
pub mod consts {
    /// Play field dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 700.0;
    /// Margin past the visible edges before wrap/removal triggers
    pub const DEAD_ZONE: f32 = 40.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 30.0;
    /// Degrees per tick
    pub const SHIP_TURN_RATE: f32 = 5.0;
    pub const SHIP_IMPULSE: f32 = 0.2;
    pub const SHIP_MAX_SPEED: f32 = 10.0;
    /// Extra ships after the first one
    pub const SHIP_LIVES: u32 = 2;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 10.0;
    /// Ticks between shots
    pub const BULLET_RATE: u32 = 5;

    /// Asteroid radii by size
    pub const SMALL_RADIUS: f32 = 20.0;
    pub const MEDIUM_RADIUS: f32 = 30.0;
    pub const LARGE_RADIUS: f32 = 50.0;
    /// Asteroid speeds by size (pixels per tick)
    pub const SMALL_SPEED: f32 = 4.0;
    pub const MEDIUM_SPEED: f32 = 3.0;
    pub const LARGE_SPEED: f32 = 2.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector pointing along an angle given in degrees
#[inline]
pub fn facing_from_degrees(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Rotate a vector counter-clockwise by an angle in degrees
#[inline]
pub fn rotate_degrees(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle.to_radians()).rotate(v)
}
