//! Data-driven game balance
//!
//! Every constant the simulation reads comes from a [`Tuning`] handed to the
//! wave at construction, so tests can run at any scale. Defaults match
//! [`crate::consts`]; overrides load from JSON with missing fields defaulted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::WaveError;
use crate::sim::{AsteroidSize, Bounds};

/// Gameplay tuning for one wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub width: f32,
    pub height: f32,
    pub dead_zone: f32,

    // === Ship ===
    pub ship_radius: f32,
    /// Degrees per tick
    pub ship_turn_rate: f32,
    /// Velocity added per tick of thrust
    pub ship_impulse: f32,
    pub ship_max_speed: f32,
    /// Ships held in reserve when the wave starts
    pub starting_lives: u32,

    // === Bullets ===
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    /// Ticks that must pass between two shots
    pub fire_rate: u32,

    // === Asteroids ===
    pub small_radius: f32,
    pub medium_radius: f32,
    pub large_radius: f32,
    pub small_speed: f32,
    pub medium_speed: f32,
    pub large_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            dead_zone: DEAD_ZONE,

            ship_radius: SHIP_RADIUS,
            ship_turn_rate: SHIP_TURN_RATE,
            ship_impulse: SHIP_IMPULSE,
            ship_max_speed: SHIP_MAX_SPEED,
            starting_lives: SHIP_LIVES,

            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            fire_rate: BULLET_RATE,

            small_radius: SMALL_RADIUS,
            medium_radius: MEDIUM_RADIUS,
            large_radius: LARGE_RADIUS,
            small_speed: SMALL_SPEED,
            medium_speed: MEDIUM_SPEED,
            large_speed: LARGE_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON, then validate them
    pub fn from_json(json: &str) -> Result<Self, WaveError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides ({}x{})", tuning.width, tuning.height);
        Ok(tuning)
    }

    /// Reject constants the simulation cannot run with
    pub fn validate(&self) -> Result<(), WaveError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ship_radius", self.ship_radius),
            ("ship_turn_rate", self.ship_turn_rate),
            ("ship_impulse", self.ship_impulse),
            ("ship_max_speed", self.ship_max_speed),
            ("bullet_radius", self.bullet_radius),
            ("bullet_speed", self.bullet_speed),
            ("small_radius", self.small_radius),
            ("medium_radius", self.medium_radius),
            ("large_radius", self.large_radius),
            ("small_speed", self.small_speed),
            ("medium_speed", self.medium_speed),
            ("large_speed", self.large_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(WaveError::tuning(field, format!("must be positive, got {value}")));
            }
        }

        if !self.dead_zone.is_finite() || self.dead_zone < 0.0 {
            return Err(WaveError::tuning(
                "dead_zone",
                format!("must be non-negative, got {}", self.dead_zone),
            ));
        }

        // Wrap moves an entity back by one span, so a single step must never
        // carry it a whole span past the edge
        let span = self.bounds().span().min_element();
        for (field, step) in [
            ("ship_max_speed", self.ship_max_speed),
            ("bullet_speed", self.bullet_speed),
        ] {
            if step >= span {
                return Err(WaveError::tuning(
                    field,
                    format!("must be below the play field span {span}, got {step}"),
                ));
            }
        }
        // Fragments start one radius out from their parent and then drift
        for size in [AsteroidSize::Small, AsteroidSize::Medium, AsteroidSize::Large] {
            let reach = self.asteroid_radius(size) + self.asteroid_speed(size);
            if reach >= span {
                return Err(WaveError::tuning(
                    size_speed_field(size),
                    format!("radius plus speed must be below the play field span {span}, got {reach}"),
                ));
            }
        }

        Ok(())
    }

    /// Extended play field derived from the screen size and dead zone
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height, self.dead_zone)
    }

    pub fn asteroid_radius(&self, size: AsteroidSize) -> f32 {
        match size {
            AsteroidSize::Small => self.small_radius,
            AsteroidSize::Medium => self.medium_radius,
            AsteroidSize::Large => self.large_radius,
        }
    }

    pub fn asteroid_speed(&self, size: AsteroidSize) -> f32 {
        match size {
            AsteroidSize::Small => self.small_speed,
            AsteroidSize::Medium => self.medium_speed,
            AsteroidSize::Large => self.large_speed,
        }
    }
}

fn size_speed_field(size: AsteroidSize) -> &'static str {
    match size {
        AsteroidSize::Small => "small_speed",
        AsteroidSize::Medium => "medium_speed",
        AsteroidSize::Large => "large_speed",
    }
}
