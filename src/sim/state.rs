//! Wave state and entity models
//!
//! Everything one level needs lives in [`Wave`]. Entities expose getters only;
//! the wave mutates them through `tick` and `respawn_ship`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::descriptor::{ShipRecord, WaveDescriptor};
use super::fragment::ImpactVector;
use crate::error::WaveError;
use crate::tuning::Tuning;
use crate::{facing_from_degrees, normalize_degrees};

/// Current phase of a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Ship flying, asteroids remain
    Active,
    /// Ship destroyed, a reserve ship is available
    ShipDestroyed,
    /// Ship destroyed with no reserve left
    Lost,
    /// Field cleared with the ship alive
    Won,
}

impl WavePhase {
    /// Lost and Won never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, WavePhase::Lost | WavePhase::Won)
    }
}

/// Events for the presentation layer (sound, effects), collected per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    BulletFired { position: Vec2 },
    ShipExploded { position: Vec2 },
    AsteroidDestroyed { size: AsteroidSize, position: Vec2 },
    ShipRespawned { lives_left: u32 },
    PhaseChanged(WavePhase),
}

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    /// Size of the fragments this asteroid breaks into
    pub fn smaller(&self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsteroidSize::Small => "small",
            AsteroidSize::Medium => "medium",
            AsteroidSize::Large => "large",
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pos: Vec2,
    /// Degrees in [0, 360)
    angle: f32,
    facing: Vec2,
    vel: Vec2,
}

impl Ship {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        let angle = normalize_degrees(angle);
        Self {
            pos,
            angle,
            facing: facing_from_degrees(angle),
            vel: Vec2::ZERO,
        }
    }

    pub(crate) fn from_record(record: &ShipRecord) -> Self {
        Self::new(Vec2::from(record.position), record.angle)
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    /// Rotate by `delta` degrees (negative turns the other way)
    pub fn turn(&mut self, delta: f32) {
        self.angle = normalize_degrees(self.angle + delta);
        self.facing = facing_from_degrees(self.angle);
    }

    /// Push along the facing direction, capping speed at `max_speed`
    pub fn apply_thrust(&mut self, impulse: f32, max_speed: f32) {
        self.vel += self.facing * impulse;
        let speed = self.vel.length();
        if speed >= max_speed && speed > 0.0 {
            self.vel = self.vel / speed * max_speed;
        }
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn wrap(&mut self, bounds: &Bounds) {
        self.pos = bounds.wrap(self.pos);
    }

    /// Direction source when this ship breaks an asteroid
    pub fn impact_vector(&self) -> ImpactVector {
        if self.vel == Vec2::ZERO {
            ImpactVector::Stationary(self.facing)
        } else {
            ImpactVector::Moving(self.vel)
        }
    }
}

/// A drifting asteroid
#[derive(Debug, Clone, Serialize)]
pub struct Asteroid {
    pos: Vec2,
    vel: Vec2,
    /// Direction it was created with (not normalized)
    direction: Vec2,
    size: AsteroidSize,
    radius: f32,
}

impl Asteroid {
    /// A zero `direction` makes a stationary asteroid
    pub fn new(pos: Vec2, direction: Vec2, size: AsteroidSize, tuning: &Tuning) -> Self {
        let vel = direction.normalize_or_zero() * tuning.asteroid_speed(size);
        Self {
            pos,
            vel,
            direction,
            size,
            radius: tuning.asteroid_radius(size),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn size(&self) -> AsteroidSize {
        self.size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn wrap(&mut self, bounds: &Bounds) {
        self.pos = bounds.wrap(self.pos);
    }
}

/// A shot fired by the ship
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pos: Vec2,
    vel: Vec2,
    /// Ship angle at the moment of firing (degrees)
    direction: f32,
}

impl Bullet {
    /// Spawn at the ship's muzzle, one ship radius ahead of its centre
    pub fn fire(ship: &Ship, tuning: &Tuning) -> Self {
        Self {
            pos: ship.pos + ship.facing * tuning.ship_radius,
            vel: ship.facing * tuning.bullet_speed,
            direction: ship.angle,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn impact_vector(&self) -> ImpactVector {
        ImpactVector::Moving(self.vel)
    }
}

/// One playable level
#[derive(Debug, Clone, Serialize)]
pub struct Wave {
    pub(crate) ship: Option<Ship>,
    /// Stable order: initial asteroids first, fragments appended
    pub(crate) asteroids: Vec<Asteroid>,
    pub(crate) bullets: Vec<Bullet>,
    /// Reserve ships
    pub(crate) lives: u32,
    /// Ticks since the last shot
    pub(crate) fire_cooldown: u32,
    pub(crate) phase: WavePhase,
    pub(crate) ticks: u64,
    pub(crate) events: Vec<GameEvent>,
    descriptor: WaveDescriptor,
    pub(crate) tuning: Tuning,
    pub(crate) bounds: Bounds,
}

impl Wave {
    /// Build a wave from a level descriptor. This is the only fallible step.
    pub fn new(descriptor: WaveDescriptor, tuning: Tuning) -> Result<Self, WaveError> {
        tuning.validate()?;
        let bounds = tuning.bounds();
        descriptor.validate(&bounds)?;

        let ship = Ship::from_record(&descriptor.ship);
        let asteroids: Vec<Asteroid> = descriptor
            .asteroids
            .iter()
            .map(|a| {
                Asteroid::new(
                    Vec2::from(a.position),
                    Vec2::from(a.direction),
                    a.size,
                    &tuning,
                )
            })
            .collect();

        log::info!(
            "Wave ready: {} asteroids, ship at ({}, {}) facing {}°, {} reserve ships",
            asteroids.len(),
            ship.pos.x,
            ship.pos.y,
            ship.angle,
            tuning.starting_lives
        );

        let mut wave = Self {
            ship: Some(ship),
            asteroids,
            bullets: Vec::new(),
            lives: tuning.starting_lives,
            fire_cooldown: 0,
            phase: WavePhase::Active,
            ticks: 0,
            events: Vec::new(),
            descriptor,
            tuning,
            bounds,
        };
        wave.refresh_phase();
        wave.events.clear();
        Ok(wave)
    }

    /// Parse a JSON level and build a wave from it
    pub fn from_json(json: &str, tuning: Tuning) -> Result<Self, WaveError> {
        Self::new(WaveDescriptor::from_json(json)?, tuning)
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == WavePhase::Won
    }

    pub fn is_lost(&self) -> bool {
        self.phase == WavePhase::Lost
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn descriptor(&self) -> &WaveDescriptor {
        &self.descriptor
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Events raised by the most recent tick or respawn
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand the pending events to the caller
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spend a reserve ship: a fresh ship from the level data replaces the
    /// destroyed one
    pub fn respawn_ship(&mut self) -> Result<(), WaveError> {
        if self.phase != WavePhase::ShipDestroyed {
            return Err(WaveError::RespawnUnavailable(self.phase));
        }

        self.events.clear();
        self.lives -= 1;
        self.ship = Some(Ship::from_record(&self.descriptor.ship));
        self.fire_cooldown = 0;
        log::info!("Ship respawned, {} reserve ships left", self.lives);
        self.events.push(GameEvent::ShipRespawned {
            lives_left: self.lives,
        });
        self.refresh_phase();
        Ok(())
    }

    /// Recompute the phase from ship presence, lives and the asteroid field
    pub(crate) fn refresh_phase(&mut self) {
        let phase = match (&self.ship, self.asteroids.is_empty()) {
            (Some(_), true) => WavePhase::Won,
            (Some(_), false) => WavePhase::Active,
            (None, _) if self.lives == 0 => WavePhase::Lost,
            (None, _) => WavePhase::ShipDestroyed,
        };

        if phase != self.phase {
            log::info!("Wave phase {:?} -> {:?} at tick {}", self.phase, phase, self.ticks);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }
}
