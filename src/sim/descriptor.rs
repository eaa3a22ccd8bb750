//! Level data for a wave
//!
//! Matches the JSON level files:
//!
//! ```json
//! { "ship": { "position": [400, 300], "angle": 90 },
//!   "asteroids": [ { "position": [100, 100], "direction": [1, 0], "size": "large" } ] }
//! ```

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::state::AsteroidSize;
use crate::error::WaveError;
use crate::tuning::Tuning;

/// Most large asteroids a generated wave starts with
pub const MAX_GENERATED_ASTEROIDS: u32 = 12;
/// Random placements tried per asteroid before giving up
const PLACEMENT_ATTEMPTS: u32 = 64;

/// Ship start record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub position: [f32; 2],
    /// Degrees
    pub angle: f32,
}

/// Asteroid start record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidRecord {
    pub position: [f32; 2],
    /// Travel direction; `[0, 0]` means stationary
    pub direction: [f32; 2],
    pub size: AsteroidSize,
}

/// Immutable source data for one wave, kept for ship respawns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDescriptor {
    pub ship: ShipRecord,
    pub asteroids: Vec<AsteroidRecord>,
}

impl WaveDescriptor {
    /// Decode a JSON level. Missing fields and unknown size tags fail here.
    pub fn from_json(json: &str) -> Result<Self, WaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject data no wave can be built from: non-finite numbers and
    /// positions outside the extended play field
    pub fn validate(&self, bounds: &Bounds) -> Result<(), WaveError> {
        check_position("ship.position", self.ship.position, bounds)?;
        if !self.ship.angle.is_finite() {
            return Err(WaveError::descriptor("ship.angle", "must be finite"));
        }

        for (i, asteroid) in self.asteroids.iter().enumerate() {
            check_position(&format!("asteroids[{i}].position"), asteroid.position, bounds)?;
            if !asteroid.direction.iter().all(|c| c.is_finite()) {
                return Err(WaveError::descriptor(
                    format!("asteroids[{i}].direction"),
                    "must be finite",
                ));
            }
        }

        Ok(())
    }

    /// Procedural wave for play past the authored levels
    ///
    /// Deterministic for a given seed and wave index. The ship starts centred,
    /// facing up; large asteroids spawn near the edges of the field, never
    /// within reach of the ship's start.
    pub fn generate(seed: u64, wave_index: u32, tuning: &Tuning) -> Self {
        let wave_seed = (wave_index as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(seed);
        let mut rng = Pcg32::seed_from_u64(wave_seed);

        let center = Vec2::new(tuning.width / 2.0, tuning.height / 2.0);
        let count = (3 + wave_index).min(MAX_GENERATED_ASTEROIDS);
        // Keep the opening clear: ship radius plus two large asteroids of room
        let safe_radius = tuning.ship_radius + 2.0 * tuning.large_radius;

        let mut asteroids = Vec::with_capacity(count as usize);
        let mut attempts = 0;
        // A field barely larger than the safe zone may fit fewer asteroids
        while asteroids.len() < count as usize && attempts < count * PLACEMENT_ATTEMPTS {
            attempts += 1;
            let position = Vec2::new(
                rng.random_range(0.0..tuning.width),
                rng.random_range(0.0..tuning.height),
            );
            if position.distance(center) < safe_radius {
                continue;
            }

            let heading = rng.random_range(0.0..std::f32::consts::TAU);
            asteroids.push(AsteroidRecord {
                position: position.into(),
                direction: [heading.cos(), heading.sin()],
                size: AsteroidSize::Large,
            });
        }

        log::info!(
            "Generated wave {}: {} large asteroids (seed {})",
            wave_index,
            asteroids.len(),
            seed
        );

        Self {
            ship: ShipRecord {
                position: center.into(),
                angle: 90.0,
            },
            asteroids,
        }
    }
}

fn check_position(field: &str, position: [f32; 2], bounds: &Bounds) -> Result<(), WaveError> {
    if !position.iter().all(|c| c.is_finite()) {
        return Err(WaveError::descriptor(field, "must be finite"));
    }
    let pos = Vec2::from(position);
    if !bounds.contains(pos) {
        return Err(WaveError::descriptor(
            field,
            format!("({}, {}) lies outside the play field", pos.x, pos.y),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "ship": { "position": [400, 300], "angle": 90 },
        "asteroids": [
            { "position": [100, 100], "direction": [1, 0], "size": "large" },
            { "position": [700, 600], "direction": [0, 0], "size": "small" }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let desc = WaveDescriptor::from_json(LEVEL).unwrap();
        assert_eq!(desc.ship.position, [400.0, 300.0]);
        assert_eq!(desc.ship.angle, 90.0);
        assert_eq!(desc.asteroids.len(), 2);
        assert_eq!(desc.asteroids[0].size, AsteroidSize::Large);
        assert_eq!(desc.asteroids[1].direction, [0.0, 0.0]);
        assert!(desc.validate(&Tuning::default().bounds()).is_ok());
    }

    #[test]
    fn test_unknown_size_fails() {
        let json = r#"{ "ship": { "position": [0, 0], "angle": 0 },
            "asteroids": [ { "position": [1, 1], "direction": [1, 0], "size": "huge" } ] }"#;
        assert!(matches!(WaveDescriptor::from_json(json), Err(WaveError::Parse(_))));
    }

    #[test]
    fn test_missing_field_fails() {
        let json = r#"{ "ship": { "position": [0, 0] }, "asteroids": [] }"#;
        assert!(matches!(WaveDescriptor::from_json(json), Err(WaveError::Parse(_))));

        let json = r#"{ "ship": { "position": [0, 0], "angle": 0 } }"#;
        assert!(matches!(WaveDescriptor::from_json(json), Err(WaveError::Parse(_))));
    }

    #[test]
    fn test_out_of_field_position_fails() {
        let mut desc = WaveDescriptor::from_json(LEVEL).unwrap();
        desc.asteroids[0].position = [5000.0, 100.0];
        let err = desc.validate(&Tuning::default().bounds()).unwrap_err();
        match err {
            WaveError::InvalidDescriptor { field, .. } => assert_eq!(field, "asteroids[0].position"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_fails() {
        let mut desc = WaveDescriptor::from_json(LEVEL).unwrap();
        desc.ship.angle = f32::NAN;
        assert!(desc.validate(&Tuning::default().bounds()).is_err());

        let mut desc = WaveDescriptor::from_json(LEVEL).unwrap();
        desc.asteroids[1].direction = [f32::INFINITY, 0.0];
        assert!(desc.validate(&Tuning::default().bounds()).is_err());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let tuning = Tuning::default();
        let a = WaveDescriptor::generate(42, 3, &tuning);
        let b = WaveDescriptor::generate(42, 3, &tuning);
        assert_eq!(a, b);
        assert_eq!(a.asteroids.len(), 6);

        let c = WaveDescriptor::generate(43, 3, &tuning);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_keeps_ship_clear() {
        let tuning = Tuning::default();
        let desc = WaveDescriptor::generate(7, 40, &tuning);
        assert_eq!(desc.asteroids.len(), MAX_GENERATED_ASTEROIDS as usize);
        assert!(desc.validate(&tuning.bounds()).is_ok());

        let ship = Vec2::from(desc.ship.position);
        for asteroid in &desc.asteroids {
            let gap = Vec2::from(asteroid.position).distance(ship);
            assert!(gap >= tuning.ship_radius + tuning.large_radius);
        }
    }
}
