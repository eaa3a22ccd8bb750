//! Deterministic wave simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per `tick`, no wall-clock time
//! - Seeded RNG only (procedural waves)
//! - Stable iteration order (field order, fragments appended)
//! - No rendering, audio or platform dependencies

pub mod bounds;
pub mod collision;
pub mod descriptor;
pub mod fragment;
pub mod state;
pub mod tick;

pub use bounds::Bounds;
pub use collision::{bullet_hits_asteroid, bullet_reach, ship_hits_asteroid};
pub use descriptor::{AsteroidRecord, ShipRecord, WaveDescriptor};
pub use fragment::{FRAGMENT_COUNT, ImpactVector, fragment, split_directions};
pub use state::{Asteroid, AsteroidSize, Bullet, GameEvent, Ship, Wave, WavePhase};
pub use tick::{TickInput, tick};
