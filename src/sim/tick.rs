//! Fixed-step wave tick
//!
//! One call advances the wave by one frame: ship controls, movement, bullet
//! culling, collisions and fragmentation, then the phase update.

use serde::{Deserialize, Serialize};

use super::collision::{first_bullet_hit, ship_hits_asteroid};
use super::fragment::fragment;
use super::state::{Bullet, GameEvent, Wave, WavePhase};

/// Control state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

/// Advance the wave by one frame
///
/// Does nothing unless the wave is `Active`: a destroyed ship waits for
/// [`Wave::respawn_ship`], and `Won`/`Lost` are final.
pub fn tick(wave: &mut Wave, input: &TickInput) {
    wave.events.clear();
    if wave.phase != WavePhase::Active {
        return;
    }
    let Some(ship) = wave.ship.as_mut() else {
        return;
    };

    wave.ticks += 1;
    let tuning = &wave.tuning;

    if input.thrust {
        ship.apply_thrust(tuning.ship_impulse, tuning.ship_max_speed);
    }

    // Running delta: holding both keys nets a single left turn
    let mut delta = 0.0;
    if input.turn_left {
        delta += tuning.ship_turn_rate;
        ship.turn(delta);
    }
    if input.turn_right {
        delta -= tuning.ship_turn_rate;
        ship.turn(delta);
    }

    if input.fire && wave.fire_cooldown >= tuning.fire_rate {
        wave.fire_cooldown = 0;
        let bullet = Bullet::fire(ship, tuning);
        log::debug!("Bullet fired at tick {} heading {}°", wave.ticks, bullet.direction());
        wave.events.push(GameEvent::BulletFired {
            position: bullet.pos(),
        });
        wave.bullets.push(bullet);
    }

    ship.integrate();
    ship.wrap(&wave.bounds);
    wave.fire_cooldown = wave.fire_cooldown.saturating_add(1);

    for bullet in &mut wave.bullets {
        bullet.integrate();
    }
    let bounds = wave.bounds;
    wave.bullets.retain(|b| !bounds.is_outside(b.pos()));

    resolve_bullet_hits(wave);
    resolve_ship_hits(wave);

    wave.refresh_phase();
}

/// Each bullet destroys at most the first asteroid it reaches. Fragments
/// join the field once every bullet has been checked.
fn resolve_bullet_hits(wave: &mut Wave) {
    let mut fragments = Vec::new();

    let mut i = 0;
    while i < wave.bullets.len() {
        let Some(hit) = first_bullet_hit(&wave.bullets[i], &wave.asteroids, &wave.tuning) else {
            i += 1;
            continue;
        };

        let bullet = wave.bullets.remove(i);
        let asteroid = wave.asteroids.remove(hit);
        fragments.extend(fragment(&asteroid, bullet.impact_vector(), &wave.tuning));
        wave.events.push(GameEvent::AsteroidDestroyed {
            size: asteroid.size(),
            position: asteroid.pos(),
        });
    }

    wave.asteroids.extend(fragments);
}

/// Checks the ship against each asteroid in order and moves every asteroid
/// that survives. The first hit destroys the ship and ends the checks.
fn resolve_ship_hits(wave: &mut Wave) {
    let Some(ship) = wave.ship.as_ref() else {
        return;
    };

    let mut hit = None;
    for (i, asteroid) in wave.asteroids.iter_mut().enumerate() {
        if hit.is_none() && ship_hits_asteroid(ship, asteroid, &wave.tuning) {
            hit = Some(i);
            continue;
        }
        asteroid.integrate();
        asteroid.wrap(&wave.bounds);
    }

    let Some(hit) = hit else {
        return;
    };

    let asteroid = wave.asteroids.remove(hit);
    let fragments = fragment(&asteroid, ship.impact_vector(), &wave.tuning);
    let ship_pos = ship.pos();
    wave.ship = None;

    log::info!(
        "Ship destroyed by {} asteroid at tick {}",
        asteroid.size().as_str(),
        wave.ticks
    );
    wave.events.push(GameEvent::AsteroidDestroyed {
        size: asteroid.size(),
        position: asteroid.pos(),
    });
    wave.events.push(GameEvent::ShipExploded { position: ship_pos });
    wave.asteroids.extend(fragments);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::descriptor::{AsteroidRecord, ShipRecord, WaveDescriptor};
    use crate::sim::AsteroidSize;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const FIRE: TickInput = TickInput {
        turn_left: false,
        turn_right: false,
        thrust: false,
        fire: true,
    };

    fn rock(position: [f32; 2], direction: [f32; 2], size: AsteroidSize) -> AsteroidRecord {
        AsteroidRecord {
            position,
            direction,
            size,
        }
    }

    fn wave_with(ship: ([f32; 2], f32), asteroids: Vec<AsteroidRecord>, tuning: Tuning) -> Wave {
        let descriptor = WaveDescriptor {
            ship: ShipRecord {
                position: ship.0,
                angle: ship.1,
            },
            asteroids,
        };
        Wave::new(descriptor, tuning).unwrap()
    }

    /// Hold fire until the first shot leaves the ship
    fn fire_once(wave: &mut Wave) {
        for _ in 0..=wave.tuning().fire_rate {
            tick(wave, &FIRE);
            if !wave.bullets().is_empty() {
                return;
            }
        }
        panic!("ship never fired");
    }

    #[test]
    fn test_bullet_splits_large_into_three_medium() {
        // A 0° shot from (400, 300) never comes near (100, 100); aim the ship at it
        let aim = Vec2::new(100.0 - 400.0, 100.0 - 300.0);
        let angle = aim.y.atan2(aim.x).to_degrees();
        let mut wave = wave_with(
            ([400.0, 300.0], angle),
            vec![rock([100.0, 100.0], [1.0, 0.0], AsteroidSize::Large)],
            Tuning::default(),
        );

        fire_once(&mut wave);
        assert_eq!(wave.bullets().len(), 1);

        for _ in 0..100 {
            tick(&mut wave, &TickInput::default());
            if wave.asteroids().len() != 1 {
                break;
            }
        }

        assert_eq!(wave.asteroids().len(), 3);
        assert!(wave.asteroids().iter().all(|a| a.size() == AsteroidSize::Medium));
        assert!(wave.bullets().is_empty());
        assert_eq!(wave.phase(), WavePhase::Active);
        assert!(wave.events().iter().any(|e| matches!(
            e,
            GameEvent::AsteroidDestroyed {
                size: AsteroidSize::Large,
                ..
            }
        )));
    }

    #[test]
    fn test_two_bullets_one_asteroid_single_hit() {
        // Both bullets are within 2 * (5 + 50) of the asteroid on the same tick
        let mut wave = wave_with(
            ([100.0, 300.0], 0.0),
            vec![rock([230.0, 300.0], [0.0, 0.0], AsteroidSize::Large)],
            Tuning::default(),
        );
        let shot = Bullet::fire(wave.ship().unwrap(), wave.tuning());
        wave.bullets.push(shot.clone());
        wave.bullets.push(shot);

        tick(&mut wave, &TickInput::default());

        // Only the first bullet hits; the fragments wait until the pass is over
        assert_eq!(wave.asteroids().len(), 3);
        assert!(wave.asteroids().iter().all(|a| a.size() == AsteroidSize::Medium));
        assert_eq!(wave.bullets().len(), 1);
        let destroyed = wave
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_asteroids_keep_moving_after_ship_hit() {
        let tuning = Tuning {
            starting_lives: 1,
            ..Default::default()
        };
        let large_speed = tuning.large_speed;
        let mut wave = wave_with(
            ([400.0, 300.0], 0.0),
            vec![
                rock([440.0, 300.0], [0.0, 0.0], AsteroidSize::Small),
                rock([100.0, 100.0], [1.0, 0.0], AsteroidSize::Large),
            ],
            tuning,
        );

        tick(&mut wave, &TickInput::default());

        assert_eq!(wave.phase(), WavePhase::ShipDestroyed);
        // The small one left no pieces; the large one drifted past the hit
        assert_eq!(wave.asteroids().len(), 1);
        let survivor = &wave.asteroids()[0];
        assert_eq!(survivor.size(), AsteroidSize::Large);
        assert!((survivor.pos().x - (100.0 + large_speed)).abs() < 1e-4);
        assert_eq!(survivor.pos().y, 100.0);
    }

    #[test]
    fn test_collision_without_lives_loses() {
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        // 40 apart, well inside ship 30 + large 50
        let mut wave = wave_with(
            ([400.0, 300.0], 0.0),
            vec![rock([440.0, 300.0], [0.0, 0.0], AsteroidSize::Large)],
            tuning,
        );

        tick(&mut wave, &TickInput::default());

        assert!(wave.is_lost());
        assert!(wave.ship().is_none());
        // Stationary ship splits along its facing: three mediums
        assert_eq!(wave.asteroids().len(), 3);
        assert!((wave.asteroids()[0].direction() - Vec2::X).length() < 1e-6);
        assert!(wave.events().contains(&GameEvent::ShipExploded {
            position: Vec2::new(400.0, 300.0)
        }));
        assert!(wave.events().contains(&GameEvent::PhaseChanged(WavePhase::Lost)));
    }

    #[test]
    fn test_clearing_field_wins() {
        let mut wave = wave_with(
            ([100.0, 300.0], 0.0),
            vec![rock([300.0, 300.0], [0.0, 0.0], AsteroidSize::Small)],
            Tuning::default(),
        );

        fire_once(&mut wave);
        for _ in 0..50 {
            tick(&mut wave, &TickInput::default());
            if wave.is_won() {
                break;
            }
        }

        assert!(wave.is_won());
        assert!(wave.asteroids().is_empty());
        assert!(wave.ship().is_some());

        // Terminal: nothing moves any more
        let ticks = wave.ticks();
        let pos = wave.ship().unwrap().pos();
        tick(&mut wave, &TickInput { thrust: true, ..FIRE });
        assert_eq!(wave.ticks(), ticks);
        assert_eq!(wave.ship().unwrap().pos(), pos);
        assert!(wave.bullets().is_empty());
    }

    #[test]
    fn test_fire_rate_limits_bullets() {
        let mut wave = wave_with(
            ([400.0, 300.0], 0.0),
            vec![rock([50.0, 650.0], [0.0, 0.0], AsteroidSize::Small)],
            Tuning::default(),
        );

        fire_once(&mut wave);
        assert!(wave.events().iter().any(|e| matches!(e, GameEvent::BulletFired { .. })));

        tick(&mut wave, &FIRE);
        assert_eq!(wave.bullets().len(), 1);
        assert!(wave.events().is_empty());

        // After a full cooldown the next shot goes out
        for _ in 0..wave.tuning().fire_rate {
            tick(&mut wave, &FIRE);
        }
        assert_eq!(wave.bullets().len(), 2);
    }

    #[test]
    fn test_bullets_culled_on_every_edge() {
        for angle in [0.0, 90.0, 180.0, 270.0] {
            let mut wave = wave_with(
                ([400.0, 350.0], angle),
                vec![rock([10.0, 10.0], [0.0, 0.0], AsteroidSize::Small)],
                Tuning::default(),
            );
            fire_once(&mut wave);

            for _ in 0..120 {
                tick(&mut wave, &TickInput::default());
                for bullet in wave.bullets() {
                    assert!(!wave.bounds().is_outside(bullet.pos()));
                }
            }
            assert!(wave.bullets().is_empty(), "bullet at {angle}° was never culled");
        }
    }

    #[test]
    fn test_both_turn_keys_net_one_left_turn() {
        let mut wave = wave_with(
            ([400.0, 300.0], 90.0),
            vec![rock([10.0, 10.0], [0.0, 0.0], AsteroidSize::Small)],
            Tuning::default(),
        );
        let both = TickInput {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        tick(&mut wave, &both);
        let expected = 90.0 + wave.tuning().ship_turn_rate;
        assert!((wave.ship().unwrap().angle() - expected).abs() < 1e-4);

        let right = TickInput {
            turn_right: true,
            ..Default::default()
        };
        tick(&mut wave, &right);
        assert!((wave.ship().unwrap().angle() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_ship_wraps_across_edge() {
        let tuning = Tuning::default();
        let mut wave = wave_with(
            ([tuning.width + tuning.dead_zone - 0.1, 300.0], 0.0),
            vec![rock([300.0, 650.0], [0.0, 0.0], AsteroidSize::Small)],
            tuning,
        );
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut wave, &thrust);
        tick(&mut wave, &thrust);

        let x = wave.ship().unwrap().pos().x;
        assert!(x < 0.0, "ship did not wrap, x = {x}");
    }

    #[test]
    fn test_respawn_after_destruction() {
        let tuning = Tuning {
            starting_lives: 1,
            ..Default::default()
        };
        let mut wave = wave_with(
            ([400.0, 300.0], 0.0),
            vec![rock([440.0, 300.0], [0.0, 0.0], AsteroidSize::Medium)],
            tuning,
        );

        tick(&mut wave, &TickInput::default());
        assert_eq!(wave.phase(), WavePhase::ShipDestroyed);
        assert!(wave.ship().is_none());
        assert_eq!(wave.lives(), 1);

        // Nothing moves while waiting for a new ship
        let before: Vec<Vec2> = wave.asteroids().iter().map(|a| a.pos()).collect();
        let ticks = wave.ticks();
        tick(&mut wave, &FIRE);
        let after: Vec<Vec2> = wave.asteroids().iter().map(|a| a.pos()).collect();
        assert_eq!(before, after);
        assert_eq!(wave.ticks(), ticks);

        wave.respawn_ship().unwrap();
        assert_eq!(wave.lives(), 0);
        assert_eq!(wave.phase(), WavePhase::Active);
        let ship = wave.ship().unwrap();
        assert_eq!(ship.pos(), Vec2::new(400.0, 300.0));
        assert_eq!(ship.vel(), Vec2::ZERO);
        assert!(wave.events().contains(&GameEvent::ShipRespawned { lives_left: 0 }));
        assert!(wave.respawn_ship().is_err());
    }

    #[test]
    fn test_asteroids_drift_and_wrap() {
        let tuning = Tuning::default();
        let start_x = tuning.width + tuning.dead_zone - 1.0;
        let mut wave = wave_with(
            ([100.0, 100.0], 0.0),
            vec![rock([start_x, 600.0], [1.0, 0.0], AsteroidSize::Large)],
            tuning.clone(),
        );

        tick(&mut wave, &TickInput::default());
        let x = wave.asteroids()[0].pos().x;
        let expected = start_x + tuning.large_speed - (tuning.width + 2.0 * tuning.dead_zone);
        assert!((x - expected).abs() < 1e-3);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(turn_left, turn_right, thrust, fire)| TickInput {
                turn_left,
                turn_right,
                thrust,
                fire,
            },
        )
    }

    proptest! {
        #[test]
        fn tick_keeps_wave_consistent(
            inputs in prop::collection::vec(arb_input(), 1..400),
            seed in any::<u64>(),
        ) {
            let tuning = Tuning::default();
            let descriptor = WaveDescriptor::generate(seed, 2, &tuning);
            let mut wave = Wave::new(descriptor, tuning.clone()).unwrap();
            let mut lives = wave.lives();

            for input in &inputs {
                if wave.phase() == WavePhase::ShipDestroyed {
                    wave.respawn_ship().unwrap();
                }
                tick(&mut wave, input);

                prop_assert!(wave.lives() <= lives);
                lives = wave.lives();

                for bullet in wave.bullets() {
                    prop_assert!(!wave.bounds().is_outside(bullet.pos()));
                }
                if let Some(ship) = wave.ship() {
                    prop_assert!(ship.vel().length() <= tuning.ship_max_speed + 1e-3);
                }
                match wave.phase() {
                    WavePhase::Won => {
                        prop_assert!(wave.ship().is_some() && wave.asteroids().is_empty());
                    }
                    WavePhase::Lost => {
                        prop_assert!(wave.ship().is_none() && wave.lives() == 0);
                    }
                    WavePhase::ShipDestroyed => {
                        prop_assert!(wave.ship().is_none() && wave.lives() > 0);
                    }
                    WavePhase::Active => {
                        prop_assert!(wave.ship().is_some() && !wave.asteroids().is_empty());
                    }
                }
            }
        }
    }
}
