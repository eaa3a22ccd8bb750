//! Planetoids headless runner
//!
//! Plays waves with a simple autopilot and logs what happens. Useful for
//! soak-testing the simulation and for tuning.
//!
//! Usage: `planetoids [LEVEL.json] [TICKS] [TUNING.json]`
//! Set `RUST_LOG=info` (or `debug`) to see the event stream.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use planetoids::normalize_degrees;
    use planetoids::sim::{GameEvent, TickInput, Wave, WaveDescriptor, WavePhase, tick};
    use planetoids::tuning::Tuning;

    const DEFAULT_LEVEL: &str = include_str!("../levels/wave1.json");
    const DEFAULT_TICKS: u64 = 3600;
    /// Seed for waves generated after the authored level
    const RUN_SEED: u64 = 0x5eed;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args: Vec<String> = std::env::args().skip(1).collect();

        let level = match args.first() {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_LEVEL.to_string(),
        };
        let max_ticks = match args.get(1) {
            Some(n) => n.parse()?,
            None => DEFAULT_TICKS,
        };
        let tuning = match args.get(2) {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let mut wave_index = 0u32;
        let mut wave = Wave::new(WaveDescriptor::from_json(&level)?, tuning.clone())?;
        let mut destroyed = 0u32;

        for t in 0..max_ticks {
            match wave.phase() {
                WavePhase::Active => {
                    let input = autopilot(&wave, t);
                    tick(&mut wave, &input);
                }
                WavePhase::ShipDestroyed => wave.respawn_ship()?,
                WavePhase::Won => {
                    wave_index += 1;
                    log::info!("Wave cleared after {} ticks, starting wave {}", wave.ticks(), wave_index);
                    let next = WaveDescriptor::generate(RUN_SEED, wave_index, &tuning);
                    wave = Wave::new(next, tuning.clone())?;
                }
                WavePhase::Lost => break,
            }

            for event in wave.take_events() {
                match event {
                    GameEvent::AsteroidDestroyed { .. } => destroyed += 1,
                    GameEvent::ShipExploded { position } => {
                        log::info!("Ship exploded at ({:.0}, {:.0})", position.x, position.y)
                    }
                    other => log::trace!("{other:?}"),
                }
            }
        }

        log::info!(
            "Run over: reached wave {}, {} asteroids destroyed, final phase {:?}, {} reserve ships",
            wave_index,
            destroyed,
            wave.phase(),
            wave.lives()
        );
        Ok(())
    }

    /// Aim at the nearest asteroid, fire when lined up, nudge forward now and then
    fn autopilot(wave: &Wave, t: u64) -> TickInput {
        let Some(ship) = wave.ship() else {
            return TickInput::default();
        };
        let Some(target) = wave.asteroids().iter().min_by(|a, b| {
            a.pos()
                .distance_squared(ship.pos())
                .total_cmp(&b.pos().distance_squared(ship.pos()))
        }) else {
            return TickInput::default();
        };

        let to_target = target.pos() - ship.pos();
        let desired = to_target.y.atan2(to_target.x).to_degrees();
        // Signed error in (-180, 180]
        let mut error = normalize_degrees(desired - ship.angle());
        if error > 180.0 {
            error -= 360.0;
        }

        let deadband = wave.tuning().ship_turn_rate / 2.0;
        TickInput {
            turn_left: error > deadband,
            turn_right: error < -deadband,
            thrust: t % 45 == 0 && to_target.length() > 250.0,
            fire: error.abs() < 10.0,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Planetoids (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host page there; no runner
}
