//! Stealth Sim headless demo
//!
//! Builds a small walled arena, drives the player with a scripted input
//! sequence and prints the final world snapshot as JSON.
//!
//! Usage: `stealth-sim [tuning.json]` (`RUST_LOG=debug` for guard transitions)

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::HashMap;
    use std::error::Error;
    use std::f32::consts::PI;

    use glam::Vec2;
    use stealth_sim::sim::{
        Enemy, EntityId, EntityKind, GameEvent, Item, ItemKind, MovementIntent, Player, TickInput,
        Wall, World,
    };
    use stealth_sim::Tuning;

    const DEMO_TICKS: u64 = 1800;
    /// Stand-in for the renderer's death animation
    const DEATH_SEQUENCE_TICKS: u32 = 45;
    const SEED: u64 = 0x5EED;

    fn arena(tuning: &Tuning) -> Vec<EntityKind> {
        let mut level: Vec<EntityKind> = vec![
            // Outer walls of a 1200x900 room
            Wall::new(0.0, 0.0, 1200.0, 20.0).into(),
            Wall::new(0.0, 880.0, 1200.0, 20.0).into(),
            Wall::new(0.0, 0.0, 20.0, 900.0).into(),
            Wall::new(1180.0, 0.0, 20.0, 900.0).into(),
            // Cover in the middle
            Wall::new(560.0, 250.0, 40.0, 400.0).into(),
        ];
        level.push(Player::new(Vec2::new(150.0, 450.0), &tuning.player).into());
        let doorman = Enemy::new(Vec2::new(420.0, 450.0), &tuning.enemy).with_facing(PI);
        level.push(doorman.into());
        level.push(Enemy::new(Vec2::new(900.0, 200.0), &tuning.enemy).into());
        for (pos, kind) in [
            (Vec2::new(300.0, 150.0), ItemKind::Ammo),
            (Vec2::new(300.0, 750.0), ItemKind::Health),
            (Vec2::new(800.0, 700.0), ItemKind::Shield),
            (Vec2::new(1000.0, 450.0), ItemKind::Upgrade),
        ] {
            level.push(Item::new(pos, kind, tuning.items.size).into());
        }
        level
    }

    /// Aim at the closest living guard, walk the room in a loop, fire when close
    fn scripted_input(world: &World, tick: u64) -> TickInput {
        let Some(player) = world.player() else {
            return TickInput::default();
        };
        let target = world
            .entities()
            .iter()
            .filter_map(|e| e.as_enemy())
            .filter(|e| !e.is_dead())
            .map(|e| e.pos)
            .min_by(|a, b| a.distance(player.pos).total_cmp(&b.distance(player.pos)));

        let mut movement = MovementIntent::default();
        match (tick / 240) % 4 {
            0 => movement.right = true,
            1 => movement.up = true,
            2 => movement.left = true,
            _ => movement.down = true,
        }

        TickInput {
            movement,
            aim_target: target,
            aim_delta: Vec2::ZERO,
            fire_held: target.is_some_and(|t| t.distance(player.pos) < 350.0),
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let tuning = match std::env::args().nth(1) {
            Some(path) => Tuning::load(&path)?,
            None => Tuning::default(),
        };

        let mut world = World::new(tuning.clone(), SEED);
        let summary = world.load_level(arena(&tuning))?;
        log::info!("Demo arena ready with seed {:#x}: {:?}", world.seed(), summary);

        let mut dying: HashMap<EntityId, u32> = HashMap::new();
        for tick in 0..DEMO_TICKS {
            let input = scripted_input(&world, tick);
            let report = world.tick(&input);

            for event in world.events() {
                match event {
                    GameEvent::EnemyKilled { enemy } => {
                        dying.insert(*enemy, DEATH_SEQUENCE_TICKS);
                    }
                    GameEvent::PlayerDied { .. } => {
                        log::info!("Player down at tick {}", report.tick)
                    }
                    GameEvent::KillCredited { enemy } => {
                        log::info!("Kill credited for {:?} at tick {}", enemy, report.tick)
                    }
                    GameEvent::ItemCollected { kind, .. } => log::info!("Picked up {:?}", kind),
                    _ => {}
                }
            }

            dying.retain(|&id, remaining| {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    world.complete_death_sequence(id);
                    return false;
                }
                true
            });

            if !report.player_alive {
                log::info!("Game over after {} ticks", report.tick);
                break;
            }
            if report.active_enemy_count == 0 {
                log::info!("Level complete after {} ticks ({} kills)", report.tick, report.kills);
                break;
            }
        }

        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stealth Sim (native demo) starting...");
    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the only wasm surface
}
