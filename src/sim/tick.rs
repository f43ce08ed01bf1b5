//! Frame-stepped simulation tick
//!
//! One call to [`World::tick`] runs every live entity's update exactly once
//! against the live list as it stood when the tick began, then reconciles the
//! additions and removals requested along the way.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::geometry::Rect;
use super::player::Player;
use super::state::{Entity, EntityId, EntityKind, GameEvent, Outcome};
use super::world::{Lifecycle, TickReport, World};
use crate::config::Tuning;

/// Directional movement keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    /// Per-axis direction (-1, 0 or 1 on each axis; diagonals are not normalized)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub movement: MovementIntent,
    /// Absolute aim point in world coordinates
    pub aim_target: Option<Vec2>,
    /// Relative aim movement (pointer-locked mode)
    pub aim_delta: Vec2,
    /// Fire button held
    pub fire_held: bool,
}

/// Every live entity except the one being updated, in snapshot order
pub struct Others<'a> {
    head: &'a mut [Entity],
    tail: &'a mut [Entity],
}

impl<'a> Others<'a> {
    pub(crate) fn new(head: &'a mut [Entity], tail: &'a mut [Entity]) -> Self {
        Self { head, tail }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.head.iter().chain(self.tail.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.head.iter_mut().chain(self.tail.iter_mut())
    }

    /// The living player, if any
    pub fn player(&self) -> Option<(EntityId, &Player)> {
        self.iter().find_map(|e| match &e.kind {
            EntityKind::Player(p) if p.is_alive() => Some((e.id, p)),
            _ => None,
        })
    }

    pub fn player_mut(&mut self) -> Option<(EntityId, &mut Player)> {
        self.iter_mut().find_map(|e| match &mut e.kind {
            EntityKind::Player(p) if p.is_alive() => Some((e.id, p)),
            _ => None,
        })
    }
}

/// What an entity's update may read and request
pub struct UpdateCtx<'a> {
    pub input: &'a TickInput,
    pub tuning: &'a Tuning,
    /// Wall boxes as they stood at tick start
    pub walls: &'a [Rect],
    /// World extents
    pub bounds: Rect,
    /// Deferred add/remove requests
    pub lifecycle: &'a mut Lifecycle,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

impl World {
    /// Advance the world by one frame
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        self.time_ticks += 1;
        self.events.clear();

        let walls: Vec<Rect> = self.live.iter().filter_map(Entity::as_obstacle).collect();
        let mut ctx = UpdateCtx {
            input,
            tuning: &self.tuning,
            walls: &walls,
            bounds: self.bounds,
            lifecycle: &mut self.lifecycle,
            rng: &mut self.rng,
            events: &mut self.events,
        };

        // Additions land in the lifecycle buffer, so this length is fixed for the pass
        for index in 0..self.live.len() {
            let (head, rest) = self.live.split_at_mut(index);
            let Some((current, tail)) = rest.split_first_mut() else {
                break;
            };
            let mut others = Others::new(head, tail);
            if update_entity(current, &mut others, &mut ctx) == Outcome::Remove {
                ctx.lifecycle.remove(current.id);
            }
        }

        self.reconcile()
    }
}

fn update_entity(entity: &mut Entity, others: &mut Others, ctx: &mut UpdateCtx) -> Outcome {
    entity.age += 1;
    let id = entity.id;
    match &mut entity.kind {
        EntityKind::Player(player) => player.update(id, ctx),
        EntityKind::Enemy(enemy) => enemy.update(id, others, ctx),
        EntityKind::Projectile(projectile) => projectile.update(id, others, ctx),
        EntityKind::Item(item) => item.update(id, others, ctx),
        EntityKind::Wall(_) => Outcome::Keep,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_4, PI, TAU};

    use super::*;
    use crate::sim::enemy::{Enemy, EnemyState};
    use crate::sim::geometry::{angle_diff, distance};
    use crate::sim::state::{Item, ItemKind, Wall};

    fn world() -> World {
        World::new(Tuning::default(), 12345)
    }

    fn guard(w: &World, id: EntityId) -> &Enemy {
        w.get(id).and_then(Entity::as_enemy).expect("guard is live")
    }

    fn fire() -> TickInput {
        TickInput {
            aim_target: Some(Vec2::new(2000.0, 500.0)),
            fire_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_movement_intent_direction() {
        let intent = MovementIntent {
            up: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(intent.direction(), Vec2::new(1.0, -1.0));
        let cancel = MovementIntent {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(cancel.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_player_moves_and_stops_at_wall() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let player = w.add(Player::new(Vec2::new(100.0, 100.0), &tuning.player));
        // Player box is 42 wide: right edge at 121. Wall starts at 124.
        w.add(Wall::new(124.0, 0.0, 20.0, 400.0));
        w.tick(&TickInput::default());

        let right = TickInput {
            movement: MovementIntent {
                right: true,
                down: true,
                ..Default::default()
            },
            ..Default::default()
        };
        w.tick(&right);
        let pos = w.get(player).and_then(Entity::as_player).map(|p| p.pos);
        assert_eq!(pos, Some(Vec2::new(103.0, 103.0)));

        // Next step would overlap the wall on X; Y keeps sliding
        w.tick(&right);
        let pos = w.get(player).and_then(Entity::as_player).map(|p| p.pos);
        assert_eq!(pos, Some(Vec2::new(103.0, 106.0)));
    }

    #[test]
    fn test_added_mid_tick_not_updated_until_next_tick() {
        let mut w = world();
        let tuning = w.tuning().clone();
        w.add(Player::new(Vec2::new(500.0, 500.0), &tuning.player));
        w.tick(&TickInput::default());

        // Tick N: the player fires, the projectile is only queued
        w.tick(&fire());
        let shot = w
            .entities()
            .iter()
            .find(|e| e.as_projectile().is_some())
            .cloned()
            .expect("projectile added at reconciliation");
        assert_eq!(shot.age(), 0);
        let start = shot.as_projectile().map(|p| p.pos);

        // Tick N+1: first update, advanced by exactly one velocity step
        w.tick(&TickInput::default());
        let moved = w.get(shot.id).expect("still live");
        assert_eq!(moved.age(), 1);
        let projectile = moved.as_projectile().expect("projectile");
        assert_eq!(Some(projectile.pos - projectile.vel), start);
    }

    #[test]
    fn test_every_entity_updated_once_per_tick() {
        let mut w = world();
        let tuning = w.tuning().clone();
        w.add(Player::new(Vec2::new(500.0, 500.0), &tuning.player));
        w.add(Enemy::new(Vec2::new(1500.0, 1500.0), &tuning.enemy));
        w.add(Wall::new(0.0, 0.0, 10.0, 10.0));
        w.tick(&TickInput::default());
        for _ in 0..5 {
            w.tick(&fire());
        }
        for entity in w.entities() {
            if entity.as_projectile().is_none() {
                assert_eq!(entity.age(), 5);
            }
        }
    }

    #[test]
    fn test_patrol_to_chase_within_one_tick() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let enemy = w.add(Enemy::new(Vec2::ZERO, &tuning.enemy));
        w.tick(&TickInput::default());
        let state = w.get(enemy).and_then(Entity::as_enemy).map(|e| e.state);
        assert_eq!(state, Some(EnemyState::Patrolling));

        // Player enters the live set at the end of this tick
        w.add(Player::new(Vec2::new(100.0, 0.0), &tuning.player));
        w.tick(&TickInput::default());
        w.tick(&TickInput::default());

        let guard = w.get(enemy).and_then(Entity::as_enemy).expect("enemy");
        assert_eq!(guard.state, EnemyState::Chasing);
        assert!(w.events().contains(&GameEvent::PlayerSpotted { enemy }));
    }

    #[test]
    fn test_wall_hides_player() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let enemy = w.add(Enemy::new(Vec2::new(200.0, 200.0), &tuning.enemy));
        w.add(Wall::new(240.0, 100.0, 20.0, 200.0));
        w.add(Player::new(Vec2::new(350.0, 200.0), &tuning.player));
        for _ in 0..3 {
            w.tick(&TickInput::default());
        }
        let guard = w.get(enemy).and_then(Entity::as_enemy).expect("enemy");
        assert_eq!(guard.state, EnemyState::Patrolling);
    }

    #[test]
    fn test_item_pickup_applies_once() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let player = w.add(Player::new(Vec2::new(300.0, 300.0), &tuning.player));
        let item = w.add(Item::new(Vec2::new(310.0, 300.0), ItemKind::Shield, tuning.items.size));
        w.tick(&TickInput::default());
        w.tick(&TickInput::default());
        assert!(w.get(item).is_none());
        assert!(matches!(
            w.events(),
            [GameEvent::ItemCollected { kind: ItemKind::Shield, .. }]
        ));

        w.tick(&TickInput::default());
        let p = w.get(player).and_then(Entity::as_player).expect("player");
        assert_eq!(p.shield, 50.0);
    }

    #[test]
    fn test_guard_shoots_player_inside_standoff() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let player = w.add(Player::new(Vec2::new(600.0, 500.0), &tuning.player));
        w.add(Enemy::new(Vec2::new(500.0, 500.0), &tuning.enemy));
        let mut damaged = false;
        for _ in 0..120 {
            w.tick(&TickInput::default());
            damaged |= w
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDamaged { player: p, .. } if *p == player));
        }
        assert!(damaged);
        let p = w.get(player).and_then(Entity::as_player).expect("player alive");
        assert!(p.health < 100.0);
    }

    #[test]
    fn test_enemy_shots_ignore_other_enemies() {
        let mut w = world();
        let tuning = w.tuning().clone();
        w.add(Player::new(Vec2::new(800.0, 500.0), &tuning.player));
        let shooter = w.add(Enemy::new(Vec2::new(700.0, 500.0), &tuning.enemy));
        // Second guard stands in the line of fire, facing away from the player
        let bystander = Enemy::new(Vec2::new(750.0, 500.0), &tuning.enemy).with_facing(PI);
        let bystander = w.add(bystander);
        for _ in 0..90 {
            w.tick(&TickInput::default());
        }
        let by = w.get(bystander).and_then(Entity::as_enemy).expect("bystander");
        assert_eq!(by.health, by.max_health);
        assert!(w.get(shooter).is_some());
    }
    #[test]
    fn test_relative_aim_keeps_facing_wrapped() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let player = w.add(Player::new(Vec2::new(500.0, 500.0), &tuning.player));
        w.tick(&TickInput::default());

        let spin = TickInput {
            aim_delta: Vec2::new(1000.0, 0.0),
            ..Default::default()
        };
        for _ in 0..10 {
            w.tick(&spin);
        }
        let facing = w.get(player).and_then(Entity::as_player).map(|p| p.facing);
        assert!(facing.is_some_and(|f| (0.0..TAU).contains(&f)));
    }

    #[test]
    fn test_chase_closes_in_at_chase_speed() {
        let mut w = world();
        let tuning = w.tuning().clone();
        w.add(Player::new(Vec2::new(700.0, 500.0), &tuning.player));
        let enemy = w.add(Enemy::new(Vec2::new(500.0, 500.0), &tuning.enemy));
        w.tick(&TickInput::default());

        // Spotting tick: state change only
        w.tick(&TickInput::default());
        assert_eq!(guard(&w, enemy).state, EnemyState::Chasing);
        assert_eq!(guard(&w, enemy).pos, Vec2::new(500.0, 500.0));

        // 200 away, beyond the standoff distance: step of speed x multiplier
        w.tick(&TickInput::default());
        let g = guard(&w, enemy);
        let step = tuning.enemy.speed * tuning.enemy.chase_multiplier;
        assert!((g.pos.x - (500.0 + step)).abs() < 1e-4);
        assert!((g.pos.y - 500.0).abs() < 1e-4);
        assert!(!w.events().iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
    }

    #[test]
    fn test_lost_sight_returns_then_resumes_patrol() {
        let mut w = world();
        let tuning = w.tuning().clone();
        let player = w.add(Player::new(Vec2::new(600.0, 500.0), &tuning.player));
        let enemy = w.add(Enemy::new(Vec2::new(500.0, 500.0), &tuning.enemy));
        w.tick(&TickInput::default());
        w.tick(&TickInput::default());
        assert_eq!(guard(&w, enemy).state, EnemyState::Chasing);

        // Player slips far out of range
        if let Some(p) = w.get_mut(player).and_then(Entity::as_player_mut) {
            p.pos = Vec2::new(500.0, 2500.0);
        }
        w.tick(&TickInput::default());
        let g = guard(&w, enemy);
        assert_eq!(g.state, EnemyState::Returning);
        let last_known = g.last_known.expect("last known position kept");
        assert_eq!(last_known, Vec2::new(600.0, 500.0));

        let mut resumed = false;
        for _ in 0..120 {
            w.tick(&TickInput::default());
            if guard(&w, enemy).state == EnemyState::Patrolling {
                resumed = true;
                break;
            }
            assert_eq!(guard(&w, enemy).state, EnemyState::Returning);
        }
        assert!(resumed);
        let g = guard(&w, enemy);
        assert!(distance(g.pos, last_known) < g.size / 4.0);
    }

    #[test]
    fn test_returning_guard_that_sees_player_chases_again() {
        let mut w = world();
        let tuning = w.tuning().clone();
        w.add(Player::new(Vec2::new(600.0, 500.0), &tuning.player));
        let mut returning = Enemy::new(Vec2::new(500.0, 500.0), &tuning.enemy);
        returning.state = EnemyState::Returning;
        returning.last_known = Some(Vec2::new(200.0, 500.0));
        let enemy = w.add(returning);
        w.tick(&TickInput::default());

        w.tick(&TickInput::default());
        let g = guard(&w, enemy);
        assert_eq!(g.state, EnemyState::Chasing);
        assert_eq!(g.last_known, Some(Vec2::new(600.0, 500.0)));
        assert!(w.events().contains(&GameEvent::PlayerSpotted { enemy }));
    }

    #[test]
    fn test_patrol_into_wall_turns_back_with_jitter() {
        let patrol = Tuning::default().enemy.patrol;
        for seed in 0..16 {
            let mut w = World::new(Tuning::default(), seed);
            let tuning = w.tuning().clone();
            // Guard box right edge at 114.4; wall starts at 115
            let enemy = w.add(Enemy::new(Vec2::new(100.0, 100.0), &tuning.enemy));
            w.add(Wall::new(115.0, 0.0, 20.0, 400.0));
            w.tick(&TickInput::default());

            w.tick(&TickInput::default());
            let g = guard(&w, enemy);
            assert_eq!(g.state, EnemyState::Patrolling);
            assert_eq!(g.pos, Vec2::new(100.0, 100.0));
            assert!(angle_diff(PI, g.facing).abs() <= FRAC_PI_4 + 1e-5);
            let intervals = patrol.min_turn_interval..=patrol.max_turn_interval;
            assert!(intervals.contains(&g.patrol_turn_timer), "seed {seed}");
        }
    }
}
