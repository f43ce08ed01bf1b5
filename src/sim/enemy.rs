//! Guard behavior
//!
//! Patrolling → Chasing → Returning → Patrolling, with Dead as a terminal
//! state reachable from any of them. Transitions are driven by line of sight
//! to the player; every move goes through the wall resolver.

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve_move;
use super::combat::Projectile;
use super::geometry::{Rect, angle_to, distance, heading, normalize_angle};
use super::perception::{Observer, is_visible};
use super::state::{EntityId, GameEvent, Outcome};
use super::tick::{Others, UpdateCtx};
use crate::config::{EnemyTuning, PatrolTuning, ShotTuning};

/// Guard behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Wandering, turning at random intervals and off walls
    Patrolling,
    /// Player in sight: closing in or firing
    Chasing,
    /// Lost sight: heading to the last known player position
    Returning,
    /// Terminal; waits for the external death sequence
    Dead,
}

/// A guard
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Center of the collision box
    pub pos: Vec2,
    /// Collision box edge
    pub size: f32,
    /// Facing angle (radians)
    pub facing: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub vision_range: f32,
    /// Full cone width (radians)
    pub vision_angle: f32,
    pub chase_multiplier: f32,
    pub standoff_distance: f32,
    pub fire_rate: u32,
    pub fire_cooldown: u32,
    pub shot: ShotTuning,
    pub state: EnemyState,
    pub last_known: Option<Vec2>,
    /// Ticks until the next random-turn attempt; 0 until the guard joins a world
    pub patrol_turn_timer: u32,
    death_sequence_done: bool,
    kill_credited: bool,
}

impl Enemy {
    /// Patrolling guard centered on `pos`, facing east
    ///
    /// The first turn interval is rolled from the world RNG when the guard
    /// joins the live set.
    pub fn new(pos: Vec2, tuning: &EnemyTuning) -> Self {
        Self {
            pos,
            size: tuning.hitbox(),
            facing: 0.0,
            speed: tuning.speed,
            health: tuning.health,
            max_health: tuning.health,
            vision_range: tuning.vision_range,
            vision_angle: tuning.vision_angle_deg.to_radians(),
            chase_multiplier: tuning.chase_multiplier,
            standoff_distance: tuning.standoff_distance,
            fire_rate: tuning.fire_rate,
            fire_cooldown: 0,
            shot: tuning.shot,
            state: EnemyState::Patrolling,
            last_known: None,
            patrol_turn_timer: 0,
            death_sequence_done: false,
            kill_credited: false,
        }
    }

    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = normalize_angle(facing);
        self
    }

    pub fn bbox(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size))
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    pub fn observer(&self) -> Observer {
        Observer {
            center: self.pos,
            facing: self.facing,
            fov: self.vision_angle,
            range: self.vision_range,
        }
    }

    /// Apply a hit from something at `source` (if known)
    ///
    /// An unaware guard investigates the source; without a usable source a
    /// patrolling guard goes straight to chasing. Returns true when this hit
    /// killed the guard.
    pub fn take_damage(&mut self, amount: f32, source: Option<Vec2>) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health -= amount;

        match (self.state, source) {
            (EnemyState::Patrolling | EnemyState::Returning, Some(source)) => {
                self.last_known = Some(source);
                self.state = EnemyState::Returning;
            }
            (EnemyState::Patrolling, None) => self.state = EnemyState::Chasing,
            _ => {}
        }

        if self.health <= 0.0 {
            self.die();
            return true;
        }
        false
    }

    fn die(&mut self) {
        if self.is_dead() {
            return;
        }
        self.state = EnemyState::Dead;
        self.speed = 0.0;
        self.last_known = None;
    }

    /// Mark the externally owned death sequence as finished
    ///
    /// Returns false for guards that are not dead.
    pub fn complete_death_sequence(&mut self) -> bool {
        if !self.is_dead() {
            return false;
        }
        self.death_sequence_done = true;
        true
    }

    /// Claim the kill for this guard; true only the first time for a dead guard
    pub(crate) fn credit_kill(&mut self) -> bool {
        if !self.is_dead() || self.kill_credited {
            return false;
        }
        self.kill_credited = true;
        true
    }

    /// Roll the first turn interval unless one was set explicitly
    pub(crate) fn schedule_patrol(&mut self, rng: &mut Pcg32, patrol: &PatrolTuning) {
        if self.patrol_turn_timer == 0 {
            self.patrol_turn_timer = turn_interval(rng, patrol);
        }
    }

    fn set_state(&mut self, id: EntityId, next: EnemyState) {
        if self.state != next {
            log::debug!("Enemy {:?}: {:?} -> {:?}", id, self.state, next);
            self.state = next;
        }
    }

    /// One tick of behavior
    pub(crate) fn update(&mut self, id: EntityId, others: &Others, ctx: &mut UpdateCtx) -> Outcome {
        if self.is_dead() {
            return if self.death_sequence_done {
                Outcome::Remove
            } else {
                Outcome::Keep
            };
        }

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);

        let patrol = ctx.tuning.enemy.patrol;
        let target = others.player().map(|(_, player)| player.center());
        let sighted = target.filter(|&t| is_visible(&self.observer(), t, ctx.walls));

        match self.state {
            EnemyState::Patrolling => {
                self.patrol_turn_timer = self.patrol_turn_timer.saturating_sub(1);
                let attempt_turn = self.patrol_turn_timer == 0;
                if attempt_turn {
                    self.patrol_turn_timer = turn_interval(ctx.rng, &patrol);
                }

                if let Some(player) = sighted {
                    self.last_known = Some(player);
                    self.set_state(id, EnemyState::Chasing);
                    ctx.events.push(GameEvent::PlayerSpotted { enemy: id });
                } else {
                    self.patrol(attempt_turn, ctx);
                }
            }
            EnemyState::Chasing => {
                self.patrol_turn_timer = turn_interval(ctx.rng, &patrol);
                if let Some(player) = sighted {
                    self.last_known = Some(player);
                    self.facing = angle_to(self.pos, player);
                    if distance(self.pos, player) > self.standoff_distance {
                        let chase_speed = self.speed * self.chase_multiplier;
                        self.move_towards(player, chase_speed, ctx.walls);
                    } else if self.fire_cooldown == 0 {
                        self.shoot(id, player, ctx);
                        self.fire_cooldown = self.fire_rate;
                    }
                } else {
                    self.set_state(id, EnemyState::Returning);
                }
            }
            EnemyState::Returning => {
                self.patrol_turn_timer = turn_interval(ctx.rng, &patrol);
                if let Some(player) = sighted {
                    self.last_known = Some(player);
                    self.set_state(id, EnemyState::Chasing);
                    ctx.events.push(GameEvent::PlayerSpotted { enemy: id });
                } else if let Some(last_known) = self.last_known {
                    self.facing = angle_to(self.pos, last_known);
                    let chase_speed = self.speed * self.chase_multiplier;
                    if self.move_towards(last_known, chase_speed, ctx.walls) {
                        self.set_state(id, EnemyState::Patrolling);
                    }
                } else {
                    self.set_state(id, EnemyState::Patrolling);
                }
            }
            EnemyState::Dead => {}
        }

        if self.health <= 0.0 {
            self.die();
        }
        Outcome::Keep
    }

    /// Walk forward, turning at random and bouncing off walls
    fn patrol(&mut self, attempt_turn: bool, ctx: &mut UpdateCtx) {
        let patrol = ctx.tuning.enemy.patrol;
        if attempt_turn && ctx.rng.random::<f64>() < patrol.random_turn_chance {
            self.facing = ctx.rng.random_range(0.0..TAU);
            self.patrol_turn_timer = turn_interval(ctx.rng, &patrol);
        }

        let bbox = self.bbox();
        let result = resolve_move(&bbox, heading(self.facing) * self.speed, ctx.walls);
        self.pos += result.applied(&bbox);

        if result.blocked() {
            let jitter = ctx.rng.random_range(-FRAC_PI_4..=FRAC_PI_4);
            self.facing = normalize_angle(self.facing + PI + jitter);
            self.patrol_turn_timer = turn_interval(ctx.rng, &patrol);
        }
    }

    /// Step toward `target`; true once close enough to count as arrived
    fn move_towards(&mut self, target: Vec2, speed: f32, walls: &[Rect]) -> bool {
        let remaining = distance(self.pos, target);
        let delta = if remaining < speed {
            target - self.pos
        } else {
            heading(angle_to(self.pos, target)) * speed
        };

        let bbox = self.bbox();
        let result = resolve_move(&bbox, delta, walls);
        self.pos += result.applied(&bbox);

        distance(self.pos, target) < (self.size / 4.0).max(speed * 0.5)
    }

    fn shoot(&self, id: EntityId, target: Vec2, ctx: &mut UpdateCtx) {
        let shot = Projectile::new(self.pos, target, &self.shot, false, Some(id), self.facing);
        ctx.lifecycle.add(shot);
        ctx.events.push(GameEvent::ShotFired {
            shooter: id,
            by_player: false,
        });
    }
}

/// Random wait until the next turn attempt
fn turn_interval(rng: &mut Pcg32, patrol: &PatrolTuning) -> u32 {
    if patrol.max_turn_interval <= patrol.min_turn_interval {
        patrol.min_turn_interval
    } else {
        rng.random_range(patrol.min_turn_interval..=patrol.max_turn_interval)
    }
}
