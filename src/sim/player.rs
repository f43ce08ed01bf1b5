//! The player character
//!
//! Translates the per-tick input snapshot into facing, movement and shots, and
//! owns the health/shield/ammo bookkeeping that pickups and hits mutate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_move;
use super::combat::Projectile;
use super::geometry::{Rect, angle_to, heading, normalize_angle};
use super::state::{EntityId, GameEvent, Outcome};
use super::tick::UpdateCtx;
use crate::config::PlayerTuning;
use crate::consts::SHOT_AIM_DISTANCE;

/// Permanent upgrades granted by upgrade pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Speed,
}

/// The player
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center of the collision box
    pub pos: Vec2,
    /// Collision box edge
    pub size: f32,
    /// Facing angle (radians)
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    pub base_speed: f32,
    pub speed: f32,
    pub speed_upgrades: u32,
    speed_per_upgrade: f32,
    dead: bool,
}

impl Player {
    /// Fresh player centered on `pos`: full health and ammo, no shield
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos,
            size: tuning.hitbox(),
            facing: 0.0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            shield: 0.0,
            max_shield: tuning.max_shield,
            ammo: tuning.max_ammo,
            max_ammo: tuning.max_ammo,
            fire_cooldown: 0,
            base_speed: tuning.speed,
            speed: tuning.speed,
            speed_upgrades: 0,
            speed_per_upgrade: tuning.speed_per_upgrade,
            dead: false,
        }
    }

    pub fn bbox(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn add_health(&mut self, amount: f32) {
        if self.dead {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn add_ammo(&mut self, amount: u32) {
        if self.dead {
            return;
        }
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    pub fn add_shield(&mut self, amount: f32) {
        if self.dead {
            return;
        }
        self.shield = (self.shield + amount).min(self.max_shield);
    }

    pub fn apply_upgrade(&mut self, upgrade: UpgradeKind) {
        if self.dead {
            return;
        }
        match upgrade {
            UpgradeKind::Speed => {
                self.speed_upgrades += 1;
                self.speed = self.base_speed + self.speed_upgrades as f32 * self.speed_per_upgrade;
                log::debug!("Speed upgrade {} -> speed {}", self.speed_upgrades, self.speed);
            }
        }
    }

    /// Apply a hit: shield absorbs first, the remainder comes off health
    ///
    /// Returns the health actually lost and whether this hit killed the
    /// player. Death is reported once; later hits are ignored.
    pub fn take_damage(&mut self, amount: f32) -> (f32, bool) {
        if self.dead || amount <= 0.0 {
            return (0.0, false);
        }
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        let remainder = amount - absorbed;
        let before = self.health;
        self.health = (self.health - remainder).max(0.0);

        if self.health <= 0.0 {
            self.die();
            return (before, true);
        }
        (before - self.health, false)
    }

    fn die(&mut self) {
        self.dead = true;
        self.health = 0.0;
        self.speed = 0.0;
        self.ammo = 0;
        log::info!("Player has died");
    }

    /// One tick of input-driven behavior
    pub(crate) fn update(&mut self, id: EntityId, ctx: &mut UpdateCtx) -> Outcome {
        if self.dead {
            return Outcome::Remove;
        }

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);

        let input = ctx.input;
        let tuning = &ctx.tuning.player;

        // Absolute aim wins over relative (pointer-locked) aim
        if let Some(target) = input.aim_target {
            if target != self.pos {
                self.facing = angle_to(self.pos, target);
            }
        } else if input.aim_delta.x != 0.0 {
            let turned = self.facing + input.aim_delta.x * tuning.rotation_sensitivity;
            self.facing = normalize_angle(turned);
        }

        let delta = input.movement.direction() * self.speed;
        if delta != Vec2::ZERO {
            let bbox = self.bbox();
            let result = resolve_move(&bbox, delta, ctx.walls);
            self.pos += result.applied(&bbox);
        }

        if input.fire_held && self.ammo > 0 && self.fire_cooldown == 0 {
            let dir = heading(self.facing);
            let start = self.pos + dir * tuning.muzzle_offset();
            let target = self.pos + dir * SHOT_AIM_DISTANCE;
            let shot = Projectile::new(start, target, &tuning.shot, true, Some(id), self.facing);
            ctx.lifecycle.add(shot);
            ctx.events.push(GameEvent::ShotFired {
                shooter: id,
                by_player: true,
            });
            self.ammo -= 1;
            self.fire_cooldown = tuning.fire_rate;
        }

        Outcome::Keep
    }
}
