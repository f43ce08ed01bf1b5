//! Projectile flight and hit resolution

use glam::Vec2;

use super::enemy::EnemyState;
use super::geometry::{Rect, aabb_overlap};
use super::state::{EntityId, EntityKind, GameEvent, Outcome};
use super::tick::{Others, UpdateCtx};
use crate::config::ShotTuning;

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Center of the collision box
    pub pos: Vec2,
    /// Constant displacement per tick
    pub vel: Vec2,
    /// Collision box edge
    pub size: f32,
    pub damage: f32,
    pub fired_by_player: bool,
    /// Who fired it; compared by id only, never looked up
    pub shooter: Option<EntityId>,
}

impl Projectile {
    /// Projectile from `start` heading for `target`
    ///
    /// When the two points coincide the shot follows `fallback_angle`.
    pub fn new(
        start: Vec2,
        target: Vec2,
        shot: &ShotTuning,
        fired_by_player: bool,
        shooter: Option<EntityId>,
        fallback_angle: f32,
    ) -> Self {
        let dir = (target - start)
            .try_normalize()
            .unwrap_or_else(|| Vec2::new(fallback_angle.cos(), fallback_angle.sin()));
        Self {
            pos: start,
            vel: dir * shot.speed,
            size: shot.size,
            damage: shot.damage,
            fired_by_player,
            shooter,
        }
    }

    pub fn bbox(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size))
    }

    /// Direction of travel (radians)
    pub fn angle(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Advance and resolve the first hit in snapshot order
    pub(crate) fn update(
        &mut self,
        id: EntityId,
        others: &mut Others,
        ctx: &mut UpdateCtx,
    ) -> Outcome {
        self.pos += self.vel;

        if !ctx.bounds.expanded(Vec2::splat(self.size)).contains(self.pos) {
            log::trace!("Projectile {:?} left the world", id);
            return Outcome::Remove;
        }

        let bbox = self.bbox();
        for other in others.iter_mut() {
            if Some(other.id) == self.shooter {
                continue;
            }
            let target_id = other.id;
            match &mut other.kind {
                EntityKind::Wall(wall) if aabb_overlap(&bbox, &wall.rect) => {
                    log::trace!("Projectile {:?} absorbed by wall {:?}", id, target_id);
                    return Outcome::Remove;
                }
                EntityKind::Enemy(enemy)
                    if self.fired_by_player
                        && !enemy.is_dead()
                        && aabb_overlap(&bbox, &enemy.bbox()) =>
                {
                    let was_unaware = enemy.state == EnemyState::Patrolling;
                    log::trace!("Projectile {:?} hit enemy {:?}", id, target_id);
                    if enemy.take_damage(self.damage, Some(self.pos)) {
                        log::debug!("Enemy {:?} killed", target_id);
                        ctx.events.push(GameEvent::EnemyKilled { enemy: target_id });
                    } else if was_unaware {
                        ctx.events.push(GameEvent::EnemyAlerted { enemy: target_id });
                    }
                    return Outcome::Remove;
                }
                EntityKind::Player(player)
                    if !self.fired_by_player
                        && player.is_alive()
                        && aabb_overlap(&bbox, &player.bbox()) =>
                {
                    let (lost, died) = player.take_damage(self.damage);
                    if lost > 0.0 {
                        ctx.events.push(GameEvent::PlayerDamaged {
                            player: target_id,
                            amount: lost,
                        });
                    }
                    if died {
                        ctx.events.push(GameEvent::PlayerDied { player: target_id });
                        ctx.lifecycle.remove(target_id);
                    }
                    return Outcome::Remove;
                }
                _ => {}
            }
        }
        Outcome::Keep
    }
}
