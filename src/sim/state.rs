//! Entity model
//!
//! The live world is a flat list of [`Entity`] values. Each wraps one variant
//! of a closed set of kinds; dispatch happens by matching on [`EntityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::Projectile;
use super::enemy::Enemy;
use super::geometry::{Rect, aabb_overlap};
use super::player::{Player, UpgradeKind};
use super::tick::{Others, UpdateCtx};

/// Stable entity identity
///
/// Ids are never reused within a [`super::World`], so holding one after the
/// entity is gone is safe: lookups simply miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What an entity's update asks of the lifecycle manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Keep,
    Remove,
}

/// A static obstacle for movement and line of sight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

impl Wall {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Ammo,
    Health,
    Shield,
    Upgrade,
}

/// A pickup lying in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub rect: Rect,
    pub kind: ItemKind,
}

impl Item {
    /// Item of edge `size` centered on `center`
    pub fn new(center: Vec2, kind: ItemKind, size: f32) -> Self {
        Self {
            rect: Rect::centered(center, Vec2::splat(size)),
            kind,
        }
    }

    /// Apply the pickup once the player touches it
    pub(crate) fn update(&self, id: EntityId, others: &mut Others, ctx: &mut UpdateCtx) -> Outcome {
        let Some((_, player)) = others.player_mut() else {
            return Outcome::Keep;
        };
        if !aabb_overlap(&self.rect, &player.bbox()) {
            return Outcome::Keep;
        }

        let amounts = &ctx.tuning.items;
        match self.kind {
            ItemKind::Ammo => player.add_ammo(amounts.ammo),
            ItemKind::Health => player.add_health(amounts.health),
            ItemKind::Shield => player.add_shield(amounts.shield),
            ItemKind::Upgrade => player.apply_upgrade(UpgradeKind::Speed),
        }
        log::debug!("Collected {:?} item {:?}", self.kind, id);
        ctx.events.push(GameEvent::ItemCollected {
            item: id,
            kind: self.kind,
        });
        Outcome::Remove
    }
}

/// The closed set of entity variants
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Player(Player),
    Enemy(Enemy),
    Projectile(Projectile),
    Wall(Wall),
    Item(Item),
}

impl From<Player> for EntityKind {
    fn from(player: Player) -> Self {
        EntityKind::Player(player)
    }
}

impl From<Enemy> for EntityKind {
    fn from(enemy: Enemy) -> Self {
        EntityKind::Enemy(enemy)
    }
}

impl From<Projectile> for EntityKind {
    fn from(projectile: Projectile) -> Self {
        EntityKind::Projectile(projectile)
    }
}

impl From<Wall> for EntityKind {
    fn from(wall: Wall) -> Self {
        EntityKind::Wall(wall)
    }
}

impl From<Item> for EntityKind {
    fn from(item: Item) -> Self {
        EntityKind::Item(item)
    }
}

/// A live (or pending) entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Number of update passes this entity has received
    pub(crate) age: u32,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind, age: 0 }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Collision/hit-test box in world coordinates
    pub fn bbox(&self) -> Rect {
        match &self.kind {
            EntityKind::Player(p) => p.bbox(),
            EntityKind::Enemy(e) => e.bbox(),
            EntityKind::Projectile(p) => p.bbox(),
            EntityKind::Wall(w) => w.rect,
            EntityKind::Item(i) => i.rect,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bbox().center()
    }

    /// Facing angle for rendering (0 for static entities)
    pub fn facing(&self) -> f32 {
        match &self.kind {
            EntityKind::Player(p) => p.facing,
            EntityKind::Enemy(e) => e.facing,
            EntityKind::Projectile(p) => p.angle(),
            EntityKind::Wall(_) | EntityKind::Item(_) => 0.0,
        }
    }

    /// Obstacle rectangle if this entity blocks movement and sight
    pub fn as_obstacle(&self) -> Option<Rect> {
        match &self.kind {
            EntityKind::Wall(w) => Some(w.rect),
            _ => None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }
}

/// Observable state changes for audio/score collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile was spawned
    ShotFired { shooter: EntityId, by_player: bool },
    /// The player picked something up
    ItemCollected { item: EntityId, kind: ItemKind },
    /// A patrolling/returning guard caught sight of the player
    PlayerSpotted { enemy: EntityId },
    /// A guard was hit while unaware and is now investigating
    EnemyAlerted { enemy: EntityId },
    /// A guard's health dropped to zero
    EnemyKilled { enemy: EntityId },
    /// Damage reached the player (after the shield)
    PlayerDamaged { player: EntityId, amount: f32 },
    /// The player's health dropped to zero
    PlayerDied { player: EntityId },
    /// A dead guard left the world and counts as a kill
    KillCredited { enemy: EntityId },
}
