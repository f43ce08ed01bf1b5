//! Authoritative world state and entity lifecycle
//!
//! Entities never enter or leave `live` in the middle of an update pass.
//! Requests are buffered in [`Lifecycle`] and applied by reconciliation at
//! the end of each tick, which also keeps the derived aggregates (player
//! reference, active enemy count, kills) in step with the live set.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::player::Player;
use super::state::{Entity, EntityId, EntityKind, GameEvent};
use crate::config::Tuning;

/// Level setup failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no player ({entities} entities loaded)")]
    MissingPlayer { entities: usize },
}

/// Buffered additions and removals for the current tick
#[derive(Debug)]
pub struct Lifecycle {
    pending_add: Vec<Entity>,
    pending_remove: Vec<EntityId>,
    next_id: u32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 1,
        }
    }
}

impl Lifecycle {
    /// Queue an entity for the next reconciliation and hand back its id
    pub fn add(&mut self, kind: impl Into<EntityKind>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending_add.push(Entity::new(id, kind.into()));
        id
    }

    /// Queue a removal; repeated requests collapse into one
    pub fn remove(&mut self, id: EntityId) {
        if !self.pending_remove.contains(&id) {
            self.pending_remove.push(id);
        }
    }

    pub fn pending_additions(&self) -> &[Entity] {
        &self.pending_add
    }

    pub fn pending_removals(&self) -> &[EntityId] {
        &self.pending_remove
    }

    fn clear(&mut self) {
        self.pending_add.clear();
        self.pending_remove.clear();
    }
}

/// Per-tick summary for the external game-state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub player_alive: bool,
    pub active_enemy_count: u32,
    pub kills: u32,
}

/// What a level load put into the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub entities: usize,
    pub enemies: u32,
    pub walls: usize,
    pub items: usize,
    pub player: Option<EntityId>,
}

/// The simulation world
pub struct World {
    /// Live entities in insertion order
    pub(crate) live: Vec<Entity>,
    pub(crate) lifecycle: Lifecycle,
    player: Option<EntityId>,
    active_enemies: u32,
    initial_enemy_count: u32,
    kills: u32,
    pub(crate) tuning: Tuning,
    pub(crate) bounds: Rect,
    pub(crate) rng: Pcg32,
    seed: u64,
    pub(crate) time_ticks: u64,
    /// Events recorded during the last tick
    pub(crate) events: Vec<GameEvent>,
}

impl World {
    /// Empty world with the given tuning and RNG seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let bounds = Rect::new(0.0, 0.0, tuning.world.width, tuning.world.height);
        Self {
            live: Vec::new(),
            lifecycle: Lifecycle::default(),
            player: None,
            active_enemies: 0,
            initial_enemy_count: 0,
            kills: 0,
            tuning,
            bounds,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Queue an entity; it joins `live` at the next reconciliation
    pub fn add(&mut self, kind: impl Into<EntityKind>) -> EntityId {
        self.lifecycle.add(kind)
    }

    /// Queue a removal; unknown ids are ignored at reconciliation
    ///
    /// Removing an enemy always lowers the active enemy count, dead or not.
    /// Only a dead enemy is credited as a kill.
    pub fn remove(&mut self, id: EntityId) {
        self.lifecycle.remove(id);
    }

    /// Replace the world contents with a level and reconcile immediately
    ///
    /// The world stays loaded even when the level has no player; the error
    /// only reports it.
    pub fn load_level<I, K>(&mut self, entities: I) -> Result<LevelSummary, LevelError>
    where
        I: IntoIterator<Item = K>,
        K: Into<EntityKind>,
    {
        self.live.clear();
        self.lifecycle.clear();
        self.events.clear();
        self.player = None;
        self.active_enemies = 0;
        self.kills = 0;
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);

        for kind in entities {
            self.lifecycle.add(kind);
        }
        self.reconcile();
        self.initial_enemy_count = self.active_enemies;

        let count = |f: fn(&Entity) -> bool| self.live.iter().filter(|e| f(e)).count();
        let summary = LevelSummary {
            entities: self.live.len(),
            enemies: self.active_enemies,
            walls: count(|e| matches!(e.kind, EntityKind::Wall(_))),
            items: count(|e| matches!(e.kind, EntityKind::Item(_))),
            player: self.player,
        };
        log::info!(
            "Level loaded: {} entities, {} enemies, {} walls, {} items",
            summary.entities,
            summary.enemies,
            summary.walls,
            summary.items
        );

        if summary.player.is_none() {
            log::warn!("Level has no player");
            return Err(LevelError::MissingPlayer {
                entities: summary.entities,
            });
        }
        Ok(summary)
    }

    /// Signal that a dead enemy's external death sequence has finished
    ///
    /// The enemy asks for removal on its next update. Returns false for
    /// unknown ids and for anything that is not a dead enemy.
    pub fn complete_death_sequence(&mut self, id: EntityId) -> bool {
        self.live
            .iter_mut()
            .find(|e| e.id == id)
            .and_then(Entity::as_enemy_mut)
            .is_some_and(|enemy| enemy.complete_death_sequence())
    }

    /// Apply buffered removals, then additions
    pub(crate) fn reconcile(&mut self) -> TickReport {
        let removals = std::mem::take(&mut self.lifecycle.pending_remove);
        if !removals.is_empty() {
            let had_enemies = self.active_enemies > 0;
            for entity in self.live.iter_mut().filter(|e| removals.contains(&e.id)) {
                if self.player == Some(entity.id) {
                    log::info!("Player {:?} removed", entity.id);
                    self.player = None;
                }
                if let EntityKind::Enemy(enemy) = &mut entity.kind {
                    self.active_enemies = self.active_enemies.saturating_sub(1);
                    if enemy.credit_kill() {
                        self.kills += 1;
                        self.events.push(GameEvent::KillCredited { enemy: entity.id });
                    }
                }
            }
            let before = self.live.len();
            self.live.retain(|e| !removals.contains(&e.id));
            log::debug!(
                "Reconciled {} removal(s), {} entities left",
                before - self.live.len(),
                self.live.len()
            );
            if had_enemies && self.active_enemies == 0 {
                log::info!("All enemies cleared ({} kills)", self.kills);
            }
        }

        let mut additions = std::mem::take(&mut self.lifecycle.pending_add);
        for entity in &mut additions {
            match &mut entity.kind {
                EntityKind::Player(_) => self.player = Some(entity.id),
                EntityKind::Enemy(enemy) => {
                    enemy.schedule_patrol(&mut self.rng, &self.tuning.enemy.patrol);
                    self.active_enemies += 1;
                }
                _ => {}
            }
        }
        if !additions.is_empty() {
            log::debug!("Reconciled {} addition(s)", additions.len());
        }
        self.live.extend(additions);

        if self.player.is_none() {
            if let Some(found) = self.live.iter().find(|e| e.is_player()) {
                log::warn!("Re-derived player reference {:?}", found.id);
                self.player = Some(found.id);
            }
        }

        self.report()
    }

    pub fn report(&self) -> TickReport {
        TickReport {
            tick: self.time_ticks,
            player_alive: self.player().is_some_and(Player::is_alive),
            active_enemy_count: self.active_enemies,
            kills: self.kills,
        }
    }

    /// Live entities in update order
    pub fn entities(&self) -> &[Entity] {
        &self.live
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.live.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.live.iter_mut().find(|e| e.id == id)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.and_then(|id| self.get(id)).and_then(Entity::as_player)
    }

    pub fn active_enemy_count(&self) -> u32 {
        self.active_enemies
    }

    pub fn initial_enemy_count(&self) -> u32 {
        self.initial_enemy_count
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Events recorded during the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
