//! Read-only view of the world for renderers and UI

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyState;
use super::geometry::Rect;
use super::state::{Entity, EntityId, EntityKind, ItemKind};
use super::world::World;

/// Per-kind state a renderer needs for sprite/animation selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewState {
    Player { health: f32, shield: f32, ammo: u32 },
    Enemy { state: EnemyState, health: f32 },
    Projectile { fired_by_player: bool },
    Wall,
    Item { item: ItemKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub bbox: Rect,
    pub center: Vec2,
    pub facing: f32,
    pub state: ViewState,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let state = match &entity.kind {
            EntityKind::Player(p) => ViewState::Player {
                health: p.health,
                shield: p.shield,
                ammo: p.ammo,
            },
            EntityKind::Enemy(e) => ViewState::Enemy {
                state: e.state,
                health: e.health,
            },
            EntityKind::Projectile(p) => ViewState::Projectile {
                fired_by_player: p.fired_by_player,
            },
            EntityKind::Wall(_) => ViewState::Wall,
            EntityKind::Item(i) => ViewState::Item { item: i.kind },
        };
        Self {
            id: entity.id,
            bbox: entity.bbox(),
            center: entity.center(),
            facing: entity.facing(),
            state,
        }
    }
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player_alive: bool,
    pub active_enemy_count: u32,
    pub kills: u32,
    pub entities: Vec<EntityView>,
}

impl World {
    pub fn snapshot(&self) -> Snapshot {
        let report = self.report();
        Snapshot {
            tick: report.tick,
            player_alive: report.player_alive,
            active_enemy_count: report.active_enemy_count,
            kills: report.kills,
            entities: self.entities().iter().map(EntityView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::sim::enemy::Enemy;
    use crate::sim::player::Player;
    use crate::sim::state::{Item, Wall};

    #[test]
    fn test_snapshot_lists_live_entities_in_order() {
        let mut w = World::new(Tuning::default(), 1);
        let tuning = w.tuning().clone();
        w.load_level::<_, EntityKind>([
            Wall::new(0.0, 0.0, 50.0, 10.0).into(),
            Player::new(Vec2::new(200.0, 200.0), &tuning.player).into(),
            Enemy::new(Vec2::new(400.0, 400.0), &tuning.enemy).into(),
            Item::new(Vec2::new(300.0, 300.0), ItemKind::Health, 15.0).into(),
        ])
        .expect("level");

        let snap = w.snapshot();
        assert!(snap.player_alive);
        assert_eq!(snap.active_enemy_count, 1);
        assert_eq!(snap.entities.len(), 4);
        assert_eq!(snap.entities[0].state, ViewState::Wall);
        assert_eq!(snap.entities[0].bbox, Rect::new(0.0, 0.0, 50.0, 10.0));
        assert_eq!(snap.entities[1].center, Vec2::new(200.0, 200.0));
        assert!(matches!(
            snap.entities[2].state,
            ViewState::Enemy {
                state: EnemyState::Patrolling,
                ..
            }
        ));
    }

    #[test]
    fn test_snapshot_json_is_tagged() {
        let mut w = World::new(Tuning::default(), 1);
        assert!(
            w.load_level([Item::new(Vec2::new(30.0, 30.0), ItemKind::Ammo, 10.0)])
                .is_err()
        );
        let json = serde_json::to_value(w.snapshot()).expect("serialize");
        assert_eq!(json["player_alive"], false);
        assert_eq!(json["entities"][0]["state"]["kind"], "item");
        assert_eq!(json["entities"][0]["state"]["item"], "Ammo");

        let back: Snapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, w.snapshot());
    }
}
