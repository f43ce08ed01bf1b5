//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One fixed step per [`World::tick`]
//! - Seeded RNG only
//! - Stable iteration order (live-set insertion order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combat;
pub mod enemy;
pub mod geometry;
pub mod perception;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{MoveResult, resolve_move};
pub use combat::Projectile;
pub use enemy::{Enemy, EnemyState};
pub use geometry::{
    Rect, aabb_overlap, angle_diff, angle_to, distance, heading, normalize_angle, point_in_cone,
    segment_intersect,
};
pub use perception::{Observer, is_visible};
pub use player::{Player, UpgradeKind};
pub use snapshot::{EntityView, Snapshot, ViewState};
pub use state::{Entity, EntityId, EntityKind, GameEvent, Item, ItemKind, Outcome, Wall};
pub use tick::{MovementIntent, Others, TickInput, UpdateCtx};
pub use world::{LevelError, LevelSummary, Lifecycle, TickReport, World};
