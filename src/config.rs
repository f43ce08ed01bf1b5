//! Gameplay tuning
//!
//! Every balance number the simulation uses, grouped per entity type. Loaded
//! from JSON; missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors that can occur when loading tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Values parsed but break an invariant
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// World extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

/// Projectile parameters for one shooter type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTuning {
    /// Units per tick
    pub speed: f32,
    pub damage: f32,
    /// Square collision box edge
    pub size: f32,
}

impl ShotTuning {
    pub const PLAYER: Self = Self {
        speed: PLAYER_PROJECTILE_SPEED,
        damage: PLAYER_PROJECTILE_DAMAGE,
        size: PLAYER_PROJECTILE_SIZE,
    };

    pub const ENEMY: Self = Self {
        speed: ENEMY_PROJECTILE_SPEED,
        damage: ENEMY_PROJECTILE_DAMAGE,
        size: ENEMY_PROJECTILE_SIZE,
    };
}

/// Partially specified shot; absent fields keep the shooter's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShotOverride {
    speed: Option<f32>,
    damage: Option<f32>,
    size: Option<f32>,
}

impl ShotOverride {
    fn over(self, base: ShotTuning) -> ShotTuning {
        ShotTuning {
            speed: self.speed.unwrap_or(base.speed),
            damage: self.damage.unwrap_or(base.damage),
            size: self.size.unwrap_or(base.size),
        }
    }
}

fn player_shot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShotTuning, D::Error> {
    ShotOverride::deserialize(deserializer).map(|o| o.over(ShotTuning::PLAYER))
}

fn enemy_shot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShotTuning, D::Error> {
    ShotOverride::deserialize(deserializer).map(|o| o.over(ShotTuning::ENEMY))
}

/// Player parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Drawn sprite size; the collision box is scaled down from it
    pub size: f32,
    pub speed: f32,
    /// Speed added per collected speed upgrade
    pub speed_per_upgrade: f32,
    pub max_health: f32,
    pub max_ammo: u32,
    pub max_shield: f32,
    /// Ticks between shots
    pub fire_rate: u32,
    /// Radians per unit of relative aim movement
    pub rotation_sensitivity: f32,
    #[serde(deserialize_with = "player_shot")]
    pub shot: ShotTuning,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            speed_per_upgrade: PLAYER_SPEED_PER_UPGRADE,
            max_health: PLAYER_MAX_HEALTH,
            max_ammo: PLAYER_MAX_AMMO,
            max_shield: PLAYER_MAX_SHIELD,
            fire_rate: PLAYER_FIRE_RATE,
            rotation_sensitivity: PLAYER_ROTATION_SENSITIVITY,
            shot: ShotTuning::PLAYER,
        }
    }
}

impl PlayerTuning {
    /// Collision box edge
    pub fn hitbox(&self) -> f32 {
        self.size * PLAYER_HITBOX_SCALE
    }

    /// Distance from the player center to where shots spawn
    pub fn muzzle_offset(&self) -> f32 {
        self.size / 2.0 + 8.0
    }
}

/// Random patrol turning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolTuning {
    /// Shortest wait (ticks) between random turn attempts
    pub min_turn_interval: u32,
    /// Longest wait (ticks) between random turn attempts
    pub max_turn_interval: u32,
    /// Chance a due turn attempt actually turns
    pub random_turn_chance: f64,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            min_turn_interval: PATROL_MIN_TURN_INTERVAL,
            max_turn_interval: PATROL_MAX_TURN_INTERVAL,
            random_turn_chance: PATROL_RANDOM_TURN_CHANCE,
        }
    }
}

/// Guard parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub speed: f32,
    pub health: f32,
    pub vision_range: f32,
    /// Full cone width in degrees
    pub vision_angle_deg: f32,
    pub chase_multiplier: f32,
    pub standoff_distance: f32,
    /// Ticks between shots
    pub fire_rate: u32,
    #[serde(deserialize_with = "enemy_shot")]
    pub shot: ShotTuning,
    pub patrol: PatrolTuning,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: ENEMY_SIZE,
            speed: ENEMY_SPEED,
            health: ENEMY_HEALTH,
            vision_range: ENEMY_VISION_RANGE,
            vision_angle_deg: ENEMY_VISION_ANGLE_DEG,
            chase_multiplier: ENEMY_CHASE_MULTIPLIER,
            standoff_distance: ENEMY_STANDOFF_DISTANCE,
            fire_rate: ENEMY_FIRE_RATE,
            shot: ShotTuning::ENEMY,
            patrol: PatrolTuning::default(),
        }
    }
}

impl EnemyTuning {
    pub fn hitbox(&self) -> f32 {
        self.size * ENEMY_HITBOX_SCALE
    }
}

/// Pickup sizes and effect amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub size: f32,
    pub ammo: u32,
    pub health: f32,
    pub shield: f32,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            size: ITEM_SIZE,
            ammo: ITEM_AMMO_AMOUNT,
            health: ITEM_HEALTH_AMOUNT,
            shield: ITEM_SHIELD_AMOUNT,
        }
    }
}

/// All gameplay tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub items: ItemTuning,
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("player.size", self.player.size)?;
        positive("player.speed", self.player.speed)?;
        positive("player.max_health", self.player.max_health)?;
        positive("player.shot.speed", self.player.shot.speed)?;
        positive("player.shot.size", self.player.shot.size)?;
        positive("enemy.size", self.enemy.size)?;
        positive("enemy.speed", self.enemy.speed)?;
        positive("enemy.chase_multiplier", self.enemy.chase_multiplier)?;
        positive("enemy.vision_range", self.enemy.vision_range)?;
        positive("enemy.health", self.enemy.health)?;
        positive("enemy.shot.speed", self.enemy.shot.speed)?;
        positive("enemy.shot.size", self.enemy.shot.size)?;
        positive("items.size", self.items.size)?;

        let patrol = &self.enemy.patrol;
        if patrol.min_turn_interval > patrol.max_turn_interval {
            return Err(ConfigError::Invalid(format!(
                "enemy.patrol.min_turn_interval ({}) exceeds max_turn_interval ({})",
                patrol.min_turn_interval, patrol.max_turn_interval
            )));
        }
        if !(0.0..=1.0).contains(&patrol.random_turn_chance) {
            return Err(ConfigError::Invalid(format!(
                "enemy.patrol.random_turn_chance must be within [0, 1], got {}",
                patrol.random_turn_chance
            )));
        }
        Ok(())
    }
}
