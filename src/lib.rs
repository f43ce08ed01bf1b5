//! Stealth Sim - top-down stealth-combat simulation core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (geometry, perception, guard AI, lifecycle)
//! - `config`: Data-driven gameplay tuning
//!
//! Rendering, audio, menus, input polling and level layouts live outside this
//! crate. They feed [`sim::TickInput`] in and read [`sim::Snapshot`] /
//! [`sim::GameEvent`] out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, Tuning};
pub use sim::{TickInput, TickReport, World};

/// Default gameplay constants (overridable through [`Tuning`])
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 5200.0;
    pub const WORLD_HEIGHT: f32 = 4000.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Collision box is smaller than the drawn sprite
    pub const PLAYER_HITBOX_SCALE: f32 = 0.7;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_SPEED_PER_UPGRADE: f32 = 0.5;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_AMMO: u32 = 30;
    pub const PLAYER_MAX_SHIELD: f32 = 100.0;
    /// Ticks between player shots
    pub const PLAYER_FIRE_RATE: u32 = 15;
    /// Radians of turn per unit of relative aim movement
    pub const PLAYER_ROTATION_SENSITIVITY: f32 = 0.004;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 32.0;
    pub const ENEMY_HITBOX_SCALE: f32 = 0.9;
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_HEALTH: f32 = 50.0;
    pub const ENEMY_VISION_RANGE: f32 = 250.0;
    pub const ENEMY_VISION_ANGLE_DEG: f32 = 80.0;
    pub const ENEMY_CHASE_MULTIPLIER: f32 = 1.5;
    /// Distance a chasing guard keeps from the player before firing
    pub const ENEMY_STANDOFF_DISTANCE: f32 = 150.0;
    pub const ENEMY_FIRE_RATE: u32 = 60;

    /// Patrol turn timing (ticks) and chance
    pub const PATROL_MIN_TURN_INTERVAL: u32 = 180;
    pub const PATROL_MAX_TURN_INTERVAL: u32 = 480;
    pub const PATROL_RANDOM_TURN_CHANCE: f64 = 0.1;

    /// Projectile defaults
    pub const PLAYER_PROJECTILE_SPEED: f32 = 8.0;
    pub const PLAYER_PROJECTILE_DAMAGE: f32 = 10.0;
    pub const PLAYER_PROJECTILE_SIZE: f32 = 8.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 5.0;
    pub const ENEMY_PROJECTILE_DAMAGE: f32 = 20.0;
    pub const ENEMY_PROJECTILE_SIZE: f32 = 4.0;
    /// How far ahead of the shooter a player shot is aimed
    pub const SHOT_AIM_DISTANCE: f32 = 1000.0;

    /// Item defaults
    pub const ITEM_SIZE: f32 = 15.0;
    pub const ITEM_AMMO_AMOUNT: u32 = 10;
    pub const ITEM_HEALTH_AMOUNT: f32 = 25.0;
    pub const ITEM_SHIELD_AMOUNT: f32 = 50.0;
}
