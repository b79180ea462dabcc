//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked from
//! JSON without touching simulation code. Missing fields fall back to the
//! shipped defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Movement speed (px/frame at multiplier 1)
    pub player_speed: f32,
    /// Projectile speed (px/frame at multiplier 1)
    pub player_bullet_speed: f32,
    /// Minimum ms between player shots
    pub player_fire_rate_ms: f64,
    /// Player bullet color (0xRRGGBB)
    pub player_bullet_color: u32,

    // === Projectiles ===
    pub bullet_lifetime_ms: f64,
    pub max_bounces: u32,

    // === Spawning ===
    /// Enemy population allowed before any kills
    pub base_enemies: usize,
    /// Absolute population ceiling
    pub max_enemies: usize,
    /// Kills needed per extra enemy slot
    pub kills_per_slot: u32,
    pub spawn_delay_min_ms: f64,
    pub spawn_delay_max_ms: f64,
    /// Probability a scheduled spawn is a fire enemy
    pub fire_enemy_chance: f64,
    /// Enemies created at session start hold fire this long
    pub first_enemy_grace_ms: f64,

    // === Pickups & buff ===
    pub pickup_lifetime_ms: f64,
    pub buff_duration_ms: f64,

    // === Session ===
    pub countdown_secs: u32,
    pub game_over_delay_ms: f64,

    // === Feedback ===
    /// Ticks of hit-shake after taking damage
    pub shake_frames: u8,

    // === Veteran rule ===
    /// Kill count above which the player's max health is raised
    pub veteran_kills: u32,
    pub veteran_max_health: i32,

    /// Also record a mint transaction when a fire enemy dies
    pub mint_on_boss_kill: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 3.0,
            player_bullet_speed: 6.0,
            player_fire_rate_ms: 250.0,
            player_bullet_color: 0xc005c7,

            bullet_lifetime_ms: 3000.0,
            max_bounces: 3,

            base_enemies: 3,
            max_enemies: 12,
            kills_per_slot: 10,
            spawn_delay_min_ms: 150.0,
            spawn_delay_max_ms: 430.0,
            fire_enemy_chance: 0.05,
            first_enemy_grace_ms: 3000.0,

            pickup_lifetime_ms: 8000.0,
            buff_duration_ms: 10_000.0,

            countdown_secs: 3,
            game_over_delay_ms: 1000.0,

            shake_frames: 6,

            veteran_kills: 10,
            veteran_max_health: 8,

            mint_on_boss_kill: false,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), TuningError> {
        if self.spawn_delay_max_ms <= self.spawn_delay_min_ms {
            return Err(TuningError::Invalid("spawn delay window is empty"));
        }
        if self.kills_per_slot == 0 {
            return Err(TuningError::Invalid("kills_per_slot must be positive"));
        }
        if self.max_enemies < self.base_enemies {
            return Err(TuningError::Invalid("max_enemies below base_enemies"));
        }
        if !(0.0..=1.0).contains(&self.fire_enemy_chance) {
            return Err(TuningError::Invalid("fire_enemy_chance outside [0, 1]"));
        }
        Ok(())
    }

    /// Enemy population allowed for a given kill count
    pub fn max_allowed_enemies(&self, kill_count: u32) -> usize {
        let extra = (kill_count / self.kills_per_slot) as usize;
        (self.base_enemies + extra).min(self.max_enemies)
    }
}
