//! Discrete gameplay events
//!
//! The resolver and session push these as they happen; the host drains them
//! once per frame (HUD updates, analytics, tests).

use glam::Vec2;
use serde::Serialize;

use super::state::{DropKind, Faction, GamePhase, PickupKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Session phase changed
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Countdown advanced (remaining seconds, 0 = go)
    CountdownTick { remaining: u32 },
    /// An actor fired
    Shot { faction: Faction },
    /// Enemy projectile struck the player
    PlayerDamaged { damage: i32, health: i32 },
    /// Player projectile struck an enemy without killing it
    EnemyDamaged { enemy_id: u32, damage: i32 },
    /// Enemy destroyed
    EnemyKilled {
        enemy_id: u32,
        faction: Faction,
        pos: Vec2,
        drop: DropKind,
        points: u64,
    },
    /// Enemy entered the arena
    EnemySpawned { enemy_id: u32, faction: Faction },
    /// Player health went up from a heart
    Healed { health: i32 },
    /// Buff (re)started; expires at the given wall-clock ms
    BuffApplied { expires_at: f64 },
    /// Buff ran out
    BuffExpired,
    /// Pickup vanished without being collected
    PickupExpired { kind: PickupKind },
    /// Player destroyed (fires once per session)
    PlayerDied { pos: Vec2 },
}
