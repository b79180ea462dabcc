//! Mondalak - a top-down arena tank shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, spawning, session flow)
//! - `services`: Injected collaborators (assets, audio cues, score sink)
//! - `renderer`: Post-frame snapshots and the draw contract
//! - `transactions`: Score/mint transaction log fed by the score sink
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `platform`: Browser-only glue (remote submission)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod services;
pub mod settings;
pub mod sim;
pub mod transactions;

pub use services::{AudioCues, Cue, ScoreSink, Services};
pub use settings::Settings;
pub use transactions::TransactionLog;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (pixels)
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Tile map geometry
    pub const CELL_SIZE: f32 = 40.0;
    pub const MAP_COLS: usize = 32;
    pub const MAP_ROWS: usize = 18;

    /// Actors are kept this far from the canvas edges
    pub const ARENA_INSET: f32 = 45.0;

    /// Frame duration the per-frame speeds were tuned against (60 Hz)
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frame multiplier bounds (a stalled tab must not teleport entities)
    pub const MIN_FRAME_MULTIPLIER: f32 = 0.25;
    pub const MAX_FRAME_MULTIPLIER: f32 = 4.0;

    /// Distance from actor center to the weapon muzzle
    pub const MUZZLE_OFFSET: f32 = 35.0;
    /// Enemy bullets hit the player inside this radius
    pub const PLAYER_HIT_RADIUS: f32 = 35.0;
    /// Pickups are collected inside this radius
    pub const PICKUP_REACH: f32 = 35.0;
    /// Enemies spawn at least this far from the canvas edges
    pub const SPAWN_PADDING: f32 = 100.0;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Clamp a point into the playable canvas area
#[inline]
pub fn clamp_to_arena(pos: Vec2) -> Vec2 {
    use consts::*;
    Vec2::new(
        pos.x.clamp(ARENA_INSET, CANVAS_WIDTH - ARENA_INSET),
        pos.y.clamp(ARENA_INSET, CANVAS_HEIGHT - ARENA_INSET),
    )
}
