//! Simulation core
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Wall-clock timestamps and the frame multiplier come in from the host
//! - Seeded RNG only
//! - Sound, sprites and score reporting go through injected services

pub mod clock;
pub mod collision;
pub mod events;
pub mod map;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tuning;

pub use clock::{FrameClock, frame_multiplier};
pub use collision::{WallContact, advance_projectile, within};
pub use events::GameEvent;
pub use map::{ArenaMap, Cell};
pub use session::{Session, TransitionError};
pub use spawner::{Spawner, request_spawns, run_due_spawns};
pub use state::{
    Actor, DamageOutcome, DropKind, Explosion, Faction, GamePhase, GameState, GameStats, Pickup,
    PickupKind, Projectile,
};
pub use tick::{FrameTime, TickInput, tick};
pub use tuning::{Tuning, TuningError};
