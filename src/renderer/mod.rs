//! Rendering module
//!
//! The core only produces snapshots; drawing happens behind `DrawSink`.
//! The browser build draws with the Canvas 2D API.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSink;
pub use snapshot::{
    ActorSprite, DrawSink, ExplosionSprite, FrameSnapshot, Hud, PickupSprite, ProjectileSprite,
};
