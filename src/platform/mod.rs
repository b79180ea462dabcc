//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Player identity
//! - Remote score submission (web only)

use uuid::Uuid;

use crate::persistence::Storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Storage key of the anonymous player id
pub const PLAYER_ID_KEY: &str = "playerId";

/// Stable anonymous player id: the stored one, or a fresh v4 UUID that is
/// stored for next time
pub fn player_id(storage: &mut dyn Storage) -> String {
    if let Some(id) = storage.get(PLAYER_ID_KEY).filter(|id| !id.is_empty()) {
        return id;
    }
    let id = Uuid::new_v4().to_string();
    storage.set(PLAYER_ID_KEY, &id);
    log::info!("Created player id");
    id
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
