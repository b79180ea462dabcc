//! Key/value persistence
//!
//! Settings and the transaction log serialize themselves to JSON strings and
//! store them under fixed keys. On the web the backing store is
//! LocalStorage; elsewhere (and in tests) an in-memory map.

use std::collections::HashMap;

/// String key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    /// Write failures (quota, private mode) are logged, never surfaced
    fn set(&mut self, key: &str, value: &str);
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when storage is unavailable (disabled, sandboxed frame)
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.inner.set_item(key, value).is_err() {
            log::warn!("LocalStorage write failed for '{}'", key);
        }
    }
}
