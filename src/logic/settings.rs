//! Settings Store Interface
//!
//! The core persists exactly one value: the Gemini API key, under
//! [`crate::constants::API_KEY_SETTING`]. The actual backend (browser
//! storage, OS keychain, config file) is the embedder's concern, so the
//! store is an injected trait rather than a module-level singleton.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key/value settings backend. Only string values, no schema.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory settings store for tests and embedders without persistence.
#[derive(Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}
