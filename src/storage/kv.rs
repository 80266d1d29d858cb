//! Injected key-value persistence for feed state.
//!
//! The feed core never talks to SQLite directly. It receives a
//! [`KeyValueStore`] and reads/writes JSON-encoded values under fixed keys,
//! so tests can swap in [`MemoryStore`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::StoreError;

/// Key holding the committed keyword selection (JSON array of strings).
pub const SELECTED_KEYWORDS_KEY: &str = "selectedKeywords";

/// Key holding the user-defined keywords (JSON array of strings, at most 5).
pub const CUSTOM_KEYWORDS_KEY: &str = "customKeywords";

/// String-keyed persistence backend.
///
/// Implementations must make a successful `set` visible to every later `get`.
#[allow(async_fn_in_trait)] // Used generically on one task, never boxed or spawned
pub trait KeyValueStore {
    /// Fetch the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load and decode a JSON value, falling back to `T::default()`.
///
/// An absent key is the normal first-run case and is silent. A malformed value
/// or a failing backend is logged and also yields the default; persisted state
/// problems never prevent startup.
pub async fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read persisted value, using default");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Malformed persisted value, using default");
            T::default()
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw).await?;
    tracing::debug!(key = %key, bytes = raw.len(), "Persisted value");
    Ok(())
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store for tests and dry runs.
///
/// [`MemoryStore::set_fail_writes`] makes every `set` fail, which lets tests
/// check that a failed write leaves in-memory state untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing encoding (e.g. to plant malformed JSON).
    pub fn with_raw(self, key: &str, value: &str) -> Self {
        self.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// Raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map; keep serving it.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write to '{}' refused", key)));
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
