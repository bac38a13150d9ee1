//! Durable key/value storage contract.
//!
//! Writes through [`PersistentStore`] are best-effort: a failed write is logged
//! and dropped, callers never see it. Reads report errors so rehydration can
//! tell "absent" from "corrupt".

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serialization(String),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) | StoreError::Unavailable(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait KeyValueStore {
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Namespaced JSON view over a [`KeyValueStore`].
pub struct PersistentStore {
    backend: Box<dyn KeyValueStore>,
    namespace: String,
}

impl PersistentStore {
    pub fn new(backend: Box<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn full_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.namespace, key)
        }
    }

    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(&self.full_key(key))? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }

    pub fn load_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.load_json(key)
    }

    /// Serializes and writes `value`. Failures are logged, never returned.
    pub fn save_json<T: Serialize>(&mut self, key: &str, value: &T) {
        let full_key = self.full_key(key);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "failed to serialize record");
                return;
            }
        };
        if let Err(e) = self.backend.set(&full_key, &raw) {
            tracing::warn!(
                key = %full_key,
                backend = self.backend.name(),
                error = %e,
                "store write failed"
            );
        }
    }

    pub fn remove(&mut self, key: &str) {
        let full_key = self.full_key(key);
        if let Err(e) = self.backend.remove(&full_key) {
            tracing::warn!(key = %full_key, error = %e, "store remove failed");
        }
    }

    /// Reads a key outside the namespace (pre-namespace records).
    pub fn get_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed");
                None
            }
        }
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore")
            .field("backend", &self.backend.name())
            .field("namespace", &self.namespace)
            .finish()
    }
}
