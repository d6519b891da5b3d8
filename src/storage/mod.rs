//! Storage layer for EasyLife data.
//!
//! Every piece of state lives under its own key as a single blob:
//!
//! - `todos` - JSON array of todo documents, newest first
//! - `users` - JSON object mapping username to password
//! - `currentUser` - the remembered username as a plain string
//!
//! [`Persistence`] wraps a [`KeyValueBackend`] and adds JSON encoding. Loads never
//! fail: a missing key yields the caller's default, and an unreadable or corrupt
//! value is logged and replaced by the default as well.

pub mod backend;
pub mod file;
pub mod memory;

pub use backend::{BackendType, KeyValueBackend};
pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Key holding the todo collection.
pub const TODOS_KEY: &str = "todos";
/// Key holding the remembered login.
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Key holding the account directory.
pub const USERS_KEY: &str = "users";

/// Shared handle to the key-value store.
///
/// Clones share one backend; the account directory, session and todo store each
/// hold a clone.
#[derive(Clone)]
pub struct Persistence {
    backend: Rc<RefCell<dyn KeyValueBackend>>,
}

impl Persistence {
    /// Wrap a backend.
    pub fn new<B: KeyValueBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Rc::new(RefCell::new(backend)),
        }
    }

    /// Decode the JSON value under `key`, falling back to `default`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.load_raw(key) else {
            return default;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable stored value");
                default
            }
        }
    }

    /// [`Persistence::load`] with `T::default()` as the fallback.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key, T::default())
    }

    /// JSON-encode `value` and store it under `key`, replacing the previous value.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.save_raw(key, &encoded)
    }

    /// Read the raw string under `key`. Read failures are logged and treated as absent.
    pub fn load_raw(&self, key: &str) -> Option<String> {
        match self.backend.borrow().get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    /// Store a raw string under `key`.
    pub fn save_raw(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, bytes = value.len(), "writing");
        self.backend.borrow_mut().set(key, value)
    }

    /// Remove `key` from the store.
    pub fn remove(&self, key: &str) -> Result<()> {
        tracing::debug!(key, "removing");
        self.backend.borrow_mut().remove(key)
    }

    /// Human-readable location of the underlying store.
    pub fn location(&self) -> String {
        self.backend.borrow().location()
    }

    /// Backend type name.
    pub fn backend_type(&self) -> &'static str {
        self.backend.borrow().backend_type()
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("backend", &self.backend_type())
            .field("location", &self.location())
            .finish()
    }
}

/// Default data directory: `<platform data dir>/easylife`.
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("easylife"))
}
