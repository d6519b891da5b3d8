//! Storage backend trait and implementations.
//!
//! This module provides the key-value backends behind [`super::Persistence`]:
//! - `FileBackend` - one file per key under the data directory (default)
//! - `MemoryBackend` - in-process map for tests and throwaway runs

use crate::Result;
use serde::{Deserialize, Serialize};

/// Trait for durable string-keyed stores.
///
/// Values are opaque strings; JSON encoding happens one layer up.
pub trait KeyValueBackend {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type name.
    fn backend_type(&self) -> &'static str;
}

/// Available storage backend types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// One JSON file per key under the data directory
    #[default]
    File,
    /// Process-local map, discarded on exit
    Memory,
}

impl BackendType {
    /// Parse a backend type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" | "default" => Some(Self::File),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
