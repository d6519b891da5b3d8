//! Registered accounts for the credentialed login mode.
//!
//! The directory is a single JSON object (`users`) mapping username to password.
//! It is re-read from storage on every call; nothing is cached.
//!
//! Passwords are stored and compared in plaintext. This is a local demo trust
//! model, not a security boundary.

use crate::storage::{Persistence, USERS_KEY};
use crate::{Error, Result};
use std::collections::BTreeMap;

type Credentials = BTreeMap<String, String>;

/// Username to password registry.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    persistence: Persistence,
}

impl AccountDirectory {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    fn load(&self) -> Credentials {
        self.persistence.load_or_default(USERS_KEY)
    }

    /// Register a new account.
    ///
    /// Inputs are expected to be trimmed and non-empty already.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        let mut users = self.load();
        if users.contains_key(username) {
            return Err(Error::DuplicateUsername(username.to_string()));
        }

        users.insert(username.to_string(), password.to_string());
        self.persistence.save(USERS_KEY, &users)?;
        tracing::debug!(username, "registered account");
        Ok(())
    }

    /// True iff `username` exists and its stored password equals `password` exactly.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.load()
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.load().contains_key(username)
    }

    /// Registered usernames in sorted order.
    pub fn usernames(&self) -> Vec<String> {
        self.load().into_keys().collect()
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
