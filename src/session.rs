//! The remembered login.
//!
//! The current username is stored as a plain string under `currentUser`, apart
//! from the account directory, so a login survives restarts. Restoring does not
//! re-check the directory.

use crate::accounts::AccountDirectory;
use crate::models::AuthPolicy;
use crate::storage::{CURRENT_USER_KEY, Persistence};
use crate::{Error, Result};

/// Currently authenticated identity.
#[derive(Debug, Clone)]
pub struct Session {
    persistence: Persistence,
    policy: AuthPolicy,
    current: Option<String>,
}

impl Session {
    /// Create a signed-out session. Call [`Session::restore`] to adopt a saved login.
    pub fn new(persistence: Persistence, policy: AuthPolicy) -> Self {
        Self {
            persistence,
            policy,
            current: None,
        }
    }

    /// Adopt the persisted identity, if any, without verification.
    pub fn restore(&mut self) -> Option<&str> {
        self.current = self
            .persistence
            .load_raw(CURRENT_USER_KEY)
            .map(|raw| raw.trim().to_string())
            .filter(|name| !name.is_empty());
        if let Some(name) = &self.current {
            tracing::debug!(username = %name, "restored session");
        }
        self.current.as_deref()
    }

    /// Apply the authentication policy, then sign in.
    ///
    /// `username` must already be trimmed and non-empty. Under
    /// [`crate::models::AuthMode::TrustUsername`] the password is ignored.
    pub fn authenticate(
        &mut self,
        username: &str,
        password: Option<&str>,
        accounts: &AccountDirectory,
    ) -> Result<()> {
        if self.policy.requires_password()
            && !accounts.verify(username, password.unwrap_or_default())
        {
            return Err(Error::InvalidCredentials);
        }
        self.sign_in(username)
    }

    /// Set and persist the current identity.
    pub fn sign_in(&mut self, username: &str) -> Result<()> {
        self.persistence.save_raw(CURRENT_USER_KEY, username)?;
        self.current = Some(username.to_string());
        tracing::debug!(username, "signed in");
        Ok(())
    }

    /// Clear the identity from memory and storage.
    pub fn sign_out(&mut self) -> Result<()> {
        self.persistence.remove(CURRENT_USER_KEY)?;
        if let Some(name) = self.current.take() {
            tracing::debug!(username = %name, "signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn policy(&self) -> AuthPolicy {
        self.policy
    }
}
