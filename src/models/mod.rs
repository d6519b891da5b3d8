//! Data models for EasyLife entities.
//!
//! This module defines the core data structures:
//! - `Todo` - a Markdown note with title, owner and timestamps
//! - `AuthPolicy` - how logins are checked (trust the username, or verify a password)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Markdown todo document.
///
/// Serialized with camelCase keys; `updatedAt` is omitted until the first edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Opaque unique identifier
    pub id: String,

    /// Trimmed, non-empty title
    pub title: String,

    /// Trimmed, non-empty Markdown source
    pub content: String,

    /// Username that created the todo
    pub owner: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last edit timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Create a never-edited todo.
    pub fn new(
        id: String,
        title: String,
        content: String,
        owner: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            owner,
            created_at,
            updated_at: None,
        }
    }
}

/// How a login attempt is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Any non-empty username is accepted; no account directory involved
    #[default]
    TrustUsername,
    /// Username and password must match a registered account
    VerifyCredentials,
}

impl AuthMode {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trust-username" | "trust" | "direct" => Some(Self::TrustUsername),
            "verify-credentials" | "verify" | "password" => Some(Self::VerifyCredentials),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrustUsername => "trust-username",
            Self::VerifyCredentials => "verify-credentials",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authentication policy injected into the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPolicy {
    pub mode: AuthMode,
}

impl AuthPolicy {
    pub fn trust_username() -> Self {
        Self {
            mode: AuthMode::TrustUsername,
        }
    }

    pub fn verify_credentials() -> Self {
        Self {
            mode: AuthMode::VerifyCredentials,
        }
    }

    /// Whether logins must be checked against the account directory.
    pub fn requires_password(&self) -> bool {
        self.mode == AuthMode::VerifyCredentials
    }
}
