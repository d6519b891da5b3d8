//! TOML schema for `config.toml`.
//!
//! ```toml
//! data-dir = "/home/me/notes"
//! auth-mode = "verify-credentials"   # or "trust-username"
//! output-format = "human"            # or "json"
//! backend = "memory"                 # or "file"
//! ```

use crate::models::AuthMode;
use crate::storage::BackendType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }

    pub fn is_human(&self) -> bool {
        *self == OutputFormat::Human
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EasyLifeConfig {
    /// Directory holding `todos.json`, `users.json` and `currentUser.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Login policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<AuthMode>,

    /// Default output format for CLI commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Where data is kept: `file` (default) or `memory`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendType>,
}

impl EasyLifeConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load config from `path`. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }
}
