//! Unified precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`EASYLIFE_DATA_DIR`, `EASYLIFE_AUTH_MODE`,
//!    `EASYLIFE_OUTPUT_FORMAT`, `EASYLIFE_BACKEND`)
//! 3. `config.toml`
//! 4. Built-in defaults

use crate::config::{EasyLifeConfig, OutputFormat};
use crate::models::{AuthMode, AuthPolicy};
use crate::storage::{BackendType, default_data_dir};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "EASYLIFE_DATA_DIR";
/// Environment variable overriding the login policy.
pub const AUTH_MODE_ENV: &str = "EASYLIFE_AUTH_MODE";
/// Environment variable overriding the output format.
pub const OUTPUT_FORMAT_ENV: &str = "EASYLIFE_OUTPUT_FORMAT";
/// Environment variable selecting the storage backend.
pub const BACKEND_ENV: &str = "EASYLIFE_BACKEND";
/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "EASYLIFE_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.toml
    ConfigFile,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub auth_mode: Option<AuthMode>,
    pub output_format: Option<OutputFormat>,
    pub backend: Option<BackendType>,
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Config file consulted (it may not exist)
    pub config_path: Option<PathBuf>,
    pub data_dir: Resolved<PathBuf>,
    pub auth_mode: Resolved<AuthMode>,
    pub output_format: Resolved<OutputFormat>,
    pub backend: Resolved<BackendType>,
}

impl ResolvedConfig {
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir.value
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            mode: self.auth_mode.value,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn backend(&self) -> BackendType {
        self.backend.value
    }
}

/// Default config file location: `<platform config dir>/easylife/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("easylife").join("config.toml"))
}

/// Resolve configuration from CLI overrides, the process environment and the config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration with an explicit environment lookup.
pub fn resolve_config_with_env<F>(overrides: &ConfigOverrides, lookup: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    let config_path = overrides
        .config_path
        .clone()
        .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from))
        .or_else(default_config_path);
    let file = match &config_path {
        Some(path) => EasyLifeConfig::load(path)?,
        None => EasyLifeConfig::new(),
    };

    let data_dir = if let Some(dir) = &overrides.data_dir {
        Resolved::new(dir.clone(), ValueSource::CliFlag)
    } else if let Some(dir) = env(DATA_DIR_ENV) {
        Resolved::new(PathBuf::from(dir), ValueSource::EnvVar(DATA_DIR_ENV.to_string()))
    } else if let Some(dir) = &file.data_dir {
        Resolved::new(dir.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(default_data_dir()?, ValueSource::Default)
    };

    let auth_mode = if let Some(mode) = overrides.auth_mode {
        Resolved::new(mode, ValueSource::CliFlag)
    } else if let Some(raw) = env(AUTH_MODE_ENV) {
        let mode = AuthMode::parse(&raw).ok_or_else(|| {
            Error::Config(format!(
                "{} must be trust-username or verify-credentials, got {:?}",
                AUTH_MODE_ENV, raw
            ))
        })?;
        Resolved::new(mode, ValueSource::EnvVar(AUTH_MODE_ENV.to_string()))
    } else if let Some(mode) = file.auth_mode {
        Resolved::new(mode, ValueSource::ConfigFile)
    } else {
        Resolved::new(AuthMode::default(), ValueSource::Default)
    };

    let output_format = if let Some(format) = overrides.output_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(raw) = env(OUTPUT_FORMAT_ENV) {
        let format = OutputFormat::parse(raw.trim()).ok_or_else(|| {
            Error::Config(format!(
                "{} must be json or human, got {:?}",
                OUTPUT_FORMAT_ENV, raw
            ))
        })?;
        Resolved::new(format, ValueSource::EnvVar(OUTPUT_FORMAT_ENV.to_string()))
    } else if let Some(format) = file.output_format {
        Resolved::new(format, ValueSource::ConfigFile)
    } else {
        Resolved::new(OutputFormat::default(), ValueSource::Default)
    };

    let backend = if let Some(backend) = overrides.backend {
        Resolved::new(backend, ValueSource::CliFlag)
    } else if let Some(raw) = env(BACKEND_ENV) {
        let backend = BackendType::parse(raw.trim()).ok_or_else(|| {
            Error::Config(format!("{} must be file or memory, got {:?}", BACKEND_ENV, raw))
        })?;
        Resolved::new(backend, ValueSource::EnvVar(BACKEND_ENV.to_string()))
    } else if let Some(backend) = file.backend {
        Resolved::new(backend, ValueSource::ConfigFile)
    } else {
        Resolved::new(BackendType::default(), ValueSource::Default)
    };

    Ok(ResolvedConfig {
        config_path,
        data_dir,
        auth_mode,
        output_format,
        backend,
    })
}
