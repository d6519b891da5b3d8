//! Configuration for EasyLife.
//!
//! Preferences live in `config.toml`, located at `$EASYLIFE_CONFIG` or
//! `~/.config/easylife/config.toml`:
//!
//! - `data-dir` - where todos, accounts and the remembered login are stored
//! - `auth-mode` - `trust-username` (any name logs in) or `verify-credentials`
//! - `output-format` - `json` or `human`
//! - `backend` - `file` (default) or `memory`, which keeps nothing after exit
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.toml > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    AUTH_MODE_ENV, BACKEND_ENV, CONFIG_PATH_ENV, ConfigOverrides, DATA_DIR_ENV, OUTPUT_FORMAT_ENV, Resolved,
    ResolvedConfig, ValueSource, default_config_path, resolve_config, resolve_config_with_env,
};
pub use schema::{EasyLifeConfig, OutputFormat};
