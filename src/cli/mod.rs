//! CLI argument definitions for EasyLife.

use crate::config::CONFIG_PATH_ENV;
use crate::models::AuthMode;
use crate::storage::BackendType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// EasyLife - Markdown todos for one or more local accounts.
///
/// Log in with `easylife login <name>`, then add notes with `easylife todo create`.
#[derive(Parser, Debug)]
#[command(name = "easylife")]
#[command(author, version, about = "Markdown todo notebook with local accounts", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the data files (overrides EASYLIFE_DATA_DIR and config.toml)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Login policy (overrides EASYLIFE_AUTH_MODE and config.toml)
    #[arg(long = "auth-mode", global = true, value_enum)]
    pub auth_mode: Option<AuthModeArg>,

    /// Storage backend (overrides EASYLIFE_BACKEND and config.toml)
    #[arg(long = "backend", global = true, value_enum)]
    pub backend: Option<BackendArg>,

    /// Path to config.toml
    #[arg(long = "config", global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// `--auth-mode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthModeArg {
    /// Any username logs in
    TrustUsername,
    /// Username and password must match a registered account
    VerifyCredentials,
}

impl From<AuthModeArg> for AuthMode {
    fn from(arg: AuthModeArg) -> Self {
        match arg {
            AuthModeArg::TrustUsername => AuthMode::TrustUsername,
            AuthModeArg::VerifyCredentials => AuthMode::VerifyCredentials,
        }
    }
}

/// `--backend` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// JSON files under the data directory
    File,
    /// Nothing is kept after the process exits
    Memory,
}

impl From<BackendArg> for BackendType {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => BackendType::File,
            BackendArg::Memory => BackendType::Memory,
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new account (used with --auth-mode verify-credentials)
    Register {
        /// Username
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Password confirmation (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Log in and remember the login for later commands
    Login {
        /// Username
        username: String,

        /// Password (required with verify-credentials)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the remembered login
    Logout,

    /// Show who is logged in
    Whoami,

    /// Todo management commands
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Interactive session reading commands from stdin
    Shell,
}

/// Todo subcommands
#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Create a new todo
    Create {
        /// Todo title
        #[arg(allow_hyphen_values = true)]
        title: String,

        /// Markdown body
        #[arg(short, long, allow_hyphen_values = true)]
        content: String,
    },

    /// List todos, newest first
    List,

    /// Show a todo with its rendered Markdown preview
    Show {
        /// Todo ID
        id: String,
    },

    /// Edit a todo's title and/or content
    Edit {
        /// Todo ID
        id: String,

        /// New title
        #[arg(short, long, allow_hyphen_values = true)]
        title: Option<String>,

        /// New Markdown body
        #[arg(short, long, allow_hyphen_values = true)]
        content: Option<String>,
    },

    /// Delete a todo
    Delete {
        /// Todo ID
        id: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved settings and where each came from
    Show,

    /// Print the config file location
    Path,
}
