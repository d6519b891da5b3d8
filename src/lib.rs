//! EasyLife - a local Markdown todo notebook for one or more accounts.
//!
//! This library provides the core state manager behind the `easylife` CLI:
//! the persisted todo collection, the account directory, the remembered login
//! session and the edit-session state machine that drives the todo form.

pub mod accounts;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod edit_session;
pub mod models;
pub mod render;
pub mod session;
pub mod shell;
pub mod storage;
pub mod todos;

pub use app::{App, AppSnapshot, Preview, SubmitOutcome};
pub use edit_session::{EditMode, EditSession};
pub use models::{AuthMode, AuthPolicy, Todo};


/// Library-level error type for EasyLife operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Username already registered: {0}")]
    DuplicateUsername(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for EasyLife operations.
pub type Result<T> = std::result::Result<T, Error>;
