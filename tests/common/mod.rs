//! Common test utilities for easylife integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real data directory or config file.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// `data_dir` holds the data files (via `EASYLIFE_DATA_DIR`), and `config_dir`
/// holds a config file that only exists if a test writes it (via `EASYLIFE_CONFIG`).
///
/// The `el()` method returns a `Command` that sets both per-invocation, making
/// tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with `username` already logged in.
    pub fn logged_in(username: &str) -> Self {
        let env = Self::new();
        env.el().args(["login", username]).assert().success();
        env
    }

    /// Get a Command for the easylife binary with isolated data and config.
    pub fn el(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_easylife"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("EASYLIFE_DATA_DIR", self.data_dir.path());
        cmd.env("EASYLIFE_CONFIG", self.config_path());
        cmd.env_remove("EASYLIFE_AUTH_MODE");
        cmd.env_remove("EASYLIFE_OUTPUT_FORMAT");
        cmd.env_remove("EASYLIFE_BACKEND");
        cmd.env_remove("EASYLIFE_LOG");
        cmd
    }

    /// Run a command expected to succeed and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.el().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    /// Create a todo and return its id.
    pub fn create_todo(&self, title: &str, content: &str) -> String {
        let created = self.json(&["todo", "create", title, "--content", content]);
        created["todo"]["id"].as_str().unwrap().to_string()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path of the (possibly absent) config file.
    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }

    /// Write `contents` to the config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
