//! Command implementations for the ac CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod rules;
pub mod run;

use std::path::PathBuf;

use autocollections_core::config::ConfigError;
use autocollections_core::expression::ExpressionError;
use autocollections_core::library::LibraryError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The expression given to `check` did not parse.
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// The config file could not be parsed.
    #[error("config error: {0}")]
    ConfigFile(#[from] ConfigError),

    /// Configuration could not be located or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// Library file error.
    #[error("library error: {0}")]
    Library(#[from] LibraryError),

    /// One or more collections were skipped or failed to sync.
    #[error("{skipped} skipped and {failed} failed of {total} collections")]
    SyncFailed {
        skipped: usize,
        failed: usize,
        total: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Config file given on the command line or via `AC_CONFIG`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            config_path: cli.config.clone(),
        }
    }
}
