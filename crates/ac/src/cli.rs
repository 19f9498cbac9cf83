//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the ac CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ac - Rule-driven media collections
#[derive(Parser, Debug)]
#[command(name = "ac")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (log each collection as it syncs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (default: ~/.config/ac/config.toml)
    #[arg(long, global = true, env = "AC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a criteria expression and print its canonical form
    #[command(alias = "c")]
    Check {
        /// Expression, e.g. 'STUDIO "Marvel" AND GENRE "Action"'
        expression: String,

        /// Also print the token stream
        #[arg(long)]
        tokens: bool,
    },

    /// List configured collection rules
    Rules,

    /// Sync every configured collection against the library
    #[command(alias = "r")]
    Run {
        /// Library file (default: config library_path, then ~/.local/share/ac/library.json)
        #[arg(short, long, value_name = "PATH")]
        library: Option<PathBuf>,

        /// Plan changes without writing them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Only sync collections with this name (repeatable)
        #[arg(long, value_name = "NAME", action = clap::ArgAction::Append)]
        only: Vec<String>,
    },

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the config file path
    Path,

    /// Show the current configuration
    Show,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["ac", "check", r#"GENRE "Action""#, "--tokens"]);
        match cli.command {
            Commands::Check { expression, tokens } => {
                assert_eq!(expression, r#"GENRE "Action""#);
                assert!(tokens);
            }
            other => panic!("Expected Check command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::parse_from([
            "ac",
            "run",
            "--library",
            "/tmp/library.json",
            "-n",
            "--only",
            "Action",
            "--only",
            "Drama",
        ]);
        match cli.command {
            Commands::Run {
                library,
                dry_run,
                only,
            } => {
                assert_eq!(library, Some(PathBuf::from("/tmp/library.json")));
                assert!(dry_run);
                assert_eq!(only, vec!["Action", "Drama"]);
            }
            other => panic!("Expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ac", "rules", "--json", "--no-color"]);
        assert!(cli.json);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Rules));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["ac", "-v", "-q", "rules"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_init_force() {
        let cli = Cli::parse_from(["ac", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: Some(ConfigCommands::Init { force: true })
            }
        ));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::parse_from(["ac", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["ac"]).is_err());
    }
}
