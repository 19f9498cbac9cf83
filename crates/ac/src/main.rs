use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::run::RunOptions;
use commands::{CommandContext, CommandError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `--verbose` and
/// `--quiet`.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .try_init()
        .ok();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Commands::Check { expression, tokens } => {
            commands::check::execute(&ctx, expression, *tokens)
        }
        Commands::Rules => commands::rules::execute(&ctx),
        Commands::Run {
            library,
            dry_run,
            only,
        } => {
            let opts = RunOptions {
                library: library.clone(),
                dry_run: *dry_run,
                only: only.clone(),
            };
            commands::run::execute(&ctx, &opts).await
        }
        Commands::Config { command } => match command {
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Init { force }) => commands::config::execute_init(&ctx, *force),
        },
        Commands::Completions { shell } => Ok(commands::completions::execute(*shell)?),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Expression(_) => "EXPRESSION_ERROR",
        CommandError::ConfigFile(_) | CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Library(_) => "LIBRARY_ERROR",
        CommandError::SyncFailed { .. } => "SYNC_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Expression(_) => ExitCode::from(1),
        CommandError::SyncFailed { .. } => ExitCode::from(2),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Library(_) => ExitCode::from(4),
        CommandError::ConfigFile(_) | CommandError::Config(_) => ExitCode::from(5),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocollections_core::config::ConfigError;

    #[test]
    fn test_error_codes() {
        let err = CommandError::SyncFailed {
            skipped: 1,
            failed: 0,
            total: 2,
        };
        assert_eq!(error_code(&err), "SYNC_ERROR");
        assert_eq!(err.to_string(), "1 skipped and 0 failed of 2 collections");

        let err = CommandError::ConfigFile(ConfigError::UnsupportedVersion { found: 9 });
        assert_eq!(error_code(&err), "CONFIG_ERROR");
    }

    #[test]
    fn test_expression_error_code() {
        let err = autocollections_core::parse_expression("GENRE").unwrap_err();
        let err = CommandError::from(err);
        assert_eq!(error_code(&err), "EXPRESSION_ERROR");
        assert!(err.to_string().starts_with("expression error: "));
    }
}
