//! Run command implementation.
//!
//! Loads the library, syncs every configured collection, and saves the
//! library unless this is a dry run.

use std::path::PathBuf;

use autocollections_core::config::SyncConfig;
use autocollections_core::library::LibraryFile;
use autocollections_core::rules::CollectionRule;
use autocollections_core::sync::{CollectionSyncDriver, RuleOutcome};
use tracing::{info, warn};

use super::config::load_config;
use super::{CommandContext, CommandError, Result};
use crate::output::{format_outcomes_json, format_outcomes_table};

/// Options for the run command.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Library file override.
    pub library: Option<PathBuf>,
    /// Force a dry run regardless of config.
    pub dry_run: bool,
    /// Restrict the run to these collection names.
    pub only: Vec<String>,
}

/// Executes the run command.
///
/// # Errors
///
/// Returns `CommandError::SyncFailed` if any collection was skipped or
/// failed. The library is still saved in that case, since the other
/// collections were updated.
pub async fn execute(ctx: &CommandContext, opts: &RunOptions) -> Result<()> {
    let mut config = load_config(ctx)?;
    if opts.dry_run {
        config.dry_run = true;
    }

    let rules = select_rules(&config, &opts.only)?;
    let library_file = resolve_library(opts, &config)?;
    let mut library = library_file.load_or_default().await?;
    if library.items.is_empty() {
        warn!(path = %library_file.path().display(), "library has no items");
    }
    info!(
        path = %library_file.path().display(),
        items = library.items.len(),
        rules = rules.len(),
        dry_run = config.dry_run,
        "starting sync"
    );

    let outcomes = {
        let mut driver =
            CollectionSyncDriver::new(&library.items, &mut library.collections, &config);
        driver.sync_all(&rules).await
    };

    if !config.dry_run {
        library_file.save(&library).await?;
    }

    if ctx.json_output {
        println!(
            "{}",
            format_outcomes_json(library_file.path(), config.dry_run, &outcomes)?
        );
    } else if !ctx.quiet {
        print!(
            "{}",
            format_outcomes_table(&outcomes, config.dry_run, ctx.use_colors)
        );
    }

    let (synced, skipped, failed) = tally(&outcomes);
    info!(
        synced = synced,
        skipped = skipped,
        failed = failed,
        "sync finished"
    );
    if skipped + failed > 0 {
        return Err(CommandError::SyncFailed {
            skipped,
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}

/// Resolves the library file: `--library`, then config, then the XDG default.
fn resolve_library(opts: &RunOptions, config: &SyncConfig) -> Result<LibraryFile> {
    if let Some(path) = opts.library.as_ref().or(config.library_path.as_ref()) {
        return Ok(LibraryFile::with_path(path.clone()));
    }
    Ok(LibraryFile::new()?)
}

/// Returns the configured rules, restricted to `only` when it is not empty.
fn select_rules(config: &SyncConfig, only: &[String]) -> Result<Vec<CollectionRule>> {
    let rules = config.rules();
    if only.is_empty() {
        return Ok(rules);
    }

    if let Some(unknown) = only
        .iter()
        .find(|name| !rules.iter().any(|rule| &rule.collection_name() == *name))
    {
        return Err(CommandError::Config(format!(
            "No configured collection named '{unknown}'"
        )));
    }

    Ok(rules
        .into_iter()
        .filter(|rule| only.contains(&rule.collection_name()))
        .collect())
}

/// Counts outcomes by status: (synced, skipped, failed).
pub fn tally(outcomes: &[RuleOutcome]) -> (usize, usize, usize) {
    outcomes
        .iter()
        .fold((0, 0, 0), |(synced, skipped, failed), outcome| match outcome {
            RuleOutcome::Synced(_) => (synced + 1, skipped, failed),
            RuleOutcome::Skipped { .. } => (synced, skipped + 1, failed),
            RuleOutcome::Failed { .. } => (synced, skipped, failed + 1),
        })
}
