//! Sync outcome output formatting.

use std::path::Path;

use autocollections_core::sync::RuleOutcome;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_change, header_line, pad, truncate_str};

/// JSON output structure for the run command.
#[derive(Serialize)]
pub struct RunOutput<'a> {
    pub library: String,
    pub dry_run: bool,
    pub outcomes: &'a [RuleOutcome],
}

/// Formats sync outcomes as JSON.
pub fn format_outcomes_json(
    library: &Path,
    dry_run: bool,
    outcomes: &[RuleOutcome],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RunOutput {
        library: library.display().to_string(),
        dry_run,
        outcomes,
    })
}

/// Formats sync outcomes as a table, one row per collection.
pub fn format_outcomes_table(outcomes: &[RuleOutcome], dry_run: bool, use_colors: bool) -> String {
    if outcomes.is_empty() {
        return "No rules to run.\n".to_string();
    }

    let mut output = String::new();
    if dry_run {
        let note = "Dry run: no changes were written.";
        if use_colors {
            output.push_str(&format!("{}\n\n", note.yellow()));
        } else {
            output.push_str(&format!("{note}\n\n"));
        }
    }

    output.push_str(&header_line(
        &format!(
            "{:<28} {:<9} {:>7} {:>6} {:>6} {:>7}  {}",
            "Collection", "Status", "Matched", "Added", "Remov", "Reorder", "Notes"
        ),
        use_colors,
    ));

    for outcome in outcomes {
        let name = truncate_str(outcome.collection_name(), 28);
        let (status, notes) = match outcome {
            RuleOutcome::Synced(report) => {
                let mut notes = Vec::new();
                if report.created {
                    notes.push("created".to_string());
                }
                if report.is_unchanged() {
                    notes.push("unchanged".to_string());
                }
                if let Some(validation) = report.validation.as_ref() {
                    if !validation.is_consistent() {
                        notes.push(format!(
                            "{} missing, {} extra",
                            validation.missing.len(),
                            validation.extra.len()
                        ));
                    }
                }
                ("synced", notes.join(", "))
            }
            RuleOutcome::Skipped { errors, .. } => ("skipped", errors.join("; ")),
            RuleOutcome::Failed { error, .. } => ("failed", error.clone()),
        };

        let status_colored = if use_colors {
            match status {
                "synced" => status.green().to_string(),
                "skipped" => status.yellow().to_string(),
                _ => status.red().to_string(),
            }
        } else {
            status.to_string()
        };

        let counts = match outcome {
            RuleOutcome::Synced(report) => format!(
                "{:>7} {} {} {}",
                report.matched,
                pad_left(&format_change('+', report.added, use_colors), report.added, 6),
                pad_left(&format_change('-', report.removed, use_colors), report.removed, 6),
                pad_left(&format_change('~', report.reordered, use_colors), report.reordered, 7),
            ),
            _ => format!("{:>7} {:>6} {:>6} {:>7}", "-", "-", "-", "-"),
        };

        output.push_str(&format!(
            "{:<28} {} {}  {}\n",
            name,
            pad(&status_colored, status, 9),
            counts,
            notes
        ));
    }

    let synced = outcomes.iter().filter(|o| o.is_synced()).count();
    output.push_str(&format!("\n{synced} of {} collections synced.\n", outcomes.len()));
    output
}

/// Right-aligns a change count that may carry color codes.
fn pad_left(text: &str, count: usize, width: usize) -> String {
    let visible = if count == 0 { 1 } else { count.to_string().len() + 1 };
    if visible >= width {
        text.to_string()
    } else {
        format!("{}{text}", " ".repeat(width - visible))
    }
}
