//! Rules command implementation.
//!
//! Lists the configured collection rules with their compile status.

use super::config::load_config;
use super::{CommandContext, Result};
use crate::output::{format_rules_json, format_rules_table, RuleRow};

/// Executes the rules command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let config = load_config(ctx)?;
    let rows: Vec<RuleRow> = config.rules().iter().map(RuleRow::from).collect();

    if ctx.json_output {
        println!("{}", format_rules_json(&rows)?);
    } else if !ctx.quiet {
        print!("{}", format_rules_table(&rows, ctx.use_colors));
    }

    Ok(())
}
