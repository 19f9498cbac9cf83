//! Check command implementation.
//!
//! Parses a criteria expression and prints its canonical form.

use autocollections_core::expression::{parse_expression, tokenize, ExpressionError};

use super::{CommandContext, Result};
use crate::output::{format_check_json, format_check_table, CheckOutput};

/// Executes the check command.
///
/// # Errors
///
/// Returns `CommandError::Expression` if the expression does not tokenize
/// or parse.
pub fn execute(ctx: &CommandContext, expression: &str, show_tokens: bool) -> Result<()> {
    let node = parse_expression(expression)?;
    let tokens = if show_tokens {
        Some(tokenize(expression).map_err(ExpressionError::from)?)
    } else {
        None
    };

    let output = CheckOutput::new(expression, &node, tokens.as_deref());
    if ctx.json_output {
        println!("{}", format_check_json(&output)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&output, ctx.use_colors));
    }

    Ok(())
}
