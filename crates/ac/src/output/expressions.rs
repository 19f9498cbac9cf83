//! Expression check output formatting.

use autocollections_core::expression::{ExpressionNode, PositionedToken};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::header_line;

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub input: &'a str,
    pub canonical: String,
    pub criteria: Vec<CriterionOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenOutput>>,
}

/// JSON output structure for one expression leaf.
#[derive(Serialize)]
pub struct CriterionOutput<'a> {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub value: &'a str,
}

/// JSON output structure for one token.
#[derive(Serialize)]
pub struct TokenOutput {
    pub token: String,
    pub position: usize,
}

impl<'a> CheckOutput<'a> {
    pub fn new(
        input: &'a str,
        expression: &'a ExpressionNode,
        tokens: Option<&[PositionedToken]>,
    ) -> Self {
        Self {
            input,
            canonical: expression.to_string(),
            criteria: expression
                .criteria()
                .into_iter()
                .map(|(kind, value)| CriterionOutput {
                    kind: kind.keyword(),
                    value,
                })
                .collect(),
            tokens: tokens.map(|tokens| {
                tokens
                    .iter()
                    .map(|t| TokenOutput {
                        token: t.token.to_string(),
                        position: t.position,
                    })
                    .collect()
            }),
        }
    }
}

/// Formats a checked expression as JSON.
pub fn format_check_json(output: &CheckOutput) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

/// Formats a checked expression for the terminal.
pub fn format_check_table(output: &CheckOutput, use_colors: bool) -> String {
    let mut text = String::new();

    let status = if use_colors {
        "valid".green().bold().to_string()
    } else {
        "valid".to_string()
    };
    text.push_str(&format!("Expression is {status}\n\n"));
    text.push_str(&format!("Canonical: {}\n", output.canonical));

    text.push_str(&format!("\nCriteria ({}):\n", output.criteria.len()));
    for criterion in &output.criteria {
        if criterion.value.is_empty() {
            text.push_str(&format!("  {}\n", criterion.kind));
        } else {
            text.push_str(&format!("  {:<20} \"{}\"\n", criterion.kind, criterion.value));
        }
    }

    if let Some(tokens) = &output.tokens {
        text.push('\n');
        text.push_str(&header_line(&format!("{:<6} {}", "Pos", "Token"), use_colors));
        for token in tokens {
            text.push_str(&format!("{:<6} {}\n", token.position, token.token));
        }
    }

    text
}
