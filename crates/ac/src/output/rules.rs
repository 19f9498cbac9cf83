//! Rule listing output formatting.

use autocollections_core::rules::CollectionRule;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{header_line, pad, truncate_str};

/// JSON output structure for the rules command.
#[derive(Serialize)]
pub struct RulesListOutput<'a> {
    pub rules: &'a [RuleRow],
}

/// One configured rule with its compile status.
#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub collection_name: String,
    #[serde(rename = "type")]
    pub rule_type: &'static str,
    pub source: String,
    pub case_sensitive: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl From<&CollectionRule> for RuleRow {
    fn from(rule: &CollectionRule) -> Self {
        let compiled = rule.compile();
        Self {
            collection_name: rule.collection_name(),
            rule_type: match rule {
                CollectionRule::Expression(_) => "expression",
                CollectionRule::TitleMatch(_) => "title-match",
            },
            source: rule.describe(),
            case_sensitive: rule.case_sensitive(),
            valid: compiled.is_valid(),
            errors: compiled.parse_errors,
        }
    }
}

/// Formats rules as JSON.
pub fn format_rules_json(rows: &[RuleRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RulesListOutput { rules: rows })
}

/// Formats rules as a table.
pub fn format_rules_table(rows: &[RuleRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No rules configured. Run 'ac config init' to create a config file.\n"
            .to_string();
    }

    let mut output = header_line(
        &format!("{:<28} {:<12} {:<8} {}", "Collection", "Type", "Status", "Rule"),
        use_colors,
    );

    for row in rows {
        let status = if row.valid { "ok" } else { "invalid" };
        let status_colored = match (use_colors, row.valid) {
            (false, _) => status.to_string(),
            (true, true) => status.green().to_string(),
            (true, false) => status.red().to_string(),
        };

        output.push_str(&format!(
            "{:<28} {:<12} {} {}\n",
            truncate_str(&row.collection_name, 28),
            row.rule_type,
            pad(&status_colored, status, 8),
            truncate_str(&row.source, 60),
        ));
        for error in &row.errors {
            output.push_str(&format!("{:<28} {}\n", "", error));
        }
    }

    output
}
