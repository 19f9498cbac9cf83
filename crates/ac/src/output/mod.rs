//! Output formatting utilities for the ac CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by command:
//!
//! - [`expressions`] - `check` output (canonical form, criteria, tokens)
//! - [`rules`] - `rules` listing
//! - [`outcomes`] - `run` results per collection
//! - [`helpers`] - Common formatting utilities (truncation, headers, counts)

mod expressions;
pub mod helpers;
mod outcomes;
mod rules;

pub use expressions::{format_check_json, format_check_table, CheckOutput};
pub use outcomes::{format_outcomes_json, format_outcomes_table};
pub use rules::{format_rules_json, format_rules_table, RuleRow};
