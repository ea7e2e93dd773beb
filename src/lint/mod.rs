//! Lint module for interceptor rule tables
//!
//! Rule problems never surface at runtime (a bad rule is silently skipped),
//! so this module reports them ahead of time:
//! - Rules without a usable common event
//! - Rules that can never be selected because an earlier rule wins
//! - Rules keyed on the opt-out sentinel

use crate::config::InterceptorConfig;
use crate::types::data::Database;
use serde::{Deserialize, Serialize};

pub mod checks;

/// Lint severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LintLevel {
    /// Error: must be fixed
    Error,
    /// Warning: should be reviewed
    Warning,
    /// Info: for your information
    Info,
}

/// A lint issue found in the rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    /// Severity level
    pub level: LintLevel,
    /// Human-readable description naming the rule
    pub message: String,
    /// Position of the offending rule in the list (0-indexed)
    pub rule_index: usize,
    /// `references`, `flow` or `quality`
    pub category: String,
}

/// Result of linting a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LintResult {
    /// Issues ordered by rule position, most severe first
    pub issues: Vec<LintIssue>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of info messages
    pub info_count: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: LintIssue) {
        match issue.level {
            LintLevel::Error => self.error_count += 1,
            LintLevel::Warning => self.warning_count += 1,
            LintLevel::Info => self.info_count += 1,
        }
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Lint a rule table, checking references when a database is available
pub fn lint(config: &InterceptorConfig, database: Option<&Database>) -> LintResult {
    let mut result = LintResult::new();

    checks::check_references(config, database, &mut result);
    checks::check_shadowing(config, &mut result);
    checks::check_sentinel_tags(config, &mut result);

    result
        .issues
        .sort_by_key(|issue| (issue.rule_index, level_rank(issue.level)));
    log::debug!(
        "Lint finished: {} error(s), {} warning(s), {} info",
        result.error_count,
        result.warning_count,
        result.info_count
    );
    result
}

fn level_rank(level: LintLevel) -> u8 {
    match level {
        LintLevel::Error => 0,
        LintLevel::Warning => 1,
        LintLevel::Info => 2,
    }
}
