use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised while assembling a validator.
///
/// These are integrator mistakes; document problems are never reported
/// through this type.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// A rule with the same code is already registered.
    #[error("duplicate rule code: {0}")]
    DuplicateRule(String),

    /// A rule code is empty or contains whitespace.
    #[error("invalid rule code: '{0}'")]
    InvalidRuleCode(String),

    /// A document category or model code the engine does not know.
    #[error("unrecognized document category: '{0}'")]
    UnknownCategory(String),

    /// An adapter or threshold setting is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Severity of a finding. Ordering is fixed: errors sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        })
    }
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Code of the rule that produced the finding (e.g. "IDN-02").
    pub code: String,
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Dot-separated path to the offending field (e.g. "items[2].operation_code").
    pub field: String,
    /// How to fix it, when there is an obvious fix.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            field: field.into(),
            suggestion: None,
        }
    }

    pub fn error(
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(code, Severity::Error, field, message)
    }

    pub fn warning(
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(code, Severity::Warning, field, message)
    }

    pub fn info(
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(code, Severity::Info, field, message)
    }

    /// Attach a remediation hint.
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Info => 'I',
        };
        write!(f, "[{level}] {} {}: {}", self.code, self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {suggestion})")?;
        }
        Ok(())
    }
}

/// Convenience queries over a returned issue list.
pub trait IssueList {
    fn has_errors(&self) -> bool;
    fn errors(&self) -> impl Iterator<Item = &ValidationIssue>;
    fn warnings(&self) -> impl Iterator<Item = &ValidationIssue>;
    fn infos(&self) -> impl Iterator<Item = &ValidationIssue>;
    fn by_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationIssue>;
    fn has_code(&self, code: &str) -> bool;
}

impl IssueList for [ValidationIssue] {
    fn has_errors(&self) -> bool {
        self.iter().any(|i| i.severity == Severity::Error)
    }

    fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.iter().filter(|i| i.severity == Severity::Error)
    }

    fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.iter().filter(|i| i.severity == Severity::Info)
    }

    fn by_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.iter().filter(move |i| i.code == code)
    }

    fn has_code(&self, code: &str) -> bool {
        self.iter().any(|i| i.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_errors_first() {
        let mut v = vec![Severity::Info, Severity::Error, Severity::Warning];
        v.sort();
        assert_eq!(v, vec![Severity::Error, Severity::Warning, Severity::Info]);
    }

    #[test]
    fn display_includes_hint() {
        let issue = ValidationIssue::error("IDN-02", "access_key", "check digit mismatch")
            .suggest("expected 3");
        insta::assert_snapshot!(
            issue.to_string(),
            @"[E] IDN-02 access_key: check digit mismatch (hint: expected 3)"
        );
    }

    #[test]
    fn issue_list_queries() {
        let issues = vec![
            ValidationIssue::error("A", "x", "a"),
            ValidationIssue::warning("B", "y", "b"),
            ValidationIssue::info("C", "z", "c"),
        ];
        assert!(issues.has_errors());
        assert_eq!(issues.warnings().count(), 1);
        assert!(issues.has_code("C"));
        assert_eq!(issues.by_code("A").count(), 1);
    }

    #[test]
    fn engine_error_messages() {
        let err = EngineError::DuplicateRule("IDN-01".into());
        assert_eq!(err.to_string(), "duplicate rule code: IDN-01");
    }
}
