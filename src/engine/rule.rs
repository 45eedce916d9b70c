use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::core::{DocumentCategory, DocumentRecord, Severity, ValidationIssue};

use super::RuleContext;

/// Evaluation function of a rule.
///
/// Must be pure: no mutation of the record and no state retained between
/// calls. External data is reached only through the [`RuleContext`].
pub type CheckFn =
    Arc<dyn Fn(&DocumentRecord, &RuleContext<'_>) -> Vec<ValidationIssue> + Send + Sync>;

/// Document categories a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    All,
    Categories(Vec<DocumentCategory>),
}

impl Applicability {
    pub fn applies_to(&self, category: DocumentCategory) -> bool {
        match self {
            Self::All => true,
            Self::Categories(categories) => categories.contains(&category),
        }
    }
}

/// Whether a rule inspects the document header or its line items.
///
/// Item-level rules are not evaluated for documents without items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Document,
    Item,
}

/// A validation rule: metadata plus a pure evaluation function.
#[derive(Clone)]
pub struct Rule {
    code: String,
    severity: Severity,
    description: String,
    applicability: Applicability,
    scope: RuleScope,
    external: bool,
    check: CheckFn,
}

impl Rule {
    /// A document-level rule applying to every category.
    pub fn new<F>(
        code: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        check: F,
    ) -> Self
    where
        F: Fn(&DocumentRecord, &RuleContext<'_>) -> Vec<ValidationIssue> + Send + Sync + 'static,
    {
        Self {
            code: code.into(),
            severity,
            description: description.into(),
            applicability: Applicability::All,
            scope: RuleScope::Document,
            external: false,
            check: Arc::new(check),
        }
    }

    /// Restrict the rule to the given categories.
    pub fn for_categories(
        mut self,
        categories: impl IntoIterator<Item = DocumentCategory>,
    ) -> Self {
        self.applicability = Applicability::Categories(categories.into_iter().collect());
        self
    }

    /// Mark the rule as item-level.
    pub fn item_level(mut self) -> Self {
        self.scope = RuleScope::Item;
        self
    }

    /// Mark the rule as backed by an external adapter.
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn applicability(&self) -> &Applicability {
        &self.applicability
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    pub fn applies_to(&self, category: DocumentCategory) -> bool {
        self.applicability.applies_to(category)
    }

    pub fn evaluate(&self, record: &DocumentRecord, ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
        (self.check)(record, ctx)
    }

    pub fn info(&self) -> RuleInfo {
        RuleInfo {
            code: self.code.clone(),
            severity: self.severity,
            description: self.description.clone(),
            applicability: self.applicability.clone(),
            scope: self.scope,
            external: self.external,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code)
            .field("severity", &self.severity)
            .field("applicability", &self.applicability)
            .field("scope", &self.scope)
            .field("external", &self.external)
            .finish_non_exhaustive()
    }
}

/// Rule metadata for introspection and documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub code: String,
    pub severity: Severity,
    pub description: String,
    pub applicability: Applicability,
    pub scope: RuleScope,
    pub external: bool,
}
