use std::collections::HashSet;

use tracing::info;

use crate::core::EngineError;

use super::{Rule, RuleInfo, rules};

/// Rules keyed by code, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    codes: HashSet<String>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in catalogue.
    pub fn with_defaults() -> Result<Self, EngineError> {
        let mut registry = Self::new();
        for rule in rules::default_rules() {
            registry.insert(rule)?;
        }
        Ok(registry)
    }

    /// Add a rule. Codes must be non-empty, free of whitespace, and unique.
    pub fn register(&mut self, rule: Rule) -> Result<(), EngineError> {
        let code = rule.code().to_string();
        self.insert(rule)?;
        info!(rule = %code, "rule registered");
        Ok(())
    }

    fn insert(&mut self, rule: Rule) -> Result<(), EngineError> {
        let code = rule.code();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(EngineError::InvalidRuleCode(code.to_string()));
        }
        if !self.codes.insert(code.to_string()) {
            return Err(EngineError::DuplicateRule(code.to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Remove a rule by code, returning it.
    pub fn remove(&mut self, code: &str) -> Option<Rule> {
        if !self.codes.remove(code) {
            return None;
        }
        let index = self.rules.iter().position(|r| r.code() == code)?;
        info!(rule = %code, "rule removed");
        Some(self.rules.remove(index))
    }

    pub fn get(&self, code: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.code() == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn list(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(Rule::info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;

    fn noop(code: &str) -> Rule {
        Rule::new(code, Severity::Warning, "noop", |_, _| Vec::new())
    }

    #[test]
    fn defaults_have_unique_codes() {
        let registry = RuleRegistry::with_defaults().unwrap();
        assert!(registry.len() >= 60);
        assert!(registry.contains("IDN-01"));
        assert!(registry.contains("EXT-08"));
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(noop("X-01")).unwrap();
        assert_eq!(
            registry.register(noop("X-01")),
            Err(EngineError::DuplicateRule("X-01".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_codes_are_rejected() {
        let mut registry = RuleRegistry::new();
        assert!(matches!(
            registry.register(noop("")),
            Err(EngineError::InvalidRuleCode(_))
        ));
        assert!(matches!(
            registry.register(noop("X 01")),
            Err(EngineError::InvalidRuleCode(_))
        ));
    }

    #[test]
    fn remove_then_reregister() {
        let mut registry = RuleRegistry::new();
        registry.register(noop("A")).unwrap();
        registry.register(noop("B")).unwrap();
        assert!(registry.remove("A").is_some());
        assert!(registry.remove("A").is_none());
        registry.register(noop("A")).unwrap();
        let order: Vec<_> = registry.iter().map(Rule::code).collect();
        assert_eq!(order, ["B", "A"]);
    }
}
