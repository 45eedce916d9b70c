use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::adapters::{
    AdapterKind, Adapters, ClassificationEntry, Lookup, PostalInfo, TaxpayerStatus,
};
use crate::core::{Severity, ValidationIssue};

/// Per-call state handed to every rule.
///
/// Gives rules access to the adapters and records which adapters were
/// skipped, so the orchestrator can report each one once. A skipped adapter
/// stays skipped for the rest of the call.
pub struct RuleContext<'a> {
    adapters: &'a Adapters,
    current: Cell<(&'a str, Severity)>,
    skipped: RefCell<BTreeMap<AdapterKind, String>>,
}

impl<'a> RuleContext<'a> {
    pub fn new(adapters: &'a Adapters) -> Self {
        Self {
            adapters,
            current: Cell::new(("", Severity::Error)),
            skipped: RefCell::new(BTreeMap::new()),
        }
    }

    pub(crate) fn enter(&self, code: &'a str, severity: Severity) {
        self.current.set((code, severity));
    }

    /// An issue carrying the code and severity of the rule being evaluated.
    pub fn issue(&self, field: impl Into<String>, message: impl Into<String>) -> ValidationIssue {
        let (code, severity) = self.current.get();
        ValidationIssue::new(code, severity, field, message)
    }

    pub fn taxpayer(&self, tax_id: &str) -> Lookup<TaxpayerStatus> {
        self.lookup(AdapterKind::Taxpayer, || self.adapters.taxpayer(tax_id))
    }

    pub fn postal(&self, postal_code: &str) -> Lookup<PostalInfo> {
        self.lookup(AdapterKind::Postal, || self.adapters.postal(postal_code))
    }

    pub fn classification(&self, code: &str) -> Lookup<ClassificationEntry> {
        self.lookup(AdapterKind::Classification, || {
            self.adapters.classification(code)
        })
    }

    pub fn similarity(&self, declared: &str, canonical: &str) -> Lookup<f64> {
        self.lookup(AdapterKind::Similarity, || {
            self.adapters.similarity(declared, canonical)
        })
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.adapters.similarity_threshold()
    }

    /// Once an adapter kind has been skipped, later lookups of that kind in
    /// the same call are skipped without touching the source again.
    fn lookup<V>(&self, kind: AdapterKind, fetch: impl FnOnce() -> Lookup<V>) -> Lookup<V> {
        let known = self.skipped.borrow().get(&kind).cloned();
        if let Some(reason) = known {
            return Lookup::Skipped(reason);
        }
        let lookup = fetch();
        if let Lookup::Skipped(reason) = &lookup {
            self.skipped.borrow_mut().insert(kind, reason.clone());
        }
        lookup
    }

    /// Adapters skipped so far, with the first reason seen for each.
    pub fn skipped(&self) -> Vec<(AdapterKind, String)> {
        self.skipped
            .borrow()
            .iter()
            .map(|(kind, reason)| (*kind, reason.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::adapters::{AdapterConfig, AdapterError, TaxpayerAdapter};

    #[test]
    fn skipped_kind_is_not_consulted_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = move |_: &str, _: Duration| -> Result<Option<TaxpayerStatus>, AdapterError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AdapterError::Unavailable("registry down".into()))
        };
        let adapters = Adapters {
            taxpayer: Some(TaxpayerAdapter::new(Arc::new(source), AdapterConfig::default())),
            ..Adapters::default()
        };
        let ctx = RuleContext::new(&adapters);
        for tax_id in ["11222333000181", "11222333000181", "33987654000100"] {
            assert_eq!(
                ctx.taxpayer(tax_id),
                Lookup::Skipped("source unavailable: registry down".into())
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.skipped().len(), 1);
    }
}
