use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    AdapterConfig, Adapters, ClassificationAdapter, ClassificationEntry, ClassificationSource,
    ClassificationTable, PostalAdapter, PostalSource, SimilarityAdapter, SimilarityConfig,
    SimilarityScorer, TaxpayerAdapter, TaxpayerSource,
};
use crate::core::{DocumentRecord, EngineError, Severity, ValidationIssue};

use super::{Rule, RuleContext, RuleInfo, RuleRegistry, RuleScope};

/// Code of the issue raised for an access key that was already processed.
pub const DUPLICATE_CODE: &str = "DUP-01";

/// Per-call options.
///
/// External rules are off by default; see [`ValidateOptions::external`].
#[derive(Clone, Copy, Default)]
pub struct ValidateOptions<'a> {
    /// Evaluate rules backed by external adapters.
    pub enable_external: bool,
    /// Reports whether an access key has already been processed.
    pub exists_by_key: Option<&'a (dyn Fn(&str) -> bool + Sync)>,
}

impl<'a> ValidateOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn external(mut self, enable: bool) -> Self {
        self.enable_external = enable;
        self
    }

    pub fn exists_by_key(mut self, exists: &'a (dyn Fn(&str) -> bool + Sync)) -> Self {
        self.exists_by_key = Some(exists);
        self
    }
}

impl fmt::Debug for ValidateOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("enable_external", &self.enable_external)
            .field("exists_by_key", &self.exists_by_key.is_some())
            .finish()
    }
}

/// The validation orchestrator.
///
/// `validate` takes `&self` and may be called from many threads at once;
/// the only shared mutable state is inside the adapter caches.
pub struct Validator {
    registry: RuleRegistry,
    adapters: Adapters,
}

impl Validator {
    /// A validator with the default rule set and no external sources.
    pub fn new() -> Result<Self, EngineError> {
        ValidatorBuilder::new().build()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Validate one record and return every issue found, ordered by
    /// severity and then rule code.
    pub fn validate(
        &self,
        record: &DocumentRecord,
        options: &ValidateOptions<'_>,
    ) -> Vec<ValidationIssue> {
        let ctx = RuleContext::new(&self.adapters);
        let mut issues = Vec::new();
        let mut evaluated = 0usize;

        for rule in self.registry.iter() {
            if !rule.applies_to(record.category)
                || (rule.scope() == RuleScope::Item && record.items.is_empty())
                || (rule.is_external() && !options.enable_external)
            {
                continue;
            }
            ctx.enter(rule.code(), rule.severity());
            issues.extend(rule.evaluate(record, &ctx));
            evaluated += 1;
        }

        for (kind, reason) in ctx.skipped() {
            issues.push(ValidationIssue::info(
                kind.skip_code(),
                format!("adapters.{kind}"),
                format!("{kind} check not performed: {reason}"),
            ));
        }

        if options
            .exists_by_key
            .is_some_and(|exists| exists(record.access_key.as_str()))
        {
            issues.push(
                ValidationIssue::error(DUPLICATE_CODE, "access_key", "document already processed")
                    .suggest("discard the resubmission or check the access key"),
            );
        }

        issues.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.code.cmp(&b.code)));

        debug!(
            category = %record.category,
            rules = evaluated,
            issues = issues.len(),
            errors = issues.iter().filter(|i| i.severity == Severity::Error).count(),
            "document validated"
        );
        issues
    }

    pub fn register_rule(&mut self, rule: Rule) -> Result<(), EngineError> {
        self.registry.register(rule)
    }

    pub fn remove_rule(&mut self, code: &str) -> Option<Rule> {
        self.registry.remove(code)
    }

    pub fn list_rules(&self) -> Vec<RuleInfo> {
        self.registry.list()
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn adapters(&self) -> &Adapters {
        &self.adapters
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Builder wiring sources, configuration, and extra rules into a [`Validator`].
///
/// ```
/// use nota::adapters::{ClassificationEntry, StaticTaxpayers};
/// use nota::engine::Validator;
///
/// let validator = Validator::builder()
///     .taxpayer_source(StaticTaxpayers::new())
///     .classification_table([ClassificationEntry::new("07032090", "Alhos")])
///     .build()
///     .unwrap();
/// assert!(!validator.list_rules().is_empty());
/// ```
pub struct ValidatorBuilder {
    adapter_config: AdapterConfig,
    similarity_config: SimilarityConfig,
    taxpayer: Option<Arc<dyn TaxpayerSource>>,
    postal: Option<Arc<dyn PostalSource>>,
    classification: Option<Arc<dyn ClassificationSource>>,
    scorer: Option<Arc<dyn SimilarityScorer>>,
    default_rules: bool,
    rules: Vec<Rule>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self {
            adapter_config: AdapterConfig::default(),
            similarity_config: SimilarityConfig::default(),
            taxpayer: None,
            postal: None,
            classification: None,
            scorer: None,
            default_rules: true,
            rules: Vec::new(),
        }
    }

    pub fn adapter_config(mut self, config: AdapterConfig) -> Self {
        self.adapter_config = config;
        self
    }

    pub fn similarity_config(mut self, config: SimilarityConfig) -> Self {
        self.similarity_config = config;
        self
    }

    pub fn taxpayer_source(mut self, source: impl TaxpayerSource + 'static) -> Self {
        self.taxpayer = Some(Arc::new(source));
        self
    }

    pub fn postal_source(mut self, source: impl PostalSource + 'static) -> Self {
        self.postal = Some(Arc::new(source));
        self
    }

    pub fn classification_source(mut self, source: impl ClassificationSource + 'static) -> Self {
        self.classification = Some(Arc::new(source));
        self
    }

    /// Load the offline classification table.
    pub fn classification_table(
        self,
        entries: impl IntoIterator<Item = ClassificationEntry>,
    ) -> Self {
        self.classification_source(entries.into_iter().collect::<ClassificationTable>())
    }

    /// Load the offline classification table from a code-keyed map.
    pub fn classification_map(self, entries: HashMap<String, ClassificationEntry>) -> Self {
        self.classification_source(ClassificationTable::new(entries))
    }

    pub fn similarity_scorer(mut self, scorer: impl SimilarityScorer + 'static) -> Self {
        self.scorer = Some(Arc::new(scorer));
        self
    }

    /// Start from an empty registry instead of the built-in catalogue.
    pub fn without_default_rules(mut self) -> Self {
        self.default_rules = false;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<Validator, EngineError> {
        self.adapter_config.validate()?;
        self.similarity_config.validate()?;

        let mut registry = if self.default_rules {
            RuleRegistry::with_defaults()?
        } else {
            RuleRegistry::new()
        };
        for rule in self.rules {
            registry.register(rule)?;
        }

        let config = self.adapter_config;
        let similarity = match self.scorer {
            Some(scorer) => SimilarityAdapter::new(scorer, config, self.similarity_config),
            None => SimilarityAdapter::local(config, self.similarity_config),
        };
        let adapters = Adapters {
            taxpayer: self.taxpayer.map(|s| TaxpayerAdapter::new(s, config)),
            postal: self.postal.map(|s| PostalAdapter::new(s, config)),
            classification: self
                .classification
                .map(|s| ClassificationAdapter::new(s, config)),
            similarity,
        };

        Ok(Validator { registry, adapters })
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
