//! Product classification code (NCM) reference table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AdapterConfig, AdapterError, AdapterKind, FailSafeAdapter, Lookup};

/// Metadata attached to one classification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub code: String,
    pub description: String,
    /// IPI rate from the TIPI table, when known.
    pub ipi_rate: Option<Decimal>,
}

impl ClassificationEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            ipi_rate: None,
        }
    }
}

/// A source of classification metadata. `Ok(None)` means the code is not in
/// the table.
pub trait ClassificationSource: Send + Sync {
    fn entry(&self, code: &str, timeout: Duration)
    -> Result<Option<ClassificationEntry>, AdapterError>;
}

/// Offline table loaded once at construction; lookups are a hash lookup.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    entries: HashMap<String, ClassificationEntry>,
}

impl ClassificationTable {
    pub fn new(entries: HashMap<String, ClassificationEntry>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&ClassificationEntry> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ClassificationEntry> for ClassificationTable {
    fn from_iter<I: IntoIterator<Item = ClassificationEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|e| (e.code.clone(), e)).collect())
    }
}

impl ClassificationSource for ClassificationTable {
    fn entry(
        &self,
        code: &str,
        _: Duration,
    ) -> Result<Option<ClassificationEntry>, AdapterError> {
        Ok(self.get(code).cloned())
    }
}

impl<F> ClassificationSource for F
where
    F: Fn(&str, Duration) -> Result<Option<ClassificationEntry>, AdapterError> + Send + Sync,
{
    fn entry(
        &self,
        code: &str,
        timeout: Duration,
    ) -> Result<Option<ClassificationEntry>, AdapterError> {
        self(code, timeout)
    }
}

/// Cached, fail-safe classification membership.
pub struct ClassificationAdapter {
    source: Arc<dyn ClassificationSource>,
    inner: FailSafeAdapter<ClassificationEntry>,
}

impl ClassificationAdapter {
    pub fn new(source: Arc<dyn ClassificationSource>, config: AdapterConfig) -> Self {
        Self {
            source,
            inner: FailSafeAdapter::new(AdapterKind::Classification, config),
        }
    }

    /// Adapter over an in-memory table.
    pub fn from_table(table: ClassificationTable, config: AdapterConfig) -> Self {
        Self::new(Arc::new(table), config)
    }

    pub fn lookup(&self, code: &str) -> Lookup<ClassificationEntry> {
        let source = Arc::clone(&self.source);
        let owned = code.to_string();
        self.inner
            .lookup_with(code, move |timeout| source.entry(&owned, timeout))
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}
