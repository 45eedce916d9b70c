//! Taxpayer registry status (CNPJ situação cadastral).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AdapterConfig, AdapterError, AdapterKind, FailSafeAdapter, Lookup};

/// Registry status of a taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerStatus {
    pub tax_id: String,
    /// Whether the registration is active (situação cadastral ATIVA).
    pub active: bool,
    /// Registered name (razão social).
    pub name: String,
    /// Jurisdiction of the registered address.
    pub jurisdiction: Option<String>,
}

/// A source of taxpayer registry data.
///
/// `Ok(None)` means the registry does not know the id. Implementations should
/// give up after `timeout`.
pub trait TaxpayerSource: Send + Sync {
    fn status(&self, tax_id: &str, timeout: Duration)
    -> Result<Option<TaxpayerStatus>, AdapterError>;
}

impl<F> TaxpayerSource for F
where
    F: Fn(&str, Duration) -> Result<Option<TaxpayerStatus>, AdapterError> + Send + Sync,
{
    fn status(
        &self,
        tax_id: &str,
        timeout: Duration,
    ) -> Result<Option<TaxpayerStatus>, AdapterError> {
        self(tax_id, timeout)
    }
}

/// In-memory registry snapshot, keyed by tax id.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxpayers {
    entries: HashMap<String, TaxpayerStatus>,
}

impl StaticTaxpayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, status: TaxpayerStatus) -> Self {
        self.entries.insert(status.tax_id.clone(), status);
        self
    }
}

impl FromIterator<TaxpayerStatus> for StaticTaxpayers {
    fn from_iter<I: IntoIterator<Item = TaxpayerStatus>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|s| (s.tax_id.clone(), s))
                .collect(),
        }
    }
}

impl TaxpayerSource for StaticTaxpayers {
    fn status(&self, tax_id: &str, _: Duration) -> Result<Option<TaxpayerStatus>, AdapterError> {
        Ok(self.entries.get(tax_id).cloned())
    }
}

/// Cached, fail-safe taxpayer status lookups.
pub struct TaxpayerAdapter {
    source: Arc<dyn TaxpayerSource>,
    inner: FailSafeAdapter<TaxpayerStatus>,
}

impl TaxpayerAdapter {
    pub fn new(source: Arc<dyn TaxpayerSource>, config: AdapterConfig) -> Self {
        Self {
            source,
            inner: FailSafeAdapter::new(AdapterKind::Taxpayer, config),
        }
    }

    /// Look up by tax id; formatting characters are ignored.
    pub fn lookup(&self, tax_id: &str) -> Lookup<TaxpayerStatus> {
        let key: String = tax_id.chars().filter(char::is_ascii_digit).collect();
        let source = Arc::clone(&self.source);
        let id = key.clone();
        self.inner
            .lookup_with(&key, move |timeout| source.status(&id, timeout))
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> TaxpayerStatus {
        TaxpayerStatus {
            tax_id: "11222333000181".into(),
            active: true,
            name: "ACME COMERCIO LTDA".into(),
            jurisdiction: Some("SP".into()),
        }
    }

    #[test]
    fn static_source_answers() {
        let adapter = TaxpayerAdapter::new(
            Arc::new(StaticTaxpayers::new().with(acme())),
            AdapterConfig::default(),
        );
        assert_eq!(adapter.lookup("11.222.333/0001-81"), Lookup::Found(acme()));
        assert_eq!(adapter.lookup("00000000000191"), Lookup::NotFound);
    }

    #[test]
    fn closure_source() {
        let source = |_: &str, t: Duration| -> Result<Option<TaxpayerStatus>, AdapterError> {
            Err(AdapterError::Timeout(t))
        };
        let adapter = TaxpayerAdapter::new(Arc::new(source), AdapterConfig::default());
        assert!(adapter.lookup("11222333000181").is_skipped());
    }
}
