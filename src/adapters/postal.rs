//! Postal code (CEP) resolution.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AdapterConfig, AdapterError, AdapterKind, FailSafeAdapter, Lookup};

/// Canonical location of a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalInfo {
    pub postal_code: String,
    pub municipality: String,
    pub jurisdiction: String,
}

/// A source of postal code data. `Ok(None)` means the code does not exist.
pub trait PostalSource: Send + Sync {
    fn resolve(&self, postal_code: &str, timeout: Duration)
    -> Result<Option<PostalInfo>, AdapterError>;
}

impl<F> PostalSource for F
where
    F: Fn(&str, Duration) -> Result<Option<PostalInfo>, AdapterError> + Send + Sync,
{
    fn resolve(
        &self,
        postal_code: &str,
        timeout: Duration,
    ) -> Result<Option<PostalInfo>, AdapterError> {
        self(postal_code, timeout)
    }
}

/// In-memory postal code table, keyed by the 8-digit code.
#[derive(Debug, Clone, Default)]
pub struct StaticPostalCodes {
    entries: HashMap<String, PostalInfo>,
}

impl StaticPostalCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, info: PostalInfo) -> Self {
        self.entries.insert(info.postal_code.clone(), info);
        self
    }
}

impl PostalSource for StaticPostalCodes {
    fn resolve(&self, postal_code: &str, _: Duration) -> Result<Option<PostalInfo>, AdapterError> {
        Ok(self.entries.get(postal_code).cloned())
    }
}

/// Strip `-`, `.` and spaces; `None` unless eight digits remain.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .collect();
    (digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Cached, fail-safe postal code lookups.
pub struct PostalAdapter {
    source: Arc<dyn PostalSource>,
    inner: FailSafeAdapter<PostalInfo>,
}

impl PostalAdapter {
    pub fn new(source: Arc<dyn PostalSource>, config: AdapterConfig) -> Self {
        Self {
            source,
            inner: FailSafeAdapter::new(AdapterKind::Postal, config),
        }
    }

    /// Malformed codes are reported as not found without consulting the source.
    pub fn lookup(&self, postal_code: &str) -> Lookup<PostalInfo> {
        let Some(key) = normalize_postal_code(postal_code) else {
            return Lookup::NotFound;
        };
        let source = Arc::clone(&self.source);
        let code = key.clone();
        self.inner
            .lookup_with(&key, move |timeout| source.resolve(&code, timeout))
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize_postal_code("01310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_postal_code("01.310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_postal_code("0131010"), None);
        assert_eq!(normalize_postal_code("0131010X"), None);
    }

    #[test]
    fn static_source() {
        let table = StaticPostalCodes::new().with(PostalInfo {
            postal_code: "01310100".into(),
            municipality: "São Paulo".into(),
            jurisdiction: "SP".into(),
        });
        let adapter = PostalAdapter::new(Arc::new(table), AdapterConfig::default());
        assert!(adapter.lookup("01310-100").is_found());
        assert_eq!(adapter.lookup("20040020"), Lookup::NotFound);
        assert_eq!(adapter.lookup("bad"), Lookup::NotFound);
    }
}
