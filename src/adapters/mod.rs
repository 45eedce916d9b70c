//! Cached, fail-safe lookups against external reference data.
//!
//! Four adapters back the `EXT-*` rules: taxpayer status, postal code,
//! classification-code table, and company-name similarity. Each one wraps a
//! pluggable source in a [`FailSafeAdapter`], which adds a 24-hour read-through
//! cache and turns timeouts and source errors into [`Lookup::Skipped`] instead
//! of failing the validation call.
//!
//! Sources perform their own I/O. The crate ships in-memory sources for
//! offline use and, behind the `brasilapi` feature, HTTP sources.

mod cache;
mod classification;
mod fail_safe;
mod postal;
mod similarity;
mod taxpayer;

#[cfg(feature = "brasilapi")]
pub mod brasilapi;

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::core::EngineError;

pub use cache::{CacheEntry, TtlCache};
pub use classification::{
    ClassificationAdapter, ClassificationEntry, ClassificationSource, ClassificationTable,
};
pub use fail_safe::FailSafeAdapter;
pub use postal::{
    PostalAdapter, PostalInfo, PostalSource, StaticPostalCodes, normalize_postal_code,
};
pub use similarity::{
    LevenshteinScorer, SimilarityAdapter, SimilarityScorer, fold_text, levenshtein,
    name_similarity, normalize_name,
};
pub use taxpayer::{StaticTaxpayers, TaxpayerAdapter, TaxpayerSource, TaxpayerStatus};

/// Default per-call timeout for external lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifetime of a cached lookup result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Similarity below which a declared name is reported as divergent.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Which adapter a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdapterKind {
    Taxpayer,
    Postal,
    Classification,
    Similarity,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 4] = [
        Self::Taxpayer,
        Self::Postal,
        Self::Classification,
        Self::Similarity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taxpayer => "taxpayer",
            Self::Postal => "postal",
            Self::Classification => "classification",
            Self::Similarity => "similarity",
        }
    }

    /// Code of the INFO issue recorded when this adapter was skipped.
    pub fn skip_code(self) -> &'static str {
        match self {
            Self::Taxpayer => "SKIP-TAXPAYER",
            Self::Postal => "SKIP-POSTAL",
            Self::Classification => "SKIP-CLASSIFICATION",
            Self::Similarity => "SKIP-SIMILARITY",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an adapter lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Found(V),
    /// The source answered authoritatively that the key does not exist.
    NotFound,
    /// The source could not be consulted; the reason is for the skip notice.
    Skipped(String),
}

impl<V> Lookup<V> {
    pub fn found(self) -> Option<V> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::Skipped(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Lookup<U> {
        match self {
            Self::Found(v) => Lookup::Found(f(v)),
            Self::NotFound => Lookup::NotFound,
            Self::Skipped(reason) => Lookup::Skipped(reason),
        }
    }
}

/// Failure of an external source. Never surfaces to callers of `validate`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdapterError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Timeout and cache lifetime shared by the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    pub timeout: Duration,
    pub ttl: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            ttl: DEFAULT_TTL,
        }
    }
}

impl AdapterConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.timeout.is_zero() {
            return Err(EngineError::Config("adapter timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// Name-similarity settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityConfig {
    /// Scores strictly below this value are reported.
    pub threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EngineError::Config(format!(
                "similarity threshold {} is outside 0.0..=1.0",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// The adapters available to external rules during one validator's life.
///
/// An adapter left unconfigured reports every lookup as skipped, so the
/// corresponding checks show up as not performed rather than silently passing.
pub struct Adapters {
    pub taxpayer: Option<TaxpayerAdapter>,
    pub postal: Option<PostalAdapter>,
    pub classification: Option<ClassificationAdapter>,
    pub similarity: SimilarityAdapter,
}

impl Default for Adapters {
    fn default() -> Self {
        Self {
            taxpayer: None,
            postal: None,
            classification: None,
            similarity: SimilarityAdapter::local(
                AdapterConfig::default(),
                SimilarityConfig::default(),
            ),
        }
    }
}

impl Adapters {
    pub fn taxpayer(&self, tax_id: &str) -> Lookup<TaxpayerStatus> {
        match &self.taxpayer {
            Some(adapter) => adapter.lookup(tax_id),
            None => not_configured(AdapterKind::Taxpayer),
        }
    }

    pub fn postal(&self, postal_code: &str) -> Lookup<PostalInfo> {
        match &self.postal {
            Some(adapter) => adapter.lookup(postal_code),
            None => not_configured(AdapterKind::Postal),
        }
    }

    pub fn classification(&self, code: &str) -> Lookup<ClassificationEntry> {
        match &self.classification {
            Some(adapter) => adapter.lookup(code),
            None => not_configured(AdapterKind::Classification),
        }
    }

    pub fn similarity(&self, declared: &str, canonical: &str) -> Lookup<f64> {
        self.similarity.compare(declared, canonical)
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity.threshold()
    }

    /// Drop every cached entry.
    pub fn clear_caches(&self) {
        if let Some(a) = &self.taxpayer {
            a.clear_cache();
        }
        if let Some(a) = &self.postal {
            a.clear_cache();
        }
        if let Some(a) = &self.classification {
            a.clear_cache();
        }
        self.similarity.clear_cache();
    }
}

fn not_configured<V>(kind: AdapterKind) -> Lookup<V> {
    Lookup::Skipped(format!("no {kind} source configured"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_codes_are_distinct() {
        let codes: std::collections::HashSet<_> =
            AdapterKind::ALL.iter().map(|k| k.skip_code()).collect();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn lookup_map_preserves_variant() {
        assert_eq!(Lookup::Found(2).map(|v| v * 2), Lookup::Found(4));
        assert_eq!(Lookup::<i32>::NotFound.map(|v| v * 2), Lookup::NotFound);
        assert!(Lookup::<i32>::Skipped("x".into()).map(|v| v + 1).is_skipped());
    }

    #[test]
    fn config_validation() {
        assert!(AdapterConfig::default().validate().is_ok());
        assert!(
            AdapterConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(SimilarityConfig { threshold: 1.5 }.validate().is_err());
    }

    #[test]
    fn unconfigured_adapters_skip() {
        let adapters = Adapters::default();
        assert!(adapters.taxpayer("11222333000181").is_skipped());
        assert!(adapters.postal("01310100").is_skipped());
        assert!(adapters.classification("07032090").is_skipped());
        assert!(adapters.similarity("ACME", "ACME").is_found());
    }
}
