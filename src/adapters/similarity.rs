//! Company-name similarity.
//!
//! Names are normalized before comparison: lower-cased, accents folded,
//! punctuation dropped, and legal-form suffixes (LTDA, S/A, ME, EPP, ...)
//! removed. The score is `1 - distance / max_len` over the normalized
//! strings, using Levenshtein distance on characters.

use std::sync::Arc;
use std::time::Duration;

use super::{AdapterConfig, AdapterError, AdapterKind, FailSafeAdapter, Lookup, SimilarityConfig};

const LEGAL_FORMS: &[&str] = &[
    "ltda", "sa", "me", "epp", "eireli", "mei", "ss", "cia", "limitada",
];

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Lower-cased, accent-folded text with punctuation and runs of whitespace
/// reduced to single spaces. "SAO  PAULO" and "São Paulo" fold alike.
pub fn fold_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form used for comparison.
pub fn normalize_name(name: &str) -> String {
    // "S.A." and "S/A" collapse to "sa" before tokenizing.
    let joined: String = name.chars().filter(|c| !matches!(c, '.' | '/')).collect();
    fold_text(&joined)
        .split(' ')
        .filter(|token| !LEGAL_FORMS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in `0.0..=1.0` between two company names.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_name(a);
    let b = normalize_name(b);
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Scores the similarity of a declared name against a canonical one.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, declared: &str, canonical: &str, timeout: Duration)
    -> Result<f64, AdapterError>;
}

/// Local scorer backed by [`name_similarity`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinScorer;

impl SimilarityScorer for LevenshteinScorer {
    fn score(&self, declared: &str, canonical: &str, _: Duration) -> Result<f64, AdapterError> {
        Ok(name_similarity(declared, canonical))
    }
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str, Duration) -> Result<f64, AdapterError> + Send + Sync,
{
    fn score(
        &self,
        declared: &str,
        canonical: &str,
        timeout: Duration,
    ) -> Result<f64, AdapterError> {
        self(declared, canonical, timeout)
    }
}

/// Cached, fail-safe name comparison.
pub struct SimilarityAdapter {
    scorer: Arc<dyn SimilarityScorer>,
    inner: FailSafeAdapter<f64>,
    threshold: f64,
}

impl SimilarityAdapter {
    pub fn new(
        scorer: Arc<dyn SimilarityScorer>,
        config: AdapterConfig,
        similarity: SimilarityConfig,
    ) -> Self {
        Self {
            scorer,
            inner: FailSafeAdapter::new(AdapterKind::Similarity, config),
            threshold: similarity.threshold,
        }
    }

    /// Adapter using the built-in [`LevenshteinScorer`].
    pub fn local(config: AdapterConfig, similarity: SimilarityConfig) -> Self {
        Self::new(Arc::new(LevenshteinScorer), config, similarity)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn compare(&self, declared: &str, canonical: &str) -> Lookup<f64> {
        let key = format!("{}\u{1f}{}", normalize_name(declared), normalize_name(canonical));
        let scorer = Arc::clone(&self.scorer);
        let (declared, canonical) = (declared.to_string(), canonical.to_string());
        self.inner.lookup_with(&key, move |timeout| {
            let score = scorer.score(&declared, &canonical, timeout)?;
            if !score.is_finite() {
                return Err(AdapterError::InvalidResponse(format!(
                    "similarity score {score} is not a finite number"
                )));
            }
            Ok(Some(score.clamp(0.0, 1.0)))
        })
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}
