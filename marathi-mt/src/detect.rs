//! Language detection over one or more text fragments
//!
//! A [`LanguageEstimator`] scores a single fragment. [`detect_languages`]
//! runs it over every fragment of a request and merges the per-fragment
//! guesses into one ranking, weighting each language's confidence by the
//! share of the analyzed text it was detected on.
//!
//! # Example
//!
//! ```ignore
//! use marathi_mt::{WhatlangEstimator, detect_languages};
//!
//! let estimator = WhatlangEstimator::new();
//! let ranked = detect_languages(&estimator, &["Hello".to_string()], &["en", "mr"]);
//! println!("{} ({})", ranked[0].language, ranked[0].confidence);
//! ```

use crate::data::DetectedLanguage;
use crate::error::MtResult;
use tracing::{debug, warn};
use whatlang::{Detector, Lang};

/// Candidates kept per fragment
const MAX_CANDIDATES: usize = 3;

/// Language reported when nothing could be detected
const DEFAULT_LANGUAGE: &str = "en";

/// Scores the languages a single text might be written in
///
/// Returns `(code, probability)` pairs, most probable first, with
/// probabilities in `0.0..=1.0`.
pub trait LanguageEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> MtResult<Vec<(String, f64)>>;
}

impl<F> LanguageEstimator for F
where
    F: Fn(&str) -> MtResult<Vec<(String, f64)>> + Send + Sync,
{
    fn estimate(&self, text: &str) -> MtResult<Vec<(String, f64)>> {
        self(text)
    }
}

/// Trigram-based estimator restricted to English and Marathi
pub struct WhatlangEstimator {
    detector: Detector,
}

impl WhatlangEstimator {
    pub fn new() -> Self {
        Self {
            detector: Detector::with_allowlist(vec![Lang::Eng, Lang::Mar]),
        }
    }
}

impl Default for WhatlangEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageEstimator for WhatlangEstimator {
    fn estimate(&self, text: &str) -> MtResult<Vec<(String, f64)>> {
        let Some(info) = self.detector.detect(text) else {
            return Ok(Vec::new());
        };

        let code = match info.lang() {
            Lang::Eng => "en",
            Lang::Mar => "mr",
            l => l.code(),
        };
        Ok(vec![(code.to_string(), info.confidence())])
    }
}

/// A per-fragment language guess
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageCandidate {
    pub code: String,
    /// Percentage, `0.0..=100.0`
    pub confidence: f64,
    /// Character count of the fragment this guess was made on
    pub text_length: usize,
}

impl LanguageCandidate {
    fn fallback(text_length: usize) -> Self {
        Self {
            code: DEFAULT_LANGUAGE.to_string(),
            confidence: 0.0,
            text_length,
        }
    }
}

/// Top candidates for a single fragment
///
/// `allowed` restricts the codes considered; an empty slice allows all.
/// Blank text, no surviving candidate, or a zero-probability top candidate
/// all yield a single zero-confidence English guess.
pub fn candidates_for(
    estimator: &dyn LanguageEstimator,
    text: &str,
    allowed: &[&str],
) -> MtResult<Vec<LanguageCandidate>> {
    let text_length = text.chars().count();
    if text.trim().is_empty() {
        return Ok(vec![LanguageCandidate::fallback(text_length)]);
    }

    let top: Vec<(String, f64)> = estimator
        .estimate(text)?
        .into_iter()
        .filter(|(code, _)| allowed.is_empty() || allowed.contains(&code.as_str()))
        .take(MAX_CANDIDATES)
        .collect();

    match top.first() {
        None => Ok(vec![LanguageCandidate::fallback(text_length)]),
        Some((_, probability)) if *probability <= 0.0 => {
            Ok(vec![LanguageCandidate::fallback(text_length)])
        }
        Some(_) => Ok(top
            .into_iter()
            .map(|(code, probability)| LanguageCandidate {
                code,
                confidence: (probability * 100.0).round(),
                text_length,
            })
            .collect()),
    }
}

/// Merge candidates that share a language code
///
/// Codes are visited in `allowed` order when a restriction is given,
/// otherwise in order of first appearance. A code seen once is kept as is;
/// a code seen `k` times becomes one candidate with the mean confidence and
/// the summed text length.
fn merge_candidates(candidates: &[LanguageCandidate], allowed: &[&str]) -> Vec<LanguageCandidate> {
    let mut order: Vec<&str> = Vec::new();
    if allowed.is_empty() {
        for candidate in candidates {
            if !order.contains(&candidate.code.as_str()) {
                order.push(&candidate.code);
            }
        }
    } else {
        order.extend_from_slice(allowed);
    }

    order
        .into_iter()
        .filter_map(|code| {
            let matching: Vec<&LanguageCandidate> =
                candidates.iter().filter(|c| c.code == code).collect();
            match matching.as_slice() {
                [] => None,
                [single] => Some((*single).clone()),
                many => Some(LanguageCandidate {
                    code: code.to_string(),
                    confidence: many.iter().map(|c| c.confidence).sum::<f64>()
                        / many.len() as f64,
                    text_length: many.iter().map(|c| c.text_length).sum(),
                }),
            }
        })
        .collect()
}

/// Rank the languages of `fragments`, most likely first
///
/// Fragments whose estimation fails are logged and left out. The result is
/// never empty: with no candidates at all it is `[{en, 0}]`.
pub fn detect_languages(
    estimator: &dyn LanguageEstimator,
    fragments: &[String],
    allowed: &[&str],
) -> Vec<DetectedLanguage> {
    let mut candidates = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        match candidates_for(estimator, fragment, allowed) {
            Ok(found) => candidates.extend(found),
            Err(e) => warn!("Language detection failed for fragment {}: {}", i, e),
        }
    }

    if candidates.is_empty() {
        return vec![DetectedLanguage::new(DEFAULT_LANGUAGE, 0.0)];
    }

    if fragments.len() > 1 {
        let merged = merge_candidates(&candidates, allowed);
        if !merged.is_empty() {
            candidates = merged;
        }
    }

    let total_length: usize = candidates.iter().map(|c| c.text_length).sum();
    let weight = |c: &LanguageCandidate| {
        if total_length == 0 {
            0.0
        } else {
            c.confidence * c.text_length as f64 / total_length as f64
        }
    };

    // Stable sort: equal weights keep their merge order
    candidates.sort_by(|a, b| weight(b).total_cmp(&weight(a)));
    debug!("Detected {} candidate language(s)", candidates.len());

    candidates
        .into_iter()
        .map(|c| DetectedLanguage::new(c.code, c.confidence))
        .collect()
}
