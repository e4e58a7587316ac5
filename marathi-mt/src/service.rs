//! Translation service: dictionary fast-path, backend call, output clean-up
//!
//! A [`TranslationService`] is built once at startup from its collaborators
//! and then shared read-only (typically behind an `Arc`) by every request.
//!
//! # Workflow Example
//!
//! ```ignore
//! use marathi_mt::{Dictionary, Language, MockMode, MockTranslator, OneOrMany,
//!     SourceLanguage, TranslationService};
//! use std::sync::Arc;
//!
//! let service = TranslationService::new(Arc::new(MockTranslator::new(MockMode::NoOp)))
//!     .with_dictionary(Dictionary::load_or_empty("data/dictionary.json".as_ref()));
//!
//! let q = OneOrMany::Many(vec!["Home".to_string(), "Good morning".to_string()]);
//! let result = service
//!     .translate(&q, SourceLanguage::Fixed(Language::En), Language::Mr)
//!     .await?;
//! ```

use crate::data::{DetectedLanguage, OneOrMany, Origin, Translated, TranslationResult};
use crate::detect::{LanguageEstimator, WhatlangEstimator, detect_languages};
use crate::dictionary::Dictionary;
use crate::error::{MtError, MtResult};
use crate::formatter::{FormatOptions, improve_formatting};
use crate::language::{Language, LanguageInfo, SourceLanguage};
use crate::translator::MachineTranslator;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Confidence reported when the caller names the source language
const EXPLICIT_SOURCE_CONFIDENCE: f64 = 100.0;

/// Snapshot returned by `/health`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub model: String,
    pub device: String,
    pub model_loaded: bool,
    pub provider: String,
    pub dictionary_entries: usize,
}

pub struct TranslationService {
    dictionary: Dictionary,
    translator: Arc<dyn MachineTranslator>,
    estimator: Arc<dyn LanguageEstimator>,
    format_options: FormatOptions,
}

impl TranslationService {
    /// Service with an empty dictionary and the whatlang estimator
    pub fn new(translator: Arc<dyn MachineTranslator>) -> Self {
        info!("Using translation provider: {}", translator.provider_name());
        Self {
            dictionary: Dictionary::new(),
            translator,
            estimator: Arc::new(WhatlangEstimator::new()),
            format_options: FormatOptions::default(),
        }
    }

    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn LanguageEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_format_options(mut self, options: FormatOptions) -> Self {
        self.format_options = options;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn translator(&self) -> &dyn MachineTranslator {
        self.translator.as_ref()
    }

    /// Translate one fragment
    ///
    /// Never fails: a backend error echoes the original text with
    /// [`Origin::Fallback`].
    pub async fn translate_fragment(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Translated {
        if text.trim().is_empty() {
            return Translated::new("", Origin::Empty);
        }

        if let Some(hit) = self.dictionary.lookup(text, source, target) {
            debug!("Dictionary hit for '{}'", text.trim());
            return Translated::new(hit, Origin::Dictionary);
        }

        match self.translator.translate(text, source, target).await {
            Ok(raw) => Translated::new(
                improve_formatting(text, &raw, self.format_options),
                Origin::Model,
            ),
            Err(e) => {
                warn!(
                    "{} failed on '{}' ({} → {}): {}",
                    self.translator.provider_name(),
                    text,
                    source,
                    target,
                    e
                );
                Translated::new(text, Origin::Fallback)
            }
        }
    }

    /// Translate a single string or a batch, preserving its shape and order
    ///
    /// # Errors
    /// - `InvalidRequest` if `q` is empty or source equals target
    pub async fn translate(
        &self,
        q: &OneOrMany<String>,
        source: SourceLanguage,
        target: Language,
    ) -> MtResult<TranslationResult> {
        if q.is_empty() {
            return Err(MtError::InvalidRequest("Missing 'q' parameter".to_string()));
        }

        let (source, detected_language) = self.resolve_source(q.as_slice(), source)?;
        if source == target {
            return Err(MtError::InvalidRequest(
                "Source and target languages must be different".to_string(),
            ));
        }

        let mut translations = Vec::with_capacity(q.len());
        for text in q.as_slice() {
            translations.push(self.translate_fragment(text, source, target).await.text);
        }
        debug!("Translated {} fragment(s) {} → {}", translations.len(), source, target);

        Ok(TranslationResult {
            translated_text: q.rewrap(translations),
            detected_language,
        })
    }

    /// Rank the supported languages of `fragments`
    pub fn detect(&self, fragments: &[String]) -> Vec<DetectedLanguage> {
        detect_languages(self.estimator.as_ref(), fragments, &Language::codes())
    }

    /// Pick the source language, detecting it when asked to
    pub fn resolve_source(
        &self,
        fragments: &[String],
        source: SourceLanguage,
    ) -> MtResult<(Language, DetectedLanguage)> {
        match source {
            SourceLanguage::Fixed(language) => Ok((
                language,
                DetectedLanguage::new(language.code(), EXPLICIT_SOURCE_CONFIDENCE),
            )),
            SourceLanguage::Auto => {
                let best = self
                    .detect(fragments)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| DetectedLanguage::new(Language::En.code(), 0.0));
                let language = best.language.parse::<Language>()?;
                debug!("Detected source {} ({})", language, best.confidence);
                Ok((language, best))
            }
        }
    }

    pub fn languages(&self) -> Vec<LanguageInfo> {
        Language::ALL.into_iter().map(LanguageInfo::from).collect()
    }

    /// Check the backend and report; remote backends are contacted
    pub async fn health(&self) -> HealthReport {
        let model_loaded = self.translator.is_ready().await;
        HealthReport {
            status: if model_loaded { "healthy" } else { "unhealthy" }.to_string(),
            model: self.translator.model_name(Language::En, Language::Mr),
            device: self.translator.device().to_string(),
            model_loaded,
            provider: self.translator.provider_name().to_string(),
            dictionary_entries: self.dictionary.len(),
        }
    }
}
