//! English ↔ Marathi machine translation
//!
//! This crate wraps a pretrained seq2seq translation model (MarianMT or
//! IndicTrans2) behind a small service that:
//!
//! 1. answers exact UI phrases from a [`Dictionary`] before touching the model,
//! 2. calls a [`MachineTranslator`] backend for everything else,
//! 3. cleans up the raw model output with [`improve_formatting`],
//! 4. ranks the language of unlabelled input with [`detect_languages`].
//!
//! # Workflow Example
//!
//! ```ignore
//! use marathi_mt::{
//!     Dictionary, InferenceEndpointProvider, Language, OneOrMany, SourceLanguage,
//!     TranslationService,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = InferenceEndpointProvider::from_env()?;
//!     let service = TranslationService::new(Arc::new(provider))
//!         .with_dictionary(Dictionary::load_or_empty("data/dictionary.json".as_ref()));
//!
//!     let q = OneOrMany::One("Good morning!".to_string());
//!     let result = service.translate(&q, SourceLanguage::Auto, Language::Mr).await?;
//!     println!("{:?}", result.translated_text);
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod detect;
pub mod dictionary;
pub mod error;
pub mod formatter;
pub mod inference;
pub mod language;
pub mod mock;
pub mod service;
pub mod translator;


// Re-export main types for convenient access
pub use data::{DetectedLanguage, OneOrMany, Origin, Translated, TranslationResult};
pub use detect::{
    LanguageCandidate, LanguageEstimator, WhatlangEstimator, candidates_for, detect_languages,
};
pub use dictionary::Dictionary;
pub use error::{MtError, MtResult};
pub use formatter::{FormatOptions, format_translation, improve_formatting};
pub use inference::{InferenceEndpointProvider, ModelFamily};
pub use language::{Language, LanguageInfo, SourceLanguage, normalize_locale};
pub use mock::{MockMode, MockTranslator};
pub use service::{HealthReport, TranslationService};
pub use translator::MachineTranslator;
