//! Supported languages and locale code handling
//!
//! The service only ever translates between English and Marathi. Incoming
//! codes are normalized before parsing so that `en-US`, `EN` and the ISO
//! 639-2 form `eng` all resolve to [`Language::En`].

use crate::error::{MtError, MtResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A language the service can translate from or into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Mr,
}

impl Language {
    /// All supported languages, in the order they are advertised
    pub const ALL: [Language; 2] = [Language::En, Language::Mr];

    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Mr => "mr",
        }
    }

    /// English display name
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Mr => "Marathi",
        }
    }

    /// FLORES-200 tag used by IndicTrans2 models
    pub fn flores_tag(self) -> &'static str {
        match self {
            Language::En => "eng_Latn",
            Language::Mr => "mar_Deva",
        }
    }

    /// Languages this one can be translated into
    pub fn targets(self) -> Vec<Language> {
        Self::ALL.into_iter().filter(|l| *l != self).collect()
    }

    /// Codes of all supported languages
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|l| l.code()).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_locale(s)?;
        match normalize_locale(s).as_str() {
            "en" => Ok(Language::En),
            "mr" => Ok(Language::Mr),
            _ => Err(MtError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Source side of a translation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    /// Detect the source language from the request text
    Auto,
    Fixed(Language),
}

impl FromStr for SourceLanguage {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(SourceLanguage::Auto)
        } else {
            s.parse().map(SourceLanguage::Fixed)
        }
    }
}

/// Entry of the `/languages` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub targets: Vec<String>,
}

impl From<Language> for LanguageInfo {
    fn from(language: Language) -> Self {
        Self {
            code: language.code().to_string(),
            name: language.name().to_string(),
            targets: language
                .targets()
                .into_iter()
                .map(|l| l.code().to_string())
                .collect(),
        }
    }
}

/// Normalize a locale code to its base language
///
/// Region and script subtags are dropped and the common three-letter
/// aliases are folded into their two-letter form:
/// - `en-US` → `en`
/// - `mr_IN` → `mr`
/// - `mar` → `mr`
pub fn normalize_locale(locale: &str) -> String {
    let base = locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase();

    match base.as_str() {
        "eng" => "en".to_string(),
        "mar" => "mr".to_string(),
        _ => base,
    }
}

/// Validate that a locale code is in acceptable format
///
/// Only ASCII alphanumerics, hyphens and underscores are allowed.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    let locale = locale.trim();
    if locale.is_empty() {
        return Err(MtError::UnsupportedLanguage(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::UnsupportedLanguage(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
