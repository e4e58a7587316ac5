//! Core data structures shared by the service and its front-ends

use serde::{Deserialize, Serialize};

/// A value that arrives either on its own or as an ordered list
///
/// Requests may carry `"q": "text"` or `"q": ["a", "b"]`. Internal logic
/// always works on the flattened sequence; the original shape is restored
/// with [`OneOrMany::rewrap`] before answering.
///
/// # Example
///
/// ```ignore
/// let q: OneOrMany<String> = serde_json::from_str(r#"["a", "b"]"#)?;
/// assert_eq!(q.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Wrap `items` in the same shape as `self`
    ///
    /// For a single value only the first item is kept.
    pub fn rewrap<U: Default>(&self, items: Vec<U>) -> OneOrMany<U> {
        match self {
            OneOrMany::One(_) => OneOrMany::One(items.into_iter().next().unwrap_or_default()),
            OneOrMany::Many(_) => OneOrMany::Many(items),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// A ranked language guess as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub confidence: f64,
    pub language: String,
}

impl DetectedLanguage {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            confidence,
            language: language.into(),
        }
    }
}

/// Outcome of a translate call, mirroring the request shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: OneOrMany<String>,
    pub detected_language: DetectedLanguage,
}

/// Where a single fragment's translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Blank input, nothing to translate
    Empty,
    /// Exact dictionary hit
    Dictionary,
    /// Backend output after formatting
    Model,
    /// Backend failed; the source text is echoed
    Fallback,
}

/// Translation of a single fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub text: String,
    pub origin: Origin,
}

impl Translated {
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }
}
