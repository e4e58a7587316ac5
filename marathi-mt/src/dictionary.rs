//! Exact-match phrase dictionary consulted before the translation backend
//!
//! The dictionary is loaded once from a JSON resource with one table per
//! direction:
//!
//! ```json
//! {
//!     "@metadata": { ... },  // Ignored
//!     "en_to_mr": { "home": "घर" },
//!     "mr_to_en": { "घर": "Home" }
//! }
//! ```
//!
//! English keys are matched case-insensitively (they are lowercased on load
//! and on lookup), Marathi keys verbatim. There is no fuzzy or partial
//! matching: only the whole trimmed input is probed.

use crate::error::{MtError, MtResult};
use crate::language::Language;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const EN_TO_MR: &str = "en_to_mr";
const MR_TO_EN: &str = "mr_to_en";

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    en_to_mr: HashMap<String, String>,
    mr_to_en: HashMap<String, String>,
}

impl Dictionary {
    /// Create an empty dictionary (backend-only mode)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single entry for the `source` → `target` direction
    ///
    /// Entries where source and target are the same language are ignored.
    pub fn with_entry(
        &mut self,
        source: Language,
        target: Language,
        phrase: &str,
        translation: &str,
    ) -> &mut Self {
        if let Some(table) = self.table_mut(source, target) {
            table.insert(normalize_key(phrase, source), translation.to_owned());
        }
        self
    }

    /// Parse a dictionary from JSON text
    ///
    /// `origin` is only used in error messages.
    pub fn from_json_str(content: &str, origin: &str) -> MtResult<Self> {
        let json: Value = serde_json::from_str(content).map_err(|e| {
            MtError::DictionaryError(format!("Failed to parse JSON from '{}': {}", origin, e))
        })?;

        let obj = json.as_object().ok_or_else(|| {
            MtError::DictionaryError(format!(
                "Invalid JSON in '{}': root must be an object",
                origin
            ))
        })?;

        let mut dictionary = Dictionary::new();
        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }

            let (source, target) = match key.as_str() {
                EN_TO_MR => (Language::En, Language::Mr),
                MR_TO_EN => (Language::Mr, Language::En),
                other => {
                    warn!("Dictionary '{}': unknown table '{}', skipping", origin, other);
                    continue;
                }
            };

            let table = value.as_object().ok_or_else(|| {
                MtError::DictionaryError(format!(
                    "Invalid JSON in '{}': '{}' must be an object",
                    origin, key
                ))
            })?;
            dictionary.load_table(table, source, target, origin);
        }

        Ok(dictionary)
    }

    /// Load a dictionary from a JSON file
    ///
    /// # Errors
    /// - File not found
    /// - Invalid JSON
    /// - File read errors
    pub fn load_from_file(path: &Path) -> MtResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MtError::DictionaryError(format!("Failed to read file '{}': {}", path.display(), e))
        })?;

        let dictionary = Self::from_json_str(&content, &path.display().to_string())?;
        info!(
            "Loaded dictionary from {} ({} entries)",
            path.display(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// Load a dictionary, degrading to an empty one if the resource is unusable
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                warn!("{}; continuing without dictionary", e);
                Self::new()
            }
        }
    }

    /// Look up an exact translation for `text`
    ///
    /// Returns `None` on a miss; the caller falls back to the backend.
    pub fn lookup(&self, text: &str, source: Language, target: Language) -> Option<&str> {
        let table = self.table(source, target)?;
        table
            .get(&normalize_key(text, source))
            .map(String::as_str)
    }

    /// Total number of entries across both directions
    pub fn len(&self) -> usize {
        self.en_to_mr.len() + self.mr_to_en.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_table(
        &mut self,
        table: &Map<String, Value>,
        source: Language,
        target: Language,
        origin: &str,
    ) {
        for (phrase, translation) in table {
            if phrase.starts_with('@') {
                continue;
            }
            match translation.as_str() {
                Some(translation) => {
                    self.with_entry(source, target, phrase, translation);
                }
                None => warn!(
                    "Dictionary '{}': entry '{}' is not a string, skipping",
                    origin, phrase
                ),
            }
        }
    }

    fn table(&self, source: Language, target: Language) -> Option<&HashMap<String, String>> {
        match (source, target) {
            (Language::En, Language::Mr) => Some(&self.en_to_mr),
            (Language::Mr, Language::En) => Some(&self.mr_to_en),
            _ => None,
        }
    }

    fn table_mut(
        &mut self,
        source: Language,
        target: Language,
    ) -> Option<&mut HashMap<String, String>> {
        match (source, target) {
            (Language::En, Language::Mr) => Some(&mut self.en_to_mr),
            (Language::Mr, Language::En) => Some(&mut self.mr_to_en),
            _ => None,
        }
    }
}

fn normalize_key(text: &str, source: Language) -> String {
    let text = text.trim();
    match source {
        Language::En => text.to_lowercase(),
        Language::Mr => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"{
        "@metadata": { "authors": ["test"] },
        "en_to_mr": { "Home": "घर", "Settings": "सेटिंग्स", "count": 3 },
        "mr_to_en": { "घर": "Home" }
    }"#;

    fn bundled_dictionary_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/dictionary.json")
    }

    #[test]
    fn test_lookup_exact_english_phrase() {
        let dictionary = Dictionary::from_json_str(SAMPLE, "sample").unwrap();
        assert_eq!(
            dictionary.lookup("Home", Language::En, Language::Mr),
            Some("घर")
        );
    }

    #[test]
    fn test_lookup_english_is_case_insensitive_and_trimmed() {
        let dictionary = Dictionary::from_json_str(SAMPLE, "sample").unwrap();
        assert_eq!(
            dictionary.lookup("  HOME ", Language::En, Language::Mr),
            Some("घर")
        );
        assert_eq!(
            dictionary.lookup("settings", Language::En, Language::Mr),
            Some("सेटिंग्स")
        );
    }

    #[test]
    fn test_lookup_miss_without_exact_entry() {
        let dictionary = Dictionary::from_json_str(SAMPLE, "sample").unwrap();
        assert_eq!(
            dictionary.lookup("home office", Language::En, Language::Mr),
            None
        );
        assert_eq!(dictionary.lookup("hom", Language::En, Language::Mr), None);
    }

    #[test]
    fn test_lookup_marathi_direction() {
        let dictionary = Dictionary::from_json_str(SAMPLE, "sample").unwrap();
        assert_eq!(
            dictionary.lookup("घर", Language::Mr, Language::En),
            Some("Home")
        );
        // Directions are independent
        assert_eq!(dictionary.lookup("घर", Language::En, Language::Mr), None);
        assert_eq!(dictionary.lookup("home", Language::Mr, Language::En), None);
    }

    #[test]
    fn test_same_language_direction_has_no_table() {
        let mut dictionary = Dictionary::new();
        dictionary.with_entry(Language::En, Language::En, "home", "home");
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.lookup("home", Language::En, Language::En), None);
    }

    #[test]
    fn test_metadata_and_non_string_entries_skipped() {
        let dictionary = Dictionary::from_json_str(SAMPLE, "sample").unwrap();
        assert_eq!(dictionary.len(), 3);
        assert_eq!(dictionary.lookup("count", Language::En, Language::Mr), None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Dictionary::from_json_str("not json", "broken"),
            Err(MtError::DictionaryError(_))
        ));
        assert!(matches!(
            Dictionary::from_json_str("[1, 2]", "array"),
            Err(MtError::DictionaryError(_))
        ));
        assert!(matches!(
            Dictionary::from_json_str(r#"{"en_to_mr": "home"}"#, "flat"),
            Err(MtError::DictionaryError(_))
        ));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dictionary = Dictionary::load_or_empty(Path::new("/nonexistent/dictionary.json"));
        assert!(dictionary.is_empty());
    }

    #[test]
    fn test_bundled_dictionary_loads() {
        let dictionary = Dictionary::load_from_file(&bundled_dictionary_path()).unwrap();
        assert!(!dictionary.is_empty());
        assert_eq!(
            dictionary.lookup("Home", Language::En, Language::Mr),
            Some("घर")
        );
        assert_eq!(
            dictionary.lookup("Logout", Language::En, Language::Mr),
            Some("लॉगआउट")
        );
    }
}
