//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, model-free translator for exercising
//! the service without a running inference server.
//!
//! # Example
//!
//! ```ignore
//! use marathi_mt::{Language, MachineTranslator, MockMode, MockTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", Language::En, Language::Mr).await.unwrap();
//!     assert_eq!(result, "hello_mr");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::language::Language;
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target code: "hello" → "hello_mr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, Language), String>),

    /// Emit the first word of the input `n` times, like a degenerate model
    Repeat(usize),

    /// Simulate backend errors
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various backend behaviors
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated inference delay (in milliseconds)
    delay_ms: u64,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    /// Create a MockTranslator with simulated inference latency
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    /// Build a `Mappings` mock from `(source text, target, translation)` triples
    pub fn with_mappings<'a>(
        entries: impl IntoIterator<Item = (&'a str, Language, &'a str)>,
    ) -> Self {
        let map = entries
            .into_iter()
            .map(|(text, target, translation)| {
                ((text.to_string(), target), translation.to_string())
            })
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: Language) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => Ok(map
                .get(&(text.to_string(), target))
                .cloned()
                .unwrap_or_else(|| format!("{}_{}", text, target))),
            MockMode::Repeat(n) => {
                let word = text.split_whitespace().next().unwrap_or_default();
                Ok(vec![word; *n].join(" "))
            }
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> MtResult<String> {
        self.apply_delay().await;
        self.apply_translation(text, target)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }

    fn device(&self) -> &str {
        "none"
    }

    /// `Error` mode stands in for a model that failed to load
    async fn is_ready(&self) -> bool {
        !matches!(self.mode, MockMode::Error(_))
    }
}
