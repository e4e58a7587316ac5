//! Machine Translation trait
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! enabling support for different MT backends (a hosted seq2seq model, mock, etc.)
//! without coupling the service to any specific implementation.
//!
//! # Example
//!
//! ```ignore
//! use marathi_mt::{InferenceEndpointProvider, Language, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = InferenceEndpointProvider::from_env()?;
//!     let result = provider.translate("Hello, world!", Language::En, Language::Mr).await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::error::MtResult;
use crate::language::Language;
use async_trait::async_trait;

/// Generic trait for machine translation backends
///
/// Implementations handle the actual translation work, whether through a
/// model server or deterministic logic (Mock). Calls may block for the
/// duration of model inference; no timeout is imposed at this layer beyond
/// what the implementation itself enforces.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target language
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The raw, unformatted model output
    /// * `Err(MtError)` - Model not available or inference failed
    async fn translate(&self, text: &str, source: Language, target: Language)
    -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging and the health report.
    fn provider_name(&self) -> &str;

    /// Identifier of the model serving `source` → `target`
    fn model_name(&self, source: Language, target: Language) -> String {
        format!("{}:{}-{}", self.provider_name(), source, target)
    }

    /// Where inference runs, as reported by `/health`
    fn device(&self) -> &str {
        "cpu"
    }

    /// Whether the backend can currently serve translations
    ///
    /// Remote backends should actually reach their model here; the
    /// default suits in-process backends that cannot be unavailable.
    async fn is_ready(&self) -> bool {
        true
    }
}
