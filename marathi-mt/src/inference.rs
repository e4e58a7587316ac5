//! Hosted seq2seq model provider
//!
//! Sends text to a Hugging Face style inference server that hosts one
//! translation model per direction. Two model families are supported:
//!
//! - **MarianMT** (`Helsinki-NLP/opus-mt-en-mr`, `Helsinki-NLP/opus-mt-mr-en`)
//! - **IndicTrans2** (`ai4bharat/indictrans2-en-indic-dist-200M`,
//!   `ai4bharat/indictrans2-indic-en-dist-200M`), whose input must be
//!   prefixed with FLORES language tags.
//!
//! # Configuration
//!
//! `from_env` reads the server base URL from `MARATHI_MT_ENDPOINT` and an
//! optional bearer token from `MARATHI_MT_API_TOKEN`.
//!
//! # Example
//!
//! ```ignore
//! use marathi_mt::{InferenceEndpointProvider, Language, MachineTranslator};
//!
//! let provider = InferenceEndpointProvider::from_env()?;
//! let result = provider.translate("Hello", Language::En, Language::Mr).await?;
//! ```

use crate::error::{MtError, MtResult};
use crate::language::Language;
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const ENDPOINT_ENV: &str = "MARATHI_MT_ENDPOINT";
pub const API_TOKEN_ENV: &str = "MARATHI_MT_API_TOKEN";
pub const MODEL_FAMILY_ENV: &str = "MARATHI_MT_MODEL_FAMILY";

/// Which pretrained model family serves the translations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelFamily {
    MarianMt,
    #[default]
    IndicTrans2,
}

impl ModelFamily {
    /// Hub identifier of the model for `source` → `target`
    pub fn model_id(self, source: Language, target: Language) -> &'static str {
        match (self, source, target) {
            (ModelFamily::MarianMt, Language::Mr, _) => "Helsinki-NLP/opus-mt-mr-en",
            (ModelFamily::MarianMt, _, _) => "Helsinki-NLP/opus-mt-en-mr",
            (ModelFamily::IndicTrans2, Language::Mr, _) => {
                "ai4bharat/indictrans2-indic-en-dist-200M"
            }
            (ModelFamily::IndicTrans2, _, _) => "ai4bharat/indictrans2-en-indic-dist-200M",
        }
    }

    /// Model input for `text`
    ///
    /// IndicTrans2 expects `"<src_tag> <tgt_tag> <text>"`; MarianMT takes the
    /// text as is.
    pub fn prepare_input(self, text: &str, source: Language, target: Language) -> String {
        match self {
            ModelFamily::MarianMt => text.to_string(),
            ModelFamily::IndicTrans2 => format!(
                "{} {} {}",
                source.flores_tag(),
                target.flores_tag(),
                text
            ),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::MarianMt => f.write_str("marian"),
            ModelFamily::IndicTrans2 => f.write_str("indictrans2"),
        }
    }
}

impl FromStr for ModelFamily {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marian" | "marianmt" => Ok(ModelFamily::MarianMt),
            "indictrans2" | "indictrans" => Ok(ModelFamily::IndicTrans2),
            other => Err(MtError::ConfigError(format!(
                "Unknown model family '{}' (expected 'marian' or 'indictrans2')",
                other
            ))),
        }
    }
}

/// Translation backend backed by a remote inference server
#[derive(Clone)]
pub struct InferenceEndpointProvider {
    /// Server base URL, without trailing slash
    endpoint: String,
    /// Optional bearer token
    api_token: Option<String>,
    family: ModelFamily,
    client: reqwest::Client,
}

impl InferenceEndpointProvider {
    /// Maximum characters per input string
    const MAX_CHARS_PER_STRING: usize = 5_000;

    /// Generation length cap passed to the model
    const MAX_LENGTH: usize = 512;

    /// Budget for the `/health` reachability check
    const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        family: ModelFamily,
    ) -> MtResult<Self> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(MtError::ConfigError(
                "Inference endpoint cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            family,
            client,
        })
    }

    /// Create a provider from `MARATHI_MT_ENDPOINT`, `MARATHI_MT_API_TOKEN`
    /// and `MARATHI_MT_MODEL_FAMILY`
    pub fn from_env() -> MtResult<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", ENDPOINT_ENV))
        })?;
        let family = match std::env::var(MODEL_FAMILY_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => ModelFamily::default(),
        };

        Self::new(endpoint, std::env::var(API_TOKEN_ENV).ok(), family)
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Whether the model for `source` → `target` answers at all
    ///
    /// Any response short of a server error counts: the model route only
    /// accepts POST, so a 405 still proves the model is being served. A
    /// 503 is what inference servers return while a model is loading.
    async fn model_reachable(&self, source: Language, target: Language) -> bool {
        let url = self.model_url(source, target);
        let mut request = self.client.get(&url).timeout(Self::READINESS_TIMEOUT);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_server_error() => {
                warn!("Model {} not ready ({})", url, response.status());
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!("Model {} unreachable: {}", url, e);
                false
            }
        }
    }

    fn model_url(&self, source: Language, target: Language) -> String {
        format!(
            "{}/models/{}",
            self.endpoint,
            self.family.model_id(source, target)
        )
    }
}

/// Pull the generated text out of an inference response
///
/// Servers answer with either a single object or a list of objects whose
/// text lives under `translation_text`, `generated_text` or `text`.
fn extract_translation(json: &Value) -> MtResult<String> {
    let item = match json {
        Value::Array(items) => items.first().ok_or_else(|| {
            MtError::TranslationError("Invalid response: empty result list".to_string())
        })?,
        other => other,
    };

    ["translation_text", "generated_text", "text"]
        .iter()
        .find_map(|key| item[key].as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            MtError::TranslationError(
                "Invalid response: missing 'translation_text' field".to_string(),
            )
        })
}

impl fmt::Debug for InferenceEndpointProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceEndpointProvider")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("family", &self.family)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for InferenceEndpointProvider {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> MtResult<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::TranslationError(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let url = self.model_url(source, target);
        let body = json!({
            "inputs": self.family.prepare_input(text, source, target),
            "parameters": { "max_length": Self::MAX_LENGTH }
        });
        debug!("POST {} ({} chars)", url, text.chars().count());

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("Inference client error ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!(
                    "Inference server error ({}): {}",
                    status, error_text
                ))
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse inference response: {}", e))
        })?;

        extract_translation(&json)
    }

    fn provider_name(&self) -> &str {
        match self.family {
            ModelFamily::MarianMt => "MarianMT",
            ModelFamily::IndicTrans2 => "IndicTrans2",
        }
    }

    fn model_name(&self, source: Language, target: Language) -> String {
        self.family.model_id(source, target).to_string()
    }

    fn device(&self) -> &str {
        "remote"
    }

    async fn is_ready(&self) -> bool {
        for source in Language::ALL {
            for target in source.targets() {
                if !self.model_reachable(source, target).await {
                    return false;
                }
            }
        }
        true
    }
}
