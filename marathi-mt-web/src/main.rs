mod routes;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marathi_mt::{
    Dictionary, InferenceEndpointProvider, MachineTranslator, MockMode, MockTranslator,
    ModelFamily, TranslationService,
};
use routes::{AppState, router};

/// HTTP API for English ↔ Marathi translation
#[derive(Debug, Parser)]
#[command(name = "marathi-mt-web", version)]
struct Settings {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Phrase dictionary JSON; a missing file means an empty dictionary
    #[arg(long, env = "MARATHI_MT_DICTIONARY", default_value = "data/dictionary.json")]
    dictionary: PathBuf,

    /// Model family served by the endpoint: indictrans2 or marian
    #[arg(long, env = "MARATHI_MT_MODEL_FAMILY", default_value = "indictrans2")]
    model_family: String,

    /// Base URL of the inference server
    #[arg(long, env = "MARATHI_MT_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "MARATHI_MT_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Serve with an echo backend instead of a model
    #[arg(long)]
    mock: bool,
}

impl Settings {
    fn translator(&self) -> Result<Arc<dyn MachineTranslator>, Box<dyn std::error::Error>> {
        if self.mock {
            warn!("Running with the mock backend: text is echoed untranslated");
            return Ok(Arc::new(MockTranslator::new(MockMode::NoOp)));
        }

        let endpoint = self.endpoint.clone().ok_or(
            "No inference endpoint configured (set MARATHI_MT_ENDPOINT or pass --mock)",
        )?;
        let family: ModelFamily = self.model_family.parse()?;
        let provider = InferenceEndpointProvider::new(endpoint, self.api_token.clone(), family)
            .map_err(|e| format!("Failed to initialize translator: {}", e))?;
        Ok(Arc::new(provider))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::parse();

    let service = TranslationService::new(settings.translator()?)
        .with_dictionary(Dictionary::load_or_empty(&settings.dictionary));
    let health = service.health().await;
    info!(
        "Model {} on {} ({} dictionary entries)",
        health.model, health.device, health.dictionary_entries
    );
    if !health.model_loaded {
        warn!("Backend not ready yet; /health will answer 503 until it is");
    }

    let app = router(AppState {
        service: Arc::new(service),
    });

    let address = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server running at http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
