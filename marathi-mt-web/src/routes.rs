use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use marathi_mt::{
    DetectedLanguage, HealthReport, Language, LanguageInfo, MtError, OneOrMany, SourceLanguage,
    TranslationResult, TranslationService,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub q: Option<OneOrMany<String>>,
    pub source: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectRequest {
    pub q: Option<OneOrMany<String>>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failure mapped onto an HTTP status and a JSON `{ "error": ... }` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<MtError> for ApiError {
    fn from(err: MtError) -> Self {
        match err {
            MtError::InvalidRequest(msg) => Self::bad_request(msg),
            MtError::UnsupportedLanguage(_) => Self::bad_request(format!(
                "Supported languages: {}",
                Language::codes()
                    .iter()
                    .map(|c| format!("'{}'", c))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid JSON data: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/translate", post(translate))
        .route("/detect", post(detect))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": "Marathi Translation API",
        "version": env!("CARGO_PKG_VERSION"),
        "languages": Language::codes(),
        "endpoints": {
            "translate": "/translate (POST)",
            "detect": "/detect (POST)",
            "health": "/health (GET)",
            "languages": "/languages (GET)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.service.health().await;
    let status = if report.model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

async fn languages(State(state): State<AppState>) -> Json<Vec<LanguageInfo>> {
    Json(state.service.languages())
}

/// `q` must be present and non-empty (an empty string or list counts as missing)
fn required_text(q: Option<OneOrMany<String>>) -> Result<OneOrMany<String>, ApiError> {
    match q {
        Some(OneOrMany::One(text)) if text.is_empty() => None,
        Some(q) if q.is_empty() => None,
        other => other,
    }
    .ok_or_else(|| ApiError::bad_request("Missing 'q' parameter"))
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(request) = payload?;
    let q = required_text(request.q)?;

    let (Some(source), Some(target)) = (
        request.source.filter(|s| !s.trim().is_empty()),
        request.target.filter(|t| !t.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Missing 'source' or 'target' parameter",
        ));
    };

    let source: SourceLanguage = source.parse()?;
    let target: Language = target.parse()?;

    info!(
        "Translating {} fragment(s) {:?} → {}",
        q.len(),
        source,
        target
    );
    let result = state.service.translate(&q, source, target).await?;
    Ok(Json(result))
}

async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<Vec<DetectedLanguage>>, ApiError> {
    let Json(request) = payload?;
    let q = required_text(request.q)?;
    Ok(Json(state.service.detect(q.as_slice())))
}

async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "Endpoint not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use marathi_mt::{
        Dictionary, InferenceEndpointProvider, LanguageEstimator, MachineTranslator, MockMode,
        MockTranslator, ModelFamily, MtResult,
    };
    use tower::ServiceExt;

    fn app(mode: MockMode) -> Router {
        app_with(Arc::new(MockTranslator::new(mode)))
    }

    fn app_with(translator: Arc<dyn MachineTranslator>) -> Router {
        let mut dictionary = Dictionary::new();
        dictionary
            .with_entry(Language::En, Language::Mr, "Home", "घर")
            .with_entry(Language::Mr, Language::En, "घर", "Home");

        let estimator: Arc<dyn LanguageEstimator> =
            Arc::new(|text: &str| -> MtResult<Vec<(String, f64)>> {
                if text.is_ascii() {
                    Ok(vec![("en".to_string(), 0.99)])
                } else {
                    Ok(vec![("mr".to_string(), 0.99)])
                }
            });

        let service = TranslationService::new(translator)
            .with_dictionary(dictionary)
            .with_estimator(estimator);
        router(AppState {
            service: Arc::new(service),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ========== Informational Endpoints ==========

    #[tokio::test]
    async fn test_index() {
        let (status, body) = send(app(MockMode::NoOp), get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "Marathi Translation API");
        assert_eq!(body["languages"], json!(["en", "mr"]));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(MockMode::NoOp), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["device"], "none");
        assert_eq!(body["dictionary_entries"], 2);
    }

    #[tokio::test]
    async fn test_health_unavailable_backend() {
        let app = app(MockMode::Error("model not loaded".to_string()));
        let (status, body) = send(app, get_request("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_health_unreachable_endpoint() {
        let provider =
            InferenceEndpointProvider::new("http://127.0.0.1:9", None, ModelFamily::IndicTrans2)
                .unwrap();
        let (status, body) = send(app_with(Arc::new(provider)), get_request("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["model_loaded"], false);
        assert_eq!(body["device"], "remote");
    }

    #[tokio::test]
    async fn test_languages() {
        let (status, body) = send(app(MockMode::NoOp), get_request("/languages")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "code": "en", "name": "English", "targets": ["mr"] },
                { "code": "mr", "name": "Marathi", "targets": ["en"] }
            ])
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(app(MockMode::NoOp), get_request("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
    }

    // ========== Translate ==========

    #[tokio::test]
    async fn test_translate_dictionary_hit() {
        let request = post_json(
            "/translate",
            json!({ "q": "Home", "source": "en", "target": "mr" }),
        );
        let (status, body) = send(app(MockMode::Suffix), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], "घर");
        assert_eq!(body["detectedLanguage"]["language"], "en");
        assert_eq!(body["detectedLanguage"]["confidence"].as_f64(), Some(100.0));
    }

    #[tokio::test]
    async fn test_translate_batch_preserves_shape() {
        let request = post_json(
            "/translate",
            json!({ "q": ["Home", "  ", "good"], "source": "EN", "target": "mr" }),
        );
        let (status, body) = send(app(MockMode::Suffix), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], json!(["घर", "", "good_mr"]));
    }

    #[tokio::test]
    async fn test_translate_auto_source() {
        let request = post_json(
            "/translate",
            json!({ "q": "घर", "source": "auto", "target": "en" }),
        );
        let (status, body) = send(app(MockMode::Suffix), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], "Home");
        assert_eq!(body["detectedLanguage"]["language"], "mr");
    }

    #[tokio::test]
    async fn test_translate_backend_failure_echoes_text() {
        let request = post_json(
            "/translate",
            json!({ "q": ["Good night", "Home"], "source": "en", "target": "mr" }),
        );
        let (status, body) = send(app(MockMode::Error("boom".to_string())), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], json!(["Good night", "घर"]));
    }

    // ========== Validation ==========

    async fn expect_bad_request(body: Value, message: &str) {
        let (status, response) = send(app(MockMode::Suffix), post_json("/translate", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], message);
    }

    #[tokio::test]
    async fn test_translate_missing_q() {
        expect_bad_request(
            json!({ "source": "en", "target": "mr" }),
            "Missing 'q' parameter",
        )
        .await;
        expect_bad_request(
            json!({ "q": "", "source": "en", "target": "mr" }),
            "Missing 'q' parameter",
        )
        .await;
        expect_bad_request(
            json!({ "q": [], "source": "en", "target": "mr" }),
            "Missing 'q' parameter",
        )
        .await;
    }

    #[tokio::test]
    async fn test_translate_missing_languages() {
        expect_bad_request(
            json!({ "q": "Home", "source": "en" }),
            "Missing 'source' or 'target' parameter",
        )
        .await;
        expect_bad_request(
            json!({ "q": "Home", "source": "", "target": "mr" }),
            "Missing 'source' or 'target' parameter",
        )
        .await;
    }

    #[tokio::test]
    async fn test_translate_unsupported_language() {
        expect_bad_request(
            json!({ "q": "Home", "source": "en", "target": "fr" }),
            "Supported languages: 'en', 'mr'",
        )
        .await;
    }

    #[tokio::test]
    async fn test_translate_same_languages() {
        expect_bad_request(
            json!({ "q": "Home", "source": "mr", "target": "mr" }),
            "Source and target languages must be different",
        )
        .await;
    }

    #[tokio::test]
    async fn test_translate_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(MockMode::Suffix), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON data"));
    }

    // ========== Detect ==========

    #[tokio::test]
    async fn test_detect_batch() {
        let request = post_json("/detect", json!({ "q": ["Hello", "नमस्कार"] }));
        let (status, body) = send(app(MockMode::NoOp), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["language"], "mr");
        assert_eq!(body[1]["language"], "en");
    }

    #[tokio::test]
    async fn test_detect_missing_q() {
        let (status, body) = send(app(MockMode::NoOp), post_json("/detect", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing 'q' parameter");
    }
}
