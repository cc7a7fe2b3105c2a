//! HTTP handlers for the Lumina API.
//!
//! | route | purpose |
//! |-------|---------|
//! | `POST /api/ai` | answer via the provider failover chain |
//! | `POST /api/gemini` | answer via Gemini only (legacy clients) |
//! | `GET /api/providers` | provider metadata and key status |
//! | `GET /api/languages` | supported answer languages |
//! | `GET /api/health` | liveness probe |

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use lumina_core::language::{LanguageInfo, LANGUAGES};
use lumina_providers::{AttemptFailure, DispatchError, Dispatcher, ProviderStatus};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Body of `POST /api/ai` and `POST /api/gemini`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AskRequest {
    pub question: Option<String>,
    pub language: Option<String>,
}

impl AskRequest {
    fn language(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }
}

/// Success body of `POST /api/ai`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub response: String,
    pub provider: String,
    pub quota_status: String,
}

/// Success body of `POST /api/gemini`.
#[derive(Debug, Serialize)]
pub struct GeminiResponse {
    pub response: String,
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// An error response: status plus `{ error, … }` JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match &err {
            DispatchError::InvalidRequest(msg) => ApiError::bad_request(msg.clone()),
            DispatchError::AllProvidersFailed {
                available_providers,
                ..
            } => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "error": err.to_string(),
                    "availableProviders": available_providers,
                }),
            },
            _ => ApiError::internal(err.to_string()),
        }
    }
}

/// Reply on `/api/gemini` when Gemini answers with blank text.
pub const GEMINI_EMPTY_ANSWER: &str =
    "I apologize, but I was unable to generate a response. Please try again.";

/// Message shown to legacy Gemini clients for each failure kind.
fn gemini_error_message(reason: &AttemptFailure) -> String {
    match reason {
        AttemptFailure::MissingCredential => {
            "Gemini API key not found. Please add GEMINI_API_KEY to your environment variables."
                .to_string()
        }
        AttemptFailure::HttpStatus { message, .. } => message.clone(),
        AttemptFailure::UnparsableResponse(_) | AttemptFailure::EmptyAnswer => {
            "Invalid response format from Gemini API".to_string()
        }
        AttemptFailure::Transport(e) => format!("Failed to connect to Gemini API: {e}"),
    }
}

fn require_question(req: &AskRequest) -> Result<&str, ApiError> {
    req.question
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Question is required"))
}

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

/// `POST /api/ai`
pub async fn ask_ai(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    let question = require_question(&req)?;

    match state.dispatcher.answer(question, req.language()).await {
        Ok(answer) => {
            info!(provider = answer.provider_id, language = req.language(), "answered /api/ai");
            Ok(Json(AiResponse {
                response: answer.text,
                provider: answer.provider_name.to_string(),
                quota_status: answer.quota_description.to_string(),
            }))
        }
        Err(e) => {
            error!(error = %e, "AI dispatch failed");
            Err(e.into())
        }
    }
}

/// `POST /api/gemini`
pub async fn ask_gemini(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<GeminiResponse>, ApiError> {
    let question = require_question(&req)?;

    match state.dispatcher.answer_with("gemini", question, req.language()).await {
        Ok(answer) => Ok(Json(GeminiResponse {
            response: answer.text,
        })),
        Err(DispatchError::ProviderFailed {
            reason: AttemptFailure::EmptyAnswer,
            ..
        }) => {
            warn!("Gemini returned an empty answer");
            Ok(Json(GeminiResponse {
                response: GEMINI_EMPTY_ANSWER.to_string(),
            }))
        }
        Err(DispatchError::ProviderFailed { reason, .. }) => {
            error!(error = %reason, "Gemini API error");
            Err(ApiError::internal(gemini_error_message(&reason)))
        }
        Err(e) => {
            error!(error = %e, "Gemini API error");
            Err(e.into())
        }
    }
}

/// `GET /api/providers`
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    Json(state.dispatcher.provider_statuses())
}

/// `GET /api/languages`
pub async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(LANGUAGES.iter().map(|l| l.info()).collect())
}

/// `GET /api/health`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
