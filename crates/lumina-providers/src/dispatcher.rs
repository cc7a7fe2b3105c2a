//! Dispatcher — ask providers in priority order until one answers.
//!
//! Each call walks the chain from the top: a provider without a key is
//! skipped without touching the network, every other provider gets exactly
//! one request, and the first usable answer ends the walk. Attempts are
//! sequential; nothing is remembered between calls.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use lumina_core::config::{ProviderConfig, ProvidersConfig};
use lumina_core::language;
use lumina_core::utils::truncate_string;

use crate::error::{AttemptFailure, DispatchError, FailedAttempt, Result};
use crate::registry::{self, ProviderDescriptor, PROVIDERS};
use crate::transport::{ProviderRequest, Transport, TransportResponse};

/// Longest upstream error body written to the debug log.
const MAX_ERROR_BODY_CHARS: usize = 300;

// ─────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────

/// A successful answer and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    pub text: String,
    pub provider_id: &'static str,
    pub provider_name: &'static str,
    pub quota_description: &'static str,
}

/// Result of trying one provider.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    Success {
        text: String,
        provider_id: &'static str,
    },
    Failure {
        provider_id: &'static str,
        reason: AttemptFailure,
    },
}

/// Registry metadata plus whether a key is configured.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub multilingual: bool,
    pub quota: &'static str,
    pub configured: bool,
    pub key_optional: bool,
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Multi-provider failover dispatcher.
///
/// Holds only read-only state, so one instance can be shared (`Arc`)
/// across any number of concurrent requests.
pub struct Dispatcher {
    providers: ProvidersConfig,
    chain: Vec<&'static ProviderDescriptor>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("chain", &self.chain.iter().map(|p| p.id).collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher over every registered provider, in registry order.
    ///
    /// # Arguments
    /// * `providers` — API keys and endpoint overrides
    /// * `transport` — how requests reach the network
    pub fn new(providers: ProvidersConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            providers,
            chain: PROVIDERS.iter().collect(),
            transport,
        }
    }

    /// Replace the chain with the given provider ids, in that order.
    ///
    /// An empty list keeps the registry order. Repeated ids are tried once.
    pub fn with_priority<S: AsRef<str>>(mut self, ids: &[S]) -> Result<Self> {
        if ids.is_empty() {
            return Ok(self);
        }

        let mut chain: Vec<&'static ProviderDescriptor> = Vec::with_capacity(ids.len());
        for id in ids {
            let provider = registry::get(id.as_ref())?;
            if chain.iter().any(|p| p.id == provider.id) {
                warn!(provider = provider.id, "duplicate id in priority list, ignoring");
                continue;
            }
            chain.push(provider);
        }

        self.chain = chain;
        Ok(self)
    }

    /// Providers in the order they will be tried.
    pub fn chain(&self) -> &[&'static ProviderDescriptor] {
        &self.chain
    }

    /// Status of every provider in the chain.
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.chain
            .iter()
            .map(|p| ProviderStatus {
                id: p.id,
                name: p.display_name,
                multilingual: p.supports_multilingual,
                quota: p.quota_description,
                configured: self.config_for(p).is_configured(),
                key_optional: p.key_optional,
            })
            .collect()
    }

    /// Answer a question with the first provider that succeeds.
    ///
    /// Fails with `InvalidRequest` for a blank question (no provider is
    /// contacted) and with `AllProvidersFailed` when the chain is exhausted.
    pub async fn answer(&self, question: &str, language: &str) -> Result<Answer> {
        let question = validate_question(question)?;
        let system_prompt = language::system_prompt_for(language);

        debug!(
            language = language,
            chain = self.chain.len(),
            chars = question.chars().count(),
            "dispatching question"
        );

        let mut failures = Vec::new();
        for &provider in &self.chain {
            match self.attempt(provider, question, system_prompt).await {
                AttemptOutcome::Success { text, .. } => {
                    info!(
                        provider = provider.id,
                        failed_before = failures.len(),
                        "answer received"
                    );
                    return Ok(answer_from(provider, text));
                }
                AttemptOutcome::Failure { reason, .. } => failures.push(FailedAttempt {
                    provider_id: provider.id,
                    provider_name: provider.display_name,
                    reason,
                }),
            }
        }

        warn!(attempts = failures.len(), "all providers failed");
        Err(DispatchError::AllProvidersFailed {
            attempts: failures,
            available_providers: registry::display_names(),
        })
    }

    /// Answer a question with one specific provider, no failover.
    pub async fn answer_with(&self, provider_id: &str, question: &str, language: &str) -> Result<Answer> {
        let provider = registry::get(provider_id)?;
        let question = validate_question(question)?;
        let system_prompt = language::system_prompt_for(language);

        match self.attempt(provider, question, system_prompt).await {
            AttemptOutcome::Success { text, .. } => Ok(answer_from(provider, text)),
            AttemptOutcome::Failure { reason, .. } => Err(DispatchError::ProviderFailed {
                provider: provider.display_name,
                reason,
            }),
        }
    }

    /// Try a single provider once.
    async fn attempt(
        &self,
        provider: &'static ProviderDescriptor,
        question: &str,
        system_prompt: &str,
    ) -> AttemptOutcome {
        let started = Instant::now();
        let outcome = match self.try_provider(provider, question, system_prompt).await {
            Ok(text) => AttemptOutcome::Success {
                text,
                provider_id: provider.id,
            },
            Err(reason) => AttemptOutcome::Failure {
                provider_id: provider.id,
                reason,
            },
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            AttemptOutcome::Success { text, .. } => debug!(
                provider = provider.id,
                elapsed_ms,
                chars = text.chars().count(),
                "provider succeeded"
            ),
            AttemptOutcome::Failure {
                reason: AttemptFailure::MissingCredential,
                ..
            } => debug!(provider = provider.id, env_key = provider.env_key, "no API key, skipping"),
            AttemptOutcome::Failure { reason, .. } => warn!(
                provider = provider.id,
                kind = reason.kind(),
                elapsed_ms,
                error = %reason,
                "provider failed"
            ),
        }

        outcome
    }

    async fn try_provider(
        &self,
        provider: &'static ProviderDescriptor,
        question: &str,
        system_prompt: &str,
    ) -> std::result::Result<String, AttemptFailure> {
        let config = self.config_for(provider);
        let api_key = config.key();
        if api_key.is_none() && !provider.key_optional {
            return Err(AttemptFailure::MissingCredential);
        }

        let request = ProviderRequest {
            url: provider.request_url(provider.resolve_endpoint(config), api_key)?,
            headers: provider.build_headers(api_key),
            body: provider.build_request_body(question, system_prompt),
        };

        let response = self
            .transport
            .post_json(&request)
            .await
            .map_err(AttemptFailure::Transport)?;

        if !response.is_success() {
            return Err(AttemptFailure::HttpStatus {
                status: response.status,
                message: upstream_error_message(&response),
            });
        }

        let data: Value = serde_json::from_str(&response.body)
            .map_err(|e| AttemptFailure::UnparsableResponse(format!("invalid JSON: {e}")))?;

        match provider.parse_response(&data) {
            Some(text) => Ok(text),
            None if provider.has_blank_answer(&data) => Err(AttemptFailure::EmptyAnswer),
            None => Err(AttemptFailure::UnparsableResponse("no answer text in response".into())),
        }
    }

    fn config_for(&self, provider: &ProviderDescriptor) -> &ProviderConfig {
        static UNCONFIGURED: ProviderConfig = ProviderConfig {
            api_key: String::new(),
            api_base: None,
        };
        self.providers.get_by_name(provider.id).unwrap_or(&UNCONFIGURED)
    }
}

fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::InvalidRequest("Question is required".into()));
    }
    Ok(trimmed)
}

fn answer_from(provider: &'static ProviderDescriptor, text: String) -> Answer {
    Answer {
        text,
        provider_id: provider.id,
        provider_name: provider.display_name,
        quota_description: provider.quota_description,
    }
}

/// Best human-readable reason for a non-2xx response.
///
/// Prefers the provider's own `error.message` (or a bare `error` string),
/// otherwise the status text. Raw bodies (HTML error pages and the like)
/// only go to the debug log.
fn upstream_error_message(response: &TransportResponse) -> String {
    if let Ok(data) = serde_json::from_str::<Value>(&response.body) {
        let message = data
            .pointer("/error/message")
            .or_else(|| data.get("error"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = response.body.trim();
    if !body.is_empty() {
        debug!(
            status = response.status,
            body = %truncate_string(body, MAX_ERROR_BODY_CHARS),
            "upstream error body"
        );
    }

    reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
