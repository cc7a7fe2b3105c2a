//! Error types for provider dispatch.
//!
//! [`AttemptFailure`] describes why a single provider attempt did not
//! produce an answer. It is recorded and the chain moves on.
//! [`DispatchError`] is what callers of the dispatcher actually see.

use thiserror::Error;

/// Why one provider attempt failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// No API key configured and the provider needs one.
    #[error("missing API key")]
    MissingCredential,

    /// Network failure, timeout, or an unusable endpoint URL.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// 2xx response, but no answer text could be extracted.
    #[error("unparsable response: {0}")]
    UnparsableResponse(String),

    /// 2xx response with an answer slot whose text is blank.
    #[error("empty answer")]
    EmptyAnswer,
}

impl AttemptFailure {
    /// Short machine-friendly label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptFailure::MissingCredential => "missing_credential",
            AttemptFailure::Transport(_) => "transport",
            AttemptFailure::HttpStatus { .. } => "http_status",
            AttemptFailure::UnparsableResponse(_) => "unparsable_response",
            AttemptFailure::EmptyAnswer => "empty_answer",
        }
    }

    /// Whether the provider was actually contacted.
    pub fn reached_network(&self) -> bool {
        !matches!(self, AttemptFailure::MissingCredential)
    }
}

/// A failed attempt against a named provider.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    pub provider_id: &'static str,
    pub provider_name: &'static str,
    pub reason: AttemptFailure,
}

impl std::fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider_name, self.reason)
    }
}

/// Errors surfaced to callers of the dispatcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The request was rejected before any provider was tried.
    #[error("{0}")]
    InvalidRequest(String),

    /// A provider id that is not in the registry.
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    /// Every provider in the chain failed.
    #[error("All AI providers failed ({})", summarize(.attempts))]
    AllProvidersFailed {
        attempts: Vec<FailedAttempt>,
        available_providers: Vec<String>,
    },

    /// A single-provider request failed.
    #[error("{provider}: {reason}")]
    ProviderFailed {
        provider: &'static str,
        reason: AttemptFailure,
    },
}

fn summarize(attempts: &[FailedAttempt]) -> String {
    if attempts.is_empty() {
        return "no providers configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
