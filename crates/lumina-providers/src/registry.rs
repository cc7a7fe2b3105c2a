//! Provider registry — static descriptors for every supported LLM backend.
//!
//! [`PROVIDERS`] is both the registry and the default failover order: the
//! dispatcher walks it top to bottom. Each [`ProviderDescriptor`] knows how
//! to build the headers, URL and JSON body for its API and how to pull the
//! answer text back out. Wire-format differences live in [`ProviderKind`].

use serde_json::{json, Value};

use lumina_core::config::ProviderConfig;

use crate::error::{AttemptFailure, DispatchError};

/// Header name/value pairs for one request.
pub type HeaderList = Vec<(&'static str, String)>;

// ─────────────────────────────────────────────
// ProviderDescriptor — static metadata for one provider
// ─────────────────────────────────────────────

/// How the API key reaches the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>` header.
    Bearer,
    /// `?key=<key>` appended to the endpoint URL.
    QueryKey,
}

/// Request/response shape of a provider API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    DeepSeek,
    Gemini,
    HuggingFace,
    Mistral,
}

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Internal id (e.g. `"gemini"`). Also the key under `providers` in the config.
    pub id: &'static str,
    /// Human-readable name for logs and API responses. E.g. `"DeepSeek V3"`.
    pub display_name: &'static str,
    /// Default endpoint URL. `ProviderConfig::api_base` overrides it.
    pub endpoint: &'static str,
    /// Environment variable conventionally holding the API key.
    pub env_key: &'static str,
    pub auth: AuthStyle,
    /// Whether requests may be sent without a key (anonymous free tier).
    pub key_optional: bool,
    pub kind: ProviderKind,
    /// Informational only; not used for selection.
    pub supports_multilingual: bool,
    /// Informational only.
    pub quota_description: &'static str,
}

// ─────────────────────────────────────────────
// All providers (in failover priority order)
// ─────────────────────────────────────────────

/// Complete list of supported providers, in default priority order.
pub static PROVIDERS: &[ProviderDescriptor] = &[
    // 1. DeepSeek — generous free tier, tried first
    ProviderDescriptor {
        id: "deepseek",
        display_name: "DeepSeek V3",
        endpoint: "https://api.deepseek.com/chat/completions",
        env_key: "DEEPSEEK_API_KEY",
        auth: AuthStyle::Bearer,
        key_optional: false,
        kind: ProviderKind::DeepSeek,
        supports_multilingual: true,
        quota_description: "Very generous free tier",
    },
    // 2. Gemini — key travels in the query string
    ProviderDescriptor {
        id: "gemini",
        display_name: "Gemini 1.5 Flash",
        endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent",
        env_key: "GEMINI_API_KEY",
        auth: AuthStyle::QueryKey,
        key_optional: false,
        kind: ProviderKind::Gemini,
        supports_multilingual: true,
        quota_description: "15 RPM free, 2000 RPM paid",
    },
    // 3. Hugging Face — works anonymously on the public inference tier
    ProviderDescriptor {
        id: "huggingface",
        display_name: "Hugging Face",
        endpoint: "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large",
        env_key: "HUGGINGFACE_API_KEY",
        auth: AuthStyle::Bearer,
        key_optional: true,
        kind: ProviderKind::HuggingFace,
        supports_multilingual: true,
        quota_description: "Unlimited free usage",
    },
    // 4. Mistral
    ProviderDescriptor {
        id: "mistral",
        display_name: "Mistral AI",
        endpoint: "https://api.mistral.ai/v1/chat/completions",
        env_key: "MISTRAL_API_KEY",
        auth: AuthStyle::Bearer,
        key_optional: false,
        kind: ProviderKind::Mistral,
        supports_multilingual: true,
        quota_description: "High free quotas",
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider descriptor by id.
pub fn find_by_name(id: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// Like [`find_by_name`], but an unknown id is an error.
pub fn get(id: &str) -> Result<&'static ProviderDescriptor, DispatchError> {
    find_by_name(id).ok_or_else(|| DispatchError::UnknownProvider(id.to_string()))
}

/// Display names of every registered provider, in priority order.
pub fn display_names() -> Vec<String> {
    PROVIDERS.iter().map(|p| p.display_name.to_string()).collect()
}

// ─────────────────────────────────────────────
// Request building / response parsing
// ─────────────────────────────────────────────

impl ProviderDescriptor {
    /// Endpoint to call: the configured override, else the built-in default.
    pub fn resolve_endpoint<'a>(&'a self, config: &'a ProviderConfig) -> &'a str {
        config
            .api_base
            .as_deref()
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .unwrap_or(self.endpoint)
    }

    /// Full request URL, with the key appended for query-string auth.
    pub fn request_url(&self, endpoint: &str, api_key: Option<&str>) -> Result<String, AttemptFailure> {
        let mut url = reqwest::Url::parse(endpoint)
            .map_err(|e| AttemptFailure::Transport(format!("invalid endpoint '{endpoint}': {e}")))?;

        if let (AuthStyle::QueryKey, Some(key)) = (self.auth, api_key) {
            url.query_pairs_mut().append_pair("key", key);
        }

        Ok(url.to_string())
    }

    /// Request headers. The key is only sent here for bearer-auth providers.
    pub fn build_headers(&self, api_key: Option<&str>) -> HeaderList {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let (AuthStyle::Bearer, Some(key)) = (self.auth, api_key) {
            headers.push(("Authorization", format!("Bearer {key}")));
        }
        headers
    }

    /// Provider-specific JSON body for a question.
    pub fn build_request_body(&self, question: &str, system_prompt: &str) -> Value {
        self.kind.build_request_body(question, system_prompt)
    }

    /// Extract the answer text, or `None` if the payload has no usable content.
    pub fn parse_response(&self, data: &Value) -> Option<String> {
        self.kind.parse_response(data)
    }

    /// Whether the payload has an answer slot whose text is blank, as
    /// opposed to having no answer slot at all.
    pub fn has_blank_answer(&self, data: &Value) -> bool {
        self.kind
            .answer_field(data)
            .is_some_and(|text| text.trim().is_empty())
    }
}

impl ProviderKind {
    /// Model name sent in the body, for chat-completions style APIs.
    fn chat_model(self) -> Option<&'static str> {
        match self {
            ProviderKind::DeepSeek => Some("deepseek-chat"),
            ProviderKind::Mistral => Some("mistral-small-latest"),
            ProviderKind::Gemini | ProviderKind::HuggingFace => None,
        }
    }

    /// Build the JSON request body.
    pub fn build_request_body(self, question: &str, system_prompt: &str) -> Value {
        match self {
            ProviderKind::DeepSeek | ProviderKind::Mistral => json!({
                "model": self.chat_model(),
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": question }
                ],
                "temperature": 0.7,
                "max_tokens": 1024
            }),
            ProviderKind::Gemini => json!({
                "contents": [{
                    "parts": [{
                        "text": format!("{system_prompt}\n\nQuestion: {question}")
                    }]
                }],
                "generationConfig": {
                    "temperature": 0.7,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 1024
                }
            }),
            ProviderKind::HuggingFace => json!({
                "inputs": format!("{system_prompt}\n\nUser: {question}\nAssistant:"),
                "parameters": {
                    "max_new_tokens": 512,
                    "temperature": 0.7,
                    "do_sample": true,
                    "return_full_text": false
                }
            }),
        }
    }

    /// Raw answer text, or `None` when the payload has no answer slot.
    ///
    /// A Gemini part without a `text` field reads as empty text.
    fn answer_field(self, data: &Value) -> Option<&str> {
        match self {
            ProviderKind::DeepSeek | ProviderKind::Mistral => {
                data.pointer("/choices/0/message/content")?.as_str()
            }
            ProviderKind::Gemini => {
                let part = data.pointer("/candidates/0/content/parts/0")?;
                Some(part.get("text").and_then(Value::as_str).unwrap_or_default())
            }
            ProviderKind::HuggingFace => data.get(0)?.get("generated_text")?.as_str(),
        }
    }

    /// Pull the answer text out of a response payload.
    ///
    /// Never fails on unexpected shapes; blank text counts as no content.
    pub fn parse_response(self, data: &Value) -> Option<String> {
        let text = self.answer_field(data)?;
        let text = match self {
            ProviderKind::HuggingFace => text.trim(),
            _ => text,
        };

        (!text.trim().is_empty()).then(|| text.to_string())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
