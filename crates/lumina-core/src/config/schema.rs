//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `ServerConfig`, `DispatchConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.lumina/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credentials and endpoint override for a single LLM provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,
    /// Custom endpoint URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Create a config holding just an API key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
        }
    }

    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// The API key, if one is set.
    pub fn key(&self) -> Option<&str> {
        self.is_configured().then_some(self.api_key.trim())
    }
}

/// All provider configurations, one per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub huggingface: ProviderConfig,
    #[serde(default)]
    pub mistral: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by id (e.g. `"gemini"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "deepseek" => Some(&self.deepseek),
            "gemini" => Some(&self.gemini),
            "huggingface" => Some(&self.huggingface),
            "mistral" => Some(&self.mistral),
            _ => None,
        }
    }

    /// Mutable counterpart of [`ProvidersConfig::get_by_name`].
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "deepseek" => Some(&mut self.deepseek),
            "gemini" => Some(&mut self.gemini),
            "huggingface" => Some(&mut self.huggingface),
            "mistral" => Some(&mut self.mistral),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP server bind address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────

/// Provider failover settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchConfig {
    /// Upper bound for a single provider attempt, in seconds.
    pub timeout_secs: u64,
    /// Provider ids in the order they should be tried.
    /// Empty means the registry's built-in order.
    pub priority: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            priority: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
