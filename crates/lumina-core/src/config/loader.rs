//! Config loader — reads `~/.lumina/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.lumina/config.json`
//! 3. Plain provider key variables (`DEEPSEEK_API_KEY`, `GEMINI_API_KEY`, …)
//! 4. Environment variables `LUMINA_<SECTION>__<FIELD>` (override everything)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Provider ids paired with the plain env var that carries their key.
const PROVIDER_KEY_VARS: &[(&str, &str)] = &[
    ("deepseek", "DEEPSEEK_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
    ("huggingface", "HUGGINGFACE_API_KEY"),
    ("mistral", "MISTRAL_API_KEY"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `DEEPSEEK_API_KEY`, `GEMINI_API_KEY`, `HUGGINGFACE_API_KEY`, `MISTRAL_API_KEY`
/// - `LUMINA_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `LUMINA_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `LUMINA_SERVER__HOST` → `server.host`
/// - `LUMINA_SERVER__PORT` → `server.port`
/// - `LUMINA_DISPATCH__TIMEOUT_SECS` → `dispatch.timeout_secs`
/// - `LUMINA_DISPATCH__PRIORITY` → `dispatch.priority` (comma-separated ids)
fn apply_env_overrides(mut config: Config) -> Config {
    for (name, plain_var) in PROVIDER_KEY_VARS {
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            apply_provider_env(provider, name, plain_var);
        }
    }

    if let Ok(val) = std::env::var("LUMINA_SERVER__HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("LUMINA_SERVER__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!(value = %val, "ignoring invalid LUMINA_SERVER__PORT"),
        }
    }

    if let Ok(val) = std::env::var("LUMINA_DISPATCH__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) if n > 0 => config.dispatch.timeout_secs = n,
            _ => warn!(value = %val, "ignoring invalid LUMINA_DISPATCH__TIMEOUT_SECS"),
        }
    }
    if let Ok(val) = std::env::var("LUMINA_DISPATCH__PRIORITY") {
        config.dispatch.priority = parse_priority(&val);
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str, plain_var: &str) {
    if let Ok(val) = std::env::var(plain_var) {
        if !val.trim().is_empty() {
            provider.api_key = val;
        }
    }

    let upper = name.to_uppercase();
    if let Ok(val) = std::env::var(format!("LUMINA_PROVIDERS__{upper}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("LUMINA_PROVIDERS__{upper}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

/// Split a comma-separated provider list, dropping blanks.
fn parse_priority(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.dispatch.timeout_secs, 30);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "server": { "port": 8080 },
            "dispatch": { "timeoutSecs": 10 }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.dispatch.timeout_secs, 10);
        // Default preserved
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert!(!config.providers.gemini.is_configured());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.providers.mistral.api_key = "ms-test".to_string();
        config.dispatch.priority = vec!["mistral".to_string(), "gemini".to_string()];

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.providers.mistral.api_key, "ms-test");
        assert_eq!(reloaded.dispatch.priority, vec!["mistral", "gemini"]);
    }

    #[test]
    fn test_full_config_with_providers() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "deepseek": { "apiKey": "ds-123" },
                "gemini": { "apiKey": "g-456", "apiBase": "https://proxy.example/v1" }
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert!(config.providers.deepseek.is_configured());
        assert!(config.providers.gemini.is_configured());
        assert_eq!(
            config.providers.gemini.api_base.as_deref(),
            Some("https://proxy.example/v1")
        );
        assert!(!config.providers.mistral.is_configured());
        assert!(!config.providers.huggingface.is_configured());
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(
            parse_priority(" Gemini, ,mistral ,deepseek"),
            vec!["gemini", "mistral", "deepseek"]
        );
        assert!(parse_priority("").is_empty());
    }

    // Env-mutating tests touch distinct variables so they can run in parallel.

    #[test]
    fn test_env_override_plain_key() {
        std::env::set_var("MISTRAL_API_KEY", "ms-env-key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.mistral.api_key, "ms-env-key");
        std::env::remove_var("MISTRAL_API_KEY");
    }

    #[test]
    fn test_env_override_prefixed_key_wins() {
        std::env::set_var("DEEPSEEK_API_KEY", "plain");
        std::env::set_var("LUMINA_PROVIDERS__DEEPSEEK__API_KEY", "prefixed");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.deepseek.api_key, "prefixed");
        std::env::remove_var("DEEPSEEK_API_KEY");
        std::env::remove_var("LUMINA_PROVIDERS__DEEPSEEK__API_KEY");
    }

    #[test]
    fn test_env_override_api_base() {
        std::env::set_var("LUMINA_PROVIDERS__HUGGINGFACE__API_BASE", "http://127.0.0.1:9");
        let config = apply_env_overrides(Config::default());
        assert_eq!(
            config.providers.huggingface.api_base.as_deref(),
            Some("http://127.0.0.1:9")
        );
        std::env::remove_var("LUMINA_PROVIDERS__HUGGINGFACE__API_BASE");
    }

    #[test]
    fn test_env_override_server_port() {
        std::env::set_var("LUMINA_SERVER__PORT", "9999");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.server.port, 9999);
        std::env::remove_var("LUMINA_SERVER__PORT");
    }

    #[test]
    fn test_env_override_priority() {
        std::env::set_var("LUMINA_DISPATCH__PRIORITY", "gemini,deepseek");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.dispatch.priority, vec!["gemini", "deepseek"]);
        std::env::remove_var("LUMINA_DISPATCH__PRIORITY");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["dispatch"].get("timeoutSecs").is_some());
        assert!(raw["dispatch"].get("timeout_secs").is_none());
        assert!(raw["providers"]["gemini"].get("apiKey").is_some());
    }
}
