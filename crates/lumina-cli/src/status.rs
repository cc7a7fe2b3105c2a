//! `lumina status` — show configuration and provider status.
//!
//! - Shows config path, bind address, dispatch timeout
//! - Shows key status for each provider, in fallback order

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use lumina_core::config::{get_config_path, load_config};
use lumina_providers::ProviderStatus;

use crate::build_dispatcher;

/// Run the status command.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(get_config_path);
    let config = load_config(Some(&config_path));
    let dispatcher = build_dispatcher(&config)?;

    println!();
    println!("{}", "✨ Lumina Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!("  {:<18} {}", "Listen:".bold(), config.server.bind_addr());
    println!(
        "  {:<18} {}",
        "Timeout:".bold(),
        format!("{}s per provider", config.dispatch.timeout_secs).dimmed()
    );

    println!();
    println!("  {}", "Providers (fallback order):".bold());
    for (position, status) in dispatcher.provider_statuses().iter().enumerate() {
        println!(
            "    {}. {:<18} {:<24} {}",
            position + 1,
            status.name,
            key_status(status),
            status.quota.dimmed()
        );
    }

    println!();
    Ok(())
}

fn key_status(status: &ProviderStatus) -> String {
    if status.configured {
        format!("{} (key set)", "✓".green())
    } else if status.key_optional {
        format!("{}", "· anonymous".yellow())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(configured: bool, key_optional: bool) -> ProviderStatus {
        ProviderStatus {
            id: "huggingface",
            name: "Hugging Face",
            multilingual: true,
            quota: "Free inference API",
            configured,
            key_optional,
        }
    }

    #[test]
    fn test_key_status_labels() {
        assert!(key_status(&status(true, false)).contains("key set"));
        assert!(key_status(&status(false, true)).contains("anonymous"));
        assert!(key_status(&status(false, false)).contains("not configured"));
    }

    #[test]
    fn test_status_with_missing_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        run(Some(tmp.path().join("absent.json"))).unwrap();
    }
}
