//! `lumina init` — write a default configuration file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use lumina_core::config::{get_config_path, save_config, Config};
use lumina_core::utils::get_data_path;

/// Run the init command.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", "✨ Lumina — Setup".cyan().bold());
    println!();

    let config_path = config_path.unwrap_or_else(get_config_path);
    let created = write_default_config(&config_path)?;
    println!(
        "  {} {} {}",
        "✓".green(),
        if created {
            "created config at"
        } else {
            "config already exists at"
        },
        config_path.display()
    );

    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)
        .with_context(|| format!("failed to create {}", history_dir.display()))?;

    println!();
    println!(
        "{}",
        "Add provider keys under \"providers\" in the config, or export DEEPSEEK_API_KEY, \
         GEMINI_API_KEY, HUGGINGFACE_API_KEY, MISTRAL_API_KEY."
            .dimmed()
    );
    println!();
    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a new file was written.
fn write_default_config(path: &std::path::Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
