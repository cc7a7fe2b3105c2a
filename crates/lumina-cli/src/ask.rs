//! Ask command — single-shot question, or hand off to the REPL.

use std::path::PathBuf;

use anyhow::{bail, Result};

use lumina_core::config::load_config;
use lumina_core::Language;

use crate::{build_dispatcher, helpers, repl};

/// Run `lumina ask`.
pub async fn run(
    config_path: Option<PathBuf>,
    question: Option<String>,
    language: &str,
    show_logs: bool,
) -> Result<()> {
    let Some(language) = Language::parse(language) else {
        bail!("unsupported language '{language}' (expected one of: en, hi, ta, te)");
    };

    let config = load_config(config_path.as_deref());
    let dispatcher = build_dispatcher(&config)?;

    let Some(question) = question else {
        return repl::run(dispatcher, language, show_logs).await;
    };

    if !show_logs {
        helpers::print_thinking();
    }
    let result = dispatcher.answer(&question, language.code()).await;
    if !show_logs {
        helpers::clear_thinking();
    }

    match result {
        Ok(answer) => {
            helpers::print_answer(&answer);
            Ok(())
        }
        Err(e) => {
            helpers::print_error(&e);
            Err(e.into())
        }
    }
}
