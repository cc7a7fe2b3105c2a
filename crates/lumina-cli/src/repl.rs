//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! `/lang <code>` switches the answer language mid-session.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use lumina_core::Language;
use lumina_providers::Dispatcher;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// What a line of REPL input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    SwitchLanguage(Option<Language>),
    Question(&'a str),
}

/// Run the interactive REPL loop.
pub async fn run(dispatcher: Dispatcher, mut language: Language, show_logs: bool) -> Result<()> {
    helpers::print_banner(language.code());

    let mut editor = create_editor()?;

    loop {
        let prompt = format!("You [{}]: ", language.code());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        match classify(&line) {
            Input::Empty => continue,
            Input::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Input::SwitchLanguage(Some(next)) => {
                language = next;
                println!("Now answering in {} ({}).", next.name(), next.local_name());
            }
            Input::SwitchLanguage(None) => {
                eprintln!("Unsupported language. Use one of: en, hi, ta, te.");
            }
            Input::Question(question) => {
                let _ = editor.add_history_entry(line.as_str());
                debug!(language = language.code(), "asking");

                if !show_logs {
                    helpers::print_thinking();
                }
                let result = dispatcher.answer(question, language.code()).await;
                if !show_logs {
                    helpers::clear_thinking();
                }

                match result {
                    Ok(answer) => helpers::print_answer(&answer),
                    Err(e) => helpers::print_error(&e),
                }
            }
        }
    }

    save_history(&mut editor);

    Ok(())
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if is_exit_command(trimmed) {
        return Input::Exit;
    }
    let mut words = trimmed.splitn(2, char::is_whitespace);
    if words.next() == Some("/lang") {
        let code = words.next().unwrap_or_default();
        return Input::SwitchLanguage(Language::parse(code));
    }
    Input::Question(trimmed)
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    lumina_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("explain recursion"));
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("   "), Input::Empty);
        assert_eq!(classify(" /exit "), Input::Exit);
        assert_eq!(
            classify("  What is photosynthesis? "),
            Input::Question("What is photosynthesis?")
        );
    }

    #[test]
    fn test_classify_language_switch() {
        assert_eq!(classify("/lang ta"), Input::SwitchLanguage(Some(Language::Ta)));
        assert_eq!(classify("/lang HI-in"), Input::SwitchLanguage(Some(Language::Hi)));
        assert_eq!(classify("/lang fr"), Input::SwitchLanguage(None));
        assert_eq!(classify("/lang"), Input::SwitchLanguage(None));
        assert_eq!(classify("/language"), Input::Question("/language"));
    }

    #[test]
    fn test_history_path() {
        let path = history_path();
        assert!(path.ends_with("history/cli_history"));
        assert!(path.to_string_lossy().contains(".lumina"));
    }
}
