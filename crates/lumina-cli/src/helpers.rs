//! Shared CLI helpers — answer printing, banner, progress placeholder.

use colored::Colorize;

use lumina_providers::{Answer, DispatchError};

/// Print an answer to stdout.
pub fn print_answer(answer: &Answer) {
    println!();
    println!(
        "{}  {}",
        "✨ Lumina".cyan().bold(),
        format!("via {}", answer.provider_name).dimmed()
    );
    if answer.text.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{}", answer.text);
    }
    println!();
}

/// Print a dispatch error, listing each provider's failure when available.
pub fn print_error(err: &DispatchError) {
    match err {
        DispatchError::AllProvidersFailed { attempts, .. } => {
            eprintln!();
            eprintln!("{}", "❌ All AI providers failed".red().bold());
            for attempt in attempts {
                eprintln!(
                    "   {:<18} {}",
                    attempt.provider_name,
                    attempt.reason.to_string().dimmed()
                );
            }
            eprintln!();
        }
        other => eprintln!("\n❌ Error: {other}\n"),
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner(language: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "✨ Lumina".cyan().bold(), version.dimmed());
    println!(
        "{}",
        format!("Answering in '{language}'. Type a question, \"/lang <code>\" to switch, or \"exit\" to quit.")
            .dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
