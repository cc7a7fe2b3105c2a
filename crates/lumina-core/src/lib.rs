//! Lumina core — configuration, the language table, and shared helpers.
//!
//! - [`config`]: `~/.lumina/config.json` schema and loader
//! - [`language`]: supported languages and their system prompts
//! - [`utils`]: data paths and string helpers

pub mod config;
pub mod language;
pub mod utils;

pub use language::{system_prompt_for, Language, LANGUAGES};
