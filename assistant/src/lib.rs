//! netcheck assistant — natural-language front end for the diagnostics

pub mod config;
pub mod intent;
pub mod llm;
pub mod repl;
pub mod router;
