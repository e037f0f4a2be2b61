//! CLI support for filtex
//!
//! Provides programmatic access to the `filtex` commands so other tools
//! can embed them.

mod check;
mod compile;
mod convert;
mod docs;

pub use check::{EvalOptions, execute_check, execute_eval};
pub use compile::{CompileOptions, Target, execute_compile};
pub use convert::{condition_to_json, json_to_record, json_to_records, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Filter(#[from] crate::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Input item {0} is not a JSON object")]
    NotARecord(usize),

    #[error("Unknown category: '{0}'\nRun 'filtex docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::ConfigError> for CliError {
    fn from(e: crate::ConfigError) -> Self {
        CliError::Filter(e.into())
    }
}
