//! Compile filters for a document store or a SQL database

use super::{CliError, condition_to_json};
use crate::Filtex;

/// Output of the compile command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    #[default]
    Relational,
    Document,
}

/// Options for the compile command
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// The filter expression
    pub expression: String,
    pub target: Target,
    /// Number of the first relational placeholder
    pub start: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            expression: String::new(),
            target: Target::default(),
            start: 1,
        }
    }
}

/// Compile a filter; relational output is `{"condition", "args"}`.
pub fn execute_compile(
    filtex: &Filtex,
    options: &CompileOptions,
) -> Result<serde_json::Value, CliError> {
    match options.target {
        Target::Document => Ok(filtex.to_document(&options.expression)?),
        Target::Relational => {
            let condition = filtex.to_relational_from(&options.expression, options.start)?;
            Ok(condition_to_json(&condition))
        }
    }
}
