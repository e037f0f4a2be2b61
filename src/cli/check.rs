//! Validate filters and apply them to JSON records

use tracing::debug;

use super::{CliError, json_to_records};
use crate::{Expression, Filtex};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The filter expression
    pub expression: String,
    /// JSON input string: an object or an array of objects
    pub input: Option<String>,
}

/// Validate a filter and return its expression tree.
pub fn execute_check(filtex: &Filtex, expression: &str) -> Result<Expression, CliError> {
    Ok(filtex.parse(expression)?)
}

/// Apply a filter to the input records and return those that match, as
/// a JSON array in input order.
pub fn execute_eval(filtex: &Filtex, options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let predicate = filtex.to_memory(&options.expression)?;

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str)?;

    let records = json_to_records(json)?;
    let total = records.len();
    let matching: Vec<serde_json::Value> = records
        .into_iter()
        .filter(|(_, record)| predicate.matches(record))
        .map(|(original, _)| original)
        .collect();

    debug!(total, matching = matching.len(), "evaluated records");
    Ok(serde_json::Value::Array(matching))
}
