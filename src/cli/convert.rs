//! JSON <-> Filtex value conversion for command input and output

use serde_json::{Map, Value as Json, json};

use super::CliError;
use crate::{Record, Value, builder::Condition, coerce};

/// Convert a JSON object to a record.
pub fn json_to_record(object: Map<String, Json>) -> Record {
    object
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect()
}

/// Split eval input into records, keeping the original JSON of each.
///
/// Accepts a single object or an array of objects.
pub fn json_to_records(json: Json) -> Result<Vec<(Json, Record)>, CliError> {
    let items = match json {
        Json::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Json::Object(object) => Ok((Json::Object(object.clone()), json_to_record(object))),
            _ => Err(CliError::NotARecord(index)),
        })
        .collect()
}

/// Convert a Filtex value to plain JSON; dates and times become strings.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Json::from(*n as i64),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        other => coerce::to_string(other)
            .map(Json::String)
            .unwrap_or(Json::Null),
    }
}

pub fn condition_to_json(condition: &Condition) -> Json {
    json!({
        "condition": condition.condition,
        "args": condition.args.iter().map(value_to_json).collect::<Vec<_>>(),
    })
}
