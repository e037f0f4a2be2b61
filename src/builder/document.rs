use chrono::Timelike;
use serde_json::{Map, Value as Json, json};

use crate::{
    ast::{Expression, FieldType, Logic, Operator},
    builder::{BuildError, Builder, Leaf, Operand, known_logic, leaf},
    coerce,
    value::Value,
};

/// A document-store filter (`$and`, `$or` and field-keyed clauses).
pub type Document = Json;

/// Builds document-store filters.
///
/// Text matching uses `$regex` with the `i` option and an escaped
/// pattern. Dates and date-times are written as `{"$date": rfc3339}`,
/// times of day as seconds since midnight.
///
/// ```
/// use filtex::{Expression, FieldType, Operator};
/// use filtex::builder::{Builder, DocumentBuilder};
/// use serde_json::json;
///
/// let leaf = Expression::operator(FieldType::Number, "age", Operator::GreaterThan, 18);
/// let document = DocumentBuilder::new().build(Some(&leaf)).unwrap();
/// assert_eq!(document, json!({"age": {"$gt": 18}}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder
    }

    fn compile(&self, expression: &Expression) -> Result<Json, BuildError> {
        match expression {
            Expression::Logic { logic, expressions } => {
                let logic = known_logic(*logic)?;
                let children = expressions
                    .iter()
                    .map(|e| self.compile(e))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(match (logic, children.is_empty()) {
                    (Logic::Or, true) => json!({"$nor": [{}]}),
                    (Logic::Or, false) => json!({"$or": children}),
                    (_, true) => json!({}),
                    (_, false) => json!({"$and": children}),
                })
            }
            Expression::Operator {
                field_type,
                field,
                operator,
                value,
            } => clause(leaf(*field_type, field, *operator, value)?),
        }
    }
}

impl Builder for DocumentBuilder {
    type Output = Document;

    fn build(&self, expression: Option<&Expression>) -> Result<Document, BuildError> {
        let expression = expression
            .ok_or_else(|| BuildError::CouldNotBeBuilt("no expression to build".into()))?;
        self.compile(expression)
    }
}

fn keyed(field: &str, condition: Json) -> Json {
    let mut map = Map::new();
    map.insert(field.to_string(), condition);
    Json::Object(map)
}

fn pattern(regex: String) -> Json {
    json!({"$regex": regex, "$options": "i"})
}

fn clause(leaf: Leaf<'_>) -> Result<Json, BuildError> {
    let Leaf {
        field_type,
        field,
        operator,
        operand,
    } = leaf;

    let value = match operand {
        Operand::None => return Ok(blank(field, field_type, operator)),
        Operand::List(values) => {
            let list: Vec<Json> = values.iter().map(to_json).collect();
            return Ok(membership(field, operator, list));
        }
        Operand::Single(value) => value,
    };

    if field_type.is_array() {
        let element = match &value {
            Value::String(s) => pattern(format!("^{}$", regex::escape(s))),
            other => json!({"$eq": to_json(other)}),
        };
        let matched = json!({"$elemMatch": element});
        return Ok(match operator {
            Operator::NotContain => keyed(field, json!({"$not": matched})),
            _ => keyed(field, matched),
        });
    }

    let text = || match &value {
        Value::String(s) => regex::escape(s),
        other => regex::escape(&to_json(other).to_string()),
    };

    let condition = match operator {
        Operator::Equal => json!({"$eq": to_json(&value)}),
        Operator::NotEqual => json!({"$ne": to_json(&value)}),
        Operator::GreaterThan => json!({"$gt": to_json(&value)}),
        Operator::GreaterThanOrEqual => json!({"$gte": to_json(&value)}),
        Operator::LessThan => json!({"$lt": to_json(&value)}),
        Operator::LessThanOrEqual => json!({"$lte": to_json(&value)}),
        Operator::Contain => pattern(text()),
        Operator::NotContain => json!({"$not": pattern(text())}),
        Operator::StartWith => pattern(format!("^{}", text())),
        Operator::NotStartWith => json!({"$not": pattern(format!("^{}", text()))}),
        Operator::EndWith => pattern(format!("{}$", text())),
        Operator::NotEndWith => json!({"$not": pattern(format!("{}$", text()))}),
        Operator::In | Operator::NotIn => {
            return Ok(membership(field, operator, vec![to_json(&value)]));
        }
        Operator::Blank | Operator::NotBlank | Operator::Unknown => {
            return Err(BuildError::CouldNotBeBuilt(format!(
                "operator '{}' on field '{}' takes no value",
                operator, field
            )));
        }
    };
    Ok(keyed(field, condition))
}

fn membership(field: &str, operator: Operator, list: Vec<Json>) -> Json {
    match operator {
        Operator::NotIn => keyed(field, json!({"$nin": list})),
        _ => keyed(field, json!({"$in": list})),
    }
}

fn blank(field: &str, field_type: FieldType, operator: Operator) -> Json {
    let negated = operator == Operator::NotBlank;
    match (field_type.is_array(), negated) {
        (false, false) => json!({"$or": [
            keyed(field, json!({"$exists": false})),
            keyed(field, Json::Null),
            keyed(field, json!("")),
        ]}),
        (false, true) => keyed(field, json!({"$exists": true, "$nin": [null, ""]})),
        (true, false) => json!({"$or": [
            keyed(field, json!({"$exists": false})),
            keyed(field, Json::Null),
            keyed(field, json!({"$size": 0})),
        ]}),
        (true, true) => keyed(
            field,
            json!({"$exists": true, "$ne": null, "$not": {"$size": 0}}),
        ),
    }
}

/// Document representation of a converted value.
pub(crate) fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::String(s) => Json::String(s.clone()),
        Value::Number(n) => number(*n),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Date(d) => json!({"$date": coerce::midnight(*d).to_rfc3339()}),
        Value::Time(t) => json!(t.num_seconds_from_midnight()),
        Value::DateTime(dt) => json!({"$date": dt.to_rfc3339()}),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
    }
}

/// Integral numbers are written as integers.
fn number(n: f64) -> Json {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < EXACT {
        json!(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}
