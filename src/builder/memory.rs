use std::{cmp::Ordering, fmt};

use tracing::trace;

use crate::{
    ast::{Expression, FieldType, Logic, Operator},
    builder::{BuildError, Builder, Leaf, Operand, known_logic, leaf},
    coerce,
    value::{Record, Value},
};

type Test = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// A compiled filter evaluated against in-memory records.
///
/// ```
/// use filtex::{Expression, FieldType, Operator, Record, Value};
/// use filtex::builder::{Builder, MemoryBuilder};
///
/// let leaf = Expression::operator(FieldType::String, "name", Operator::Equal, "FILTEX");
/// let predicate = MemoryBuilder::new().build(Some(&leaf)).unwrap();
///
/// let mut record = Record::new();
/// record.insert("name".into(), Value::from("filtex"));
/// assert!(predicate.matches(&record));
/// ```
pub struct Predicate {
    test: Test,
}

impl Predicate {
    fn new(test: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        Predicate {
            test: Box::new(test),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        (self.test)(record)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// Builds [`Predicate`]s.
///
/// Record values are converted to the field type on every evaluation; a
/// value that cannot be converted does not match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBuilder;

impl MemoryBuilder {
    pub fn new() -> Self {
        MemoryBuilder
    }

    fn compile(&self, expression: &Expression) -> Result<Predicate, BuildError> {
        match expression {
            Expression::Logic { logic, expressions } => {
                let children = expressions
                    .iter()
                    .map(|e| self.compile(e))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(match known_logic(*logic)? {
                    Logic::Or => Predicate::new(move |r| children.iter().any(|c| c.matches(r))),
                    _ => Predicate::new(move |r| children.iter().all(|c| c.matches(r))),
                })
            }
            Expression::Operator {
                field_type,
                field,
                operator,
                value,
            } => compile_leaf(leaf(*field_type, field, *operator, value)?),
        }
    }
}

impl Builder for MemoryBuilder {
    type Output = Predicate;

    fn build(&self, expression: Option<&Expression>) -> Result<Predicate, BuildError> {
        let expression = expression
            .ok_or_else(|| BuildError::CouldNotBeBuilt("no expression to build".into()))?;
        self.compile(expression)
    }
}

fn compile_leaf(leaf: Leaf<'_>) -> Result<Predicate, BuildError> {
    let Leaf {
        field_type,
        field,
        operator,
        operand,
    } = leaf;
    let field = field.to_string();
    let base = field_type.base();

    if let Operand::None = operand {
        let blank = move |r: &Record| is_blank(r.get(&field), field_type);
        return Ok(match operator {
            Operator::NotBlank => Predicate::new(move |r| !blank(r)),
            _ => Predicate::new(blank),
        });
    }

    let expected = match operand {
        Operand::Single(v) => vec![v],
        Operand::List(values) => values,
        Operand::None => Vec::new(),
    };

    let negated = matches!(
        operator,
        Operator::NotEqual
            | Operator::NotIn
            | Operator::NotContain
            | Operator::NotStartWith
            | Operator::NotEndWith
    );

    // None when the record has no usable value; that never matches
    let test = move |r: &Record| -> Option<bool> {
        let actual = r.get(&field).filter(|v| !v.is_null())?;
        let actual = match coerce::coerce(actual, field_type) {
            Ok(v) => v,
            Err(e) => {
                trace!(field = %field, error = %e, "record value does not convert");
                return None;
            }
        };

        if let Value::Array(items) = &actual {
            return Some(items.iter().any(|item| equals(item, &expected[0], base)));
        }

        Some(match operator {
            Operator::Equal | Operator::NotEqual => equals(&actual, &expected[0], base),
            Operator::In | Operator::NotIn => expected.iter().any(|e| equals(&actual, e, base)),
            Operator::GreaterThan => compare(&actual, &expected[0]) == Some(Ordering::Greater),
            Operator::GreaterThanOrEqual => matches!(
                compare(&actual, &expected[0]),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::LessThan => compare(&actual, &expected[0]) == Some(Ordering::Less),
            Operator::LessThanOrEqual => matches!(
                compare(&actual, &expected[0]),
                Some(Ordering::Less | Ordering::Equal)
            ),
            _ => text(&actual, &expected[0], operator),
        })
    };

    Ok(Predicate::new(move |r| test(r).is_some_and(|matched| matched != negated)))
}

fn is_blank(value: Option<&Value>, field_type: FieldType) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) if !field_type.is_array() => s.is_empty(),
        Some(_) => false,
    }
}

fn equals(actual: &Value, expected: &Value, base: FieldType) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(e)) if base == FieldType::String => {
            a.to_lowercase() == e.to_lowercase()
        }
        _ => compare(actual, expected) == Some(Ordering::Equal),
    }
}

fn compare(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(e)) => a.partial_cmp(e),
        (Value::Boolean(a), Value::Boolean(e)) => Some(a.cmp(e)),
        (Value::Date(a), Value::Date(e)) => Some(a.cmp(e)),
        (Value::Time(a), Value::Time(e)) => Some(a.cmp(e)),
        (Value::DateTime(a), Value::DateTime(e)) => Some(a.cmp(e)),
        (Value::String(a), Value::String(e)) => Some(a.cmp(e)),
        _ => None,
    }
}

/// Case-insensitive substring tests; negations are applied by the caller.
fn text(actual: &Value, expected: &Value, operator: Operator) -> bool {
    let (Value::String(actual), Value::String(expected)) = (actual, expected) else {
        return false;
    };
    let actual = actual.to_lowercase();
    let expected = expected.to_lowercase();

    match operator {
        Operator::Contain | Operator::NotContain => actual.contains(&expected),
        Operator::StartWith | Operator::NotStartWith => actual.starts_with(&expected),
        Operator::EndWith | Operator::NotEndWith => actual.ends_with(&expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_field_never_matches_comparisons() {
        let expr = Expression::operator(FieldType::Number, "age", Operator::NotEqual, 3);
        let predicate = MemoryBuilder::new().build(Some(&expr)).unwrap();
        assert!(!predicate.matches(&Record::new()));
        assert!(!predicate.matches(&record(&[("age", Value::Null)])));
        assert!(predicate.matches(&record(&[("age", Value::from(4))])));

        let expr = Expression::operator(FieldType::Number, "age", Operator::Equal, 3);
        let predicate = MemoryBuilder::new().build(Some(&expr)).unwrap();
        assert!(!predicate.matches(&Record::new()));
    }

    #[test]
    fn test_unconvertible_record_value() {
        let expr = Expression::operator(FieldType::Number, "age", Operator::GreaterThan, 3);
        let predicate = MemoryBuilder::new().build(Some(&expr)).unwrap();
        assert!(!predicate.matches(&record(&[("age", Value::from("old"))])));
        assert!(predicate.matches(&record(&[("age", Value::from("4"))])));

        let expr = Expression::operator(FieldType::Number, "age", Operator::NotIn, vec![1, 2]);
        let predicate = MemoryBuilder::new().build(Some(&expr)).unwrap();
        assert!(!predicate.matches(&record(&[("age", Value::from("old"))])));
        assert!(predicate.matches(&record(&[("age", Value::from(3))])));
    }
}
