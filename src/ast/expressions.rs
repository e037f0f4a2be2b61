use crate::{
    ast::{FieldType, Logic, Operator},
    value::Value,
};

/// Semantic expression tree produced by the parser and consumed by the
/// builders.
///
/// # Examples
///
/// ```
/// use filtex::ast::{Expression, FieldType, Logic, Operator};
///
/// let active = Expression::operator(FieldType::String, "status", Operator::Equal, "active");
/// let adult = Expression::operator(FieldType::Number, "age", Operator::GreaterThan, 18);
/// let both = Expression::logic(Logic::And, vec![active, adult]);
///
/// assert_eq!(both.leaf_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `child and child ...` / `child or child ...`
    Logic {
        logic: Logic,
        expressions: Vec<Expression>,
    },

    /// A single field-operator-value test
    ///
    /// `value` is [`Value::Null`] for Blank/NotBlank and a
    /// [`Value::Array`] for a multi-value In/NotIn.
    Operator {
        field_type: FieldType,
        field: String,
        operator: Operator,
        value: Value,
    },
}

impl Expression {
    pub fn logic(logic: Logic, expressions: Vec<Expression>) -> Self {
        Expression::Logic { logic, expressions }
    }

    pub fn operator(
        field_type: FieldType,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        Expression::Operator {
            field_type,
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn and(expressions: Vec<Expression>) -> Self {
        Self::logic(Logic::And, expressions)
    }

    pub fn or(expressions: Vec<Expression>) -> Self {
        Self::logic(Logic::Or, expressions)
    }

    /// Number of operator leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expression::Logic { expressions, .. } => {
                expressions.iter().map(Expression::leaf_count).sum()
            }
            Expression::Operator { .. } => 1,
        }
    }
}
