//! Backends compiling an [`Expression`] into a target artifact.
//!
//! All builders walk the tree the same way: a logic node combines its
//! built children, an operator leaf is generated from its
//! `(operator, field type)` pair. [`supports`] is the single legality
//! matrix every backend consults, so an unsupported pair fails the same
//! way everywhere, whatever produced the tree.

pub mod document;
pub mod memory;
pub mod relational;

use thiserror::Error;

use crate::{
    ast::{Expression, FieldType, Operator},
    coerce,
    value::Value,
};

pub use document::{Document, DocumentBuilder};
pub use memory::{MemoryBuilder, Predicate};
pub use relational::{Condition, RelationalBuilder};

/// A builder was asked for something it cannot compile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("expression could not be built: {0}")]
    CouldNotBeBuilt(String),
}

impl BuildError {
    fn unsupported(operator: Operator, field_type: FieldType, field: &str) -> Self {
        BuildError::CouldNotBeBuilt(format!(
            "operator '{}' is not supported for {} field '{}'",
            operator, field_type, field
        ))
    }
}

/// Compiles an expression tree into a backend artifact.
///
/// `None` stands for a missing tree and always fails.
pub trait Builder {
    type Output;

    fn build(&self, expression: Option<&Expression>) -> Result<Self::Output, BuildError>;
}

/// Whether any backend can compile `operator` on a field of `field_type`.
///
/// | operator | string | number/date/time/datetime | boolean | arrays |
/// |---|---|---|---|---|
/// | equal, not equal | yes | yes | yes | no |
/// | contain, not contain | yes | no | no | yes |
/// | start/end with and negations | yes | no | no | no |
/// | blank, not blank | yes | no | no | yes |
/// | ordering | no | yes | no | no |
/// | in, not in | yes | yes | yes | no |
pub fn supports(operator: Operator, field_type: FieldType) -> bool {
    use FieldType as T;
    use Operator as O;

    if field_type.is_unknown() {
        return false;
    }
    let array = field_type.is_array();

    match operator {
        O::Unknown => false,
        O::Equal | O::NotEqual | O::In | O::NotIn => !array,
        O::Contain | O::NotContain | O::Blank | O::NotBlank => array || field_type == T::String,
        O::StartWith | O::NotStartWith | O::EndWith | O::NotEndWith => field_type == T::String,
        O::GreaterThan | O::GreaterThanOrEqual | O::LessThan | O::LessThanOrEqual => {
            matches!(field_type, T::Number | T::Date | T::Time | T::DateTime)
        }
    }
}

/// The value side of a leaf, converted to the field's base type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    None,
    Single(Value),
    List(Vec<Value>),
}

/// A leaf after the legality gate and value conversion.
pub(crate) struct Leaf<'e> {
    pub field_type: FieldType,
    pub field: &'e str,
    pub operator: Operator,
    pub operand: Operand,
}

/// Check a leaf against [`supports`] and convert its value.
///
/// Blank/NotBlank ignore the value, In/NotIn accept a single value or a
/// non-empty list, every other operator needs exactly one value.
pub(crate) fn leaf<'e>(
    field_type: FieldType,
    field: &'e str,
    operator: Operator,
    value: &Value,
) -> Result<Leaf<'e>, BuildError> {
    if !supports(operator, field_type) {
        return Err(BuildError::unsupported(operator, field_type, field));
    }

    let base = field_type.base();
    let convert = |v: &Value| {
        coerce::coerce(v, base).map_err(|e| {
            BuildError::CouldNotBeBuilt(format!("invalid value for field '{}': {}", field, e))
        })
    };
    let missing = || {
        BuildError::CouldNotBeBuilt(format!(
            "operator '{}' on field '{}' expects a value",
            operator, field
        ))
    };

    let operand = match (operator, value) {
        (Operator::Blank | Operator::NotBlank, _) => Operand::None,
        (_, Value::Null) => return Err(missing()),
        (Operator::In | Operator::NotIn, Value::Array(items)) => {
            if items.is_empty() {
                return Err(missing());
            }
            Operand::List(items.iter().map(convert).collect::<Result<_, _>>()?)
        }
        (_, Value::Array(_)) => {
            return Err(BuildError::CouldNotBeBuilt(format!(
                "operator '{}' on field '{}' expects a single value",
                operator, field
            )));
        }
        (_, v) => Operand::Single(convert(v)?),
    };

    Ok(Leaf {
        field_type,
        field,
        operator,
        operand,
    })
}

/// Reject logic nodes that lost their combinator.
pub(crate) fn known_logic(logic: crate::ast::Logic) -> Result<crate::ast::Logic, BuildError> {
    match logic {
        crate::ast::Logic::Unknown => Err(BuildError::CouldNotBeBuilt(
            "logic node has unknown logic".into(),
        )),
        known => Ok(known),
    }
}
