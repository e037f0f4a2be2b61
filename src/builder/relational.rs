use crate::{
    ast::{Expression, FieldType, Logic, Operator},
    builder::{BuildError, Builder, Leaf, Operand, known_logic, leaf},
    value::Value,
};

/// A SQL condition with `$n` placeholders and the arguments bound to them,
/// in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub condition: String,
    pub args: Vec<Value>,
}

impl Condition {
    fn new(condition: impl Into<String>, args: Vec<Value>) -> Self {
        Condition {
            condition: condition.into(),
            args,
        }
    }
}

/// Builds SQL conditions for PostgreSQL-style positional parameters.
///
/// Field names are written as given; they are expected to be validated
/// column names. The placeholder counter belongs to a single
/// [`Builder::build`] call and starts at `1` unless set with
/// [`RelationalBuilder::starting_at`].
///
/// ```
/// use filtex::{Expression, FieldType, Operator, Value};
/// use filtex::builder::{Builder, RelationalBuilder};
///
/// let leaf = Expression::operator(FieldType::Number, "Value", Operator::In, vec![1, 2, 3]);
/// let built = RelationalBuilder::new().build(Some(&leaf)).unwrap();
///
/// assert_eq!(built.condition, "Value IN ($1,$2,$3)");
/// assert_eq!(built.args, vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RelationalBuilder {
    start: usize,
}

impl Default for RelationalBuilder {
    fn default() -> Self {
        RelationalBuilder { start: 1 }
    }
}

impl RelationalBuilder {
    pub fn new() -> Self {
        RelationalBuilder::default()
    }

    /// Number the first placeholder `start`, to append to an existing
    /// parameter list.
    pub fn starting_at(start: usize) -> Self {
        RelationalBuilder {
            start: start.max(1),
        }
    }

    fn compile(&self, expression: &Expression, next: &mut usize) -> Result<Condition, BuildError> {
        match expression {
            Expression::Logic { logic, expressions } => {
                let logic = known_logic(*logic)?;
                if expressions.is_empty() {
                    let identity = if logic == Logic::Or { "FALSE" } else { "TRUE" };
                    return Ok(Condition::new(identity, Vec::new()));
                }

                let joiner = if logic == Logic::Or { " OR " } else { " AND " };
                let mut parts = Vec::with_capacity(expressions.len());
                let mut args = Vec::new();
                for child in expressions {
                    let built = self.compile(child, next)?;
                    parts.push(format!("({})", built.condition));
                    args.extend(built.args);
                }
                Ok(Condition::new(parts.join(joiner), args))
            }
            Expression::Operator {
                field_type,
                field,
                operator,
                value,
            } => fragment(leaf(*field_type, field, *operator, value)?, next),
        }
    }
}

impl Builder for RelationalBuilder {
    type Output = Condition;

    fn build(&self, expression: Option<&Expression>) -> Result<Condition, BuildError> {
        let expression = expression
            .ok_or_else(|| BuildError::CouldNotBeBuilt("no expression to build".into()))?;
        let mut next = self.start;
        self.compile(expression, &mut next)
    }
}

/// Take the next placeholder.
fn placeholder(next: &mut usize) -> String {
    let p = format!("${}", next);
    *next += 1;
    p
}

fn fragment(leaf: Leaf<'_>, next: &mut usize) -> Result<Condition, BuildError> {
    let Leaf {
        field_type,
        field: f,
        operator,
        operand,
    } = leaf;
    let string = field_type.base() == FieldType::String;

    let value = match operand {
        Operand::None => {
            let condition = match (field_type.is_array(), operator) {
                (true, Operator::NotBlank) => format!("ARRAY_LENGTH({f}, 1) <> 0"),
                (true, _) => format!("ARRAY_LENGTH({f}, 1) = 0"),
                (false, Operator::NotBlank) => format!("{f} IS NOT NULL AND {f} <> ''"),
                (false, _) => format!("{f} IS NULL OR {f} = ''"),
            };
            return Ok(Condition::new(condition, Vec::new()));
        }
        Operand::List(values) => return Ok(membership(f, operator, string, values, next)),
        Operand::Single(value) => value,
    };

    if matches!(operator, Operator::In | Operator::NotIn) {
        return Ok(membership(f, operator, string, vec![value], next));
    }

    let n = placeholder(next);

    let condition = if field_type.is_array() {
        let contains = if string {
            format!("LOWER({n})=ANY(LOWER({f}::TEXT)::TEXT[])")
        } else {
            format!("{n}=ANY({f})")
        };
        match operator {
            Operator::NotContain => format!("NOT ({contains})"),
            _ => contains,
        }
    } else {
        match operator {
            Operator::Equal if string => format!("{f} ILIKE {n}"),
            Operator::NotEqual if string => format!("{f} NOT ILIKE {n}"),
            Operator::Equal => format!("{f} = {n}"),
            Operator::NotEqual => format!("{f} <> {n}"),
            Operator::Contain => format!("{f} ILIKE '%'||{n}||'%'"),
            Operator::NotContain => format!("NOT ({f} ILIKE '%'||{n}||'%')"),
            Operator::StartWith => format!("{f} ILIKE {n}||'%'"),
            Operator::NotStartWith => format!("{f} NOT ILIKE {n}||'%'"),
            Operator::EndWith => format!("{f} ILIKE '%'||{n}"),
            Operator::NotEndWith => format!("{f} NOT ILIKE '%'||{n}"),
            Operator::GreaterThan => format!("{f} > {n}"),
            Operator::GreaterThanOrEqual => format!("{f} >= {n}"),
            Operator::LessThan => format!("{f} < {n}"),
            Operator::LessThanOrEqual => format!("{f} <= {n}"),
            Operator::In
            | Operator::NotIn
            | Operator::Blank
            | Operator::NotBlank
            | Operator::Unknown => {
                return Err(BuildError::CouldNotBeBuilt(format!(
                    "operator '{}' on field '{}' has no condition",
                    operator, f
                )));
            }
        }
    };

    Ok(Condition::new(condition, vec![value]))
}

fn membership(
    f: &str,
    operator: Operator,
    string: bool,
    values: Vec<Value>,
    next: &mut usize,
) -> Condition {
    let placeholders: Vec<String> = values
        .iter()
        .map(|_| {
            let n = placeholder(next);
            if string { format!("LOWER({n})") } else { n }
        })
        .collect();

    let column = if string {
        format!("LOWER({f})")
    } else {
        f.to_string()
    };
    let not = if operator == Operator::NotIn { "NOT " } else { "" };

    Condition::new(
        format!("{column} {not}IN ({})", placeholders.join(",")),
        values,
    )
}
