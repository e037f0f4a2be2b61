use std::fmt;

/// Comparison or test applied between a field and a value.
///
/// Each operator has a canonical name (`not-in`) and a display label
/// (`not in`). [`parse_operator`] matches either, ignoring case and the
/// `-`, `_` and space separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Sentinel returned by [`parse_operator`] when nothing matches
    Unknown,

    Equal,
    NotEqual,
    Contain,
    NotContain,
    StartWith,
    NotStartWith,
    EndWith,
    NotEndWith,
    Blank,
    NotBlank,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
}

impl Operator {
    /// The sixteen real operators, in declaration order.
    pub const ALL: [Operator; 16] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Contain,
        Operator::NotContain,
        Operator::StartWith,
        Operator::NotStartWith,
        Operator::EndWith,
        Operator::NotEndWith,
        Operator::Blank,
        Operator::NotBlank,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::In,
        Operator::NotIn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operator::Unknown => "unknown",
            Operator::Equal => "equal",
            Operator::NotEqual => "not-equal",
            Operator::Contain => "contain",
            Operator::NotContain => "not-contain",
            Operator::StartWith => "start-with",
            Operator::NotStartWith => "not-start-with",
            Operator::EndWith => "end-with",
            Operator::NotEndWith => "not-end-with",
            Operator::Blank => "blank",
            Operator::NotBlank => "not-blank",
            Operator::GreaterThan => "greater-than",
            Operator::GreaterThanOrEqual => "greater-than-or-equal",
            Operator::LessThan => "less-than",
            Operator::LessThanOrEqual => "less-than-or-equal",
            Operator::In => "in",
            Operator::NotIn => "not-in",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operator::Unknown => "unknown",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Contain => "contains",
            Operator::NotContain => "not contains",
            Operator::StartWith => "starts with",
            Operator::NotStartWith => "not starts with",
            Operator::EndWith => "ends with",
            Operator::NotEndWith => "not ends with",
            Operator::Blank => "blank",
            Operator::NotBlank => "not blank",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Operator::Unknown
    }

    /// Blank and NotBlank take no value.
    pub fn is_comparer(self) -> bool {
        !matches!(self, Operator::Unknown | Operator::Blank | Operator::NotBlank)
    }

    /// In and NotIn accept a list of values.
    pub fn is_multi_allowed(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an operator from its name, label or a common alias.
///
/// Never fails: returns [`Operator::Unknown`] when nothing matches.
///
/// ```
/// use filtex::ast::{parse_operator, Operator};
///
/// assert_eq!(parse_operator("NOT-IN"), Operator::NotIn);
/// assert_eq!(parse_operator("starts with"), Operator::StartWith);
/// assert_eq!(parse_operator("maybe"), Operator::Unknown);
/// ```
pub fn parse_operator(text: &str) -> Operator {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Operator::Unknown;
    }

    if let Some(op) = Operator::ALL.into_iter().find(|op| {
        normalize(op.name()) == normalized || normalize(op.label()) == normalized
    }) {
        return op;
    }

    match normalized.as_str() {
        "==" | "eq" | "equals" | "is" => Operator::Equal,
        "<>" | "ne" | "neq" | "isnot" => Operator::NotEqual,
        "doesnotcontain" => Operator::NotContain,
        "gt" => Operator::GreaterThan,
        "gte" | "ge" => Operator::GreaterThanOrEqual,
        "lt" => Operator::LessThan,
        "lte" | "le" => Operator::LessThanOrEqual,
        "empty" | "isblank" | "isempty" => Operator::Blank,
        "notempty" | "isnotblank" | "isnotempty" => Operator::NotBlank,
        _ => Operator::Unknown,
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '\t'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Logical combinator of a logic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    /// Sentinel returned by [`parse_logic`] when nothing matches
    Unknown,
    And,
    Or,
}

impl Logic {
    pub fn name(self) -> &'static str {
        match self {
            Logic::Unknown => "unknown",
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve `and`/`or` (any case, or `&&`/`||`). Unknown on no match.
pub fn parse_logic(text: &str) -> Logic {
    match text.trim().to_lowercase().as_str() {
        "and" | "&&" => Logic::And,
        "or" | "||" => Logic::Or,
        _ => Logic::Unknown,
    }
}
