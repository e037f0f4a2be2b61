use std::fmt;

use crate::ast::Operator;

/// A lexical unit of a filter expression.
///
/// `literal` holds the source text (unquoted for quoted strings) and
/// `position` the character offset where the token starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at position {}", self.literal, self.position)
    }
}

/// Kinds of tokens.
///
/// The `is_*` predicates on this type are the grammar: the parser checks
/// whether a kind may follow the previous one instead of keeping a state
/// table per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    /// `(`
    OpenBracket,
    /// `)`
    CloseBracket,
    /// `,` between list values
    Comma,
    /// `/` between list values
    Slash,
    /// A run of whitespace, discarded by the parser
    Space,

    // Logic
    And,
    Or,

    // Fields
    /// A field already resolved against metadata
    Field,
    /// Raw identifier text, resolved during parsing
    ///
    /// In field position it names a field, in operator position it is a
    /// candidate operator word.
    Literal,

    // Values
    /// Bare value the lexer could not classify
    Value,
    StringValue,
    NumberValue,
    BooleanValue,
    DateValue,
    TimeValue,
    DateTimeValue,

    // Comparer operators
    Equal,
    NotEqual,
    Contain,
    NotContain,
    StartWith,
    NotStartWith,
    EndWith,
    NotEndWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,

    // Non-comparer operators
    Blank,
    NotBlank,
}

impl TokenKind {
    /// Token kind of an operator, `None` for [`Operator::Unknown`].
    pub fn from_operator(op: Operator) -> Option<TokenKind> {
        let kind = match op {
            Operator::Unknown => return None,
            Operator::Equal => TokenKind::Equal,
            Operator::NotEqual => TokenKind::NotEqual,
            Operator::Contain => TokenKind::Contain,
            Operator::NotContain => TokenKind::NotContain,
            Operator::StartWith => TokenKind::StartWith,
            Operator::NotStartWith => TokenKind::NotStartWith,
            Operator::EndWith => TokenKind::EndWith,
            Operator::NotEndWith => TokenKind::NotEndWith,
            Operator::Blank => TokenKind::Blank,
            Operator::NotBlank => TokenKind::NotBlank,
            Operator::GreaterThan => TokenKind::GreaterThan,
            Operator::GreaterThanOrEqual => TokenKind::GreaterThanOrEqual,
            Operator::LessThan => TokenKind::LessThan,
            Operator::LessThanOrEqual => TokenKind::LessThanOrEqual,
            Operator::In => TokenKind::In,
            Operator::NotIn => TokenKind::NotIn,
        };
        Some(kind)
    }

    /// The operator this kind stands for, [`Operator::Unknown`] otherwise.
    pub fn operator(self) -> Operator {
        match self {
            TokenKind::Equal => Operator::Equal,
            TokenKind::NotEqual => Operator::NotEqual,
            TokenKind::Contain => Operator::Contain,
            TokenKind::NotContain => Operator::NotContain,
            TokenKind::StartWith => Operator::StartWith,
            TokenKind::NotStartWith => Operator::NotStartWith,
            TokenKind::EndWith => Operator::EndWith,
            TokenKind::NotEndWith => Operator::NotEndWith,
            TokenKind::GreaterThan => Operator::GreaterThan,
            TokenKind::GreaterThanOrEqual => Operator::GreaterThanOrEqual,
            TokenKind::LessThan => Operator::LessThan,
            TokenKind::LessThanOrEqual => Operator::LessThanOrEqual,
            TokenKind::In => Operator::In,
            TokenKind::NotIn => Operator::NotIn,
            TokenKind::Blank => Operator::Blank,
            TokenKind::NotBlank => Operator::NotBlank,
            _ => Operator::Unknown,
        }
    }

    pub fn is_field(self) -> bool {
        matches!(self, TokenKind::Field | TokenKind::Literal)
    }

    pub fn is_operator(self) -> bool {
        self.is_comparer() || self.is_non_comparer()
    }

    pub fn is_comparer(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Contain
                | TokenKind::NotContain
                | TokenKind::StartWith
                | TokenKind::NotStartWith
                | TokenKind::EndWith
                | TokenKind::NotEndWith
                | TokenKind::GreaterThan
                | TokenKind::GreaterThanOrEqual
                | TokenKind::LessThan
                | TokenKind::LessThanOrEqual
                | TokenKind::In
                | TokenKind::NotIn
        )
    }

    pub fn is_non_comparer(self) -> bool {
        matches!(self, TokenKind::Blank | TokenKind::NotBlank)
    }

    /// Separators between the values of a list.
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Comma | TokenKind::Slash)
    }

    /// Kinds after which a field may start.
    pub fn is_pre_field(self) -> bool {
        matches!(self, TokenKind::OpenBracket | TokenKind::And | TokenKind::Or)
    }

    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Value
                | TokenKind::StringValue
                | TokenKind::NumberValue
                | TokenKind::BooleanValue
                | TokenKind::DateValue
                | TokenKind::TimeValue
                | TokenKind::DateTimeValue
        )
    }

    pub fn is_logic(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    pub fn is_open_group(self) -> bool {
        self == TokenKind::OpenBracket
    }

    pub fn is_close_group(self) -> bool {
        self == TokenKind::CloseBracket
    }

    /// Operators that take a list of values.
    pub fn is_multi_allowed(self) -> bool {
        matches!(self, TokenKind::In | TokenKind::NotIn)
    }

    pub fn is_space(self) -> bool {
        self == TokenKind::Space
    }

    /// Kinds a complete comparison may end with.
    pub fn is_terminal(self) -> bool {
        self.is_value() || self.is_non_comparer() || self.is_close_group()
    }
}
