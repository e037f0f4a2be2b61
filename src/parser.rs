use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Expression, FieldType, Logic, Operator, Token, TokenKind, parse_logic, parse_operator},
    coerce,
    metadata::{Lookup, Metadata},
    value::Value,
};

/// Grammar or resolution failure while turning tokens into an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid token '{literal}' at position {position}")]
    InvalidToken { literal: String, position: usize },

    #[error("expression cannot end with '{literal}' at position {position}")]
    InvalidLastToken { literal: String, position: usize },

    #[error("mismatched brackets at position {position}")]
    MismatchedBrackets { position: usize },

    #[error("unknown field '{field}' at position {position}")]
    InvalidField { field: String, position: usize },

    #[error("operator '{operator}' is not valid for field '{field}' at position {position}")]
    InvalidOperator {
        operator: String,
        field: String,
        position: usize,
    },

    #[error("invalid value '{value}' for field '{field}' at position {position}: {reason}")]
    InvalidValue {
        value: String,
        field: String,
        position: usize,
        reason: String,
    },

    #[error("invalid logic '{literal}' at position {position}")]
    InvalidLogic { literal: String, position: usize },

    #[error("expression could not be parsed: {0}")]
    CouldNotBeParsed(String),

    #[error("expression could not be validated: {0}")]
    CouldNotBeValidated(String),
}

/// Kind a token plays in the grammar. A literal right after a field is an
/// operator word; one that names no operator is checked as a single-value
/// comparer and reported when the comparison is resolved.
fn grammar_kind(token: &Token, prev: Option<TokenKind>) -> TokenKind {
    if token.kind == TokenKind::Literal && prev.is_some_and(TokenKind::is_field) {
        TokenKind::from_operator(parse_operator(&token.literal)).unwrap_or(TokenKind::Equal)
    } else {
        token.kind
    }
}

/// Recursive-descent parser over a token sequence.
///
/// Whitespace tokens are dropped on construction. [`Parser::parse`] first
/// checks every token against the one before it, then reduces
/// `Or := And (or And)*`, `And := Unary (and Unary)*`,
/// `Unary := ( Or ) | Field Operator Value?`, resolving fields, operators
/// and values against the metadata.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    metadata: &'a dyn Metadata,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, metadata: &'a dyn Metadata) -> Self {
        Parser {
            tokens: tokens.into_iter().filter(|t| !t.kind.is_space()).collect(),
            position: 0,
            metadata,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn check(&self, pred: impl Fn(TokenKind) -> bool) -> bool {
        self.current().is_some_and(|t| pred(t.kind))
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| ParseError::CouldNotBeParsed("unexpected end of expression".into()))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, pred: impl Fn(TokenKind) -> bool) -> Result<Token, ParseError> {
        let token = self.advance()?;
        if pred(token.kind) {
            Ok(token)
        } else {
            Err(ParseError::InvalidToken {
                literal: token.literal,
                position: token.position,
            })
        }
    }

    /// Check token adjacency and bracket balance without resolving anything.
    pub fn check_grammar(&self) -> Result<(), ParseError> {
        let Some(last) = self.tokens.last() else {
            return Err(ParseError::CouldNotBeValidated("empty expression".into()));
        };

        let mut prev: Option<TokenKind> = None;
        let mut active: Option<TokenKind> = None;
        let mut open_brackets: Vec<usize> = Vec::new();
        let mut list_group = false;

        for token in &self.tokens {
            let kind = grammar_kind(token, prev);

            let legal = if kind.is_field() {
                prev.is_none_or(TokenKind::is_pre_field) && !list_group
            } else if kind.is_operator() {
                active = Some(kind);
                prev.is_some_and(TokenKind::is_field)
            } else if kind.is_value() {
                match prev {
                    Some(p) if p.is_operator() => p.is_comparer(),
                    Some(p) if p.is_separator() => true,
                    Some(p) if p.is_open_group() => list_group,
                    _ => false,
                }
            } else if kind.is_separator() {
                prev.is_some_and(TokenKind::is_value)
                    && active.is_some_and(TokenKind::is_multi_allowed)
            } else if kind.is_open_group() {
                match prev {
                    Some(p) if p.is_multi_allowed() => {
                        list_group = true;
                        true
                    }
                    _ => prev.is_none_or(TokenKind::is_pre_field) && !list_group,
                }
            } else if kind.is_close_group() {
                if open_brackets.is_empty() {
                    return Err(ParseError::MismatchedBrackets {
                        position: token.position,
                    });
                }
                if list_group {
                    list_group = false;
                    prev.is_some_and(TokenKind::is_value)
                } else {
                    prev.is_some_and(TokenKind::is_terminal)
                }
            } else if kind.is_logic() {
                prev.is_some_and(TokenKind::is_terminal) && !list_group
            } else {
                false
            };

            if !legal {
                return Err(ParseError::InvalidToken {
                    literal: token.literal.clone(),
                    position: token.position,
                });
            }

            if kind.is_open_group() {
                open_brackets.push(token.position);
            } else if kind.is_close_group() {
                open_brackets.pop();
            }
            prev = Some(kind);
        }

        if !prev.is_some_and(TokenKind::is_terminal) {
            return Err(ParseError::InvalidLastToken {
                literal: last.literal.clone(),
                position: last.position,
            });
        }

        if let Some(position) = open_brackets.pop() {
            return Err(ParseError::MismatchedBrackets { position });
        }

        Ok(())
    }

    /// Parse the whole token sequence into an expression.
    pub fn parse(mut self) -> Result<Expression, ParseError> {
        self.check_grammar()?;

        let expression = self.parse_or()?;
        if let Some(token) = self.current() {
            return Err(ParseError::InvalidToken {
                literal: token.literal.clone(),
                position: token.position,
            });
        }

        debug!(leaves = expression.leaf_count(), "parsed filter expression");
        Ok(expression)
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut children = vec![self.parse_and()?];

        while self.check(|k| k == TokenKind::Or) {
            self.expect_logic(Logic::Or)?;
            children.push(self.parse_and()?);
        }
        Ok(combine(Logic::Or, children))
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut children = vec![self.parse_unary()?];

        while self.check(|k| k == TokenKind::And) {
            self.expect_logic(Logic::And)?;
            children.push(self.parse_unary()?);
        }
        Ok(combine(Logic::And, children))
    }

    fn expect_logic(&mut self, logic: Logic) -> Result<(), ParseError> {
        let token = self.advance()?;
        if parse_logic(&token.literal) != logic {
            return Err(ParseError::InvalidLogic {
                literal: token.literal,
                position: token.position,
            });
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.check(TokenKind::is_open_group) {
            self.advance()?;
            let expression = self.parse_or()?;
            self.expect(TokenKind::is_close_group)?;
            // a bracketed comparison keeps its group as a one-child node
            return Ok(match expression {
                Expression::Operator { .. } => Expression::and(vec![expression]),
                group => group,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let metadata = self.metadata;
        let field_token = self.expect(TokenKind::is_field)?;
        let field_type = metadata.resolve_type(&field_token.literal);
        if field_type.is_unknown() {
            return Err(ParseError::InvalidField {
                field: field_token.literal,
                position: field_token.position,
            });
        }
        let field = metadata.resolve_name(&field_token.literal);

        let operator_token = self.advance()?;
        let operator = match operator_token.kind {
            kind if kind.is_operator() => kind.operator(),
            _ => parse_operator(&operator_token.literal),
        };
        let allowed = metadata
            .resolve_operators(&field_token.literal)
            .unwrap_or_default();
        if operator.is_unknown() || !allowed.contains(&operator) {
            return Err(ParseError::InvalidOperator {
                operator: operator_token.literal,
                field,
                position: operator_token.position,
            });
        }

        let value = if operator.is_comparer() {
            let lookups = metadata.resolve_allowed_values(&field_token.literal);
            self.parse_values(operator, field_type, &field, lookups)?
        } else {
            Value::Null
        };

        trace!(field = %field, operator = %operator, "resolved comparison");
        Ok(Expression::Operator {
            field_type,
            field,
            operator,
            value,
        })
    }

    fn parse_values(
        &mut self,
        operator: Operator,
        field_type: FieldType,
        field: &str,
        lookups: Option<&[Lookup]>,
    ) -> Result<Value, ParseError> {
        let multi = operator.is_multi_allowed();
        let grouped = multi && self.check(TokenKind::is_open_group);
        if grouped {
            self.advance()?;
        }

        let mut values = vec![self.parse_value(field_type, field, lookups)?];
        while multi && self.check(TokenKind::is_separator) {
            self.advance()?;
            values.push(self.parse_value(field_type, field, lookups)?);
        }

        if grouped {
            self.expect(TokenKind::is_close_group)?;
        }

        if grouped || values.len() > 1 {
            Ok(Value::Array(values))
        } else {
            Ok(values.remove(0))
        }
    }

    fn parse_value(
        &mut self,
        field_type: FieldType,
        field: &str,
        lookups: Option<&[Lookup]>,
    ) -> Result<Value, ParseError> {
        let token = self.expect(TokenKind::is_value)?;
        let invalid = |reason: String| ParseError::InvalidValue {
            value: token.literal.clone(),
            field: field.to_string(),
            position: token.position,
            reason,
        };

        let raw = match lookups {
            Some(lookups) => lookups
                .iter()
                .find(|lookup| lookup_matches(lookup, &token.literal))
                .map(|lookup| lookup.value.clone())
                .ok_or_else(|| invalid("not one of the allowed values".into()))?,
            None => Value::String(token.literal.clone()),
        };

        coerce::coerce(&raw, field_type.base()).map_err(|e| invalid(e.to_string()))
    }
}

fn lookup_matches(lookup: &Lookup, literal: &str) -> bool {
    let wanted = literal.to_lowercase();
    lookup.name.to_lowercase() == wanted
        || coerce::to_string(&lookup.value).is_ok_and(|v| v.to_lowercase() == wanted)
}

/// A precedence level with a single operand stands for it; runs of the same
/// logic stay flat. Bracket groups are kept by [`Parser::parse_unary`].
fn combine(logic: Logic, mut children: Vec<Expression>) -> Expression {
    if children.len() == 1 {
        children.remove(0)
    } else {
        Expression::logic(logic, children)
    }
}

/// Parse tokens into an expression, resolving fields through `metadata`.
pub fn parse(tokens: Vec<Token>, metadata: &dyn Metadata) -> Result<Expression, ParseError> {
    Parser::new(tokens, metadata).parse()
}

/// Run the full parse and report only the first error, if any.
pub fn validate(tokens: &[Token], metadata: &dyn Metadata) -> Result<(), ParseError> {
    parse(tokens.to_vec(), metadata).map(|_| ())
}
