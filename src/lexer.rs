use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{Logic, Token, TokenKind, parse_logic, parse_operator},
    coerce,
};

/// Lexical failure: the text cannot be split into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unterminated quoted literal starting at position {position}")]
    UnterminatedLiteral { position: usize },

    #[error("invalid escape sequence '\\{character}' at position {position}")]
    InvalidEscape { character: char, position: usize },
}

/// What the grammar expects next; decides how a run of text is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Field,
    Operator,
    Value,
    Continuation,
}

/// Longest operator spelled over several words (`not starts with`).
const MAX_OPERATOR_WORDS: usize = 3;

/// Slashed dates need a four-digit year at either end, so `1/2/3` stays a
/// list of three values.
static SLASHED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}/\d{1,2}/\d{1,2}|\d{1,2}/\d{1,2}/\d{4})(?:$|T)")
        .expect("slashed date pattern is valid")
});

/// Context-sensitive lexer.
///
/// The same text means different things depending on where it appears:
/// `in` is an operator after a field and a plain value after `=`, `/`
/// separates values unless it is part of a date. The lexer tracks the
/// expected position and classifies bare values through the coercion
/// layer.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    expect: Expect,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            expect: Expect::Field,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
        self.slice(start, self.position)
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, TokenizeError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(c @ ('"' | '\'' | '\\')) => result.push(c),
                        Some(c) => {
                            return Err(TokenizeError::InvalidEscape {
                                character: c,
                                position: self.position,
                            });
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(TokenizeError::UnterminatedLiteral { position: start })
    }

    fn read_symbol_operator(&mut self, start: usize) -> Result<Token, TokenizeError> {
        let first = self.current_char().unwrap_or_default();
        let second = self.peek_char(1);

        let width = match (first, second) {
            ('=', Some('=')) | ('!', Some('=')) | ('<', Some('=')) | ('>', Some('=')) => 2,
            ('<', Some('>')) => 2,
            ('!', _) => {
                return Err(TokenizeError::UnexpectedCharacter {
                    character: '!',
                    position: start,
                });
            }
            _ => 1,
        };
        self.position += width;

        let literal = self.slice(start, self.position);
        let kind = TokenKind::from_operator(parse_operator(&literal)).unwrap_or(TokenKind::Literal);
        self.expect = Expect::Value;
        Ok(Token::new(kind, literal, start))
    }

    /// Reads one to three words and keeps the longest run that names an
    /// operator; a lone unknown word becomes a literal.
    fn read_operator_words(&mut self, start: usize) -> Token {
        let first = self.read_while(is_word_char);
        let mut best: Option<(usize, TokenKind)> =
            TokenKind::from_operator(parse_operator(&first)).map(|kind| (self.position, kind));
        let after_first = self.position;

        let mut words = 1;
        while words < MAX_OPERATOR_WORDS {
            let gap = self.read_while(|c| c == ' ' || c == '\t');
            if gap.is_empty() || !self.current_char().is_some_and(is_word_char) {
                break;
            }
            self.read_while(is_word_char);
            words += 1;

            let candidate = self.slice(start, self.position);
            if let Some(kind) = TokenKind::from_operator(parse_operator(&candidate)) {
                best = Some((self.position, kind));
            }
        }

        let (end, kind) = best.unwrap_or((after_first, TokenKind::Literal));
        self.position = end;
        self.expect = if kind.is_non_comparer() {
            Expect::Continuation
        } else {
            Expect::Value
        };
        Token::new(kind, self.slice(start, end), start)
    }

    fn read_value(&mut self, start: usize) -> Token {
        let run = self.read_while(is_value_char);

        // `/` separates values unless the whole run is a date
        let mut literal = run.clone();
        let date = SLASHED_DATE.is_match(&run) && coerce::parse_date_str(&run).is_some();
        if run.contains('/') && !date {
            let cut = run.find('/').unwrap_or(run.len());
            literal = run[..cut].to_string();
            self.position = start + literal.chars().count();
        }

        let mut kind = classify(&literal);

        // `2024-01-02 10:30` spans a space
        if kind == TokenKind::DateValue {
            let resume = self.position;
            let gap = self.read_while(|c| c == ' ');
            let time = self.read_while(is_value_char);
            let joined = format!("{}{}{}", literal, gap, time);
            if !gap.is_empty() && !time.is_empty() && coerce::parse_datetime_str(&joined).is_some()
            {
                literal = joined;
                kind = TokenKind::DateTimeValue;
            } else {
                self.position = resume;
            }
        }

        self.expect = Expect::Continuation;
        Token::new(kind, literal, start)
    }

    /// Next token including whitespace runs, `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        let start = self.position;
        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        if ch.is_whitespace() {
            let space = self.read_while(char::is_whitespace);
            return Ok(Some(Token::new(TokenKind::Space, space, start)));
        }

        let token = match ch {
            '(' => {
                self.advance();
                if self.expect != Expect::Value {
                    self.expect = Expect::Field;
                }
                Token::new(TokenKind::OpenBracket, "(", start)
            }
            ')' => {
                self.advance();
                self.expect = Expect::Continuation;
                Token::new(TokenKind::CloseBracket, ")", start)
            }
            ',' => {
                self.advance();
                self.expect = Expect::Value;
                Token::new(TokenKind::Comma, ",", start)
            }
            '/' => {
                self.advance();
                self.expect = Expect::Value;
                Token::new(TokenKind::Slash, "/", start)
            }
            '=' | '!' | '<' | '>' => self.read_symbol_operator(start)?,
            '&' | '|' if self.expect == Expect::Continuation => {
                if self.peek_char(1) != Some(ch) {
                    return Err(TokenizeError::UnexpectedCharacter {
                        character: ch,
                        position: start,
                    });
                }
                self.position += 2;
                self.expect = Expect::Field;
                let kind = if ch == '&' { TokenKind::And } else { TokenKind::Or };
                Token::new(kind, self.slice(start, self.position), start)
            }
            '\'' | '"' => {
                let text = self.read_quoted(ch)?;
                match self.expect {
                    Expect::Field => {
                        self.expect = Expect::Operator;
                        Token::new(TokenKind::Literal, text, start)
                    }
                    Expect::Operator => {
                        let kind = TokenKind::from_operator(parse_operator(&text))
                            .unwrap_or(TokenKind::Literal);
                        self.expect = if kind.is_non_comparer() {
                            Expect::Continuation
                        } else {
                            Expect::Value
                        };
                        Token::new(kind, text, start)
                    }
                    Expect::Value | Expect::Continuation => {
                        self.expect = Expect::Continuation;
                        Token::new(TokenKind::StringValue, text, start)
                    }
                }
            }
            _ => match self.expect {
                Expect::Value => self.read_value(start),
                Expect::Operator if is_word_char(ch) => self.read_operator_words(start),
                Expect::Field | Expect::Continuation if is_field_char(ch) => {
                    let word = self.read_while(is_field_char);
                    match parse_logic(&word) {
                        Logic::And => {
                            self.expect = Expect::Field;
                            Token::new(TokenKind::And, word, start)
                        }
                        Logic::Or => {
                            self.expect = Expect::Field;
                            Token::new(TokenKind::Or, word, start)
                        }
                        Logic::Unknown => {
                            self.expect = Expect::Operator;
                            Token::new(TokenKind::Literal, word, start)
                        }
                    }
                }
                _ => {
                    return Err(TokenizeError::UnexpectedCharacter {
                        character: ch,
                        position: start,
                    });
                }
            },
        };

        Ok(Some(token))
    }

    /// Split the whole input, whitespace tokens included.
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        debug!(tokens = tokens.len(), "tokenized filter expression");
        Ok(tokens)
    }
}

/// Split `text` into tokens.
///
/// ```
/// use filtex::{ast::TokenKind, lexer::tokenize};
///
/// let kinds: Vec<TokenKind> = tokenize("age >= 18")
///     .unwrap()
///     .into_iter()
///     .map(|t| t.kind)
///     .filter(|k| !k.is_space())
///     .collect();
///
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Literal, TokenKind::GreaterThanOrEqual, TokenKind::NumberValue]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizeError> {
    Lexer::new(text).tokenize()
}

fn is_field_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-')
}

fn is_value_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | ',')
}

fn classify(literal: &str) -> TokenKind {
    if coerce::parse_number(literal).is_some() {
        TokenKind::NumberValue
    } else if literal.eq_ignore_ascii_case("true") || literal.eq_ignore_ascii_case("false") {
        TokenKind::BooleanValue
    } else if coerce::parse_date_str(literal).is_some() {
        TokenKind::DateValue
    } else if coerce::parse_datetime_str(literal).is_some() {
        TokenKind::DateTimeValue
    } else if coerce::parse_time_str(literal).is_some() {
        TokenKind::TimeValue
    } else {
        TokenKind::Value
    }
}

#[cfg(test)]
fn significant(input: &str) -> Vec<(TokenKind, String)> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .filter(|t| !t.kind.is_space())
        .map(|t| (t.kind, t.literal))
        .collect()
}

#[test]
fn test_keywords() {
    let tokens = significant("a = 1 AND b = 2 or c blank");
    let kinds: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::NumberValue,
            TokenKind::And,
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::NumberValue,
            TokenKind::Or,
            TokenKind::Literal,
            TokenKind::Blank,
        ]
    );
}

#[test]
fn test_value_list() {
    let tokens = significant("role in ('admin','owner')");
    assert_eq!(
        tokens,
        vec![
            (TokenKind::Literal, "role".to_string()),
            (TokenKind::In, "in".to_string()),
            (TokenKind::OpenBracket, "(".to_string()),
            (TokenKind::StringValue, "admin".to_string()),
            (TokenKind::Comma, ",".to_string()),
            (TokenKind::StringValue, "owner".to_string()),
            (TokenKind::CloseBracket, ")".to_string()),
        ]
    );
}
