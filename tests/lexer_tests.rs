// tests/lexer_tests.rs

use filtex::ast::TokenKind;
use filtex::lexer::{Lexer, TokenizeError, tokenize};

fn significant(input: &str) -> Vec<(TokenKind, String)> {
    tokenize(input)
        .unwrap_or_else(|e| panic!("Failed to tokenize {:?}: {}", input, e))
        .into_iter()
        .filter(|t| !t.kind.is_space())
        .map(|t| (t.kind, t.literal))
        .collect()
}

fn kinds(input: &str) -> Vec<TokenKind> {
    significant(input).into_iter().map(|(k, _)| k).collect()
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_symbol_operators() {
    let test_cases = vec![
        ("a = 1", TokenKind::Equal),
        ("a == 1", TokenKind::Equal),
        ("a != 1", TokenKind::NotEqual),
        ("a <> 1", TokenKind::NotEqual),
        ("a > 1", TokenKind::GreaterThan),
        ("a >= 1", TokenKind::GreaterThanOrEqual),
        ("a < 1", TokenKind::LessThan),
        ("a <= 1", TokenKind::LessThanOrEqual),
    ];

    for (input, expected) in test_cases {
        let tokens = kinds(input);
        assert_eq!(tokens.len(), 3, "Failed for input: {}", input);
        assert_eq!(tokens[1], expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_symbol_operators_without_spaces() {
    assert_eq!(
        kinds("a>=1"),
        vec![TokenKind::Literal, TokenKind::GreaterThanOrEqual, TokenKind::NumberValue]
    );
}

#[test]
fn test_word_operators() {
    let test_cases = vec![
        ("a contains x", TokenKind::Contain, "contains"),
        ("a not contains x", TokenKind::NotContain, "not contains"),
        ("a does not contain x", TokenKind::NotContain, "does not contain"),
        ("a starts with x", TokenKind::StartWith, "starts with"),
        ("a not starts with x", TokenKind::NotStartWith, "not starts with"),
        ("a ends with x", TokenKind::EndWith, "ends with"),
        ("a end-with x", TokenKind::EndWith, "end-with"),
        ("a in x", TokenKind::In, "in"),
        ("a not in x", TokenKind::NotIn, "not in"),
        ("a NOT-IN x", TokenKind::NotIn, "NOT-IN"),
        ("a eq x", TokenKind::Equal, "eq"),
        ("a is not x", TokenKind::NotEqual, "is not"),
    ];

    for (input, expected, literal) in test_cases {
        let tokens = significant(input);
        assert_eq!(tokens.len(), 3, "Failed for input: {}", input);
        assert_eq!(tokens[1].0, expected, "Failed for input: {}", input);
        assert_eq!(tokens[1].1, literal, "Failed for input: {}", input);
        assert_eq!(tokens[2].1, "x", "Failed for input: {}", input);
    }
}

#[test]
fn test_non_comparer_operators() {
    let test_cases = vec![
        ("a blank", TokenKind::Blank),
        ("a not blank", TokenKind::NotBlank),
        ("a is not blank", TokenKind::NotBlank),
        ("a empty", TokenKind::Blank),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            kinds(input),
            vec![TokenKind::Literal, expected],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_unknown_operator_word_is_literal() {
    assert_eq!(
        significant("a maybe 1"),
        vec![
            (TokenKind::Literal, "a".to_string()),
            (TokenKind::Literal, "maybe".to_string()),
            (TokenKind::NumberValue, "1".to_string()),
        ]
    );
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_value_classification() {
    let test_cases = vec![
        ("n = 42", TokenKind::NumberValue, "42"),
        ("n = -1.5", TokenKind::NumberValue, "-1.5"),
        ("n = 1e3", TokenKind::NumberValue, "1e3"),
        ("b = true", TokenKind::BooleanValue, "true"),
        ("b = FALSE", TokenKind::BooleanValue, "FALSE"),
        ("d = 2024-01-31", TokenKind::DateValue, "2024-01-31"),
        ("d = 01/31/2024", TokenKind::DateValue, "01/31/2024"),
        ("d = 31.01.2024", TokenKind::DateValue, "31.01.2024"),
        ("d = 2024-01-31 10:30", TokenKind::DateTimeValue, "2024-01-31 10:30"),
        ("d = 2024-01-31T10:30:00Z", TokenKind::DateTimeValue, "2024-01-31T10:30:00Z"),
        ("t = 10:30", TokenKind::TimeValue, "10:30"),
        ("t = 1h30m", TokenKind::TimeValue, "1h30m"),
        ("s = active", TokenKind::Value, "active"),
        ("s = 'two words'", TokenKind::StringValue, "two words"),
        ("s = \"double\"", TokenKind::StringValue, "double"),
    ];

    for (input, kind, literal) in test_cases {
        let tokens = significant(input);
        assert_eq!(tokens.len(), 3, "Failed for input: {}", input);
        assert_eq!(tokens[2], (kind, literal.to_string()), "Failed for input: {}", input);
    }
}

#[test]
fn test_keywords_are_values_after_operators() {
    assert_eq!(
        significant("s = and"),
        vec![
            (TokenKind::Literal, "s".to_string()),
            (TokenKind::Equal, "=".to_string()),
            (TokenKind::Value, "and".to_string()),
        ]
    );
    assert_eq!(
        kinds("s = in"),
        vec![TokenKind::Literal, TokenKind::Equal, TokenKind::Value]
    );
}

#[test]
fn test_date_followed_by_logic() {
    assert_eq!(
        kinds("d = 2024-01-31 and x = 1"),
        vec![
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::DateValue,
            TokenKind::And,
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::NumberValue,
        ]
    );
}

#[test]
fn test_escapes() {
    let tokens = significant(r#"s = 'it\'s' or s = "tab\there""#);
    assert_eq!(tokens[2], (TokenKind::StringValue, "it's".to_string()));
    assert_eq!(tokens[6], (TokenKind::StringValue, "tab\there".to_string()));
}

// ============================================================================
// Lists and Groups
// ============================================================================

#[test]
fn test_comma_list() {
    assert_eq!(
        significant("x in 1, 2,3"),
        vec![
            (TokenKind::Literal, "x".to_string()),
            (TokenKind::In, "in".to_string()),
            (TokenKind::NumberValue, "1".to_string()),
            (TokenKind::Comma, ",".to_string()),
            (TokenKind::NumberValue, "2".to_string()),
            (TokenKind::Comma, ",".to_string()),
            (TokenKind::NumberValue, "3".to_string()),
        ]
    );
}

#[test]
fn test_slash_list() {
    assert_eq!(
        significant("role in admin/owner"),
        vec![
            (TokenKind::Literal, "role".to_string()),
            (TokenKind::In, "in".to_string()),
            (TokenKind::Value, "admin".to_string()),
            (TokenKind::Slash, "/".to_string()),
            (TokenKind::Value, "owner".to_string()),
        ]
    );
}

#[test]
fn test_slash_list_of_short_numbers() {
    let test_cases = vec![
        (
            "x in 1/2/3",
            vec![
                TokenKind::Literal,
                TokenKind::In,
                TokenKind::NumberValue,
                TokenKind::Slash,
                TokenKind::NumberValue,
                TokenKind::Slash,
                TokenKind::NumberValue,
            ],
        ),
        (
            "x in 10/20/30",
            vec![
                TokenKind::Literal,
                TokenKind::In,
                TokenKind::NumberValue,
                TokenKind::Slash,
                TokenKind::NumberValue,
                TokenKind::Slash,
                TokenKind::NumberValue,
            ],
        ),
        ("x = 2024/01/31", vec![TokenKind::Literal, TokenKind::Equal, TokenKind::DateValue]),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_bracketed_list() {
    assert_eq!(
        kinds("x not in (1, 2)"),
        vec![
            TokenKind::Literal,
            TokenKind::NotIn,
            TokenKind::OpenBracket,
            TokenKind::NumberValue,
            TokenKind::Comma,
            TokenKind::NumberValue,
            TokenKind::CloseBracket,
        ]
    );
}

#[test]
fn test_groups_and_logic() {
    assert_eq!(
        kinds("(a = 1 OR b = 2) && c blank"),
        vec![
            TokenKind::OpenBracket,
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::NumberValue,
            TokenKind::Or,
            TokenKind::Literal,
            TokenKind::Equal,
            TokenKind::NumberValue,
            TokenKind::CloseBracket,
            TokenKind::And,
            TokenKind::Literal,
            TokenKind::Blank,
        ]
    );
}

#[test]
fn test_quoted_field() {
    assert_eq!(
        significant("\"First Name\" starts with 'An'"),
        vec![
            (TokenKind::Literal, "First Name".to_string()),
            (TokenKind::StartWith, "starts with".to_string()),
            (TokenKind::StringValue, "An".to_string()),
        ]
    );
}

// ============================================================================
// Positions and Whitespace
// ============================================================================

#[test]
fn test_positions() {
    let tokens = tokenize("age >= 18").unwrap();
    let positions: Vec<(TokenKind, usize)> = tokens.iter().map(|t| (t.kind, t.position)).collect();
    assert_eq!(
        positions,
        vec![
            (TokenKind::Literal, 0),
            (TokenKind::Space, 3),
            (TokenKind::GreaterThanOrEqual, 4),
            (TokenKind::Space, 6),
            (TokenKind::NumberValue, 7),
        ]
    );
}

#[test]
fn test_whitespace_runs_are_single_tokens() {
    let tokens = tokenize("a  =\t 1").unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[1].literal, "  ");
    assert_eq!(tokens[3].literal, "\t ");
}

#[test]
fn test_next_token_until_end() {
    let mut lexer = Lexer::new("a blank");
    let mut count = 0;
    while lexer.next_token().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
    assert_eq!(lexer.next_token().unwrap(), None);
}

#[test]
fn test_empty_input() {
    assert!(tokenize("").unwrap().is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_literal() {
    assert_eq!(
        tokenize("a = 'open"),
        Err(TokenizeError::UnterminatedLiteral { position: 4 })
    );
}

#[test]
fn test_lone_exclamation() {
    assert_eq!(
        tokenize("a ! b"),
        Err(TokenizeError::UnexpectedCharacter {
            character: '!',
            position: 2
        })
    );
}

#[test]
fn test_invalid_escape() {
    assert!(matches!(
        tokenize(r"a = 'x\q'"),
        Err(TokenizeError::InvalidEscape { character: 'q', .. })
    ));
}

#[test]
fn test_unexpected_character() {
    assert_eq!(
        tokenize("(a = 1) # b"),
        Err(TokenizeError::UnexpectedCharacter {
            character: '#',
            position: 8
        })
    );
}
