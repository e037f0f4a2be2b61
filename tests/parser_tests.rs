// tests/parser_tests.rs

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use filtex::ast::{Expression, FieldType, Logic, Operator};
use filtex::lexer::tokenize;
use filtex::metadata::{Field, Fields, Lookup};
use filtex::parser::{ParseError, Parser, parse, validate};
use filtex::value::Value;

fn fields() -> Fields {
    Fields::new(vec![
        Field::new("name", FieldType::String).with_label("Full Name"),
        Field::new("age", FieldType::Number),
        Field::new("active", FieldType::Boolean),
        Field::new("born", FieldType::Date),
        Field::new("opens", FieldType::Time),
        Field::new("seen", FieldType::DateTime),
        Field::new("tags", FieldType::StringArray),
        Field::new("note", FieldType::String).nullable(),
        Field::new("status", FieldType::String).with_lookups(vec![
            Lookup::new("Active", "A"),
            Lookup::new("Closed", "C"),
        ]),
    ])
}

fn parse_str(input: &str) -> Result<Expression, ParseError> {
    let tokens =
        tokenize(input).unwrap_or_else(|e| panic!("Failed to tokenize {:?}: {}", input, e));
    parse(tokens, &fields())
}

fn leaf(
    field_type: FieldType,
    field: &str,
    operator: Operator,
    value: impl Into<Value>,
) -> Expression {
    Expression::operator(field_type, field, operator, value)
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_simple_comparisons() {
    let test_cases = vec![
        ("age > 30", leaf(FieldType::Number, "age", Operator::GreaterThan, 30)),
        ("age = -1.5", leaf(FieldType::Number, "age", Operator::Equal, -1.5)),
        ("name = Ada", leaf(FieldType::String, "name", Operator::Equal, "Ada")),
        ("name contains 'da'", leaf(FieldType::String, "name", Operator::Contain, "da")),
        ("name not starts with A", leaf(FieldType::String, "name", Operator::NotStartWith, "A")),
        ("active = 1", leaf(FieldType::Boolean, "active", Operator::Equal, true)),
        ("active != false", leaf(FieldType::Boolean, "active", Operator::NotEqual, false)),
        ("note blank", leaf(FieldType::String, "note", Operator::Blank, Value::Null)),
        ("tags not blank", leaf(FieldType::StringArray, "tags", Operator::NotBlank, Value::Null)),
        ("tags contains red", leaf(FieldType::StringArray, "tags", Operator::Contain, "red")),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse_str(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_numbers_are_coerced_from_strings() {
    assert_eq!(
        parse_str("age = '42'").unwrap(),
        leaf(FieldType::Number, "age", Operator::Equal, 42)
    );
}

#[test]
fn test_temporal_values() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let test_cases = vec![
        ("born > 2024-01-31", leaf(FieldType::Date, "born", Operator::GreaterThan, date)),
        ("born > 01/31/2024", leaf(FieldType::Date, "born", Operator::GreaterThan, date)),
        (
            "opens < '9:30 AM'",
            leaf(
                FieldType::Time,
                "opens",
                Operator::LessThan,
                NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            ),
        ),
        (
            "opens = 1h30m",
            leaf(
                FieldType::Time,
                "opens",
                Operator::Equal,
                NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
            ),
        ),
        (
            "seen >= 2024-01-31 10:30",
            leaf(
                FieldType::DateTime,
                "seen",
                Operator::GreaterThanOrEqual,
                Utc.with_ymd_and_hms(2024, 1, 31, 10, 30, 0).unwrap(),
            ),
        ),
        (
            "seen < 2024-01-31",
            leaf(
                FieldType::DateTime,
                "seen",
                Operator::LessThan,
                Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
            ),
        ),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse_str(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

// ============================================================================
// Field Resolution
// ============================================================================

#[test]
fn test_field_by_label_and_case() {
    let expected = leaf(FieldType::String, "name", Operator::Equal, "Ada");
    for input in ["\"FULL NAME\" = 'Ada'", "'full name' = 'Ada'", "NAME = 'Ada'"] {
        assert_eq!(parse_str(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_lookup_values() {
    let test_cases = vec![
        ("status = active", Value::from("A")),
        ("status = 'CLOSED'", Value::from("C")),
        ("status = c", Value::from("C")),
        ("status in (active, closed)", Value::from(vec!["A", "C"])),
    ];

    for (input, expected) in test_cases {
        match parse_str(input).unwrap() {
            Expression::Operator { value, .. } => {
                assert_eq!(value, expected, "Failed for input: {}", input)
            }
            other => panic!("Expected a leaf for {}, got {:?}", input, other),
        }
    }

    assert!(matches!(
        parse_str("status = open"),
        Err(ParseError::InvalidValue { ref value, .. }) if value == "open"
    ));
}

// ============================================================================
// Value Lists
// ============================================================================

#[test]
fn test_value_lists() {
    let test_cases = vec![
        ("age in 1, 2, 3", Value::from(vec![1, 2, 3])),
        ("age in 1/2", Value::from(vec![1, 2])),
        ("age in 1/2/3", Value::from(vec![1, 2, 3])),
        ("age in 10/20/30", Value::from(vec![10, 20, 30])),
        ("name in a/b/c", Value::from(vec!["a", "b", "c"])),
        ("name in 1/2/3", Value::from(vec!["1", "2", "3"])),
        ("age in (1, 2)", Value::from(vec![1, 2])),
        ("age in (5)", Value::from(vec![5])),
        ("age in 5", Value::from(5)),
        ("name not in ('a', 'b')", Value::from(vec!["a", "b"])),
    ];

    for (input, expected) in test_cases {
        match parse_str(input).unwrap() {
            Expression::Operator { value, .. } => {
                assert_eq!(value, expected, "Failed for input: {}", input)
            }
            other => panic!("Expected a leaf for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_dates_in_lists() {
    let expected = Value::from(vec![
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    ]);
    match parse_str("born in 01/31/2024, 02/01/2024").unwrap() {
        Expression::Operator { value, .. } => assert_eq!(value, expected),
        other => panic!("Expected a leaf, got {:?}", other),
    }
}

// ============================================================================
// Logic and Grouping
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    let a = leaf(FieldType::Number, "age", Operator::Equal, 1);
    let b = leaf(FieldType::Number, "age", Operator::Equal, 2);
    let c = leaf(FieldType::Number, "age", Operator::Equal, 3);

    assert_eq!(
        parse_str("age = 1 or age = 2 and age = 3").unwrap(),
        Expression::or(vec![a.clone(), Expression::and(vec![b.clone(), c.clone()])])
    );
    assert_eq!(
        parse_str("(age = 1 or age = 2) and age = 3").unwrap(),
        Expression::and(vec![Expression::or(vec![a, b]), c])
    );
}

#[test]
fn test_runs_stay_flat() {
    match parse_str("age = 1 and age = 2 && age = 3").unwrap() {
        Expression::Logic { logic, expressions } => {
            assert_eq!(logic, Logic::And);
            assert_eq!(expressions.len(), 3);
        }
        other => panic!("Expected a logic node, got {:?}", other),
    }
}

#[test]
fn test_nested_groups() {
    let age = leaf(FieldType::Number, "age", Operator::Equal, 1);
    let note = leaf(FieldType::String, "note", Operator::Blank, Value::Null);
    let tags = leaf(FieldType::StringArray, "tags", Operator::Contain, "x");
    let name = leaf(FieldType::String, "name", Operator::Equal, "y");

    assert_eq!(
        parse_str("((age = 1)) or (note blank and (tags contains x or name = y))").unwrap(),
        Expression::or(vec![
            Expression::and(vec![age]),
            Expression::and(vec![note, Expression::or(vec![tags, name])]),
        ])
    );
}

#[test]
fn test_bracketed_comparison_keeps_its_group() {
    let age = leaf(FieldType::Number, "age", Operator::Equal, 1);
    let test_cases = vec![
        ("age = 1", age.clone()),
        ("(age = 1)", Expression::and(vec![age.clone()])),
        (
            "(age = 1) and age = 1",
            Expression::and(vec![Expression::and(vec![age.clone()]), age.clone()]),
        ),
        (
            "age = 1 or (age = 1)",
            Expression::or(vec![age.clone(), Expression::and(vec![age])]),
        ),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse_str(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_as_value() {
    assert_eq!(
        parse_str("name = and or name = or").unwrap(),
        Expression::or(vec![
            leaf(FieldType::String, "name", Operator::Equal, "and"),
            leaf(FieldType::String, "name", Operator::Equal, "or"),
        ])
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_field() {
    assert_eq!(
        parse_str("unknown = 1"),
        Err(ParseError::InvalidField {
            field: "unknown".to_string(),
            position: 0
        })
    );
}

#[test]
fn test_invalid_operator() {
    let test_cases = vec![
        ("age contains 1", "contains", 4),
        ("age maybe 1", "maybe", 4),
        ("name > 'a'", ">", 5),
        ("status contains a", "contains", 7),
        ("tags = red", "=", 5),
        ("name blank", "blank", 5),
    ];

    for (input, operator, position) in test_cases {
        match parse_str(input) {
            Err(ParseError::InvalidOperator {
                operator: found,
                position: at,
                ..
            }) => {
                assert_eq!(found, operator, "Failed for input: {}", input);
                assert_eq!(at, position, "Failed for input: {}", input);
            }
            other => panic!("Expected InvalidOperator for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_invalid_value() {
    let test_cases = vec![
        ("age = abc", "abc", 6),
        ("active = yes", "yes", 9),
        ("born = 2024-13-45", "2024-13-45", 7),
        ("opens = soon", "soon", 8),
        ("age in 1, x", "x", 10),
    ];

    for (input, value, position) in test_cases {
        match parse_str(input) {
            Err(ParseError::InvalidValue {
                value: found,
                position: at,
                ..
            }) => {
                assert_eq!(found, value, "Failed for input: {}", input);
                assert_eq!(at, position, "Failed for input: {}", input);
            }
            other => panic!("Expected InvalidValue for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_invalid_token() {
    let test_cases = vec![
        ("age = 1 age = 2", "age", 8),
        ("age = 1, 2", ",", 7),
        ("age = = 1", "=", 6),
        ("age = 1 and or age = 2", "or", 12),
        ("and age = 1", "and", 0),
        ("note blank 1", "1", 11),
        ("() and age = 1", ")", 1),
    ];

    for (input, literal, position) in test_cases {
        match parse_str(input) {
            Err(ParseError::InvalidToken {
                literal: found,
                position: at,
            }) => {
                assert_eq!(found, literal, "Failed for input: {}", input);
                assert_eq!(at, position, "Failed for input: {}", input);
            }
            other => panic!("Expected InvalidToken for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_invalid_last_token() {
    let test_cases = vec![
        ("age = 1 and", "and"),
        ("age >", ">"),
        ("age", "age"),
        ("age in 1,", ","),
    ];

    for (input, literal) in test_cases {
        match parse_str(input) {
            Err(ParseError::InvalidLastToken { literal: found, .. }) => {
                assert_eq!(found, literal, "Failed for input: {}", input)
            }
            other => panic!("Expected InvalidLastToken for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_mismatched_brackets() {
    assert_eq!(
        parse_str("(age = 1"),
        Err(ParseError::MismatchedBrackets { position: 0 })
    );
    assert_eq!(
        parse_str("age = 1)"),
        Err(ParseError::MismatchedBrackets { position: 7 })
    );
    assert_eq!(
        parse_str("((age = 1)"),
        Err(ParseError::MismatchedBrackets { position: 0 })
    );
}

#[test]
fn test_empty_expression() {
    for input in ["", "   "] {
        assert!(
            matches!(parse_str(input), Err(ParseError::CouldNotBeValidated(_))),
            "Failed for input: {:?}",
            input
        );
    }
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validate() {
    let fields = fields();
    let ok = tokenize("age > 1 and (note blank or tags contains x)").unwrap();
    assert_eq!(validate(&ok, &fields), Ok(()));

    let bad = tokenize("age > x").unwrap();
    assert!(matches!(validate(&bad, &fields), Err(ParseError::InvalidValue { .. })));
}

#[test]
fn test_check_grammar_without_resolution() {
    let fields = fields();
    let tokens = tokenize("nothing = 1 and other blank").unwrap();
    let parser = Parser::new(tokens, &fields);
    assert_eq!(parser.check_grammar(), Ok(()));
    assert!(matches!(parser.parse(), Err(ParseError::InvalidField { .. })));
}
