//! Conversions between runtime [`Value`]s and the canonical form of each
//! field type.
//!
//! Every function here is pure and total: unsupported input yields a
//! [`CastError`], never a panic. Textual dates and times are tried against
//! an ordered list of layouts and the first successful parse wins.

use std::{str::FromStr, sync::LazyLock};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use crate::{ast::FieldType, value::Value};

/// A value could not be converted to the requested shape.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot cast {found} '{value}' to {target}")]
pub struct CastError {
    pub target: &'static str,
    pub found: &'static str,
    pub value: String,
}

impl CastError {
    fn new(target: &'static str, value: &Value) -> Self {
        CastError {
            target,
            found: value.type_name(),
            value: describe(value),
        }
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Layouts carrying their own offset.
const OFFSET_DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%d %b %y %H:%M %z",
    "%a %b %e %H:%M:%S %z %Y",
];

/// Layouts without offset, read as UTC.
const NAIVE_DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
    "%a, %d %b %Y",
];

const TIME_LAYOUTS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M%p",
];

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?(?:h|ms|m|s))+$").expect("duration pattern is valid")
});

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(h|ms|m|s)").expect("duration part pattern is valid")
});

/// Convert to the canonical string form.
///
/// Numbers print without a trailing `.0`, dates as `YYYY-MM-DD`, times as
/// `HH:MM:SS` and date-times as RFC 3339.
pub fn to_string(value: &Value) -> Result<String, CastError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(format_number(*n)),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
        Value::Time(t) => Ok(t.format("%H:%M:%S%.f").to_string()),
        Value::DateTime(dt) => Ok(dt.to_rfc3339()),
        Value::Null | Value::Array(_) => Err(CastError::new("string", value)),
    }
}

/// Convert to a number. Booleans map to 1/0, strings must hold a decimal
/// or scientific literal.
pub fn to_number(value: &Value) -> Result<f64, CastError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s).ok_or_else(|| CastError::new("number", value)),
        _ => Err(CastError::new("number", value)),
    }
}

/// Convert to a boolean: `true`/`false` words (any case) and 0/1.
pub fn to_boolean(value: &Value) -> Result<bool, CastError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Number(n) if *n == 0.0 => Ok(false),
        Value::Number(n) if *n == 1.0 => Ok(true),
        Value::String(s) => parse_boolean(s).ok_or_else(|| CastError::new("boolean", value)),
        _ => Err(CastError::new("boolean", value)),
    }
}

/// Convert to a calendar day. Date-times are truncated to their day in
/// their own offset; numbers are Unix timestamps in seconds.
pub fn to_date(value: &Value) -> Result<NaiveDate, CastError> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::DateTime(dt) => Ok(dt.date_naive()),
        Value::Number(n) => from_timestamp(*n)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| CastError::new("date", value)),
        Value::String(s) => {
            let s = s.trim();
            parse_date_str(s)
                .or_else(|| parse_datetime_str(s).map(|dt| dt.date_naive()))
                .ok_or_else(|| CastError::new("date", value))
        }
        _ => Err(CastError::new("date", value)),
    }
}

/// Convert to a time of day.
///
/// Besides clock layouts, strings may hold a duration (`1h30m`) or a bare
/// number of seconds since midnight.
pub fn to_time(value: &Value) -> Result<NaiveTime, CastError> {
    match value {
        Value::Time(t) => Ok(*t),
        Value::DateTime(dt) => Ok(dt.time()),
        Value::Number(n) => time_from_seconds(*n).ok_or_else(|| CastError::new("time", value)),
        Value::String(s) => {
            let s = s.trim();
            parse_time_str(s)
                .or_else(|| s.parse::<u32>().ok().and_then(|n| time_from_seconds(n as f64)))
                .or_else(|| parse_datetime_str(s).map(|dt| dt.time()))
                .ok_or_else(|| CastError::new("time", value))
        }
        _ => Err(CastError::new("time", value)),
    }
}

/// Seconds since midnight of a time-of-day value.
pub fn to_seconds(value: &Value) -> Result<u32, CastError> {
    to_time(value).map(|t| t.num_seconds_from_midnight())
}

/// Convert to an instant. Offset-less text is read as UTC, dates become
/// midnight UTC, numbers are Unix timestamps in seconds.
pub fn to_datetime(value: &Value) -> Result<DateTime<FixedOffset>, CastError> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Date(d) => Ok(midnight(*d)),
        Value::Number(n) => from_timestamp(*n).ok_or_else(|| CastError::new("datetime", value)),
        Value::String(s) => {
            let s = s.trim();
            parse_datetime_str(s)
                .or_else(|| parse_date_str(s).map(midnight))
                .ok_or_else(|| CastError::new("datetime", value))
        }
        _ => Err(CastError::new("datetime", value)),
    }
}

/// Convert a sequence value to its ordered items.
pub fn to_array(value: &Value) -> Result<Vec<Value>, CastError> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(CastError::new("array", value)),
    }
}

pub fn is_string(value: &Value) -> bool {
    to_string(value).is_ok()
}

pub fn is_number(value: &Value) -> bool {
    to_number(value).is_ok()
}

pub fn is_boolean(value: &Value) -> bool {
    to_boolean(value).is_ok()
}

pub fn is_date(value: &Value) -> bool {
    to_date(value).is_ok()
}

pub fn is_time(value: &Value) -> bool {
    to_time(value).is_ok()
}

pub fn is_datetime(value: &Value) -> bool {
    to_datetime(value).is_ok()
}

pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Convert a value to the canonical variant of a field type.
///
/// Array types convert every item to the base type and keep their order.
///
/// ```
/// use filtex::{coerce::coerce, ast::FieldType, Value};
///
/// assert_eq!(coerce(&Value::from("42"), FieldType::Number).unwrap(), Value::Number(42.0));
/// assert!(coerce(&Value::from("forty"), FieldType::Number).is_err());
/// ```
pub fn coerce(value: &Value, field_type: FieldType) -> Result<Value, CastError> {
    if field_type.is_array() {
        let base = field_type.base();
        return to_array(value)?
            .iter()
            .map(|item| coerce(item, base))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    match field_type {
        FieldType::String => to_string(value).map(Value::String),
        FieldType::Number => to_number(value).map(Value::Number),
        FieldType::Boolean => to_boolean(value).map(Value::Boolean),
        FieldType::Date => to_date(value).map(Value::Date),
        FieldType::Time => to_time(value).map(Value::Time),
        FieldType::DateTime => to_datetime(value).map(Value::DateTime),
        _ => Err(CastError::new("unknown", value)),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    n.to_string()
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Decimal rejects inf/nan spellings that f64 parsing would accept
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .and_then(|d| d.to_f64())
        .or_else(|| {
            let looks_numeric = s
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
            s.parse::<f64>().ok().filter(|n| looks_numeric && n.is_finite())
        })
}

pub(crate) fn parse_boolean(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_date_str(s: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
}

pub(crate) fn parse_datetime_str(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    OFFSET_DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(s, layout).ok())
        .or_else(|| {
            NAIVE_DATETIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

pub(crate) fn parse_time_str(s: &str) -> Option<NaiveTime> {
    TIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveTime::parse_from_str(s, layout).ok())
        .or_else(|| parse_duration(s).and_then(time_from_seconds))
}

/// Seconds in a Go-style duration such as `1h30m` or `90s`.
fn parse_duration(s: &str) -> Option<f64> {
    if !DURATION.is_match(s) {
        return None;
    }

    DURATION_PART.captures_iter(s).try_fold(0.0, |total, caps| {
        let amount: f64 = caps[1].parse().ok()?;
        let unit = match &caps[2] {
            "h" => 3_600.0,
            "m" => 60.0,
            "s" => 1.0,
            _ => 0.001,
        };
        Some(total + amount * unit)
    })
}

fn time_from_seconds(seconds: f64) -> Option<NaiveTime> {
    if !(0.0..SECONDS_PER_DAY).contains(&seconds) {
        return None;
    }
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, nanos.min(999_999_999))
}

fn from_timestamp(seconds: f64) -> Option<DateTime<FixedOffset>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)).map(|dt| dt.fixed_offset())
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(describe).collect();
            format!("[{}]", items.join(", "))
        }
        other => to_string(other).unwrap_or_default(),
    }
}
