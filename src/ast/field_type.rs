use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Declared data kind of a filterable field.
///
/// Array-ness is orthogonal to the base kind: every scalar has an array
/// counterpart, and [`FieldType::base`] / [`FieldType::array_of`] move
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FieldType {
    /// Sentinel for unresolved fields
    Unknown,

    String,
    Number,
    Boolean,
    Date,
    Time,
    DateTime,

    StringArray,
    NumberArray,
    BooleanArray,
    DateArray,
    TimeArray,
    DateTimeArray,
}

impl FieldType {
    /// Every known field type, scalars first.
    pub const ALL: [FieldType; 12] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::StringArray,
        FieldType::NumberArray,
        FieldType::BooleanArray,
        FieldType::DateArray,
        FieldType::TimeArray,
        FieldType::DateTimeArray,
    ];

    pub fn is_array(self) -> bool {
        matches!(
            self,
            FieldType::StringArray
                | FieldType::NumberArray
                | FieldType::BooleanArray
                | FieldType::DateArray
                | FieldType::TimeArray
                | FieldType::DateTimeArray
        )
    }

    pub fn is_unknown(self) -> bool {
        self == FieldType::Unknown
    }

    /// The scalar kind of this type (identity for scalars).
    pub fn base(self) -> FieldType {
        match self {
            FieldType::StringArray => FieldType::String,
            FieldType::NumberArray => FieldType::Number,
            FieldType::BooleanArray => FieldType::Boolean,
            FieldType::DateArray => FieldType::Date,
            FieldType::TimeArray => FieldType::Time,
            FieldType::DateTimeArray => FieldType::DateTime,
            scalar => scalar,
        }
    }

    /// The array variant of this type's base kind.
    pub fn array_of(self) -> FieldType {
        match self.base() {
            FieldType::String => FieldType::StringArray,
            FieldType::Number => FieldType::NumberArray,
            FieldType::Boolean => FieldType::BooleanArray,
            FieldType::Date => FieldType::DateArray,
            FieldType::Time => FieldType::TimeArray,
            FieldType::DateTime => FieldType::DateTimeArray,
            _ => FieldType::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Unknown => "unknown",
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::StringArray => "string-array",
            FieldType::NumberArray => "number-array",
            FieldType::BooleanArray => "boolean-array",
            FieldType::DateArray => "date-array",
            FieldType::TimeArray => "time-array",
            FieldType::DateTimeArray => "datetime-array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    /// Accepts `string`, `String`, `string-array`, `string_array`,
    /// `stringArray` and `string[]` style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .replace("[]", "array")
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        let (base, array) = match normalized.strip_suffix("array") {
            Some(base) if !base.is_empty() => (base.to_string(), true),
            _ => (normalized, false),
        };

        let scalar = match base.as_str() {
            "string" | "text" => FieldType::String,
            "number" | "numeric" => FieldType::Number,
            "boolean" | "bool" => FieldType::Boolean,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" | "timestamp" => FieldType::DateTime,
            _ => return Err(format!("unknown field type '{}'", s)),
        };

        Ok(if array { scalar.array_of() } else { scalar })
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
