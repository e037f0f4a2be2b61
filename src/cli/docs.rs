//! Reference text for the `filtex docs` command

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Types,
    Fields,
    Backends,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "types" | "type" | "values" => Some(Self::Types),
            "fields" | "field" | "config" => Some(Self::Fields),
            "backends" | "backend" | "builders" => Some(Self::Backends),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"FILTEX DOCUMENTATION

Filtex compiles end-user filter text such as

  age >= 18 and (status = 'active' or role in ('admin', 'owner'))

into an in-memory predicate, a document-store query or a parameterized SQL
condition. Field names are checked against a JSON file of declared fields.

DOCUMENTATION CATEGORIES

  syntax        Comparisons, and/or, brackets and value lists
  operators     The sixteen operators and which field types accept them
  types         Field types and how values are read for each
  fields        The field declaration file
  backends      What each output looks like

QUICK REFERENCE

  field = value               Comparison
  field blank                 Operator without a value
  a = 1 and b = 2             Both
  a = 1 or b = 2              Either (and binds tighter)
  (a = 1 or b = 2) and c = 3  Grouping
  role in ('a', 'b')          Value list

Run 'filtex docs <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        Some(DocCategory::Fields) => Ok(FIELDS_DOC),
        Some(DocCategory::Backends) => Ok(BACKENDS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Filter Expressions

COMPARISON
  field operator value
    A field name or label, an operator, then a value. Blank and not blank
    take no value.

    Examples:
      age > 30
      "First Name" starts with 'An'
      note blank

    Constraints:
      - Fields are matched by name or label, ignoring case
      - Quote fields and values containing spaces with ' or "
      - Escapes inside quotes: \n \t \r \' \" \\

LOGIC
  and / &&    Both sides must hold
  or  / ||    Either side must hold

    "and" binds tighter than "or":
      a = 1 or b = 2 and c = 3    means    a = 1 or (b = 2 and c = 3)

GROUPING
  ( ... )
    Brackets override precedence and may nest.

    Example:
      (a = 1 or b = 2) and c = 3

VALUE LISTS
  field in v1, v2, v3
  field in (v1, v2, v3)
  field not in v1/v2
    Only "in" and "not in" take several values. Values are separated by
    commas or slashes; a slash inside a date such as 01/02/2024 is part of
    the date.

DATES AND TIMES
  created > 2024-01-31
  created > 2024-01-31 10:30
  opens < '9:30 AM'
    A date followed by a time is read as one date-time value.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

  Operator            Also written as            Field types
  =                   ==, eq, equals, is         scalars
  !=                  <>, ne, is not             scalars
  contains            contain                    string, arrays
  not contains        does not contain           string, arrays
  starts with         start-with, startsWith     string
  not starts with                                string
  ends with           end-with, endsWith         string
  not ends with                                  string
  blank               empty, is blank            string, arrays
  not blank           not empty, is not blank    string, arrays
  >                   gt                         number, date, time, datetime
  >=                  gte, ge                    number, date, time, datetime
  <                   lt                         number, date, time, datetime
  <=                  lte, le                    number, date, time, datetime
  in                                             scalars
  not in              not-in, notIn              scalars

  Operator names ignore case, spaces, dashes and underscores.

WHICH OPERATORS A FIELD ACCEPTS
  - every scalar field:           =, !=, in, not in
  - string without lookups:       contains, starts with, ends with, negations
  - number, date, time, datetime
    without lookups:              >, >=, <, <=
  - nullable string:              blank, not blank
  - array fields:                 contains, not contains, blank, not blank

  Text comparisons ignore case.
"#;

const TYPES_DOC: &str = r#"TYPES - Field Types and Values

  string      Any text
  number      42, -1.5, 1e3
  boolean     true, false, 1, 0
  date        2024-01-31, 01/31/2024, 31.01.2024, Jan 31 2024, ...
  time        10:30, 10:30:15, 9:30 AM, or a duration such as 1h30m
  datetime    2024-01-31T10:30:00Z, 2024-01-31 10:30, RFC 2822, ...

  Each type has an array form: string-array, number-array, ... (also
  written string[]). Array fields hold several values of their base type.

CONVERSION
  Values are converted to the field's type while parsing; a value that
  cannot be converted is rejected with its position. Date-times without an
  offset are read as UTC. A date compared against a date-time means
  midnight UTC of that day.
"#;

const FIELDS_DOC: &str = r#"FIELDS - Declaration File

  [
    {"name": "status", "type": "string", "label": "Status",
     "lookups": [{"name": "Active", "value": "A"},
                 {"name": "Closed", "value": "C"}]},
    {"name": "age", "type": "number"},
    {"name": "tags", "type": "string-array"},
    {"name": "note", "type": "string", "nullable": true}
  ]

KEYS
  name        Column or property name used in the output (required)
  type        Field type, see 'filtex docs types' (required)
  label       Alternative name accepted in filter text
  nullable    Grants blank / not blank on string fields
  lookups     Allowed values; filter text may use either the name or the
              value, the value is what ends up in the output

  Names must be unique ignoring case.
"#;

const BACKENDS_DOC: &str = r#"BACKENDS - Outputs

MEMORY (filtex eval)
  Matches JSON records directly. Record values are converted to the field
  type on the fly; values that cannot be converted do not match.

DOCUMENT (filtex compile --target document)
  status = 'A' and age > 30
    {"$and": [{"status": {"$eq": "A"}}, {"age": {"$gt": 30}}]}

  name contains 'an'
    {"name": {"$regex": "an", "$options": "i"}}

  Dates are written as {"$date": "..."}, times as seconds since midnight.

RELATIONAL (filtex compile --target relational)
  status = 'A' and age > 30
    {"condition": "(status ILIKE $1) AND (age > $2)", "args": ["A", 30]}

  tags blank
    {"condition": "ARRAY_LENGTH(tags, 1) = 0", "args": []}

  Placeholders are numbered in the order of the args, starting at 1 or at
  --start.
"#;
