//! Declared fields consulted by the parser.
//!
//! A [`Field`] carries its type, label, enumerated lookup values and the
//! set of operators the end user may apply to it. [`Fields`] is the ordered
//! declaration list and the default [`Metadata`] implementation.

use crate::{
    ast::{FieldType, Operator},
    value::Value,
};

/// Resolution of field tokens, by name or label, ignoring case.
///
/// Implementations are built once and only read afterwards, so they are
/// shared by reference across parses.
pub trait Metadata {
    /// Declared type, [`FieldType::Unknown`] if nothing matches.
    fn resolve_type(&self, name_or_label: &str) -> FieldType;

    /// Canonical field name, the input itself if nothing matches.
    fn resolve_name(&self, name_or_label: &str) -> String;

    /// Enumerated values, `None` if nothing matches or none are declared.
    fn resolve_allowed_values(&self, name_or_label: &str) -> Option<&[Lookup]>;

    /// Operators the field accepts, `None` if nothing matches.
    fn resolve_operators(&self, name_or_label: &str) -> Option<&[Operator]>;
}

/// An enumerated `{name, value}` pair of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub name: String,
    pub value: Value,
}

impl Lookup {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Lookup {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A declared filterable field.
///
/// The operator set is derived from the declaration and recomputed by
/// every builder method:
///
/// - scalars: `=`, `!=`, `in`, `not in`
/// - string scalars without lookups: contains, starts with, ends with and
///   their negations
/// - number, date, time and date-time scalars without lookups: `>`, `>=`,
///   `<`, `<=`
/// - arrays: contains, not contains, blank, not blank
/// - nullable string scalars: blank, not blank
///
/// # Examples
///
/// ```
/// use filtex::{ast::{FieldType, Operator}, metadata::Field};
///
/// let status = Field::new("status", FieldType::String).with_label("Status");
/// assert!(status.operators().contains(&Operator::StartWith));
/// assert!(!status.operators().contains(&Operator::Blank));
///
/// let tags = Field::new("tags", FieldType::StringArray);
/// assert!(tags.operators().contains(&Operator::Blank));
/// assert!(!tags.operators().contains(&Operator::Equal));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    label: String,
    field_type: FieldType,
    nullable: bool,
    lookups: Vec<Lookup>,
    operators: Vec<Operator>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let mut field = Field {
            label: name.clone(),
            name,
            field_type,
            nullable: false,
            lookups: Vec::new(),
            operators: Vec::new(),
        };
        field.operators = field.derive_operators();
        field
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self.operators = self.derive_operators();
        self
    }

    pub fn with_lookups(mut self, lookups: Vec<Lookup>) -> Self {
        self.lookups = lookups;
        self.operators = self.derive_operators();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Case-insensitive match against name or label.
    pub fn is(&self, name_or_label: &str) -> bool {
        let wanted = name_or_label.trim().to_lowercase();
        self.name.to_lowercase() == wanted || self.label.to_lowercase() == wanted
    }

    fn derive_operators(&self) -> Vec<Operator> {
        let ft = self.field_type;
        let enumerated = !self.lookups.is_empty();
        let mut operators = Vec::new();

        if ft.is_unknown() {
            return operators;
        }

        if ft.is_array() {
            operators.extend([
                Operator::Contain,
                Operator::NotContain,
                Operator::Blank,
                Operator::NotBlank,
            ]);
            return operators;
        }

        operators.extend([Operator::Equal, Operator::NotEqual]);

        match ft {
            FieldType::String if !enumerated => operators.extend([
                Operator::Contain,
                Operator::NotContain,
                Operator::StartWith,
                Operator::NotStartWith,
                Operator::EndWith,
                Operator::NotEndWith,
            ]),
            FieldType::Number | FieldType::Date | FieldType::Time | FieldType::DateTime
                if !enumerated =>
            {
                operators.extend([
                    Operator::GreaterThan,
                    Operator::GreaterThanOrEqual,
                    Operator::LessThan,
                    Operator::LessThanOrEqual,
                ])
            }
            _ => {}
        }

        if ft == FieldType::String && self.nullable {
            operators.extend([Operator::Blank, Operator::NotBlank]);
        }

        operators.extend([Operator::In, Operator::NotIn]);
        operators
    }
}

/// Ordered list of declared fields.
///
/// When several fields match a token, the first declared one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    fields: Vec<Field>,
}

impl Fields {
    pub fn new(fields: Vec<Field>) -> Self {
        Fields { fields }
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn find(&self, name_or_label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.is(name_or_label))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Fields::new(fields)
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Fields::new(iter.into_iter().collect())
    }
}

impl Metadata for Fields {
    fn resolve_type(&self, name_or_label: &str) -> FieldType {
        self.find(name_or_label)
            .map(Field::field_type)
            .unwrap_or(FieldType::Unknown)
    }

    fn resolve_name(&self, name_or_label: &str) -> String {
        self.find(name_or_label)
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| name_or_label.to_string())
    }

    fn resolve_allowed_values(&self, name_or_label: &str) -> Option<&[Lookup]> {
        self.find(name_or_label)
            .map(Field::lookups)
            .filter(|lookups| !lookups.is_empty())
    }

    fn resolve_operators(&self, name_or_label: &str) -> Option<&[Operator]> {
        self.find(name_or_label).map(Field::operators)
    }
}
