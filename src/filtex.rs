use tracing::debug;

use crate::{
    ast::Expression,
    builder::{
        Builder, Condition, Document, DocumentBuilder, MemoryBuilder, Predicate, RelationalBuilder,
    },
    error::Result,
    lexer,
    metadata::Fields,
    parser,
};

/// Filter text in, backend artifact out.
///
/// Holds the declared fields and runs lexing, parsing and one builder per
/// call. It keeps no state between calls and can be shared across threads.
///
/// ```
/// use filtex::{Filtex, FieldType};
/// use filtex::metadata::Field;
///
/// let filtex = Filtex::new(vec![
///     Field::new("name", FieldType::String),
///     Field::new("age", FieldType::Number),
/// ].into());
///
/// let sql = filtex.to_relational("name = 'Ada' and age >= 30").unwrap();
/// assert_eq!(sql.condition, "(name ILIKE $1) AND (age >= $2)");
///
/// assert!(filtex.validate("age contains 3").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filtex {
    fields: Fields,
}

impl Filtex {
    pub fn new(fields: Fields) -> Self {
        Filtex { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Check `text` without building anything.
    pub fn validate(&self, text: &str) -> Result<()> {
        let tokens = lexer::tokenize(text)?;
        parser::validate(&tokens, &self.fields)?;
        Ok(())
    }

    pub fn parse(&self, text: &str) -> Result<Expression> {
        let tokens = lexer::tokenize(text)?;
        Ok(parser::parse(tokens, &self.fields)?)
    }

    pub fn to_memory(&self, text: &str) -> Result<Predicate> {
        let expression = self.parse(text)?;
        Ok(MemoryBuilder::new().build(Some(&expression))?)
    }

    pub fn to_document(&self, text: &str) -> Result<Document> {
        let expression = self.parse(text)?;
        let document = DocumentBuilder::new().build(Some(&expression))?;
        debug!(document = %document, "built document filter");
        Ok(document)
    }

    pub fn to_relational(&self, text: &str) -> Result<Condition> {
        self.to_relational_from(text, 1)
    }

    /// Like [`Filtex::to_relational`] with the first placeholder numbered
    /// `start`.
    pub fn to_relational_from(&self, text: &str, start: usize) -> Result<Condition> {
        let expression = self.parse(text)?;
        let condition = RelationalBuilder::starting_at(start).build(Some(&expression))?;
        debug!(
            condition = %condition.condition,
            args = condition.args.len(),
            "built relational condition"
        );
        Ok(condition)
    }
}
