pub mod ast;
pub mod builder;
pub mod coerce;
pub mod config;
pub mod error;
pub mod filtex;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expression, FieldType, Logic, Operator, Token, TokenKind};
pub use builder::{BuildError, Builder};
pub use coerce::CastError;
pub use config::{ConfigError, load_fields};
pub use error::{Error, Result};
pub use filtex::Filtex;
pub use lexer::{Lexer, TokenizeError, tokenize};
pub use metadata::{Field, Fields, Lookup, Metadata};
pub use parser::{ParseError, Parser, parse, validate};
pub use value::{Record, Value};
