//! # Filtex - Syntax and Expression Tree
//!
//! This module defines the vocabulary shared by every stage of the filter
//! compiler: the field types, the operators, the tokens produced by the
//! lexer and the expression tree produced by the parser.
//!
//! ## Architecture Overview
//!
//! - **[field_type]** - Declared kinds of filterable fields (scalar and array)
//! - **[operators]** - The sixteen operators and the and/or combinators
//! - **[tokens]** - Lexical tokens and the adjacency predicates of the grammar
//! - **[expressions]** - Logic and operator nodes walked by the builders
//!
//! ## Quick Start
//!
//! ```text
//! age > 30 and (status = 'active' or role in ('admin', 'owner'))
//! ```
//!
//! parses into
//!
//! ```text
//! And
//! ├── Operator { age, GreaterThan, 30 }
//! └── Or
//!     ├── Operator { status, Equal, "active" }
//!     └── Operator { role, In, ["admin", "owner"] }
//! ```
//!
//! ## Grammar
//!
//! ```text
//! Filter := Or
//! Or     := And ("or" And)*
//! And    := Unary ("and" Unary)*
//! Unary  := "(" Or ")" | Field Operator Value?
//! Value  := Literal | Literal ("," | "/") Value
//! ```
//!
//! Value lists are only legal after `in` / `not in`, and may be wrapped in
//! brackets.
pub mod expressions;
pub mod field_type;
pub mod operators;
pub mod tokens;

pub use expressions::Expression;
pub use field_type::FieldType;
pub use operators::{Logic, Operator, parse_logic, parse_operator};
pub use tokens::{Token, TokenKind};
