use thiserror::Error;

use crate::{builder::BuildError, config::ConfigError, lexer::TokenizeError, parser::ParseError};

/// Any failure of the filter pipeline, keeping the stage that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
