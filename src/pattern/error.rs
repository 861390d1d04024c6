use thiserror::Error;

use super::lexer::TokenType;
use crate::canonicalize::CanonicalizeError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern '{pattern}' has an invalid token '{value}' at index {index}")]
    InvalidToken {
        pattern: String,
        value: String,
        index: usize,
    },
    #[error("pattern '{pattern}' expected {expected:?} at index {index} but found {found:?}")]
    UnexpectedToken {
        pattern: String,
        expected: TokenType,
        found: TokenType,
        index: usize,
    },
    #[error("pattern '{pattern}' declares group '{name}' more than once")]
    DuplicateGroupName { pattern: String, name: String },
    #[error("regular expression for group '{name}' in pattern '{pattern}' declares a capturing group")]
    CapturingGroupInRegexp { pattern: String, name: String },
    #[error("regular expression for group '{name}' in pattern '{pattern}' is invalid: {error}")]
    RegexpInvalid {
        pattern: String,
        name: String,
        error: String,
    },
    #[error(transparent)]
    Canonicalize(#[from] CanonicalizeError),
}

pub type PatternResult<T> = Result<T, PatternError>;
