use crate::canonicalize::CanonicalizeError;
use crate::pattern::PatternError;
use crate::types::Component;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlPatternError {
    #[error("a base URL cannot be combined with a structured pattern input; set its baseURL field instead")]
    BaseUrlWithInit,
    #[error("base URL '{input}' is invalid: {source}")]
    InvalidBaseUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{component} pattern is invalid: {source}")]
    Pattern {
        component: Component,
        #[source]
        source: PatternError,
    },
    #[error("{component} regular expression '{regexp}' failed to compile: {source}")]
    Regex {
        component: Component,
        regexp: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Canonicalize(#[from] CanonicalizeError),
}

impl UrlPatternError {
    /// The component whose pattern failed to compile, if any.
    pub fn component(&self) -> Option<Component> {
        match self {
            Self::Pattern { component, .. } | Self::Regex { component, .. } => Some(*component),
            _ => None,
        }
    }
}

pub type UrlPatternResult<T> = Result<T, UrlPatternError>;
