use crate::types::Component;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CanonicalizeError {
    #[error("'{value}' is not a valid {component}")]
    InvalidValue { component: Component, value: String },
    #[error("'{value}' contains '{invalid}', which is not allowed in an IPv6 hostname")]
    InvalidIpv6Character { value: String, invalid: char },
}

pub type CanonicalizeResult<T> = Result<T, CanonicalizeError>;
