mod encode;
mod error;

pub use encode::{
    canonicalize_hash, canonicalize_hostname, canonicalize_ipv6_hostname,
    canonicalize_opaque_pathname, canonicalize_password, canonicalize_pathname,
    canonicalize_port, canonicalize_protocol, canonicalize_search, canonicalize_username,
};
pub use error::{CanonicalizeError, CanonicalizeResult};
