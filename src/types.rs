use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

pub type GroupNameList = SmallVec<[String; 4]>;

pub const FULL_WILDCARD_REGEXP: &str = ".*";

const SPECIAL_SCHEMES: [(&str, Option<&str>); 6] = [
    ("ftp", Some("21")),
    ("file", None),
    ("http", Some("80")),
    ("https", Some("443")),
    ("ws", Some("80")),
    ("wss", Some("443")),
];

/// One of the eight URL parts a pattern matches independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Protocol,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Component::Protocol,
        Component::Username,
        Component::Password,
        Component::Hostname,
        Component::Port,
        Component::Pathname,
        Component::Search,
        Component::Hash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Protocol => "protocol",
            Component::Username => "username",
            Component::Password => "password",
            Component::Hostname => "hostname",
            Component::Port => "port",
            Component::Pathname => "pathname",
            Component::Search => "search",
            Component::Hash => "hash",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn special_schemes() -> impl Iterator<Item = &'static str> {
    SPECIAL_SCHEMES.iter().map(|(scheme, _)| *scheme)
}

pub fn is_special_scheme(scheme: &str) -> bool {
    SPECIAL_SCHEMES.iter().any(|(s, _)| *s == scheme)
}

pub fn special_scheme_default_port(scheme: &str) -> Option<&'static str> {
    SPECIAL_SCHEMES
        .iter()
        .find(|(s, _)| *s == scheme)
        .and_then(|(_, port)| *port)
}
