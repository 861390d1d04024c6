use serde::{Deserialize, Serialize};
use url::Url;

use crate::canonicalize::{
    canonicalize_hash, canonicalize_hostname, canonicalize_opaque_pathname, canonicalize_password,
    canonicalize_pathname, canonicalize_port, canonicalize_protocol, canonicalize_search,
    canonicalize_username,
};
use crate::errors::{UrlPatternError, UrlPatternResult};
use crate::pattern::escape_pattern_string;
use crate::types::{Component, is_special_scheme};

/// Structured pattern or match input: one optional string per component.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlPatternInit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl UrlPatternInit {
    pub fn get(&self, component: Component) -> Option<&str> {
        self.field(component).as_deref()
    }

    pub fn set(&mut self, component: Component, value: impl Into<String>) {
        *self.field_mut(component) = Some(value.into());
    }

    pub fn contains(&self, component: Component) -> bool {
        self.field(component).is_some()
    }

    fn contains_any(&self, components: &[Component]) -> bool {
        components.iter().any(|c| self.contains(*c))
    }

    fn field(&self, component: Component) -> &Option<String> {
        match component {
            Component::Protocol => &self.protocol,
            Component::Username => &self.username,
            Component::Password => &self.password,
            Component::Hostname => &self.hostname,
            Component::Port => &self.port,
            Component::Pathname => &self.pathname,
            Component::Search => &self.search,
            Component::Hash => &self.hash,
        }
    }

    fn field_mut(&mut self, component: Component) -> &mut Option<String> {
        match component {
            Component::Protocol => &mut self.protocol,
            Component::Username => &mut self.username,
            Component::Password => &mut self.password,
            Component::Hostname => &mut self.hostname,
            Component::Port => &mut self.port,
            Component::Pathname => &mut self.pathname,
            Component::Search => &mut self.search,
            Component::Hash => &mut self.hash,
        }
    }

    fn empty_components() -> Self {
        let mut init = Self::default();
        for component in Component::ALL {
            init.set(component, "");
        }
        init
    }
}

/// A URL string or a structured init, as accepted by construction and matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrInit {
    String(String),
    Init(UrlPatternInit),
}

impl From<&str> for StringOrInit {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StringOrInit {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<UrlPatternInit> for StringOrInit {
    fn from(value: UrlPatternInit) -> Self {
        Self::Init(value)
    }
}

/// Whether an init describes a pattern (values kept verbatim) or a concrete
/// URL (values canonicalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitKind {
    Pattern,
    Url,
}

// Components that, when present, stop the base URL from supplying the
// component at the same position in `Component::ALL`.
const INHERIT_BLOCKERS: [&[Component]; 8] = [
    &[Component::Protocol],
    &[
        Component::Protocol,
        Component::Hostname,
        Component::Port,
        Component::Username,
    ],
    &[
        Component::Protocol,
        Component::Hostname,
        Component::Port,
        Component::Username,
        Component::Password,
    ],
    &[Component::Protocol, Component::Hostname],
    &[Component::Protocol, Component::Hostname, Component::Port],
    &[
        Component::Protocol,
        Component::Hostname,
        Component::Port,
        Component::Pathname,
    ],
    &[
        Component::Protocol,
        Component::Hostname,
        Component::Port,
        Component::Pathname,
        Component::Search,
    ],
    &[
        Component::Protocol,
        Component::Hostname,
        Component::Port,
        Component::Pathname,
        Component::Search,
        Component::Hash,
    ],
];

fn base_component(base: &Url, component: Component) -> String {
    match component {
        Component::Protocol => base.scheme().to_string(),
        Component::Username => base.username().to_string(),
        Component::Password => base.password().unwrap_or_default().to_string(),
        Component::Hostname => base.host_str().unwrap_or_default().to_string(),
        Component::Port => base.port().map(|p| p.to_string()).unwrap_or_default(),
        Component::Pathname => base.path().to_string(),
        Component::Search => base.query().unwrap_or_default().to_string(),
        Component::Hash => base.fragment().unwrap_or_default().to_string(),
    }
}

fn process_base_url_string(value: &str, kind: InitKind) -> String {
    match kind {
        InitKind::Pattern => escape_pattern_string(value),
        InitKind::Url => value.to_string(),
    }
}

fn is_absolute_pathname(value: &str, kind: InitKind) -> bool {
    if value.starts_with('/') {
        return true;
    }
    kind == InitKind::Pattern && (value.starts_with("\\/") || value.starts_with("{/"))
}

/// Fills `init` into a full component set, inheriting from its `baseURL`
/// and canonicalizing values when `kind` is `Url`.
#[tracing::instrument(level = "trace", skip(init), fields(kind=?kind))]
pub(crate) fn process_init(
    init: &UrlPatternInit,
    kind: InitKind,
) -> UrlPatternResult<UrlPatternInit> {
    let mut result = match kind {
        InitKind::Pattern => UrlPatternInit::default(),
        InitKind::Url => UrlPatternInit::empty_components(),
    };

    let base_url = match &init.base_url {
        Some(input) => Some(Url::parse(input).map_err(|source| {
            UrlPatternError::InvalidBaseUrl {
                input: input.clone(),
                source,
            }
        })?),
        None => None,
    };

    if let Some(base) = &base_url {
        for (component, blockers) in Component::ALL.iter().zip(INHERIT_BLOCKERS) {
            let credentials = matches!(component, Component::Username | Component::Password);
            if (credentials && kind == InitKind::Pattern) || init.contains_any(blockers) {
                continue;
            }
            let value = base_component(base, *component);
            let value = match component {
                Component::Port => value,
                _ => process_base_url_string(&value, kind),
            };
            result.set(*component, value);
        }
    }

    if let Some(protocol) = &init.protocol {
        let stripped = protocol.strip_suffix(':').unwrap_or(protocol);
        result.protocol = Some(match kind {
            InitKind::Pattern => stripped.to_string(),
            InitKind::Url => canonicalize_protocol(stripped)?,
        });
    }
    if let Some(username) = &init.username {
        result.username = Some(match kind {
            InitKind::Pattern => username.clone(),
            InitKind::Url => canonicalize_username(username)?,
        });
    }
    if let Some(password) = &init.password {
        result.password = Some(match kind {
            InitKind::Pattern => password.clone(),
            InitKind::Url => canonicalize_password(password)?,
        });
    }
    if let Some(hostname) = &init.hostname {
        result.hostname = Some(match kind {
            InitKind::Pattern => hostname.clone(),
            InitKind::Url => canonicalize_hostname(hostname)?,
        });
    }
    if let Some(port) = &init.port {
        result.port = Some(match kind {
            InitKind::Pattern => port.clone(),
            InitKind::Url => canonicalize_port(port, result.protocol.as_deref())?,
        });
    }
    if let Some(pathname) = &init.pathname {
        let mut value = pathname.clone();
        if let Some(base) = &base_url
            && !base.cannot_be_a_base()
            && !is_absolute_pathname(&value, kind)
        {
            let base_path = process_base_url_string(base.path(), kind);
            if let Some(slash) = memchr::memrchr(b'/', base_path.as_bytes()) {
                value = format!("{}{}", &base_path[..=slash], value);
            }
        }
        result.pathname = Some(match kind {
            InitKind::Pattern => value,
            InitKind::Url => {
                let protocol = result.protocol.as_deref().unwrap_or_default();
                if protocol.is_empty() || is_special_scheme(protocol) {
                    canonicalize_pathname(&value)?
                } else {
                    canonicalize_opaque_pathname(&value)?
                }
            }
        });
    }
    if let Some(search) = &init.search {
        let stripped = search.strip_prefix('?').unwrap_or(search);
        result.search = Some(match kind {
            InitKind::Pattern => stripped.to_string(),
            InitKind::Url => canonicalize_search(stripped)?,
        });
    }
    if let Some(hash) = &init.hash {
        let stripped = hash.strip_prefix('#').unwrap_or(hash);
        result.hash = Some(match kind {
            InitKind::Pattern => stripped.to_string(),
            InitKind::Url => canonicalize_hash(stripped)?,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_with_base(base: &str) -> UrlPatternInit {
        UrlPatternInit {
            base_url: Some(base.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn pattern_inherits_everything_but_credentials_from_base() {
        let init = init_with_base("https://user:pw@example.com:8080/a/b?q=1#h");
        let result = process_init(&init, InitKind::Pattern).unwrap();
        assert_eq!(result.protocol.as_deref(), Some("https"));
        assert_eq!(result.username, None);
        assert_eq!(result.password, None);
        assert_eq!(result.hostname.as_deref(), Some("example.com"));
        assert_eq!(result.port.as_deref(), Some("8080"));
        assert_eq!(result.pathname.as_deref(), Some("/a/b"));
        assert_eq!(result.search.as_deref(), Some("q=1"));
        assert_eq!(result.hash.as_deref(), Some("h"));
    }

    #[test]
    fn url_inherits_credentials_from_base() {
        let init = init_with_base("https://user:pw@example.com/");
        let result = process_init(&init, InitKind::Url).unwrap();
        assert_eq!(result.username.as_deref(), Some("user"));
        assert_eq!(result.password.as_deref(), Some("pw"));
    }

    #[test]
    fn explicit_pathname_stops_inheritance_of_later_components() {
        let mut init = init_with_base("https://example.com/a?q=1#h");
        init.pathname = Some("/x".into());
        let result = process_init(&init, InitKind::Pattern).unwrap();
        assert_eq!(result.hostname.as_deref(), Some("example.com"));
        assert_eq!(result.pathname.as_deref(), Some("/x"));
        assert_eq!(result.search, None);
        assert_eq!(result.hash, None);
    }

    #[test]
    fn relative_pathname_resolves_against_base_directory() {
        let mut init = init_with_base("https://example.com/docs/index.html");
        init.pathname = Some(":page".into());
        let result = process_init(&init, InitKind::Pattern).unwrap();
        assert_eq!(result.pathname.as_deref(), Some("/docs/:page"));
    }

    #[test]
    fn base_values_are_escaped_for_patterns() {
        let init = init_with_base("https://example.com/a:b");
        let result = process_init(&init, InitKind::Pattern).unwrap();
        assert_eq!(result.pathname.as_deref(), Some("/a\\:b"));
    }

    #[test]
    fn url_kind_canonicalizes_and_strips_delimiters() {
        let init = UrlPatternInit {
            protocol: Some("HTTPS:".into()),
            port: Some("443".into()),
            search: Some("?a b".into()),
            hash: Some("#x".into()),
            ..Default::default()
        };
        let result = process_init(&init, InitKind::Url).unwrap();
        assert_eq!(result.protocol.as_deref(), Some("https"));
        assert_eq!(result.port.as_deref(), Some(""));
        assert_eq!(result.search.as_deref(), Some("a%20b"));
        assert_eq!(result.hash.as_deref(), Some("x"));
        assert_eq!(result.hostname.as_deref(), Some(""));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let err = process_init(&init_with_base("not a url"), InitKind::Pattern).unwrap_err();
        assert!(matches!(err, UrlPatternError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn schema_accessors_follow_component_order() {
        let mut init = UrlPatternInit::default();
        init.set(Component::Hostname, "example.com");
        assert!(init.contains(Component::Hostname));
        assert_eq!(init.get(Component::Hostname), Some("example.com"));
        assert_eq!(init.get(Component::Port), None);
    }
}
