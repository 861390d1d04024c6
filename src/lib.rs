pub mod canonicalize;
mod component;
mod constructor;
pub mod errors;
mod init;
mod matcher;
pub mod options;
pub mod pattern;
pub mod quirks;
pub mod types;

pub use component::CompiledComponent;
pub use errors::{UrlPatternError, UrlPatternResult};
pub use init::{StringOrInit, UrlPatternInit};
pub use matcher::{ComponentMatch, Groups, Inputs, MatchInput, UrlPatternMatch};
pub use options::{UrlPatternOptions, UrlPatternOptionsBuilder};
pub use types::Component;

use crate::canonicalize::{
    canonicalize_hash, canonicalize_hostname, canonicalize_ipv6_hostname,
    canonicalize_opaque_pathname, canonicalize_password, canonicalize_pathname,
    canonicalize_port, canonicalize_protocol, canonicalize_search, canonicalize_username,
};
use crate::constructor::parse_constructor_string;
use crate::init::{InitKind, process_init};
use crate::matcher::{ComponentSet, exec_components, process_match_input, test_components};
use crate::pattern::Options;
use crate::types::special_scheme_default_port;

/// A compiled URL pattern. Immutable once built and safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    components: ComponentSet,
}

impl UrlPattern {
    pub fn new(
        input: impl Into<StringOrInit>,
        base_url: Option<&str>,
    ) -> UrlPatternResult<Self> {
        Self::with_options(input, base_url, UrlPatternOptions::default())
    }

    #[tracing::instrument(level = "trace", skip(input), fields(base_url = ?base_url, ignore_case = options.ignore_case))]
    pub fn with_options(
        input: impl Into<StringOrInit>,
        base_url: Option<&str>,
        options: UrlPatternOptions,
    ) -> UrlPatternResult<Self> {
        let init = construct_pattern_init(input.into(), base_url)?;
        Self::from_init(&init, options)
    }

    pub(crate) fn from_init(
        init: &UrlPatternInit,
        options: UrlPatternOptions,
    ) -> UrlPatternResult<Self> {
        let mut processed = process_init(init, InitKind::Pattern)?;

        for component in Component::ALL {
            if !processed.contains(component) {
                processed.set(component, "*");
            }
        }

        if let Some(protocol) = processed.protocol.as_deref()
            && let Some(port) = processed.port.as_deref()
            && special_scheme_default_port(protocol) == Some(port)
        {
            processed.port = Some(String::new());
        }

        let value = |component| processed.get(component).unwrap_or_default();
        let default_options = Options::default();
        let case_options = default_options.with_ignore_case(options.ignore_case);

        let protocol = CompiledComponent::compile(
            Component::Protocol,
            value(Component::Protocol),
            canonicalize_protocol,
            &default_options,
        )?;
        let username = CompiledComponent::compile(
            Component::Username,
            value(Component::Username),
            canonicalize_username,
            &default_options,
        )?;
        let password = CompiledComponent::compile(
            Component::Password,
            value(Component::Password),
            canonicalize_password,
            &default_options,
        )?;

        let hostname_pattern = value(Component::Hostname);
        let hostname = if is_ipv6_hostname_pattern(hostname_pattern) {
            CompiledComponent::compile(
                Component::Hostname,
                hostname_pattern,
                canonicalize_ipv6_hostname,
                &Options::hostname(),
            )?
        } else {
            CompiledComponent::compile(
                Component::Hostname,
                hostname_pattern,
                canonicalize_hostname,
                &Options::hostname(),
            )?
        };

        let port = CompiledComponent::compile(
            Component::Port,
            value(Component::Port),
            |port: &str| canonicalize_port(port, None),
            &default_options,
        )?;

        let pathname = if protocol.matches_special_scheme() {
            CompiledComponent::compile(
                Component::Pathname,
                value(Component::Pathname),
                canonicalize_pathname,
                &Options::pathname().with_ignore_case(options.ignore_case),
            )?
        } else {
            CompiledComponent::compile(
                Component::Pathname,
                value(Component::Pathname),
                canonicalize_opaque_pathname,
                &case_options,
            )?
        };

        let search = CompiledComponent::compile(
            Component::Search,
            value(Component::Search),
            canonicalize_search,
            &case_options,
        )?;
        let hash = CompiledComponent::compile(
            Component::Hash,
            value(Component::Hash),
            canonicalize_hash,
            &case_options,
        )?;

        Ok(Self {
            components: [
                protocol, username, password, hostname, port, pathname, search, hash,
            ],
        })
    }

    pub fn component(&self, component: Component) -> &CompiledComponent {
        &self.components[component as usize]
    }

    pub fn protocol(&self) -> &str {
        self.component(Component::Protocol).pattern_string()
    }

    pub fn username(&self) -> &str {
        self.component(Component::Username).pattern_string()
    }

    pub fn password(&self) -> &str {
        self.component(Component::Password).pattern_string()
    }

    pub fn hostname(&self) -> &str {
        self.component(Component::Hostname).pattern_string()
    }

    pub fn port(&self) -> &str {
        self.component(Component::Port).pattern_string()
    }

    pub fn pathname(&self) -> &str {
        self.component(Component::Pathname).pattern_string()
    }

    pub fn search(&self) -> &str {
        self.component(Component::Search).pattern_string()
    }

    pub fn hash(&self) -> &str {
        self.component(Component::Hash).pattern_string()
    }

    /// Whether any component uses a custom regular expression group.
    pub fn has_regexp_groups(&self) -> bool {
        self.components.iter().any(CompiledComponent::has_regexp_groups)
    }

    /// Returns `Ok(false)` for inputs that do not resolve to a URL; errors
    /// only when a separate base URL accompanies a structured input.
    #[tracing::instrument(level = "trace", skip_all, fields(base_url = ?base_url))]
    pub fn test(
        &self,
        input: impl Into<StringOrInit>,
        base_url: Option<&str>,
    ) -> UrlPatternResult<bool> {
        let input = input.into();
        Ok(match process_match_input(&input, base_url)? {
            Some((values, _)) => test_components(&self.components, &values),
            None => false,
        })
    }

    #[tracing::instrument(level = "trace", skip_all, fields(base_url = ?base_url))]
    pub fn exec(
        &self,
        input: impl Into<StringOrInit>,
        base_url: Option<&str>,
    ) -> UrlPatternResult<Option<UrlPatternMatch>> {
        let input = input.into();
        Ok(match process_match_input(&input, base_url)? {
            Some((values, inputs)) => exec_components(&self.components, &values, inputs),
            None => None,
        })
    }
}

pub(crate) fn construct_pattern_init(
    input: StringOrInit,
    base_url: Option<&str>,
) -> UrlPatternResult<UrlPatternInit> {
    match input {
        StringOrInit::String(pattern) => {
            let mut init = parse_constructor_string(&pattern)?;
            init.base_url = base_url.map(str::to_string);
            Ok(init)
        }
        StringOrInit::Init(init) => {
            if base_url.is_some() {
                return Err(UrlPatternError::BaseUrlWithInit);
            }
            Ok(init)
        }
    }
}

fn is_ipv6_hostname_pattern(pattern: &str) -> bool {
    pattern.starts_with('[') || pattern.starts_with("{[") || pattern.starts_with("\\[")
}
