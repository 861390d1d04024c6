use serde::{Deserialize, Serialize};
use url::Url;

use super::Inputs;
use crate::errors::{UrlPatternError, UrlPatternResult};
use crate::init::{InitKind, StringOrInit, process_init};
use crate::types::Component;

/// Concrete component values of a resolved match input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInput {
    pub protocol: String,
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl MatchInput {
    pub fn get(&self, component: Component) -> &str {
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

    pub fn get_mut(&mut self, component: Component) -> &mut String {
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

    fn from_url(url: &Url) -> Self {
        let protocol = url::quirks::protocol(url);
        let search = url::quirks::search(url);
        let hash = url::quirks::hash(url);
        Self {
            protocol: protocol.strip_suffix(':').unwrap_or(protocol).to_string(),
            username: url::quirks::username(url).to_string(),
            password: url::quirks::password(url).to_string(),
            hostname: url::quirks::hostname(url).to_string(),
            port: url::quirks::port(url).to_string(),
            pathname: url::quirks::pathname(url).to_string(),
            search: search.strip_prefix('?').unwrap_or(search).to_string(),
            hash: hash.strip_prefix('#').unwrap_or(hash).to_string(),
        }
    }
}

/// Resolves a match input into component values. `Ok(None)` means the input
/// cannot be a URL and therefore matches nothing.
#[tracing::instrument(level = "trace", skip(input), fields(base_url = ?base_url))]
pub fn process_match_input(
    input: &StringOrInit,
    base_url: Option<&str>,
) -> UrlPatternResult<Option<(MatchInput, Inputs)>> {
    let mut inputs = Inputs::new();
    inputs.push(input.clone());

    match input {
        StringOrInit::Init(init) => {
            if base_url.is_some() {
                return Err(UrlPatternError::BaseUrlWithInit);
            }
            match process_init(init, InitKind::Url) {
                Ok(values) => {
                    let mut resolved = MatchInput::default();
                    for component in Component::ALL {
                        let value = values.get(component).unwrap_or_default().to_string();
                        *resolved.get_mut(component) = value;
                    }
                    Ok(Some((resolved, inputs)))
                }
                Err(error) => {
                    tracing::event!(
                        tracing::Level::DEBUG,
                        operation = "process_match_input",
                        reason = %error
                    );
                    Ok(None)
                }
            }
        }
        StringOrInit::String(url) => {
            let base = match base_url {
                Some(base) => {
                    inputs.push(StringOrInit::String(base.to_string()));
                    match Url::parse(base) {
                        Ok(parsed) => Some(parsed),
                        Err(error) => {
                            tracing::event!(
                                tracing::Level::DEBUG,
                                operation = "process_match_input",
                                base = %base,
                                reason = %error
                            );
                            return Ok(None);
                        }
                    }
                }
                None => None,
            };

            match Url::options().base_url(base.as_ref()).parse(url) {
                Ok(parsed) => Ok(Some((MatchInput::from_url(&parsed), inputs))),
                Err(error) => {
                    tracing::event!(
                        tracing::Level::DEBUG,
                        operation = "process_match_input",
                        input = %url,
                        reason = %error
                    );
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::UrlPatternInit;

    #[test]
    fn resolves_string_against_base() {
        let input = StringOrInit::from("../b?x=1#top");
        let (values, inputs) = process_match_input(&input, Some("https://example.com:8443/a/c"))
            .unwrap()
            .unwrap();
        assert_eq!(values.protocol, "https");
        assert_eq!(values.hostname, "example.com");
        assert_eq!(values.port, "8443");
        assert_eq!(values.pathname, "/b");
        assert_eq!(values.search, "x=1");
        assert_eq!(values.hash, "top");
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn default_port_is_empty() {
        let input = StringOrInit::from("https://example.com:443/");
        let (values, _) = process_match_input(&input, None).unwrap().unwrap();
        assert_eq!(values.port, "");
    }

    #[test]
    fn unparsable_input_resolves_to_none() {
        let input = StringOrInit::from("/relative/only");
        assert!(process_match_input(&input, None).unwrap().is_none());
        assert!(
            process_match_input(&input, Some("not a base"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn init_with_separate_base_is_an_error() {
        let input = StringOrInit::from(UrlPatternInit::default());
        let err = process_match_input(&input, Some("https://example.com")).unwrap_err();
        assert!(matches!(err, UrlPatternError::BaseUrlWithInit));
    }

    #[test]
    fn init_components_default_to_empty() {
        let input = StringOrInit::from(UrlPatternInit {
            pathname: Some("/a b".into()),
            ..Default::default()
        });
        let (values, inputs) = process_match_input(&input, None).unwrap().unwrap();
        assert_eq!(values.pathname, "/a%20b");
        assert_eq!(values.protocol, "");
        assert_eq!(inputs.len(), 1);
    }
}
